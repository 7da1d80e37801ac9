mod logging;

pub use logging::init_logging;

use autobgp_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;

    info!(
        listen = %config.dns.listen,
        upstream = %config.dns.authoritative_dns,
        zones = config.rules.zones.len(),
        backend = config.bgp.backend.as_str(),
        "Configuration loaded"
    );

    Ok(config)
}
