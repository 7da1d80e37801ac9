use autobgp_domain::CliOverrides;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "autobgp")]
#[command(version)]
#[command(about = "DNS forwarder that announces resolved addresses as BGP host routes")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Inbound listen address (ip:port)
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Upstream DNS-over-TLS resolver (host:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Next hop for announced routes
    #[arg(short = 'n', long)]
    next_hop: Option<String>,

    /// Watched zone, may be repeated. Replaces the configured zones.
    #[arg(short = 'z', long = "zone", value_name = "ZONE")]
    zones: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen: cli.listen,
        authoritative_dns: cli.upstream,
        next_hop: cli.next_hop,
        zones: cli.zones,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting autobgp v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config).await?;
    let shutdown = CancellationToken::new();

    let mut server = tokio::spawn(server::start_dns_server(
        config.dns.listen.clone(),
        config.dns.network,
        services.handler,
        shutdown.clone(),
    ));

    let finished = tokio::select! {
        result = &mut server => result,
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
            shutdown.cancel();
            server.await
        }
    };

    match finished {
        Ok(Ok(())) => info!("Server shutdown complete"),
        Ok(Err(e)) => {
            error!(error = %e, "DNS server error");
            return Err(e);
        }
        Err(e) => return Err(anyhow::anyhow!("DNS server task failed: {}", e)),
    }

    Ok(())
}
