pub mod bgp;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod rules;

pub use bgp::{BgpConfig, InjectorBackend};
pub use dns::{DnsConfig, ListenNetwork};
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use rules::RulesConfig;
