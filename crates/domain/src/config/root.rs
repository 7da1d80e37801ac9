use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;

use super::bgp::BgpConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::rules::RulesConfig;
use crate::rules::parse_next_hop;

/// Main configuration structure for autobgp
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Inbound serving and upstream resolver
    #[serde(default)]
    pub dns: DnsConfig,

    /// Path injection backend
    #[serde(default)]
    pub bgp: BgpConfig,

    /// Next hop and watched zones
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. autobgp.toml in current directory
    /// 3. /etc/autobgp/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("autobgp.toml").exists() {
            Self::from_file("autobgp.toml")?
        } else if std::path::Path::new("/etc/autobgp/config.toml").exists() {
            Self::from_file("/etc/autobgp/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Parse a TOML document. Zones come out normalized.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen {
            self.dns.listen = listen;
        }
        if let Some(upstream) = overrides.authoritative_dns {
            self.dns.authoritative_dns = upstream;
        }
        if let Some(next_hop) = overrides.next_hop {
            self.rules.next_hop = next_hop;
        }
        if !overrides.zones.is_empty() {
            self.rules.zones = overrides.zones.iter().collect();
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        SocketAddr::from_str(&self.dns.listen).map_err(|e| {
            ConfigError::Validation(format!("Invalid listen address '{}': {}", self.dns.listen, e))
        })?;

        if self.dns.upstream_host().is_none() {
            return Err(ConfigError::Validation(format!(
                "authoritative_dns must be host:port, got '{}'",
                self.dns.authoritative_dns
            )));
        }

        if self.dns.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "query_timeout cannot be 0".to_string(),
            ));
        }

        if self.dns.retries == 0 {
            return Err(ConfigError::Validation("retries cannot be 0".to_string()));
        }

        parse_next_hop(&self.rules.next_hop)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.rules.zones.is_empty() {
            return Err(ConfigError::Validation("No zones configured".to_string()));
        }

        for cidr in &self.rules.networks {
            ipnetwork::Ipv4Network::from_str(cidr).map_err(|e| {
                ConfigError::Validation(format!("Invalid network '{}': {}", cidr, e))
            })?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen: Option<String>,
    pub authoritative_dns: Option<String>,
    pub next_hop: Option<String>,
    pub zones: Vec<String>,
    pub log_level: Option<String>,
}
