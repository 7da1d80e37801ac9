use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub network: ListenNetwork,

    /// Upstream resolver as `host:port`, reached over DNS-over-TLS.
    #[serde(default)]
    pub authoritative_dns: String,

    /// SNI / certificate name for the upstream. Defaults to the host part of
    /// `authoritative_dns`.
    #[serde(default)]
    pub tls_server_name: Option<String>,

    /// Seconds allowed per exchange attempt.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Attempts per exchange before giving up.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl DnsConfig {
    pub fn upstream_host(&self) -> Option<&str> {
        let addr = self.authoritative_dns.trim();
        let (host, port) = addr.rsplit_once(':')?;
        if host.is_empty() || port.parse::<u16>().is_err() {
            return None;
        }
        Some(host.trim_start_matches('[').trim_end_matches(']'))
    }

    pub fn server_name(&self) -> Option<String> {
        self.tls_server_name
            .clone()
            .or_else(|| self.upstream_host().map(str::to_string))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListenNetwork {
    Udp,

    Tcp,

    #[default]
    Both,
}

impl ListenNetwork {
    pub fn serves_udp(&self) -> bool {
        matches!(self, Self::Udp | Self::Both)
    }

    pub fn serves_tcp(&self) -> bool {
        matches!(self, Self::Tcp | Self::Both)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            network: ListenNetwork::default(),
            authoritative_dns: String::new(),
            tls_server_name: None,
            query_timeout: default_query_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:53".to_string()
}

fn default_query_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    5
}
