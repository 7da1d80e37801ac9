use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport error with {server}: {reason}")]
    TransportFailed { server: String, reason: String },

    #[error("TLS handshake with {server} failed: {reason}")]
    TlsHandshake { server: String, reason: String },

    #[error("Path injection failed for {prefix}: {reason}")]
    InjectionFailed { prefix: String, reason: String },

    #[error("Unsupported path: {0}")]
    UnsupportedPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors raised by the upstream connection itself, as opposed to a
    /// malformed or mismatched answer.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::TransportConnectionReset { .. }
                | Self::TransportFailed { .. }
                | Self::TlsHandshake { .. }
        )
    }
}
