pub mod resilient;
pub mod resolver;
pub mod tcp;
pub mod tls;

use async_trait::async_trait;
use autobgp_domain::DomainError;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

pub use resilient::ResilientTransport;
pub use tls::TlsConnector;

/// Opens fresh byte streams to the upstream resolver.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    async fn connect(&self, timeout: Duration) -> Result<Self::Stream, DomainError>;

    /// Upstream label used in logs and errors.
    fn server(&self) -> &str;
}
