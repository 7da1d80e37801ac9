//! DNS-over-TLS connector (RFC 7858).
//!
//! Only dials; reuse and reconnect are handled by [`super::ResilientTransport`].

use super::resolver::resolve_all;
use super::tcp::io_error;
use super::StreamConnector;
use async_trait::async_trait;
use autobgp_domain::DomainError;
use rustls::pki_types::ServerName;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::debug;

/// Shared TLS config, built once.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

pub struct TlsConnector {
    upstream: String,
    server_name: ServerName<'static>,
}

impl TlsConnector {
    /// `upstream` is `host:port`; `server_name` is checked against the
    /// upstream certificate.
    pub fn new(upstream: impl Into<String>, server_name: &str) -> Result<Self, DomainError> {
        let server_name = ServerName::try_from(server_name.to_string()).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid TLS hostname '{}': {}", server_name, e))
        })?;

        Ok(Self {
            upstream: upstream.into(),
            server_name,
        })
    }

    async fn connect_tcp(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let mut last_error = None;

        for addr in resolve_all(&self.upstream, timeout).await? {
            match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    stream
                        .set_nodelay(true)
                        .map_err(|e| io_error(&self.upstream, e))?;
                    return Ok(stream);
                }
                Ok(Err(e)) => {
                    debug!(server = %addr, error = %e, "TCP connect failed");
                    last_error = Some(io_error(&self.upstream, e));
                }
                Err(_) => {
                    last_error = Some(DomainError::TransportTimeout {
                        server: self.upstream.clone(),
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DomainError::TransportFailed {
            server: self.upstream.clone(),
            reason: "no address to connect to".to_string(),
        }))
    }
}

#[async_trait]
impl StreamConnector for TlsConnector {
    type Stream = TlsStream<TcpStream>;

    async fn connect(&self, timeout: Duration) -> Result<Self::Stream, DomainError> {
        let connector = tokio_rustls::TlsConnector::from(SHARED_TLS_CONFIG.clone());
        let tcp_stream = self.connect_tcp(timeout).await?;

        let tls_stream = tokio::time::timeout(
            timeout,
            connector.connect(self.server_name.clone(), tcp_stream),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: self.upstream.clone(),
        })?
        .map_err(|e| DomainError::TlsHandshake {
            server: self.upstream.clone(),
            reason: e.to_string(),
        })?;

        debug!(server = %self.upstream, "TLS connection established");
        Ok(tls_stream)
    }

    fn server(&self) -> &str {
        &self.upstream
    }
}
