//! Single reusable upstream session with bounded reconnect.
//!
//! At most one stream exists at a time. A stream that fails an exchange is
//! dropped and never reused; the next attempt dials a fresh one. Dial errors
//! end the call immediately, exchange errors consume one attempt.

use super::tcp::{io_error, read_with_length_prefix, send_with_length_prefix};
use super::StreamConnector;
use crate::dns::wire;
use async_trait::async_trait;
use autobgp_application::ports::{Exchange, UpstreamExchanger};
use autobgp_domain::DomainError;
use hickory_proto::op::Message;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ResilientTransport<C: StreamConnector> {
    connector: C,
    // Held for the whole exchange so concurrent callers never share a stream.
    conn: Mutex<Option<C::Stream>>,
    retries: u32,
    timeout: Duration,
}

impl<C: StreamConnector> ResilientTransport<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            conn: Mutex::new(None),
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a live stream is currently held for reuse.
    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    async fn send_on_stream(
        &self,
        stream: &mut C::Stream,
        query_bytes: &[u8],
        query_id: u16,
    ) -> Result<Message, DomainError> {
        let server = self.connector.server();

        let response_bytes = tokio::time::timeout(self.timeout, async {
            send_with_length_prefix(&mut *stream, query_bytes).await?;
            read_with_length_prefix(&mut *stream).await
        })
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| io_error(server, e))?;

        let response = wire::decode(&response_bytes)?;

        if response.id() != query_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "ID mismatch from {}: sent {}, got {}",
                server,
                query_id,
                response.id()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl<C: StreamConnector> UpstreamExchanger for ResilientTransport<C> {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        let query_bytes = wire::encode(query)?;
        let server = self.connector.server();

        let mut slot = self.conn.lock().await;
        let mut last_error = None;

        for attempt in 1..=self.retries {
            let mut stream = match slot.take() {
                Some(stream) => stream,
                None => {
                    debug!(server, attempt, "Dialing upstream");
                    self.connector.connect(self.timeout).await?
                }
            };

            let start = Instant::now();
            match self.send_on_stream(&mut stream, &query_bytes, query.id()).await {
                Ok(response) => {
                    *slot = Some(stream);
                    return Ok(Exchange {
                        response,
                        rtt: start.elapsed(),
                    });
                }
                Err(e) => {
                    // Broken stream is dropped here; next attempt redials.
                    let class = if e.is_transport_error() {
                        "transport"
                    } else {
                        "response"
                    };
                    warn!(server, attempt, class, error = %e, "Upstream exchange failed");
                    last_error = Some(e);
                }
            }
        }

        error!(server, attempts = self.retries, "Upstream retry budget exhausted");

        Err(last_error.unwrap_or_else(|| DomainError::TransportFailed {
            server: server.to_string(),
            reason: "no exchange attempted".to_string(),
        }))
    }
}
