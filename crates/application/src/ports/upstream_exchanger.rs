use async_trait::async_trait;
use autobgp_domain::DomainError;
use hickory_proto::op::Message;
use std::time::Duration;

/// Upstream answer together with the round trip of the attempt that produced it.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: Message,
    pub rtt: Duration,
}

#[async_trait]
pub trait UpstreamExchanger: Send + Sync {
    /// Send `query` upstream and wait for its answer.
    ///
    /// Implementations own reconnect and retry; an error here means the
    /// retry budget is spent.
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError>;
}
