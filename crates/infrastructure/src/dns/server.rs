use crate::dns::wire;
use autobgp_application::use_cases::HandleDnsQueryUseCase;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Turns raw inbound query bytes into raw response bytes.
///
/// `None` means nothing is sent back: the client sees a timeout rather than a
/// synthesized error response.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub async fn handle_raw(&self, query_bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match wire::decode(query_bytes) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %client, error = %e, "Dropping unparseable query");
                return None;
            }
        };

        if let Some(query) = request.queries().first() {
            info!(
                domain = %query.name(),
                record_type = ?query.query_type(),
                client = %client,
                "DNS query received"
            );
        }

        let response = match self.use_case.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(client = %client, id = request.id(), error = %e, "Query failed, no response sent");
                return None;
            }
        };

        match wire::encode(&response) {
            Ok(bytes) => {
                debug!(client = %client, answers = response.answers().len(), "Sending response");
                Some(bytes)
            }
            Err(e) => {
                error!(client = %client, error = %e, "Failed to encode response");
                None
            }
        }
    }
}
