use crate::ports::UpstreamExchanger;
use crate::services::RouteInjector;
use autobgp_domain::{is_routable, DomainError, ZoneSet};
use hickory_proto::op::Message;
use hickory_proto::rr::{RData, Record};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Forwards a query upstream and announces a host route for every qualifying
/// A answer before the response is released.
///
/// Injection is all-or-nothing per response: the first failed injection
/// aborts the remaining answers and the response is withheld from the client.
/// Routes injected before the failure stay announced.
pub struct HandleDnsQueryUseCase {
    exchanger: Arc<dyn UpstreamExchanger>,
    injector: Arc<RouteInjector>,
    zones: Arc<ZoneSet>,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        exchanger: Arc<dyn UpstreamExchanger>,
        injector: Arc<RouteInjector>,
        zones: Arc<ZoneSet>,
    ) -> Self {
        Self {
            exchanger,
            injector,
            zones,
        }
    }

    /// Returns the upstream response unmodified once every qualifying answer
    /// has been injected.
    #[instrument(skip_all, fields(id = request.id()))]
    pub async fn execute(&self, request: &Message) -> Result<Message, DomainError> {
        let exchange = self.exchanger.exchange(request).await?;

        debug!(
            rtt_ms = exchange.rtt.as_millis() as u64,
            answers = exchange.response.answers().len(),
            "Upstream exchange complete"
        );

        self.process_answers(&exchange.response).await?;

        Ok(exchange.response)
    }

    /// Filters and injects the answers of an already obtained response, in
    /// answer order. Returns how many routes were injected.
    pub async fn process_answers(&self, response: &Message) -> Result<usize, DomainError> {
        let mut injected = 0;

        for record in response.answers() {
            let Some(addr) = self.qualifying_address(record) else {
                continue;
            };

            self.injector.inject(addr).await?;
            injected += 1;
        }

        Ok(injected)
    }

    fn qualifying_address(&self, record: &Record) -> Option<Ipv4Addr> {
        // A records only.
        let addr = match record.data() {
            RData::A(a) => a.0,
            _ => return None,
        };

        // Zones are stored in wire (punycode) form.
        let owner = record.name().to_ascii();

        if self.zones.matches(&owner).is_none() {
            debug!(name = %owner, %addr, "Answer outside watched zones");
            return None;
        }

        if !is_routable(addr) {
            debug!(name = %owner, %addr, "Answer address not routable");
            return None;
        }

        Some(addr)
    }
}
