use autobgp_domain::{AddPathRequest, DomainError, Rules};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::PathInjector;

/// Turns a resolved address into a host route announcement.
pub struct RouteInjector {
    injector: Arc<dyn PathInjector>,
    next_hop: Ipv4Addr,
}

impl RouteInjector {
    pub fn new(injector: Arc<dyn PathInjector>, rules: &Rules) -> Self {
        Self {
            injector,
            next_hop: rules.next_hop,
        }
    }

    pub fn next_hop(&self) -> Ipv4Addr {
        self.next_hop
    }

    /// Submits `addr/32` via the configured next hop. One call, no retry;
    /// speaker errors come back untouched.
    #[instrument(skip(self), fields(next_hop = %self.next_hop))]
    pub async fn inject(&self, addr: Ipv4Addr) -> Result<AddPathRequest, DomainError> {
        let request = AddPathRequest::host_route(addr, self.next_hop);
        self.injector.add_path(&request).await?;

        info!(prefix = %request.path.nlri, "Route injected");
        Ok(request)
    }
}
