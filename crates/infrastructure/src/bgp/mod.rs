//! Adapters for the external BGP speaker's path-addition interface.
pub mod exabgp;
pub mod memory;

pub use exabgp::{announce_command, ExaBgpInjector};
pub use memory::MemoryAdjRibOut;

use autobgp_domain::{AddPathRequest, DomainError, Family};

/// Only IPv4 unicast paths are ever announced.
fn ensure_ipv4_unicast(request: &AddPathRequest) -> Result<(), DomainError> {
    if request.path.family != Family::IPV4_UNICAST {
        return Err(DomainError::UnsupportedPath(format!(
            "{} has family {:?}/{:?}",
            request.path.nlri, request.path.family.afi, request.path.family.safi
        )));
    }
    Ok(())
}
