use async_trait::async_trait;
use autobgp_domain::{AddPathRequest, DomainError};

/// Path-addition entry point of the BGP speaker.
#[async_trait]
pub trait PathInjector: Send + Sync {
    /// Submit one path. Re-submitting an identical path must not fail.
    async fn add_path(&self, request: &AddPathRequest) -> Result<(), DomainError>;
}
