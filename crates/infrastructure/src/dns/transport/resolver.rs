use autobgp_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a `host:port` target to all its socket addresses.
pub async fn resolve_all(target: &str, timeout: Duration) -> Result<Vec<SocketAddr>, DomainError> {
    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(target))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: target.to_string(),
        })?
        .map_err(|e| DomainError::TransportFailed {
            server: target.to_string(),
            reason: format!("resolution failed: {}", e),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::TransportFailed {
            server: target.to_string(),
            reason: "no addresses found".to_string(),
        });
    }

    Ok(addrs)
}
