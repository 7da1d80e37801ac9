//! ExaBGP text API adapter.
//!
//! Each path becomes one `announce route` command written to the ExaBGP
//! command pipe (or any other writer ExaBGP reads from).

use super::ensure_ipv4_unicast;
use async_trait::async_trait;
use autobgp_application::ports::PathInjector;
use autobgp_domain::{AddPathRequest, DomainError};
use std::path::Path as FsPath;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

pub struct ExaBgpInjector<W> {
    writer: Mutex<W>,
}

impl ExaBgpInjector<tokio::fs::File> {
    /// Opens an existing command pipe for writing. Blocks until ExaBGP has
    /// the read side open.
    pub async fn open_pipe(path: impl AsRef<FsPath>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .await
            .map_err(|e| {
                DomainError::ConfigError(format!(
                    "Cannot open ExaBGP pipe {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self::new(file))
    }
}

impl<W: AsyncWrite + Unpin + Send> ExaBgpInjector<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Renders the ExaBGP command for `request`, newline terminated.
pub fn announce_command(request: &AddPathRequest) -> Result<String, DomainError> {
    ensure_ipv4_unicast(request)?;

    let path = &request.path;
    let next_hop = path
        .next_hop()
        .ok_or_else(|| DomainError::UnsupportedPath(format!("{} has no next hop", path.nlri)))?;

    let mut command = format!("announce route {} next-hop {}", path.nlri, next_hop);
    if let Some(origin) = path.origin() {
        command.push_str(" origin ");
        command.push_str(origin.as_str());
    }
    command.push('\n');

    Ok(command)
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> PathInjector for ExaBgpInjector<W> {
    async fn add_path(&self, request: &AddPathRequest) -> Result<(), DomainError> {
        let command = announce_command(request)?;
        let prefix = request.path.nlri.to_string();

        let mut writer = self.writer.lock().await;
        let written = async {
            writer.write_all(command.as_bytes()).await?;
            writer.flush().await
        }
        .await;

        written.map_err(|e| DomainError::InjectionFailed {
            prefix,
            reason: e.to_string(),
        })?;

        debug!(command = command.trim_end(), "ExaBGP command written");
        Ok(())
    }
}
