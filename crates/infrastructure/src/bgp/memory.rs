//! In-process Adj-RIB-Out.
//!
//! Holds the set of routes the speaker should advertise, keyed by prefix.
//! Submitting the same prefix again replaces the stored path.

use super::ensure_ipv4_unicast;
use async_trait::async_trait;
use autobgp_application::ports::PathInjector;
use autobgp_domain::{AddPathRequest, DomainError, Nlri, Path};
use dashmap::DashMap;
use tracing::debug;

#[derive(Default)]
pub struct MemoryAdjRibOut {
    table: DashMap<Nlri, Path>,
}

impl MemoryAdjRibOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, nlri: &Nlri) -> Option<Path> {
        self.table.get(nlri).map(|entry| entry.value().clone())
    }

    pub fn paths(&self) -> Vec<Path> {
        self.table.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[async_trait]
impl PathInjector for MemoryAdjRibOut {
    async fn add_path(&self, request: &AddPathRequest) -> Result<(), DomainError> {
        ensure_ipv4_unicast(request)?;

        let nlri = request.path.nlri;
        let replaced = self.table.insert(nlri, request.path.clone()).is_some();

        debug!(prefix = %nlri, replaced, table_size = self.table.len(), "Adj-RIB-Out updated");
        Ok(())
    }
}
