use crate::ZoneSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub next_hop: String,

    /// Normalized on deserialization.
    #[serde(default)]
    pub zones: ZoneSet,

    #[serde(default)]
    pub networks: Vec<String>,
}
