use serde::{Deserialize, Serialize};

/// Where announcements are submitted. The speaker itself runs elsewhere.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BgpConfig {
    #[serde(default)]
    pub backend: InjectorBackend,

    /// ExaBGP API command pipe, used with `backend = "exabgp"`.
    #[serde(default = "default_exabgp_pipe")]
    pub exabgp_pipe: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InjectorBackend {
    /// In-process Adj-RIB-Out table.
    #[default]
    Memory,

    ExaBgp,
}

impl InjectorBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::ExaBgp => "exabgp",
        }
    }
}

impl Default for BgpConfig {
    fn default() -> Self {
        Self {
            backend: InjectorBackend::default(),
            exabgp_pipe: default_exabgp_pipe(),
        }
    }
}

fn default_exabgp_pipe() -> String {
    "/run/exabgp.in".to_string()
}
