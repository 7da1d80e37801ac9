//! autobgp domain layer
pub mod bgp_path;
pub mod config;
pub mod errors;
pub mod rules;
pub mod zone;

pub use bgp_path::{AddPathRequest, Afi, Family, Nlri, Origin, Path, PathAttribute, Safi, TableType};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use rules::{is_routable, Rules};
pub use zone::{normalize, Zone, ZoneSet};
