//! autobgp application layer: ports and the answer pipeline.
pub mod ports;
pub mod services;
pub mod use_cases;
