//! autobgp infrastructure: upstream DNS-over-TLS, inbound handling and BGP
//! speaker adapters.
pub mod bgp;
pub mod dns;
