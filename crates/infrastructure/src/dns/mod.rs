pub mod server;
pub mod transport;
pub mod wire;

pub use server::DnsServerHandler;
pub use transport::{ResilientTransport, StreamConnector, TlsConnector};
