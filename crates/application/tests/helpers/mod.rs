#![allow(dead_code)]

mod mock_ports;
mod messages;

pub use messages::{a_record, aaaa_record, cname_record, query_for, response_with};
pub use mock_ports::{MockPathInjector, MockUpstreamExchanger};
