#![allow(dead_code)]

pub mod builders;
pub mod dns_server_mock;

pub use builders::{a_record, answer_for, query_for};
pub use dns_server_mock::{Behavior, ScriptedConnector};
