mod path_injector;
mod upstream_exchanger;

pub use path_injector::PathInjector;
pub use upstream_exchanger::{Exchange, UpstreamExchanger};
