mod route_injector;

pub use route_injector::RouteInjector;
