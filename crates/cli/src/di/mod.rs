use autobgp_application::ports::{PathInjector, UpstreamExchanger};
use autobgp_application::services::RouteInjector;
use autobgp_application::use_cases::HandleDnsQueryUseCase;
use autobgp_domain::config::InjectorBackend;
use autobgp_domain::{Config, Rules};
use autobgp_infrastructure::bgp::{ExaBgpInjector, MemoryAdjRibOut};
use autobgp_infrastructure::dns::{DnsServerHandler, ResilientTransport, TlsConnector};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct Services {
    pub handler: DnsServerHandler,
}

impl Services {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let rules = Rules::from_config(&config.rules)?;

        let exchanger = Self::build_transport(config)?;
        let path_injector = Self::build_path_injector(config).await?;

        let route_injector = Arc::new(RouteInjector::new(path_injector, &rules));
        let use_case = Arc::new(HandleDnsQueryUseCase::new(
            exchanger,
            route_injector,
            Arc::new(rules.zones.clone()),
        ));

        info!(
            next_hop = %rules.next_hop,
            zones = ?rules.zones.iter().map(|z| z.as_str()).collect::<Vec<_>>(),
            "Answer pipeline ready"
        );

        Ok(Self {
            handler: DnsServerHandler::new(use_case),
        })
    }

    fn build_transport(config: &Config) -> anyhow::Result<Arc<dyn UpstreamExchanger>> {
        let server_name = config.dns.server_name().ok_or_else(|| {
            anyhow::anyhow!("Cannot derive TLS name from '{}'", config.dns.authoritative_dns)
        })?;

        let connector = TlsConnector::new(config.dns.authoritative_dns.clone(), &server_name)?;
        let transport = ResilientTransport::new(connector)
            .with_retries(config.dns.retries)
            .with_timeout(Duration::from_secs(config.dns.query_timeout));

        info!(
            upstream = %config.dns.authoritative_dns,
            tls_name = %server_name,
            retries = config.dns.retries,
            timeout_secs = config.dns.query_timeout,
            "Upstream transport configured"
        );

        Ok(Arc::new(transport))
    }

    async fn build_path_injector(config: &Config) -> anyhow::Result<Arc<dyn PathInjector>> {
        let injector: Arc<dyn PathInjector> = match config.bgp.backend {
            InjectorBackend::Memory => Arc::new(MemoryAdjRibOut::new()),
            InjectorBackend::ExaBgp => {
                info!(pipe = %config.bgp.exabgp_pipe, "Waiting for ExaBGP command pipe");
                Arc::new(ExaBgpInjector::open_pipe(&config.bgp.exabgp_pipe).await?)
            }
        };

        info!(backend = config.bgp.backend.as_str(), "Path injector ready");
        Ok(injector)
    }
}
