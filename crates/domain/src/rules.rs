use crate::config::RulesConfig;
use crate::{DomainError, ZoneSet};
use ipnetwork::Ipv4Network;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Runtime routing policy, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Rules {
    pub next_hop: Ipv4Addr,
    pub zones: ZoneSet,
    /// Reserved. Parsed and validated but not consulted by the pipeline.
    pub networks: Vec<Ipv4Network>,
}

impl Rules {
    pub fn new(next_hop: Ipv4Addr, zones: ZoneSet) -> Self {
        Self {
            next_hop,
            zones,
            networks: Vec::new(),
        }
    }

    pub fn from_config(config: &RulesConfig) -> Result<Self, DomainError> {
        let next_hop = parse_next_hop(&config.next_hop)?;

        let networks = config
            .networks
            .iter()
            .map(|cidr| {
                Ipv4Network::from_str(cidr)
                    .map_err(|e| DomainError::InvalidCidr(format!("{}: {}", cidr, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            next_hop,
            zones: config.zones.clone(),
            networks,
        })
    }
}

pub(crate) fn parse_next_hop(raw: &str) -> Result<Ipv4Addr, DomainError> {
    match IpAddr::from_str(raw.trim()) {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(_)) => Err(DomainError::InvalidIpAddress(format!(
            "next hop {} is IPv6, only IPv4 routes are announced",
            raw
        ))),
        Err(e) => Err(DomainError::InvalidIpAddress(format!("{}: {}", raw, e))),
    }
}

/// Address classes that never get a route: unspecified, loopback, RFC 1918.
pub fn is_routable(addr: Ipv4Addr) -> bool {
    !(addr.is_unspecified() || addr.is_loopback() || addr.is_private())
}
