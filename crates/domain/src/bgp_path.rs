//! Route announcements handed to the BGP speaker.
//!
//! Attributes are a closed set of tagged variants; turning them into a wire
//! or API encoding is left to whichever speaker adapter consumes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// BGP ORIGIN attribute value; discriminants are the RFC 4271 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Origin {
    Igp = 0,
    Egp = 1,
    Incomplete = 2,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Igp => "igp",
            Self::Egp => "egp",
            Self::Incomplete => "incomplete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathAttribute {
    Origin(Origin),
    NextHop(Ipv4Addr),
}

/// IPv4 prefix being advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nlri {
    pub prefix: Ipv4Addr,
    pub prefix_len: u8,
}

impl Nlri {
    pub fn host(addr: Ipv4Addr) -> Self {
        Self {
            prefix: addr,
            prefix_len: 32,
        }
    }
}

impl fmt::Display for Nlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.prefix_len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Afi {
    Ip,
    Ip6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Safi {
    Unicast,
    Multicast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Family {
    pub afi: Afi,
    pub safi: Safi,
}

impl Family {
    pub const IPV4_UNICAST: Family = Family {
        afi: Afi::Ip,
        safi: Safi::Unicast,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    /// Per-peer outbound adjacency (Adj-RIB-Out).
    AdjOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub nlri: Nlri,
    pub attributes: Vec<PathAttribute>,
    pub family: Family,
}

impl Path {
    pub fn origin(&self) -> Option<Origin> {
        self.attributes.iter().find_map(|attr| match attr {
            PathAttribute::Origin(origin) => Some(*origin),
            _ => None,
        })
    }

    pub fn next_hop(&self) -> Option<Ipv4Addr> {
        self.attributes.iter().find_map(|attr| match attr {
            PathAttribute::NextHop(hop) => Some(*hop),
            _ => None,
        })
    }
}

/// A single path submission to the speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPathRequest {
    pub table: TableType,
    pub path: Path,
}

impl AddPathRequest {
    /// Host route for `addr` with origin IGP via `next_hop`, IPv4 unicast, Adj-RIB-Out.
    pub fn host_route(addr: Ipv4Addr, next_hop: Ipv4Addr) -> Self {
        Self {
            table: TableType::AdjOut,
            path: Path {
                nlri: Nlri::host(addr),
                attributes: vec![
                    PathAttribute::Origin(Origin::Igp),
                    PathAttribute::NextHop(next_hop),
                ],
                family: Family::IPV4_UNICAST,
            },
        }
    }
}
