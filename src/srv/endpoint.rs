use crate::dns::AddressRecord;
use crate::srv::ttl::normalize_ttl;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

/// A connectable address produced by an SRV lookup.
///
/// `port` always comes from the SRV target the address was resolved for.
/// Serializes as `{ "address", "family": 4, "port", "ttl" }` with the TTL
/// in whole milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedEndpoint {
    pub address: Ipv4Addr,
    pub port: u16,
    pub ttl: Duration,
}

impl ResolvedEndpoint {
    pub fn new(address: Ipv4Addr, port: u16, ttl: Duration) -> Self {
        Self { address, port, ttl }
    }

    /// Build an endpoint from an address record of a target on `port`.
    pub fn from_record(record: &AddressRecord, port: u16, max_ttl: Duration) -> Self {
        Self::new(record.address, port, normalize_ttl(record.ttl, max_ttl))
    }

    /// Address family; lookups only produce IPv4.
    pub fn family(&self) -> u8 {
        4
    }

    /// TTL in whole milliseconds, saturating.
    pub fn ttl_millis(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.address, self.port))
    }
}

impl From<&ResolvedEndpoint> for SocketAddr {
    fn from(endpoint: &ResolvedEndpoint) -> Self {
        endpoint.socket_addr()
    }
}

impl Serialize for ResolvedEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResolvedEndpoint", 4)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("family", &self.family())?;
        state.serialize_field("port", &self.port)?;
        state.serialize_field("ttl", &self.ttl_millis())?;
        state.end()
    }
}
