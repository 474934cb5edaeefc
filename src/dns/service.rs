//! SRV and address resolution backend abstraction.

use super::Name;
use crate::base::lookuperror::ResolveError;
use std::{future::Future, net::Ipv4Addr, pin::Pin, sync::Arc};

/// One SRV answer: where the service lives and on which port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SrvTarget {
    /// Target hostname, without the trailing root dot.
    pub name: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

impl SrvTarget {
    /// Creates a target with zero priority and weight.
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
            priority: 0,
            weight: 0,
        }
    }

    pub fn with_priority(mut self, priority: u16, weight: u16) -> Self {
        self.priority = priority;
        self.weight = weight;
        self
    }
}

/// One IPv4 answer for a target name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: Ipv4Addr,
    /// TTL in seconds as reported by the resolver, if it reported one.
    pub ttl: Option<u32>,
}

impl AddressRecord {
    pub fn new(address: Ipv4Addr, ttl: Option<u32>) -> Self {
        Self { address, ttl }
    }
}

/// Future returned by [`ServiceResolve::resolve_service`].
pub type ResolvingService = Pin<Box<dyn Future<Output = Result<Vec<SrvTarget>, ResolveError>> + Send>>;

/// Future returned by [`ServiceResolve::resolve_addresses`].
pub type ResolvingAddresses =
    Pin<Box<dyn Future<Output = Result<Vec<AddressRecord>, ResolveError>> + Send>>;

/// Backend capable of SRV and IPv4 lookups.
///
/// This is the seam for substituting test doubles or custom DNS
/// infrastructure; [`HickoryServiceResolver`](super::HickoryServiceResolver)
/// is the default. A name that exists but has no records of the requested
/// type must be reported as [`ResolveError::NoData`].
pub trait ServiceResolve: Send + Sync {
    /// Looks up the SRV records of `hostname`.
    fn resolve_service(&self, hostname: Name) -> ResolvingService;

    /// Looks up the A records of `hostname`, with TTLs when available.
    fn resolve_addresses(&self, hostname: Name) -> ResolvingAddresses;
}

impl<R: ServiceResolve + ?Sized> ServiceResolve for Arc<R> {
    fn resolve_service(&self, hostname: Name) -> ResolvingService {
        (**self).resolve_service(hostname)
    }

    fn resolve_addresses(&self, hostname: Name) -> ResolvingAddresses {
        (**self).resolve_addresses(hostname)
    }
}
