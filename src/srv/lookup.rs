//! SRV lookup strategy with builder configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use srvlookup::dns::Origin;
//! use srvlookup::srv::{LookupOptions, SrvLookup};
//!
//! let lookup = SrvLookup::builder().dedupe(true).build();
//! let origin = Origin::parse("http://_api._tcp.example.com")?;
//! for endpoint in lookup.lookup(&origin, &LookupOptions::default()).await? {
//!     println!("{} (ttl {}ms)", endpoint.socket_addr(), endpoint.ttl_millis());
//! }
//! ```

use crate::base::lookuperror::LookupError;
use crate::dns::{Addrs, HickoryServiceResolver, Name, Origin, Resolve, Resolving, ServiceResolve};
use crate::srv::observer::LookupObserver;
use crate::srv::pipeline::{self, LookupOptions};
use crate::srv::singleflight::SingleFlight;
use crate::srv::ResolvedEndpoint;
use std::{fmt, net::SocketAddr, sync::Arc, time::Duration};

/// Resolves origins into endpoints through SRV + A lookups.
///
/// Cheap to clone; clones share the resolver, the observer and, with
/// deduplication enabled, the in-flight map.
///
/// Use [`SrvLookup::builder()`] to configure one.
#[derive(Clone)]
pub struct SrvLookup {
    resolver: Arc<dyn ServiceResolve>,
    observer: Option<Arc<dyn LookupObserver>>,
    inflight: Option<SingleFlight>,
    options: LookupOptions,
}

impl Default for SrvLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl SrvLookup {
    /// Lookup on the system resolver, no observer, no deduplication.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SrvLookupBuilder {
        SrvLookupBuilder::default()
    }

    /// Resolve `origin` into endpoints.
    ///
    /// With deduplication enabled, calls for the same origin made while a
    /// lookup is in flight share its result, including its failure. Must be
    /// called from within a tokio runtime.
    pub async fn lookup(
        &self,
        origin: &Origin,
        options: &LookupOptions,
    ) -> Result<Vec<ResolvedEndpoint>, LookupError> {
        let Some(inflight) = &self.inflight else {
            return pipeline::resolve_endpoints(
                self.resolver.as_ref(),
                origin,
                options,
                self.observer.as_deref(),
            )
            .await;
        };

        let shared = inflight.run(origin.key(), || {
            let resolver = Arc::clone(&self.resolver);
            let observer = self.observer.clone();
            let origin = origin.clone();
            let options = *options;
            async move {
                pipeline::resolve_endpoints(resolver.as_ref(), &origin, &options, observer.as_deref())
                    .await
            }
        });

        shared.await.map(|endpoints| endpoints.to_vec())
    }

    /// Options used when resolving through the [`Resolve`] trait.
    pub fn default_options(&self) -> &LookupOptions {
        &self.options
    }

    pub fn is_dedupe(&self) -> bool {
        self.inflight.is_some()
    }

    /// Number of origins with a shared lookup in flight.
    pub fn in_flight(&self) -> usize {
        self.inflight.as_ref().map_or(0, SingleFlight::in_flight)
    }
}

/// Lets connection layers written against [`Resolve`] use SRV lookups.
///
/// The name is looked up as an `http` origin with the configured default
/// options; addresses carry the SRV target ports.
impl Resolve for SrvLookup {
    fn resolve(&self, name: Name) -> Resolving {
        let this = self.clone();
        Box::pin(async move {
            let origin = Origin::http(name.as_str());
            let endpoints = this.lookup(&origin, &this.options).await?;
            let addrs: Vec<_> = endpoints.iter().map(SocketAddr::from).collect();
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

impl fmt::Debug for SrvLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrvLookup")
            .field("dedupe", &self.is_dedupe())
            .field("observer", &self.observer.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a [`SrvLookup`].
#[derive(Default)]
pub struct SrvLookupBuilder {
    resolver: Option<Arc<dyn ServiceResolve>>,
    observer: Option<Arc<dyn LookupObserver>>,
    dedupe: bool,
    max_ttl: Option<Duration>,
}

impl SrvLookupBuilder {
    /// Set the resolver backend. Defaults to [`HickoryServiceResolver`].
    pub fn resolver<R: ServiceResolve + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set a resolver backend that is shared with other owners.
    pub fn shared_resolver(mut self, resolver: Arc<dyn ServiceResolve>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set a sink for per-lookup diagnostic events.
    pub fn observer<O: LookupObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Collapse concurrent lookups for the same origin. Off by default.
    pub fn dedupe(mut self, enabled: bool) -> Self {
        self.dedupe = enabled;
        self
    }

    /// Fallback TTL for the [`Resolve`] path. Defaults to 10 seconds.
    pub fn max_ttl(mut self, max_ttl: Duration) -> Self {
        self.max_ttl = Some(max_ttl);
        self
    }

    pub fn build(self) -> SrvLookup {
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(HickoryServiceResolver::new()));
        let options = self
            .max_ttl
            .map(LookupOptions::new)
            .unwrap_or_default();

        SrvLookup {
            resolver,
            observer: self.observer,
            inflight: self.dedupe.then(SingleFlight::new),
            options,
        }
    }
}
