//! SRV-based endpoint lookup.
//!
//! Turns an origin into connectable, TTL-bounded IPv4 endpoints:
//! SRV records first, then the A records of every SRV target in parallel.
//!
//! - [`SrvLookup`]: the configured lookup strategy
//! - [`pipeline`]: one resolution run, with partial-failure aggregation
//! - [`singleflight`]: optional collapsing of concurrent lookups per origin
//! - [`ttl`]: TTL normalization
//! - [`observer`]: per-lookup diagnostic events

mod endpoint;
mod lookup;
pub mod observer;
pub mod pipeline;
pub mod singleflight;
pub mod ttl;

pub use endpoint::ResolvedEndpoint;
pub use lookup::{SrvLookup, SrvLookupBuilder};
pub use observer::{LookupEvent, LookupObserver, LookupOutcome, TracingObserver};
pub use pipeline::LookupOptions;
