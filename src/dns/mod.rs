//! DNS Resolution Module
//!
//! Provides the resolver abstraction the SRV lookup is built on:
//! - [`ServiceResolve`]: SRV + A lookups, pluggable and mockable
//! - [`HickoryServiceResolver`]: default backend on hickory-dns
//! - [`Resolve`]: name-to-socket-address trait for connection layers
//! - [`Origin`]: the service a lookup is made for
//!
//! # Example
//!
//! ```rust,ignore
//! use srvlookup::dns::{HickoryServiceResolver, Name, ServiceResolve};
//!
//! let resolver = HickoryServiceResolver::new();
//! for target in resolver.resolve_service(Name::new("svc.example")).await? {
//!     println!("{}:{}", target.name, target.port);
//! }
//! ```

mod hickory;
mod origin;
mod resolve;
mod service;

pub use hickory::HickoryServiceResolver;
pub use origin::Origin;
pub use resolve::{Addrs, Name, Resolve, Resolving};
pub use service::{AddressRecord, ResolvingAddresses, ResolvingService, ServiceResolve, SrvTarget};
