//! # srvlookup
//!
//! SRV-based endpoint resolution for HTTP connection layers.
//!
//! `srvlookup` resolves a service hostname into concrete, TTL-bounded
//! endpoints: it looks up the SRV records of the name, resolves the A
//! records of every SRV target in parallel and pairs each address with its
//! target's port.
//!
//! ## Features
//!
//! - **Partial failure**: one broken SRV target never hides the others;
//!   only a lookup that produced nothing reports every cause at once
//! - **TTL normalization**: TTLs in milliseconds, floored at 500 ms, with a
//!   caller-supplied fallback when the wire carried none
//! - **Single-flight**: optional collapsing of concurrent lookups per origin
//! - **Pluggable backend**: hickory-dns by default, any [`dns::ServiceResolve`]
//!   for tests or custom DNS infrastructure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use srvlookup::dns::Origin;
//! use srvlookup::srv::{LookupOptions, SrvLookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lookup = SrvLookup::builder().dedupe(true).build();
//!     let origin = Origin::parse("http://_api._tcp.example.com")?;
//!     let endpoints = lookup.lookup(&origin, &LookupOptions::default()).await?;
//!     for endpoint in endpoints {
//!         println!("{}", endpoint.socket_addr());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`dns`] - Resolver abstraction, hickory backend and origins
//! - [`srv`] - The lookup pipeline, single-flight and configuration

pub mod base;
pub mod dns;
pub mod srv;

pub use base::lookuperror::{LookupError, ResolveError, TargetError};
pub use srv::{LookupOptions, ResolvedEndpoint, SrvLookup};
