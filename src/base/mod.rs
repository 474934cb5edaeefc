//! Base types and error handling.
//!
//! - [`ResolveError`](lookuperror::ResolveError): failures reported by a resolver backend
//! - [`LookupError`](lookuperror::LookupError): failures of a whole SRV lookup

pub mod lookuperror;
