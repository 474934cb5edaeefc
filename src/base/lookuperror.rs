use crate::dns::SrvTarget;
use std::{error::Error as StdError, io, sync::Arc};
use thiserror::Error;

/// Failure reported by a [`ServiceResolve`](crate::dns::ServiceResolve) backend.
///
/// Every variant carries the name that was being resolved. Sources are kept
/// behind an `Arc` so the error stays `Clone` and can be handed to every
/// waiter of a shared lookup.
#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    /// The name exists but has no records of the requested type.
    #[error("No data for {name}")]
    NoData { name: String },
    /// The name does not exist (NXDOMAIN).
    #[error("Name not found: {name}")]
    NotFound { name: String },
    #[error("Resolution timed out for {name}")]
    Timeout { name: String },
    #[error("Resolution failed for {name}: {source}")]
    Failed {
        name: String,
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
}

impl ResolveError {
    /// Wrap an arbitrary message as a [`ResolveError::Failed`].
    pub fn other(name: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::Failed {
            name: name.into(),
            source: Arc::new(io::Error::other(message.into())),
        }
    }

    /// Wrap an underlying backend error as a [`ResolveError::Failed`].
    pub fn failed<E>(name: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ResolveError::Failed {
            name: name.into(),
            source: Arc::new(source),
        }
    }

    /// True for the negative answer that means "zero records", not failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ResolveError::NoData { .. })
    }

    /// The name that was being resolved.
    pub fn name(&self) -> &str {
        match self {
            ResolveError::NoData { name }
            | ResolveError::NotFound { name }
            | ResolveError::Timeout { name }
            | ResolveError::Failed { name, .. } => name,
        }
    }
}

/// An address-resolution failure tagged with the SRV target it belongs to.
#[derive(Debug, Error, Clone)]
#[error("{}:{}: {error}", .target.name, .target.port)]
pub struct TargetError {
    pub target: SrvTarget,
    #[source]
    pub error: ResolveError,
}

impl TargetError {
    pub fn new(target: SrvTarget, error: ResolveError) -> Self {
        Self { target, error }
    }
}

/// Failure of a whole SRV lookup.
#[derive(Debug, Error, Clone)]
pub enum LookupError {
    /// SRV resolution itself failed; nothing else was attempted.
    #[error("SRV resolution failed for {hostname}")]
    Service {
        hostname: String,
        #[source]
        source: ResolveError,
    },
    /// Every SRV target failed and none produced an address.
    #[error("Address resolution failed for {}", join_targets(.0))]
    Aggregate(Vec<TargetError>),
    /// The shared lookup task panicked or was cancelled by the runtime.
    #[error("Lookup aborted: {0}")]
    Aborted(String),
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}

impl LookupError {
    /// All per-target causes of an aggregate failure; empty otherwise.
    pub fn errors(&self) -> &[TargetError] {
        match self {
            LookupError::Aggregate(errors) => errors,
            _ => &[],
        }
    }
}

fn join_targets(errors: &[TargetError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<LookupError> for io::Error {
    fn from(err: LookupError) -> Self {
        let kind = match &err {
            LookupError::Service {
                source: ResolveError::Timeout { .. },
                ..
            } => io::ErrorKind::TimedOut,
            LookupError::InvalidOrigin(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::NotFound,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, port: u16) -> SrvTarget {
        SrvTarget::new(name, port)
    }

    #[test]
    fn test_no_data_detection() {
        assert!(ResolveError::NoData { name: "a".into() }.is_no_data());
        assert!(!ResolveError::NotFound { name: "a".into() }.is_no_data());
        assert!(!ResolveError::other("a", "boom").is_no_data());
    }

    #[test]
    fn test_resolve_error_name() {
        let err = ResolveError::other("1.svc.example", "refused");
        assert_eq!(err.name(), "1.svc.example");
        assert_eq!(
            err.to_string(),
            "Resolution failed for 1.svc.example: refused"
        );
    }

    #[test]
    fn test_aggregate_lists_every_target() {
        let err = LookupError::Aggregate(vec![
            TargetError::new(target("a.svc", 1), ResolveError::other("a.svc", "x")),
            TargetError::new(target("b.svc", 2), ResolveError::Timeout { name: "b.svc".into() }),
        ]);

        assert_eq!(err.errors().len(), 2);
        let msg = err.to_string();
        assert!(msg.contains("a.svc:1"));
        assert!(msg.contains("b.svc:2"));
    }

    #[test]
    fn test_service_error_source() {
        let err = LookupError::Service {
            hostname: "svc.example".into(),
            source: ResolveError::NotFound { name: "svc.example".into() },
        };
        assert!(err.errors().is_empty());
        let source = StdError::source(&err).expect("source");
        assert_eq!(source.to_string(), "Name not found: svc.example");
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = LookupError::Service {
            hostname: "svc".into(),
            source: ResolveError::Timeout { name: "svc".into() },
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);

        let err: io::Error = LookupError::Aggregate(vec![]).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
