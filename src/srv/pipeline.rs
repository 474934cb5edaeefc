//! The SRV resolution pipeline.
//!
//! 1. Resolve the SRV records of the origin's hostname. A failure here is
//!    returned as is.
//! 2. No targets is a normal, empty answer.
//! 3. Resolve the A records of every target concurrently and wait for all of
//!    them. Each address becomes an endpoint on its target's port. A target
//!    answering "no data" simply contributes nothing; other failures are
//!    recorded against the target.
//! 4. Any endpoint at all wins over recorded failures. Only an empty result
//!    with failures is an error, carrying every failure.

use crate::base::lookuperror::{LookupError, TargetError};
use crate::dns::{Name, Origin, ServiceResolve, SrvTarget};
use crate::srv::observer::{LookupEvent, LookupObserver, LookupOutcome};
use crate::srv::ResolvedEndpoint;
use futures::future::join_all;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Per-call lookup options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupOptions {
    /// TTL given to addresses the resolver reported no TTL for.
    pub max_ttl: Duration,
}

impl LookupOptions {
    pub fn new(max_ttl: Duration) -> Self {
        Self { max_ttl }
    }
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            max_ttl: Duration::from_secs(10),
        }
    }
}

/// Run the pipeline once for `origin`.
///
/// `observer`, if given, receives a [`LookupEvent`] when the run settles.
pub async fn resolve_endpoints(
    resolver: &dyn ServiceResolve,
    origin: &Origin,
    options: &LookupOptions,
    observer: Option<&dyn LookupObserver>,
) -> Result<Vec<ResolvedEndpoint>, LookupError> {
    let started_at = OffsetDateTime::now_utc();
    let start = Instant::now();
    let hostname = origin.hostname();

    let (targets, result) = run(resolver, hostname, options).await;
    let duration = start.elapsed();

    match &result {
        Ok(endpoints) => tracing::debug!(
            hostname = %hostname,
            targets = targets.len(),
            endpoints = endpoints.len(),
            elapsed = ?duration,
            "SRV lookup complete"
        ),
        Err(e) => tracing::debug!(
            hostname = %hostname,
            targets = targets.len(),
            error = %e,
            elapsed = ?duration,
            "SRV lookup failed"
        ),
    }

    if let Some(observer) = observer {
        let outcome = match &result {
            Ok(endpoints) => LookupOutcome::Resolved(endpoints.clone()),
            Err(e) => LookupOutcome::Failed(e.clone()),
        };
        observer.on_lookup(&LookupEvent {
            origin: origin.key(),
            hostname: hostname.to_string(),
            started_at,
            duration,
            targets,
            outcome,
        });
    }

    result
}

async fn run(
    resolver: &dyn ServiceResolve,
    hostname: &str,
    options: &LookupOptions,
) -> (Vec<SrvTarget>, Result<Vec<ResolvedEndpoint>, LookupError>) {
    let targets = match resolver.resolve_service(Name::new(hostname)).await {
        Ok(targets) => targets,
        Err(source) => {
            let err = LookupError::Service {
                hostname: hostname.to_string(),
                source,
            };
            return (Vec::new(), Err(err));
        }
    };

    if targets.is_empty() {
        tracing::debug!(hostname = %hostname, "no SRV targets");
        return (targets, Ok(Vec::new()));
    }

    let lookups = targets.iter().map(|target| {
        let pending = resolver.resolve_addresses(Name::new(target.name.as_str()));
        async move { (target, pending.await) }
    });
    let outcomes = join_all(lookups).await;

    let mut endpoints = Vec::new();
    let mut errors = Vec::new();
    for (target, outcome) in outcomes {
        match outcome {
            Ok(records) => endpoints.extend(
                records
                    .iter()
                    .map(|record| ResolvedEndpoint::from_record(record, target.port, options.max_ttl)),
            ),
            Err(e) if e.is_no_data() => {
                tracing::debug!(srv_target = %target.name, "no A records for SRV target");
            }
            Err(e) => {
                tracing::warn!(srv_target = %target.name, port = target.port, error = %e, "SRV target resolution failed");
                errors.push(TargetError::new(target.clone(), e));
            }
        }
    }

    let result = if endpoints.is_empty() && !errors.is_empty() {
        Err(LookupError::Aggregate(errors))
    } else {
        Ok(endpoints)
    };
    (targets, result)
}
