//! Diagnostic events for SRV lookups.
//!
//! Every pipeline run logs through `tracing`. An optional [`LookupObserver`]
//! additionally receives one [`LookupEvent`] per run, e.g. to feed metrics
//! or an application logger. Observers never influence the lookup result.

use crate::base::lookuperror::LookupError;
use crate::dns::SrvTarget;
use crate::srv::ResolvedEndpoint;
use std::time::Duration;
use time::OffsetDateTime;

/// How a pipeline run ended.
#[derive(Clone, Debug)]
pub enum LookupOutcome {
    Resolved(Vec<ResolvedEndpoint>),
    Failed(LookupError),
}

impl LookupOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupOutcome::Resolved(_))
    }

    /// Endpoints of a successful run; empty for a failed one.
    pub fn endpoints(&self) -> &[ResolvedEndpoint] {
        match self {
            LookupOutcome::Resolved(endpoints) => endpoints,
            LookupOutcome::Failed(_) => &[],
        }
    }
}

/// Summary of one pipeline run.
#[derive(Clone, Debug)]
pub struct LookupEvent {
    /// Canonical origin key the lookup was made for.
    pub origin: String,
    pub hostname: String,
    pub started_at: OffsetDateTime,
    pub duration: Duration,
    /// SRV targets found; empty when SRV resolution failed.
    pub targets: Vec<SrvTarget>,
    pub outcome: LookupOutcome,
}

/// Sink for [`LookupEvent`]s.
pub trait LookupObserver: Send + Sync {
    fn on_lookup(&self, event: &LookupEvent);
}

impl<F> LookupObserver for F
where
    F: Fn(&LookupEvent) + Send + Sync,
{
    fn on_lookup(&self, event: &LookupEvent) {
        self(event)
    }
}

/// Observer that reports each run as an `info`-level tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn on_lookup(&self, event: &LookupEvent) {
        let duration_ms = u64::try_from(event.duration.as_millis()).unwrap_or(u64::MAX);
        let targets: Vec<String> = event
            .targets
            .iter()
            .map(|t| format!("{}:{}", t.name, t.port))
            .collect();

        match &event.outcome {
            LookupOutcome::Resolved(endpoints) => {
                let endpoints: Vec<String> = endpoints
                    .iter()
                    .map(|e| format!("{} ttl={}ms", e.socket_addr(), e.ttl_millis()))
                    .collect();
                tracing::info!(
                    origin = %event.origin,
                    started_at = %event.started_at,
                    duration_ms,
                    targets = ?targets,
                    endpoints = ?endpoints,
                    "SRV lookup resolved"
                );
            }
            LookupOutcome::Failed(err) => {
                tracing::info!(
                    origin = %event.origin,
                    started_at = %event.started_at,
                    duration_ms,
                    targets = ?targets,
                    error = %err,
                    "SRV lookup failed"
                );
            }
        }
    }
}
