//! TTL normalization for resolved endpoints.
//!
//! Reported TTLs arrive in seconds and leave in milliseconds. Some resolvers
//! report `0` for records that are cacheable for a short window, so every
//! reported TTL is floored at [`MIN_TTL`]; a zero must never reach the
//! connection layer as "already expired". Records without a TTL fall back to
//! the caller's `max_ttl` unchanged.

use std::time::Duration;

/// Floor applied to every TTL reported by a resolver.
pub const MIN_TTL: Duration = Duration::from_millis(500);

/// Normalize a reported TTL (seconds) into an endpoint TTL.
pub fn normalize_ttl(reported: Option<u32>, max_ttl: Duration) -> Duration {
    match reported {
        Some(secs) => Duration::from_secs(u64::from(secs)).max(MIN_TTL),
        None => max_ttl,
    }
}
