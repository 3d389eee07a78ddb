/// Preset timeouts for the collaborators a content backend talks to
use crate::timeout::TimeoutConfig;
use std::time::Duration;

/// Object storage writes (media upload)
///
/// - Timeout: 30s, large video payloads need headroom
/// - A timed-out upload fails the whole mutation
pub fn object_storage_upload() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(30),
    }
}

/// Object storage deletes (stale media cleanup)
///
/// - Timeout: 10s
/// - A timed-out delete is a logged miss, never retried inline
pub fn object_storage_delete() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(10),
    }
}

/// Live push to a single real-time channel
///
/// - Timeout: 2s, pushes are abandoned past it
pub fn realtime_push() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(2),
    }
}

/// Relational store queries (pool acquire)
pub fn database() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(10),
    }
}
