//! Cache revalidation hooks.
//!
//! Mutating actions report the route paths whose cached pages went stale.
//! The HTTP layer installs a no-op; tests install a recorder and assert on
//! the collected paths.

use std::sync::{Mutex, PoisonError};

/// Receives paths whose cached content should be refreshed after a mutation.
pub trait Revalidator: Send + Sync {
    fn revalidate(&self, path: &str);
}

/// Drops every notification.
#[derive(Debug, Default)]
pub struct NoopRevalidator;

impl Revalidator for NoopRevalidator {
    fn revalidate(&self, _path: &str) {}
}

/// Records every path, in call order.
#[derive(Debug, Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    /// Paths recorded so far.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Revalidator for RecordingRevalidator {
    fn revalidate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
