//! Cancellation token for long-running kernels (§5, §EXP-5). A monotone flag
//! set with release semantics by the caller, checked with acquire semantics
//! at every frontier boundary by the simulator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheaply cloned; all clones observe the same underlying flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A token that is never cancelled, for callers that don't need one.
pub fn never() -> CancelToken {
    CancelToken::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_observed_across_clones() {
        let t = CancelToken::new();
        let t2 = t.clone();
        assert!(!t.is_cancelled());
        t2.cancel();
        assert!(t.is_cancelled());
    }
}
