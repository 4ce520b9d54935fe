use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation, polled once per grid cell.
pub trait AbortSignal: Sync {
    fn should_abort(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAbort;

impl AbortSignal for NeverAbort {
    #[inline]
    fn should_abort(&self) -> bool {
        false
    }
}

impl AbortSignal for AtomicBool {
    #[inline]
    fn should_abort(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}
