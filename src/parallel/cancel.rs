use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic cancellation flag shared by every worker of a search
///
/// Once cancelled it stays cancelled. `cancel` is idempotent and safe to call
/// from any number of threads at once.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
