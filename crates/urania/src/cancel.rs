use crate::error::ChartError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal shared between a caller and a
/// long-running search.
///
/// Clones observe the same flag. Searches call [`CancelFlag::checkpoint`]
/// once per outer iteration and stop with [`ChartError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn checkpoint(&self) -> Result<(), ChartError> {
        if self.is_cancelled() {
            Err(ChartError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let observer = flag.clone();
        assert!(observer.checkpoint().is_ok());
        flag.cancel();
        assert!(observer.is_cancelled());
        assert!(matches!(observer.checkpoint(), Err(ChartError::Cancelled)));
    }
}
