//! Run long searches on tokio's blocking pool.
//!
//! The searches are CPU-bound and call the provider synchronously, so they
//! never run on an async worker thread. Each handle carries the search's
//! [`CancelFlag`]; cancelling makes the search stop at its next checkpoint
//! and resolve to [`ChartError::Cancelled`].

use crate::aspects::Aspect;
use crate::bodies::Body;
use crate::cancel::CancelFlag;
use crate::ephemeris::PositionProvider;
use crate::error::ChartError;
use crate::patterns::{detect_patterns_cancellable, AspectPattern};
use crate::transits::{TransitHit, TransitQuery, TransitSearch};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A background computation that can be cancelled and awaited.
pub struct TaskHandle<T> {
    cancel: CancelFlag,
    join: JoinHandle<Result<T, ChartError>>,
}

pub type SearchHandle = TaskHandle<Vec<TransitHit>>;
pub type PatternHandle = TaskHandle<Vec<AspectPattern>>;

impl<T> TaskHandle<T> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub async fn join(self) -> Result<T, ChartError> {
        self.join
            .await
            .map_err(|e| ChartError::Task(format!("Task failed: {}", e)))?
    }
}

/// Start a transit search on the blocking pool.
///
/// Must be called from within a tokio runtime.
pub fn spawn_transit_search<P>(provider: Arc<P>, query: TransitQuery) -> SearchHandle
where
    P: PositionProvider + Send + Sync + ?Sized + 'static,
{
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    let join = tokio::task::spawn_blocking(move || {
        TransitSearch::new(provider.as_ref())
            .with_cancel(flag)
            .find_hits(&query)
    });
    TaskHandle { cancel, join }
}

/// Start pattern detection on the blocking pool.
pub fn spawn_pattern_detection(aspects: Vec<Aspect>, bodies: Vec<Body>) -> PatternHandle {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    let join = tokio::task::spawn_blocking(move || {
        detect_patterns_cancellable(&aspects, &bodies, &flag)
    });
    TaskHandle { cancel, join }
}
