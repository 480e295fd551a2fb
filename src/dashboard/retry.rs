//! Cycle retry with stale-result suppression.
//!
//! Every refresh runs under a generation tag taken at entry. A refresh that
//! settles after a newer one has started is discarded instead of clobbering
//! the newer view — a slow response must never overwrite a faster, fresher
//! one. Subscribers receive each published view on a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::dashboard::snapshot::{DashboardSnapshot, DashboardView};
use crate::dashboard::{stats, Aggregator};
use crate::domain::types::Generation;
use crate::structured_logger::StructuredLogger;

/// Re-triggers full aggregation cycles and publishes only current results.
pub struct RetryCoordinator {
    aggregator: Aggregator,
    generation: AtomicU64,
    view_tx: watch::Sender<DashboardView>,
    logger: Arc<StructuredLogger>,
}

impl RetryCoordinator {
    /// Returns the coordinator and a receiver for published views.
    pub fn new(
        aggregator: Aggregator,
        logger: Arc<StructuredLogger>,
    ) -> (Self, watch::Receiver<DashboardView>) {
        let (view_tx, view_rx) = watch::channel(DashboardView::empty());
        let coordinator = Self {
            aggregator,
            generation: AtomicU64::new(0),
            view_tx,
            logger,
        };
        (coordinator, view_rx)
    }

    /// Starts a new cycle, superseding any still in flight.
    ///
    /// Returns the published view, or `None` if this cycle was itself
    /// superseded while its fetches were running.
    pub async fn refresh(&self) -> Option<DashboardView> {
        let generation = Generation(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.logger.log_cycle_started(generation);
        let snapshot = self.aggregator.aggregate(generation).await;
        self.publish(snapshot)
    }

    /// Applies a settled snapshot unless a newer cycle has started since.
    fn publish(&self, snapshot: DashboardSnapshot) -> Option<DashboardView> {
        let current = Generation(self.generation.load(Ordering::SeqCst));
        if snapshot.generation != current {
            self.logger.log_cycle_discarded(snapshot.generation, current);
            tracing::debug!(
                "Discarding stale cycle {} (current is {})",
                snapshot.generation,
                current
            );
            return None;
        }

        let stats = stats::compute(&snapshot, Utc::now());
        self.logger
            .log_cycle_settled(snapshot.generation, snapshot.errors.len());
        let view = DashboardView {
            snapshot: Arc::new(snapshot),
            stats,
        };
        let _ = self.view_tx.send(view.clone());
        Some(view)
    }
}

#[cfg(test)]
#[path = "tests/retry_tests.rs"]
mod retry_tests;
