//! Concurrent dashboard aggregation.
//!
//! One aggregation cycle fans out every domain fetch at once, waits for all
//! of them to settle, and assembles a single immutable snapshot. A failing
//! domain contributes an error entry instead of aborting the cycle.

pub mod retry;
pub mod snapshot;
pub mod stats;

use std::collections::{BTreeMap, HashSet};

use crate::dashboard::snapshot::DashboardSnapshot;
use crate::domain::errors::{DomainResult, ErrorKind};
use crate::domain::types::{DomainKey, Generation, Notification, TimestampUtc};
use crate::gateways::Gateways;

/// Runs aggregation cycles over a fixed set of gateways.
pub struct Aggregator {
    gateways: Gateways,
}

impl Aggregator {
    pub fn new(gateways: Gateways) -> Self {
        Self { gateways }
    }

    /// Runs one full fan-out and joins on every domain settling.
    ///
    /// Never fails as a whole: each outcome lands either in the snapshot
    /// data or in its error-map entry. The progress-log fetch is chained
    /// onto the identity future inside the fan-out, so the pair still runs
    /// concurrently with the other four domains.
    pub async fn aggregate(&self, generation: Generation) -> DashboardSnapshot {
        let identity_and_logs = async {
            let identity = self.gateways.identity.fetch_identity().await;
            let logs = match &identity {
                Ok(user) => self.gateways.progress_logs.fetch_progress_logs(&user.id).await,
                // Nothing to even request without an identity to key it by.
                Err(_) => Err(ErrorKind::MissingDependency),
            };
            (identity, logs)
        };

        let ((identity, progress_logs), current_stage, events, notifications, profile) = futures::join!(
            identity_and_logs,
            self.gateways.stage.fetch_current_stage(),
            self.gateways.events.fetch_events(),
            self.gateways.notifications.fetch_notifications(),
            self.gateways.profile.fetch_profile(),
        );

        let mut errors = BTreeMap::new();
        let identity = settle(DomainKey::Identity, identity, &mut errors);
        if let Some(kind) = errors.get(&DomainKey::Identity).copied() {
            // A dashboard without its user is meaningless; flag the cycle.
            if kind != ErrorKind::NotFound {
                errors.insert(DomainKey::General, kind);
            }
        }
        let current_stage = settle_optional(DomainKey::Stage, current_stage, &mut errors);
        let events = settle_list(DomainKey::Events, events, &mut errors);
        let notifications =
            dedup_notifications(settle_list(DomainKey::Notifications, notifications, &mut errors));
        let profile = settle_optional(DomainKey::Profile, profile, &mut errors);
        let progress_logs = settle_list(DomainKey::ProgressLogs, progress_logs, &mut errors);

        tracing::debug!(
            "Cycle {} settled with {} failed domain(s)",
            generation,
            errors.len()
        );

        DashboardSnapshot {
            generation,
            identity,
            current_stage,
            events,
            notifications,
            profile,
            progress_logs,
            errors,
            fetched_at: TimestampUtc::now(),
        }
    }
}

fn settle<T>(
    key: DomainKey,
    result: DomainResult<T>,
    errors: &mut BTreeMap<DomainKey, ErrorKind>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(kind) => {
            tracing::warn!("Fetch failed for {}: {}", key, kind);
            errors.insert(key, kind);
            None
        }
    }
}

/// Optional domains read `NotFound` as "no data yet", not a failure.
fn settle_optional<T>(
    key: DomainKey,
    result: DomainResult<T>,
    errors: &mut BTreeMap<DomainKey, ErrorKind>,
) -> Option<T> {
    match result {
        Err(ErrorKind::NotFound) => None,
        other => settle(key, other, errors),
    }
}

fn settle_list<T>(
    key: DomainKey,
    result: DomainResult<Vec<T>>,
    errors: &mut BTreeMap<DomainKey, ErrorKind>,
) -> Vec<T> {
    settle(key, result, errors).unwrap_or_default()
}

/// Collapses duplicate deliveries and orders newest first.
fn dedup_notifications(mut notifications: Vec<Notification>) -> Vec<Notification> {
    let mut seen = HashSet::new();
    notifications.retain(|n| seen.insert(n.dedup_key()));
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notifications
}

#[cfg(test)]
#[path = "tests/aggregator_tests.rs"]
mod aggregator_tests;
