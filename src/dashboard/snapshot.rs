//! Immutable result of one aggregation cycle.
//!
//! Consumers never mutate a snapshot; a retry replaces the whole value.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::dashboard::stats::DashboardStats;
use crate::domain::errors::ErrorKind;
use crate::domain::types::{
    CurrentStage, DomainKey, Event, Generation, Notification, Profile, ProgressLog, TimestampUtc,
    UserData,
};

/// One fully joined aggregation result.
///
/// Built in a single step after every domain has settled. A domain that
/// failed contributes its empty/absent slot plus an entry in `errors`;
/// optional domains that were simply absent contribute neither.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generation: Generation,
    pub identity: Option<UserData>,
    pub current_stage: Option<CurrentStage>,
    pub events: Vec<Event>,
    pub notifications: Vec<Notification>,
    pub profile: Option<Profile>,
    pub progress_logs: Vec<ProgressLog>,
    pub errors: BTreeMap<DomainKey, ErrorKind>,
    pub fetched_at: TimestampUtc,
}

impl DashboardSnapshot {
    /// Placeholder published before the first cycle settles.
    pub fn empty() -> Self {
        Self {
            generation: Generation(0),
            identity: None,
            current_stage: None,
            events: Vec::new(),
            notifications: Vec::new(),
            profile: None,
            progress_logs: Vec::new(),
            errors: BTreeMap::new(),
            fetched_at: TimestampUtc::now(),
        }
    }

    /// The whole-cycle failure, if this cycle had one.
    pub fn general_failure(&self) -> Option<ErrorKind> {
        self.errors.get(&DomainKey::General).copied()
    }
}

/// Snapshot plus derived stats, as published to subscribers.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub snapshot: Arc<DashboardSnapshot>,
    pub stats: DashboardStats,
}

impl DashboardView {
    /// Initial watch-channel value before any cycle has run.
    pub fn empty() -> Self {
        Self {
            snapshot: Arc::new(DashboardSnapshot::empty()),
            stats: DashboardStats::default(),
        }
    }
}
