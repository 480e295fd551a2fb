//! Derived dashboard statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::snapshot::DashboardSnapshot;
use crate::domain::types::ActivityStatus;

/// Aggregate numbers shown in the dashboard header tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub completed_activities: usize,
    pub total_activities: usize,
    pub pending_activities: usize,
    pub milestones: usize,
    pub progress: u8,
    pub upcoming_events: usize,
    pub unread_notifications: usize,
}

/// Computes the stats for a settled snapshot.
///
/// Pure: the only clock involved is the `now` passed in, so the same
/// snapshot and instant always produce the same stats. Absent domains
/// count as empty; an unparsable event date is excluded, not an error.
pub fn compute(snapshot: &DashboardSnapshot, now: DateTime<Utc>) -> DashboardStats {
    let activities = snapshot
        .current_stage
        .as_ref()
        .map(|stage| stage.activities.as_slice())
        .unwrap_or(&[]);
    let completed = activities
        .iter()
        .filter(|a| a.status == ActivityStatus::Completed)
        .count();
    let total = activities.len();

    DashboardStats {
        completed_activities: completed,
        total_activities: total,
        pending_activities: total - completed,
        milestones: snapshot.progress_logs.len(),
        progress: snapshot
            .current_stage
            .as_ref()
            .map(|stage| stage.progression.progress_percent)
            .unwrap_or(0),
        upcoming_events: snapshot
            .events
            .iter()
            .filter(|e| e.parsed_date().is_some_and(|date| date >= now))
            .count(),
        unread_notifications: snapshot.notifications.iter().filter(|n| !n.is_read).count(),
    }
}

#[cfg(test)]
#[path = "tests/stats_tests.rs"]
mod stats_tests;
