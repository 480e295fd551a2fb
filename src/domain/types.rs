//! Strongly typed domain primitives and backend payload records.
//!
//! The newtypes keep identifiers from different domains apart; the records
//! mirror the JSON payloads of the backend endpoints (camelCase on the wire).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the venture whose incubation track is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VentureId(pub String);

impl From<&str> for VentureId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VentureId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for VentureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing tag for aggregation cycles.
///
/// A settled cycle may only be published while its generation still equals
/// the coordinator's current one; anything older is stale and discarded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Generation(pub u64);

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimestampUtc(pub DateTime<Utc>);

impl TimestampUtc {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the timestamp as an RFC3339 string.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for TimestampUtc {
    fn default() -> Self {
        Self::now()
    }
}

/// One independent data source feeding the dashboard.
///
/// `General` is not a source: it flags whole-cycle conditions that make the
/// dashboard meaningless regardless of the per-domain outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainKey {
    Identity,
    Stage,
    Events,
    Notifications,
    Profile,
    ProgressLogs,
    General,
}

impl DomainKey {
    /// Human-readable label for banner lines.
    pub fn label(&self) -> &'static str {
        match self {
            DomainKey::Identity => "identity",
            DomainKey::Stage => "current stage",
            DomainKey::Events => "events",
            DomainKey::Notifications => "notifications",
            DomainKey::Profile => "profile",
            DomainKey::ProgressLogs => "progress logs",
            DomainKey::General => "dashboard",
        }
    }
}

impl std::fmt::Display for DomainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where a venture sits in its track lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Completion state of one stage activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
}

/// The signed-in user as returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Public venture profile. Optional domain: a fresh venture has none yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub venture_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A scheduled incubator event.
///
/// The backend sends `date` as a raw string; parsing happens lazily so one
/// malformed row never poisons the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl Event {
    /// Parses the event date as RFC3339, falling back to a plain
    /// `YYYY-MM-DD` day (taken as midnight UTC). `None` for anything else.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

/// An in-app notification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: TimestampUtc,
}

impl Notification {
    /// Uniqueness key guarding against duplicate delivery. The backend can
    /// emit the same row more than once; `id` alone is not enough.
    pub fn dedup_key(&self) -> (String, String, DateTime<Utc>) {
        (self.id.clone(), self.message.clone(), self.created_at.0)
    }
}

/// One milestone entry from the venture's progress history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub logged_at: TimestampUtc,
}

/// One activity scoped to the current stage instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub status: ActivityStatus,
    pub required: bool,
}

/// The venture's current position as reported by the stage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStage {
    pub venture_id: VentureId,
    pub stage_name: String,
    pub substage_name: String,
    pub progression: crate::domain::stage::ProgressionState,
    #[serde(default)]
    pub activities: Vec<Activity>,
}
