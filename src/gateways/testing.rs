//! Canned gateways for exercising aggregation without a backend.
//!
//! Every domain returns a scripted result; the first identity fetch can be
//! held behind a gate so tests can control settlement order deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Notify;

use crate::domain::errors::DomainResult;
use crate::domain::stage::ProgressionState;
use crate::domain::types::{
    Activity, ActivityStatus, CurrentStage, Event, Notification, Profile, ProgressLog, StageStatus,
    TimestampUtc, UserData, UserId, VentureId,
};
use crate::gateways::{
    EventsGateway, Gateways, IdentityGateway, NotificationsGateway, ProfileGateway,
    ProgressLogGateway, StageGateway,
};

/// Gate released by the test to let a held fetch proceed.
///
/// `started` fires once the fetch is parked on the gate; `release` lets it
/// finish. Both carry a permit, so signalling before waiting is safe.
#[derive(Default)]
pub struct FetchGate {
    pub started: Notify,
    pub release: Notify,
}

/// Scripted per-domain results, shared by all six stub gateways.
pub struct StubSources {
    pub identity: DomainResult<UserData>,
    pub stage: DomainResult<CurrentStage>,
    pub events: DomainResult<Vec<Event>>,
    pub notifications: DomainResult<Vec<Notification>>,
    pub profile: DomainResult<Profile>,
    pub progress_logs: DomainResult<Vec<ProgressLog>>,
    /// Holds the first identity fetch until the gate is released.
    pub first_identity_gate: Option<Arc<FetchGate>>,
    pub identity_calls: Arc<AtomicUsize>,
    pub progress_log_calls: Arc<AtomicUsize>,
}

impl StubSources {
    /// Every domain healthy, with small but realistic payloads.
    pub fn healthy() -> Self {
        Self {
            identity: Ok(sample_user()),
            stage: Ok(sample_stage()),
            events: Ok(vec![
                sample_event("ev-1", "Pitch night", &(Utc::now() + Duration::days(1)).to_rfc3339()),
                sample_event("ev-2", "Alumni meetup", &(Utc::now() - Duration::days(1)).to_rfc3339()),
            ]),
            notifications: Ok(vec![
                sample_notification("nt-1", "Mentor assigned", false),
                sample_notification("nt-2", "Report due", true),
            ]),
            profile: Ok(Profile {
                venture_name: "Solarize".to_string(),
                description: Some("Rooftop solar analytics".to_string()),
                website: None,
            }),
            progress_logs: Ok(vec![
                sample_progress_log("pl-1", "Completed idea validation"),
                sample_progress_log("pl-2", "First customer interview"),
            ]),
            first_identity_gate: None,
            identity_calls: Arc::new(AtomicUsize::new(0)),
            progress_log_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bundles the scripted sources behind the gateway seams.
    pub fn into_gateways(self) -> Gateways {
        let stub = Arc::new(StubGateway {
            sources: Arc::new(self),
        });
        Gateways {
            identity: stub.clone(),
            stage: stub.clone(),
            events: stub.clone(),
            notifications: stub.clone(),
            profile: stub.clone(),
            progress_logs: stub,
        }
    }
}

pub fn sample_user() -> UserData {
    UserData {
        id: UserId::from("user-7"),
        name: "Amina Diallo".to_string(),
        email: "amina@solarize.example".to_string(),
        role: Some("founder".to_string()),
    }
}

pub fn sample_stage() -> CurrentStage {
    CurrentStage {
        venture_id: VentureId::from("venture-42"),
        stage_name: "Pre-Incubation".to_string(),
        substage_name: "Research".to_string(),
        progression: ProgressionState {
            flat_index: 2,
            status: StageStatus::InProgress,
            progress_percent: 33,
        },
        activities: vec![
            Activity {
                id: "act-1".to_string(),
                name: "Customer interviews".to_string(),
                status: ActivityStatus::Completed,
                required: true,
            },
            Activity {
                id: "act-2".to_string(),
                name: "Market sizing".to_string(),
                status: ActivityStatus::Pending,
                required: true,
            },
            Activity {
                id: "act-3".to_string(),
                name: "Logo draft".to_string(),
                status: ActivityStatus::InProgress,
                required: false,
            },
        ],
    }
}

pub fn sample_event(id: &str, title: &str, date: &str) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        location: Some("Innovation Hub".to_string()),
    }
}

pub fn sample_notification(id: &str, message: &str, is_read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        message: message.to_string(),
        kind: "info".to_string(),
        is_read,
        created_at: TimestampUtc::now(),
    }
}

pub fn sample_progress_log(id: &str, title: &str) -> ProgressLog {
    ProgressLog {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        logged_at: TimestampUtc::now(),
    }
}

struct StubGateway {
    sources: Arc<StubSources>,
}

#[async_trait]
impl IdentityGateway for StubGateway {
    async fn fetch_identity(&self) -> DomainResult<UserData> {
        let call = self.sources.identity_calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            if let Some(gate) = &self.sources.first_identity_gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }
        }
        self.sources.identity.clone()
    }
}

#[async_trait]
impl StageGateway for StubGateway {
    async fn fetch_current_stage(&self) -> DomainResult<CurrentStage> {
        self.sources.stage.clone()
    }
}

#[async_trait]
impl EventsGateway for StubGateway {
    async fn fetch_events(&self) -> DomainResult<Vec<Event>> {
        self.sources.events.clone()
    }
}

#[async_trait]
impl NotificationsGateway for StubGateway {
    async fn fetch_notifications(&self) -> DomainResult<Vec<Notification>> {
        self.sources.notifications.clone()
    }
}

#[async_trait]
impl ProfileGateway for StubGateway {
    async fn fetch_profile(&self) -> DomainResult<Profile> {
        self.sources.profile.clone()
    }
}

#[async_trait]
impl ProgressLogGateway for StubGateway {
    async fn fetch_progress_logs(&self, _user: &UserId) -> DomainResult<Vec<ProgressLog>> {
        self.sources.progress_log_calls.fetch_add(1, Ordering::SeqCst);
        self.sources.progress_logs.clone()
    }
}
