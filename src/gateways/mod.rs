//! Data-source seams for the dashboard domains.
//!
//! Each domain exposes exactly one fetch returning a `DomainResult`;
//! transport failures are classified at this boundary and never escape as
//! errors. The aggregator only ever sees settled values.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::{DomainResult, PromotionError};
use crate::domain::stage::ProgressionState;
use crate::domain::types::{
    CurrentStage, Event, Notification, Profile, ProgressLog, UserData, UserId, VentureId,
};

pub mod http;

#[cfg(test)]
pub mod testing;

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn fetch_identity(&self) -> DomainResult<UserData>;
}

#[async_trait]
pub trait StageGateway: Send + Sync {
    async fn fetch_current_stage(&self) -> DomainResult<CurrentStage>;
}

#[async_trait]
pub trait EventsGateway: Send + Sync {
    async fn fetch_events(&self) -> DomainResult<Vec<Event>>;
}

#[async_trait]
pub trait NotificationsGateway: Send + Sync {
    async fn fetch_notifications(&self) -> DomainResult<Vec<Notification>>;
}

#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn fetch_profile(&self) -> DomainResult<Profile>;
}

/// Progress logs are keyed by the user; the fetch cannot run without one.
#[async_trait]
pub trait ProgressLogGateway: Send + Sync {
    async fn fetch_progress_logs(&self, user: &UserId) -> DomainResult<Vec<ProgressLog>>;
}

/// Server-side promotion endpoint. The server is authoritative: a local
/// optimistic promotion is only kept once this call confirms it.
#[async_trait]
pub trait StagePromotionGateway: Send + Sync {
    async fn advance_stage(&self, venture: &VentureId) -> Result<ProgressionState, PromotionError>;
}

/// The full set of per-domain gateways one aggregation cycle fans out over.
#[derive(Clone)]
pub struct Gateways {
    pub identity: Arc<dyn IdentityGateway>,
    pub stage: Arc<dyn StageGateway>,
    pub events: Arc<dyn EventsGateway>,
    pub notifications: Arc<dyn NotificationsGateway>,
    pub profile: Arc<dyn ProfileGateway>,
    pub progress_logs: Arc<dyn ProgressLogGateway>,
}

impl Gateways {
    /// Wires every domain to the same HTTP client.
    pub fn over_http(client: Arc<http::ApiClient>) -> Self {
        Self {
            identity: client.clone(),
            stage: client.clone(),
            events: client.clone(),
            notifications: client.clone(),
            profile: client.clone(),
            progress_logs: client,
        }
    }
}
