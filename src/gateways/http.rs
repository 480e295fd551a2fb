//! HTTP implementations of the dashboard gateways.
//!
//! One `reqwest` client is shared by every domain; each fetch classifies its
//! transport outcome into an `ErrorKind` instead of surfacing `reqwest`
//! errors to callers. The session cookie from the config is attached to
//! every request; authentication itself happens elsewhere.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::domain::errors::{DomainResult, ErrorKind, PromotionError};
use crate::domain::stage::ProgressionState;
use crate::domain::types::{
    CurrentStage, Event, Notification, Profile, ProgressLog, UserData, UserId, VentureId,
};
use crate::gateways::{
    EventsGateway, IdentityGateway, NotificationsGateway, ProfileGateway, ProgressLogGateway,
    StageGateway, StagePromotionGateway,
};

/// API client for the incubation platform endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client with the configured timeout and session cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// cookie value is not a valid header value.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).context("Invalid session cookie value")?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DomainResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await.map_err(classify_transport)?;
        decode(response).await
    }
}

/// Maps a request-level failure (no usable response) onto the taxonomy.
fn classify_transport(err: reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Network
    }
}

/// Maps a non-success status onto the taxonomy.
fn classify_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Auth,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        _ => ErrorKind::Server,
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> DomainResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(classify_status(status));
    }
    response.json::<T>().await.map_err(|err| {
        tracing::warn!("Undecodable response body: {}", err);
        ErrorKind::Server
    })
}

#[async_trait]
impl IdentityGateway for ApiClient {
    async fn fetch_identity(&self) -> DomainResult<UserData> {
        self.get_json("/api/auth/me").await
    }
}

#[async_trait]
impl StageGateway for ApiClient {
    async fn fetch_current_stage(&self) -> DomainResult<CurrentStage> {
        self.get_json("/api/ventures/current-stage").await
    }
}

#[async_trait]
impl EventsGateway for ApiClient {
    async fn fetch_events(&self) -> DomainResult<Vec<Event>> {
        self.get_json("/api/events").await
    }
}

#[async_trait]
impl NotificationsGateway for ApiClient {
    async fn fetch_notifications(&self) -> DomainResult<Vec<Notification>> {
        self.get_json("/api/notifications").await
    }
}

#[async_trait]
impl ProfileGateway for ApiClient {
    async fn fetch_profile(&self) -> DomainResult<Profile> {
        self.get_json("/api/profile").await
    }
}

#[async_trait]
impl ProgressLogGateway for ApiClient {
    async fn fetch_progress_logs(&self, user: &UserId) -> DomainResult<Vec<ProgressLog>> {
        let path = format!("/api/progress-logs?user_id={}", user.as_str());
        self.get_json(&path).await
    }
}

/// Rejection payload of the advance-stage endpoint.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    missing: Vec<String>,
}

#[async_trait]
impl StagePromotionGateway for ApiClient {
    async fn advance_stage(&self, venture: &VentureId) -> Result<ProgressionState, PromotionError> {
        let url = format!("{}/api/ventures/{}/advance-stage", self.base_url, venture);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|err| PromotionError::Transport(classify_transport(err)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ProgressionState>()
                .await
                .map_err(|_| PromotionError::Transport(ErrorKind::Server));
        }
        match status {
            StatusCode::CONFLICT => Err(PromotionError::AlreadyAtFinalStage),
            StatusCode::PRECONDITION_FAILED | StatusCode::UNPROCESSABLE_ENTITY => {
                let missing = response
                    .json::<RejectionBody>()
                    .await
                    .map(|body| body.missing)
                    .unwrap_or_default();
                Err(PromotionError::ActivitiesIncomplete { missing })
            }
            other => Err(PromotionError::Transport(classify_status(other))),
        }
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;
