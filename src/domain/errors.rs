//! Error taxonomy for dashboard fetches and stage promotion.
//!
//! Gateway failures are classified at the gateway boundary into `ErrorKind`
//! and carried as values; they never escape through the aggregator as
//! errors. Promotion rejections are a separate family because they describe
//! refused transitions, not transport trouble.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Classified failure of a single domain fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connectivity failure before a usable response arrived.
    Network,
    /// Expired or invalid session. Retrying without re-authentication is
    /// pointless; callers should redirect to login instead.
    Auth,
    /// The resource does not exist. For optional domains this means
    /// "no data yet", not failure.
    NotFound,
    /// The bounded per-call deadline elapsed.
    Timeout,
    /// The backend answered with a server error or an undecodable body.
    Server,
    /// The fetch was never attempted because a prerequisite domain failed.
    MissingDependency,
}

impl ErrorKind {
    /// True if re-running the cycle could plausibly clear this failure.
    /// `MissingDependency` counts: a retry re-attempts the prerequisite too.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server | ErrorKind::MissingDependency
        )
    }

    /// True if the failure calls for re-authentication rather than retry.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ErrorKind::Auth)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network error"),
            Self::Auth => write!(f, "authentication required"),
            Self::NotFound => write!(f, "not found"),
            Self::Timeout => write!(f, "timed out"),
            Self::Server => write!(f, "server error"),
            Self::MissingDependency => write!(f, "prerequisite fetch failed"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Outcome of one domain fetch within an aggregation cycle.
pub type DomainResult<T> = Result<T, ErrorKind>;

/// Rejected stage promotion. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionError {
    /// Required activities of the current stage are not all completed.
    ActivitiesIncomplete { missing: Vec<String> },
    /// The state already sits at the last substage of the last stage.
    AlreadyAtFinalStage,
    /// The promotion endpoint could not be reached or rejected the call
    /// for transport reasons.
    Transport(ErrorKind),
}

impl Display for PromotionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActivitiesIncomplete { missing } => {
                write!(f, "required activities incomplete: {}", missing.join(", "))
            }
            Self::AlreadyAtFinalStage => write!(f, "already at the final stage"),
            Self::Transport(kind) => write!(f, "promotion request failed: {kind}"),
        }
    }
}

impl std::error::Error for PromotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Command rejected by the stage machine for its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageCommandError {
    /// Promotion refused by the track rules.
    Promotion(PromotionError),
    /// `MarkComplete` is only valid at the terminal flat index.
    NotAtFinalStep { flat_index: usize },
    /// A reconciled state pointed outside the flattened track.
    IndexOutOfRange { flat_index: usize, total: usize },
}

impl Display for StageCommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Promotion(err) => write!(f, "{err}"),
            Self::NotAtFinalStep { flat_index } => {
                write!(f, "cannot mark complete at step {flat_index}: track not finished")
            }
            Self::IndexOutOfRange { flat_index, total } => {
                write!(f, "step {flat_index} outside track of {total} steps")
            }
        }
    }
}

impl std::error::Error for StageCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Promotion(err) => Some(err),
            _ => None,
        }
    }
}
