//! Commands accepted by the stage machine.

use serde::Serialize;

use crate::domain::stage::ProgressionState;
use crate::domain::types::Activity;

/// Intent to change progression state. Validation happens in the machine;
/// a rejected command leaves the state untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageCommand {
    /// Advance one substage (or into the next stage), subject to the
    /// promotion policy against the given current-stage activities.
    Promote { activities: Vec<Activity> },
    /// Mark the track finished. Only valid at the terminal flat index;
    /// promotion alone never completes a track.
    #[allow(dead_code)]
    MarkComplete,
    /// Absorb the server-confirmed state after an optimistic promotion.
    /// The server value wins, even when it points backward.
    Reconcile { confirmed: ProgressionState },
}
