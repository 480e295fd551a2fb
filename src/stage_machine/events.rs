//! Facts emitted by the stage machine.

use serde::Serialize;

/// What happened as a result of an applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageEvent {
    /// Moved one step forward on the flattened track.
    SubstageAdvanced {
        from: usize,
        to: usize,
        progress_percent: u8,
    },
    /// The step crossed into a new stage.
    StageEntered { stage: String },
    /// The track was explicitly marked complete.
    TrackCompleted,
    /// Local state was replaced by the server-confirmed value.
    StateReconciled { flat_index: usize },
}
