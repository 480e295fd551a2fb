//! Stage progression state machine.
//!
//! The only place progression transitions happen. The machine owns the
//! track and the current state, validates commands, emits events, and
//! broadcasts each new `ProgressionState` to subscribers via a watch
//! channel. Transitions produce fresh values; a rejected command leaves
//! the previous state fully intact.

mod commands;
mod events;

pub use commands::StageCommand;
pub use events::StageEvent;

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::errors::StageCommandError;
use crate::domain::stage::{ProgressionState, PromotionPolicy, StageTrack};
use crate::domain::types::StageStatus;
use crate::structured_logger::StructuredLogger;

/// Command-driven shell over the pure promotion rules.
pub struct StageMachine {
    track: StageTrack,
    policy: PromotionPolicy,
    state: ProgressionState,
    state_tx: watch::Sender<ProgressionState>,
    logger: Arc<StructuredLogger>,
}

impl StageMachine {
    /// Creates a machine at the given starting state.
    ///
    /// Returns the machine and a watch receiver for state broadcasts.
    pub fn new(
        track: StageTrack,
        policy: PromotionPolicy,
        initial: ProgressionState,
        logger: Arc<StructuredLogger>,
    ) -> (Self, watch::Receiver<ProgressionState>) {
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let machine = Self {
            track,
            policy,
            state: initial,
            state_tx,
            logger,
        };
        (machine, state_rx)
    }

    /// All mutations go through this single method.
    ///
    /// Returns the emitted events; broadcasts the new state automatically.
    pub fn apply(&mut self, command: StageCommand) -> Result<Vec<StageEvent>, StageCommandError> {
        self.logger.log_stage_command(&command);

        let (next, events) = self.apply_internal(command)?;
        self.state = next;
        for event in &events {
            self.logger.log_stage_event(event);
        }
        let _ = self.state_tx.send(self.state.clone());
        Ok(events)
    }

    fn apply_internal(
        &self,
        command: StageCommand,
    ) -> Result<(ProgressionState, Vec<StageEvent>), StageCommandError> {
        match command {
            StageCommand::Promote { activities } => {
                let promotion = self
                    .track
                    .promote(&self.state, &activities, &self.policy)
                    .map_err(StageCommandError::Promotion)?;
                let mut events = vec![StageEvent::SubstageAdvanced {
                    from: self.state.flat_index,
                    to: promotion.next.flat_index,
                    progress_percent: promotion.next.progress_percent,
                }];
                if let Some(stage) = promotion.entered_stage {
                    events.push(StageEvent::StageEntered { stage });
                }
                Ok((promotion.next, events))
            }

            StageCommand::MarkComplete => {
                if self.state.status == StageStatus::Completed {
                    // Already complete, no-op.
                    return Ok((self.state.clone(), vec![]));
                }
                if !self.track.is_terminal(self.state.flat_index) {
                    return Err(StageCommandError::NotAtFinalStep {
                        flat_index: self.state.flat_index,
                    });
                }
                let next = ProgressionState {
                    status: StageStatus::Completed,
                    ..self.state.clone()
                };
                Ok((next, vec![StageEvent::TrackCompleted]))
            }

            StageCommand::Reconcile { confirmed } => {
                let total = self.track.total_flattened_steps();
                if confirmed.flat_index >= total {
                    return Err(StageCommandError::IndexOutOfRange {
                        flat_index: confirmed.flat_index,
                        total,
                    });
                }
                let flat_index = confirmed.flat_index;
                Ok((confirmed, vec![StageEvent::StateReconciled { flat_index }]))
            }
        }
    }

    /// The current state. For display; subscribers should use the watch
    /// receiver instead.
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }
}
