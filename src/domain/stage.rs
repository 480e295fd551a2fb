//! Incubation track model: ordered stages, the flattened substage sequence,
//! and the pure promotion rules.
//!
//! A venture's position is a single index over the concatenation of all
//! stages' substages in stage order then substage order. Promotion always
//! moves exactly one step; crossing into the next stage is the same `+1`
//! on the flattened sequence, surfaced to callers so they can announce it.

use serde::{Deserialize, Serialize};

use crate::domain::errors::PromotionError;
use crate::domain::types::{Activity, ActivityStatus, StageStatus};

/// One substage within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substage {
    pub name: String,
    pub order: u32,
}

/// One stage of the incubation track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub order: u32,
    pub substages: Vec<Substage>,
}

/// The fixed, globally ordered incubation track for a venture.
///
/// Order is part of the track definition and never changes at runtime;
/// construction sorts by the declared `order` fields so config authors can
/// list stages in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrack {
    stages: Vec<Stage>,
}

impl StageTrack {
    pub fn new(mut stages: Vec<Stage>) -> Self {
        stages.sort_by_key(|s| s.order);
        for stage in &mut stages {
            stage.substages.sort_by_key(|s| s.order);
        }
        Self { stages }
    }

    /// Length of the flattened substage sequence.
    pub fn total_flattened_steps(&self) -> usize {
        self.stages.iter().map(|s| s.substages.len()).sum()
    }

    /// Resolves a flat index to its (stage, substage) pair.
    pub fn step_at(&self, flat_index: usize) -> Option<(&Stage, &Substage)> {
        let mut remaining = flat_index;
        for stage in &self.stages {
            if remaining < stage.substages.len() {
                return Some((stage, &stage.substages[remaining]));
            }
            remaining -= stage.substages.len();
        }
        None
    }

    /// Index of the stage containing the given flat index.
    fn stage_index_at(&self, flat_index: usize) -> Option<usize> {
        let mut remaining = flat_index;
        for (idx, stage) in self.stages.iter().enumerate() {
            if remaining < stage.substages.len() {
                return Some(idx);
            }
            remaining -= stage.substages.len();
        }
        None
    }

    /// True when the flat index is the last substage of the last stage.
    pub fn is_terminal(&self, flat_index: usize) -> bool {
        let total = self.total_flattened_steps();
        total > 0 && flat_index + 1 >= total
    }

    /// Percentage of the track behind the given position, floored.
    pub fn progress_percent(&self, flat_index: usize) -> u8 {
        let total = self.total_flattened_steps();
        if total == 0 {
            return 0;
        }
        ((flat_index.min(total) * 100) / total) as u8
    }

    /// Applies the single-step promotion rules to `state`.
    ///
    /// Returns a fresh state; the input is never modified. Rejections leave
    /// the caller holding the old state untouched.
    pub fn promote(
        &self,
        state: &ProgressionState,
        activities: &[Activity],
        policy: &PromotionPolicy,
    ) -> Result<Promotion, PromotionError> {
        if state.flat_index + 1 >= self.total_flattened_steps() {
            return Err(PromotionError::AlreadyAtFinalStage);
        }
        if policy.require_completed_activities {
            let missing: Vec<String> = activities
                .iter()
                .filter(|a| a.required && a.status != ActivityStatus::Completed)
                .map(|a| a.name.clone())
                .collect();
            if !missing.is_empty() {
                return Err(PromotionError::ActivitiesIncomplete { missing });
            }
        }

        let next_index = state.flat_index + 1;
        let entered_stage = if self.stage_index_at(state.flat_index) != self.stage_index_at(next_index)
        {
            self.step_at(next_index).map(|(stage, _)| stage.name.clone())
        } else {
            None
        };

        Ok(Promotion {
            next: ProgressionState {
                flat_index: next_index,
                status: StageStatus::InProgress,
                progress_percent: self.progress_percent(next_index),
            },
            entered_stage,
        })
    }
}

/// Promotion precondition policy.
///
/// The backend historically allowed promotion regardless of activity
/// completion; the flag keeps that permissive behavior one config line away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPolicy {
    /// Require every `required` activity of the current stage to be
    /// completed before promoting.
    #[serde(default = "default_require_completed")]
    pub require_completed_activities: bool,
}

fn default_require_completed() -> bool {
    true
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            require_completed_activities: default_require_completed(),
        }
    }
}

/// Position of a venture within the flattened track.
///
/// Server-owned and durable; locally it is an immutable value. A promotion
/// yields a fresh one, which lets callers apply it optimistically and
/// reconcile against the server-confirmed value later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub flat_index: usize,
    pub status: StageStatus,
    pub progress_percent: u8,
}

/// Outcome of a successful promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// The state after the step.
    pub next: ProgressionState,
    /// Name of the stage the step crossed into, if it crossed a boundary.
    pub entered_stage: Option<String>,
}

#[cfg(test)]
#[path = "tests/stage_tests.rs"]
mod stage_tests;
