use std::collections::HashSet;

use crate::round::{RoundInstance, RoundSpec};
use crate::selection::SelectionState;
use crate::verdict::Verdict;

/// Where the playthrough stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Round(u8),
    /// All rounds passed; waiting for [`SessionState::reset`].
    Completed,
    /// A round was failed or timed out; waiting for [`SessionState::reset`].
    Failed { round: u8 },
}

/// Outcome of feeding a verdict or an expiry into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: u8, to: u8, total: u32 },
    Completed { total: u32 },
    Failed { round: u8, total: u32 },
    Expired { round: u8, total: u32 },
    /// Nothing happened; the session was not in a round, or not in the verdict's round.
    Ignored,
}

impl Transition {
    /// Whether the session must be reset before play continues.
    pub fn ends_playthrough(&self) -> bool {
        matches!(
            self,
            Transition::Completed { .. } | Transition::Failed { .. } | Transition::Expired { .. }
        )
    }
}

/// The round currently on screen together with its selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRound {
    pub instance: RoundInstance,
    pub selection: SelectionState,
}

/// Everything that lives for one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    stage: Stage,
    points: u32,
    used: HashSet<String>,
    active: Option<ActiveRound>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Round(1),
            points: 0,
            used: HashSet::new(),
            active: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The round to generate next, if the session is mid-playthrough.
    pub fn current_round(&self) -> Option<u8> {
        match self.stage {
            Stage::Round(round) => Some(round),
            Stage::Completed | Stage::Failed { .. } => None,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Identifiers already shown during this playthrough.
    pub fn used_identifiers(&self) -> &HashSet<String> {
        &self.used
    }

    pub fn active(&self) -> Option<&ActiveRound> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveRound> {
        self.active.as_mut()
    }

    /// Puts `instance` on screen with an empty selection and marks its images as used.
    pub fn begin_round(&mut self, instance: RoundInstance) {
        self.used
            .extend(instance.identifiers().map(str::to_string));
        let selection = SelectionState::for_round(&instance);
        self.active = Some(ActiveRound {
            instance,
            selection,
        });
    }

    /// Adds the verdict's points, then advances, completes, or fails the playthrough.
    pub fn record(&mut self, verdict: &Verdict) -> Transition {
        let Stage::Round(round) = self.stage else {
            return Transition::Ignored;
        };

        if verdict.round != round {
            tracing::debug!(verdict = verdict.round, round, "ignoring verdict for another round");
            return Transition::Ignored;
        }

        self.points += verdict.points_awarded;
        self.active = None;

        let transition = if !verdict.passed {
            self.stage = Stage::Failed { round };
            Transition::Failed {
                round,
                total: self.points,
            }
        } else if RoundSpec::for_round(round).map_or(true, RoundSpec::is_last) {
            self.stage = Stage::Completed;
            Transition::Completed { total: self.points }
        } else {
            self.stage = Stage::Round(round + 1);
            Transition::Advanced {
                from: round,
                to: round + 1,
                total: self.points,
            }
        };

        tracing::info!(?transition, "recorded verdict");
        transition
    }

    /// Fails the current round for running out of time; no points are added.
    pub fn expire(&mut self) -> Transition {
        let Stage::Round(round) = self.stage else {
            return Transition::Ignored;
        };

        self.active = None;
        self.stage = Stage::Failed { round };

        let transition = Transition::Expired {
            round,
            total: self.points,
        };
        tracing::info!(?transition, "round expired");
        transition
    }

    /// Back to round 1 with no points and no used images.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
