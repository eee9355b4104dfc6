//! Reset gating for the odometry estimator

use super::integrator::Pose;

/// A reseed waiting for the next tick sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendingReset {
    /// Pose to restore when the reseed is consumed. `None` for the startup
    /// reseed, which keeps the current pose.
    pub commanded_pose: Option<Pose>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetState {
    Normal,
    PendingReset(PendingReset),
}

/// Outcome of a reset command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    /// The command was the origin and a reseed is now pending
    Accepted,
    /// A reseed was already pending; nothing changed
    AlreadyPending,
    /// Not the origin; nothing changed
    Ignored,
}

/// Two-state machine deciding when the tick baseline is reseeded.
///
/// Starts pending so the first sample seeds the baseline without producing
/// motion.
#[derive(Debug, Clone)]
pub struct ResetController {
    state: ResetState,
}

impl Default for ResetController {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetController {
    pub fn new() -> Self {
        Self {
            state: ResetState::PendingReset(PendingReset::default()),
        }
    }

    /// Handle a reset command. Only an exact `(0, 0, 0)` is accepted.
    pub fn request(&mut self, command: Pose) -> ResetDecision {
        if !(command.x == 0.0 && command.y == 0.0 && command.theta == 0.0) {
            return ResetDecision::Ignored;
        }
        match self.state {
            ResetState::Normal => {
                self.state = ResetState::PendingReset(PendingReset {
                    commanded_pose: Some(command),
                });
                ResetDecision::Accepted
            }
            ResetState::PendingReset(_) => ResetDecision::AlreadyPending,
        }
    }

    /// Take the pending reseed, if any, returning to `Normal`
    pub fn consume(&mut self) -> Option<PendingReset> {
        match std::mem::replace(&mut self.state, ResetState::Normal) {
            ResetState::PendingReset(pending) => Some(pending),
            ResetState::Normal => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ResetState::PendingReset(_))
    }

    pub fn state(&self) -> ResetState {
        self.state
    }
}
