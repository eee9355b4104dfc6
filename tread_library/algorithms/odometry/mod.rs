//! Wheel-encoder dead reckoning
//!
//! Turns a stream of cumulative left/right tick samples into a planar pose.
//!
//! # Pipeline
//!
//! ```text
//! TickCount ─► TickDeltaComputer ─► DifferentialDriveKinematics ─► integrate ─► Pose
//!                     ▲
//!              ResetController (startup seed, reset commands)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tread_library::algorithms::odometry::{OdometryEstimator, TickCount};
//! use tread_library::config::OdometryConfig;
//!
//! let mut estimator = OdometryEstimator::from_config(&OdometryConfig::default()).unwrap();
//! estimator.update(TickCount::new(500, 500)); // seeds the baseline
//! let update = estimator.update(TickCount::new(1500, 1500));
//! assert!(update.pose.x > 0.0);
//! ```

pub mod integrator;
pub mod reset;
pub mod tick_delta;

pub use integrator::{integrate, wrap_heading_once, Pose};
pub use reset::{PendingReset, ResetController, ResetDecision, ResetState};
pub use tick_delta::{TickCount, TickDelta, TickDeltaComputer};

use crate::algorithms::differential_drive::{DifferentialDriveKinematics, WheelGeometry};
use crate::config::OdometryConfig;
use serde::{Deserialize, Serialize};
use tread_core::error::TreadResult;

/// What to do with a sample whose tick delta is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDeltaPolicy {
    /// Skip integration; the previous pose message is sent again unchanged
    #[default]
    Republish,
    /// Integrate anyway and emit a freshly stamped pose
    Integrate,
}

/// Result of feeding one sample to the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseUpdate {
    /// Pose after the update
    pub pose: Pose,
    pub delta: TickDelta,
    /// The sample became the new baseline without producing motion
    pub reseeded: bool,
    /// Kinematics and integration ran for this sample
    pub integrated: bool,
}

/// Dead-reckoning state: pose, tick baseline and reset gate.
///
/// Mutated only through `&mut self`; callers that share one estimator across
/// threads must wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct OdometryEstimator {
    kinematics: DifferentialDriveKinematics,
    ticks: TickDeltaComputer,
    reset: ResetController,
    pose: Pose,
    zero_delta_policy: ZeroDeltaPolicy,
}

impl OdometryEstimator {
    /// Estimator at the origin, waiting for its first sample
    pub fn new(geometry: WheelGeometry, zero_delta_policy: ZeroDeltaPolicy) -> TreadResult<Self> {
        Ok(Self {
            kinematics: DifferentialDriveKinematics::new(geometry)?,
            ticks: TickDeltaComputer::new(),
            reset: ResetController::new(),
            pose: Pose::origin(),
            zero_delta_policy,
        })
    }

    pub fn from_config(config: &OdometryConfig) -> TreadResult<Self> {
        Self::new(config.geometry, config.zero_delta_policy)
    }

    /// Fold one tick sample into the pose
    pub fn update(&mut self, ticks: TickCount) -> PoseUpdate {
        let pending = self.reset.consume();
        let reseed = pending.is_some();
        if let Some(commanded) = pending.and_then(|p| p.commanded_pose) {
            self.pose = commanded;
        }

        let reseeded = reseed || self.ticks.needs_seed();
        let delta = self.ticks.compute_delta(ticks, reseed);

        let integrated =
            !(delta.is_zero() && self.zero_delta_policy == ZeroDeltaPolicy::Republish);
        if integrated {
            let motion = self.kinematics.motion(delta);
            self.pose = integrate(self.pose, motion.forward, motion.rotation);
        }

        PoseUpdate {
            pose: self.pose,
            delta,
            reseeded,
            integrated,
        }
    }

    /// Handle a reset command; see [`ResetController::request`]
    pub fn request_reset(&mut self, command: Pose) -> ResetDecision {
        self.reset.request(command)
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn baseline(&self) -> Option<TickCount> {
        self.ticks.baseline()
    }

    pub fn reset_state(&self) -> ResetState {
        self.reset.state()
    }

    pub fn kinematics(&self) -> &DifferentialDriveKinematics {
        &self.kinematics
    }

    pub fn zero_delta_policy(&self) -> ZeroDeltaPolicy {
        self.zero_delta_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn estimator(policy: ZeroDeltaPolicy) -> OdometryEstimator {
        OdometryEstimator::new(WheelGeometry::new(0.0625, 2000.0, 65.5, 0.43), policy).unwrap()
    }

    fn seeded(policy: ZeroDeltaPolicy, left: i64, right: i64) -> OdometryEstimator {
        let mut est = estimator(policy);
        est.update(TickCount::new(left, right));
        est
    }

    #[test]
    fn test_first_sample_only_seeds() {
        let mut est = estimator(ZeroDeltaPolicy::Republish);

        let update = est.update(TickCount::new(123_456, -654_321));

        assert!(update.reseeded);
        assert!(!update.integrated);
        assert!(update.delta.is_zero());
        assert_eq!(update.pose, Pose::origin());
        assert_eq!(est.baseline(), Some(TickCount::new(123_456, -654_321)));
        assert_eq!(est.reset_state(), ResetState::Normal);
    }

    #[test]
    fn test_zero_motion_idempotence() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 10, 10);
        est.update(TickCount::new(1010, 990));
        let before = est.pose();

        let update = est.update(TickCount::new(1010, 990));

        assert!(!update.integrated);
        assert!(!update.reseeded);
        assert_eq!(update.pose, before);
        assert_eq!(est.baseline(), Some(TickCount::new(1010, 990)));
    }

    #[test]
    fn test_integrate_policy_runs_on_zero_delta() {
        let mut est = seeded(ZeroDeltaPolicy::Integrate, 0, 0);
        est.update(TickCount::new(400, 600));
        let before = est.pose();

        let update = est.update(TickCount::new(400, 600));

        assert!(update.integrated);
        assert_eq!(update.pose, before);
    }

    #[test]
    fn test_integrate_policy_also_integrates_seed_sample() {
        let mut est = estimator(ZeroDeltaPolicy::Integrate);

        let update = est.update(TickCount::new(77, 88));

        assert!(update.reseeded);
        assert!(update.integrated);
        assert_eq!(update.pose, Pose::origin());
    }

    #[test]
    fn test_straight_line_motion() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        let mpt = est.kinematics().meters_per_tick();

        let update = est.update(TickCount::new(1000, 1000));

        assert_eq!(update.pose.theta, 0.0);
        assert_relative_eq!(update.pose.x, 1000.0 * mpt);
        assert_relative_eq!(update.pose.x, 2.99e-3, max_relative = 0.01);
        assert_eq!(update.pose.y, 0.0);
    }

    #[test]
    fn test_pure_rotation() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        let mpt = est.kinematics().meters_per_tick();

        // Right wheel forward, left wheel back: heading increases
        let update = est.update(TickCount::new(-250, 250));

        assert_eq!(update.pose.x, 0.0);
        assert_eq!(update.pose.y, 0.0);
        assert_relative_eq!(update.pose.theta, 2.0 * 250.0 * mpt / 0.43);
    }

    #[test]
    fn test_rotation_through_zero_wraps() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        let mpt = est.kinematics().meters_per_tick();

        let update = est.update(TickCount::new(250, -250));

        assert_relative_eq!(update.pose.theta, TAU - 2.0 * 250.0 * mpt / 0.43);
    }

    #[test]
    fn test_reset_to_origin() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        est.update(TickCount::new(5000, 3000));
        assert_ne!(est.pose(), Pose::origin());

        assert_eq!(est.request_reset(Pose::origin()), ResetDecision::Accepted);
        let update = est.update(TickCount::new(9000, 1000));

        assert!(update.reseeded);
        assert_eq!(update.pose, Pose::origin());
        assert_eq!(est.baseline(), Some(TickCount::new(9000, 1000)));

        // Motion resumes relative to the reseeded baseline
        let update = est.update(TickCount::new(10_000, 2000));
        assert_eq!(update.delta, TickDelta::new(1000, 1000));
    }

    #[test]
    fn test_reset_rejection_changes_nothing() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        est.update(TickCount::new(5000, 3000));
        let pose = est.pose();
        let baseline = est.baseline();

        assert_eq!(
            est.request_reset(Pose::new(1.0, 2.0, 3.0)),
            ResetDecision::Ignored
        );

        assert_eq!(est.pose(), pose);
        assert_eq!(est.baseline(), baseline);
        assert_eq!(est.reset_state(), ResetState::Normal);
        assert_eq!(
            est.update(TickCount::new(5100, 3100)).delta,
            TickDelta::new(100, 100)
        );
    }

    #[test]
    fn test_pose_restored_only_when_reseed_consumed() {
        let mut est = seeded(ZeroDeltaPolicy::Republish, 0, 0);
        est.update(TickCount::new(2000, 2000));
        let moved = est.pose();

        est.request_reset(Pose::origin());

        assert_eq!(est.pose(), moved);
        assert!(matches!(est.reset_state(), ResetState::PendingReset(_)));
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let result = OdometryEstimator::new(
            WheelGeometry::new(0.0625, 2000.0, 65.5, 0.0),
            ZeroDeltaPolicy::Republish,
        );
        assert!(result.is_err());
    }
}
