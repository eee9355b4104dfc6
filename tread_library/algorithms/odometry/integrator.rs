//! Dead-reckoning pose integration

use crate::messages::OdometryPose;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Planar pose: meters, meters, radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn to_message(self, stamp_nanos: u64) -> OdometryPose {
        OdometryPose::new(self.x, self.y, self.theta).with_stamp(stamp_nanos)
    }
}

impl From<OdometryPose> for Pose {
    fn from(msg: OdometryPose) -> Self {
        Self::new(msg.x, msg.y, msg.theta)
    }
}

/// Bring a heading back toward `[0, 2π]` with a single corrective step.
///
/// Only one full turn is added or removed, so a heading more than one turn
/// out of range stays out of range. Exactly `2π` is left untouched.
pub fn wrap_heading_once(theta: f64) -> f64 {
    if theta < 0.0 {
        theta + TAU
    } else if theta > TAU {
        theta - TAU
    } else {
        theta
    }
}

/// Advance `pose` by `forward` meters after turning by `-rotation` radians.
///
/// The displacement is applied along the updated heading.
pub fn integrate(pose: Pose, forward: f64, rotation: f64) -> Pose {
    let theta = wrap_heading_once(pose.theta - rotation);
    Pose {
        x: pose.x + forward * theta.cos(),
        y: pose.y + forward * theta.sin(),
        theta,
    }
}
