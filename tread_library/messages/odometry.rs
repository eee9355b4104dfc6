use serde::{Deserialize, Serialize};
use tread_core::core::LogSummary;

/// Planar pose estimate, also used as the reset command payload
///
/// `theta` is in radians and normally within `[0, 2π)`. `stamp_nanos` is
/// `None` for commands that carry no meaningful time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OdometryPose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_nanos: Option<u64>,
}

impl OdometryPose {
    /// Unstamped pose, the shape of a reset command
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta,
            stamp_nanos: None,
        }
    }

    /// Reset-to-origin command
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn with_stamp(mut self, stamp_nanos: u64) -> Self {
        self.stamp_nanos = Some(stamp_nanos);
        self
    }

    /// True when every component compares equal to zero (`-0.0` included)
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.theta == 0.0
    }
}

impl LogSummary for OdometryPose {
    fn log_summary(&self) -> String {
        format!(
            "OdometryPose(x:{:.3}, y:{:.3}, θ:{:.3})",
            self.x, self.y, self.theta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_detection() {
        assert!(OdometryPose::origin().is_origin());
        assert!(OdometryPose::new(-0.0, 0.0, -0.0).is_origin());
        assert!(!OdometryPose::new(0.0, 0.0, 1e-300).is_origin());
        assert!(!OdometryPose::new(f64::NAN, 0.0, 0.0).is_origin());
    }

    #[test]
    fn test_with_stamp_keeps_pose() {
        let pose = OdometryPose::new(1.0, 2.0, 0.5).with_stamp(42);
        assert_relative_eq!(pose.theta, 0.5);
        assert_eq!(pose.stamp_nanos, Some(42));
    }

    #[test]
    fn test_reset_payload_parses_without_stamp() {
        let pose: OdometryPose = serde_json::from_str(r#"{"x":0.0,"y":0.0,"theta":0.0}"#).unwrap();
        assert!(pose.is_origin());
        assert_eq!(pose.stamp_nanos, None);
        assert_eq!(
            serde_json::to_string(&pose).unwrap(),
            r#"{"x":0.0,"y":0.0,"theta":0.0}"#
        );
    }
}
