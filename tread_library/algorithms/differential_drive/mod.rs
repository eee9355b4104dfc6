//! Differential Drive Kinematics
//!
//! Converts wheel encoder tick deltas into chassis motion for a two-wheeled
//! differential drive robot.
//!
//! # Example
//!
//! ```rust
//! use tread_library::algorithms::differential_drive::{DifferentialDriveKinematics, WheelGeometry};
//! use tread_library::algorithms::odometry::TickDelta;
//!
//! let geometry = WheelGeometry::new(0.0625, 2000.0, 65.5, 0.43);
//! let kinematics = DifferentialDriveKinematics::new(geometry).unwrap();
//!
//! let motion = kinematics.motion(TickDelta::new(1000, 1000));
//! assert!(motion.rotation.abs() < 1e-12);
//! ```

use crate::algorithms::odometry::TickDelta;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tread_core::error::{TreadError, TreadResult};

/// Physical constants of the drive train
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelGeometry {
    /// Wheel radius (m)
    pub wheel_radius: f64,
    /// Encoder counts per motor revolution
    pub encoder_resolution: f64,
    /// Motor revolutions per wheel revolution
    pub gear_ratio: f64,
    /// Distance between the wheel contact points (m)
    pub wheelbase: f64,
}

impl WheelGeometry {
    pub fn new(wheel_radius: f64, encoder_resolution: f64, gear_ratio: f64, wheelbase: f64) -> Self {
        Self {
            wheel_radius,
            encoder_resolution,
            gear_ratio,
            wheelbase,
        }
    }

    /// Every constant must be positive and finite
    pub fn validate(&self) -> TreadResult<()> {
        let constants = [
            ("wheel_radius", self.wheel_radius),
            ("encoder_resolution", self.encoder_resolution),
            ("gear_ratio", self.gear_ratio),
            ("wheelbase", self.wheelbase),
        ];
        for (name, value) in constants {
            if !(value.is_finite() && value > 0.0) {
                return Err(TreadError::config(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Distance a wheel rolls per encoder tick (m)
    pub fn meters_per_tick(&self) -> f64 {
        self.wheel_radius * TAU / (self.encoder_resolution * self.gear_ratio)
    }
}

/// Chassis motion produced by one tick delta
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    /// Distance travelled by the chassis center (m)
    pub forward: f64,
    /// Heading change (rad), positive when the left wheel travelled further.
    /// The integrator subtracts it from the heading.
    pub rotation: f64,
}

/// Differential drive kinematics, immutable once built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDriveKinematics {
    geometry: WheelGeometry,
    meters_per_tick: f64,
}

impl DifferentialDriveKinematics {
    /// Build from validated geometry.
    ///
    /// Fails with `TreadError::Config` when any constant is zero, negative,
    /// NaN or infinite.
    pub fn new(geometry: WheelGeometry) -> TreadResult<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            meters_per_tick: geometry.meters_per_tick(),
        })
    }

    /// Per-wheel travel for a tick delta: (left, right) in meters
    pub fn wheel_displacements(&self, delta: TickDelta) -> (f64, f64) {
        (
            delta.left as f64 * self.meters_per_tick,
            delta.right as f64 * self.meters_per_tick,
        )
    }

    /// Forward kinematics: tick delta to chassis motion
    pub fn motion(&self, delta: TickDelta) -> Motion {
        let (s_left, s_right) = self.wheel_displacements(delta);
        Motion {
            forward: (s_left + s_right) / 2.0,
            rotation: (s_left - s_right) / self.geometry.wheelbase,
        }
    }

    pub fn meters_per_tick(&self) -> f64 {
        self.meters_per_tick
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rss_kinematics() -> DifferentialDriveKinematics {
        DifferentialDriveKinematics::new(WheelGeometry::new(0.0625, 2000.0, 65.5, 0.43)).unwrap()
    }

    #[test]
    fn test_meters_per_tick() {
        let dd = rss_kinematics();
        assert_relative_eq!(dd.meters_per_tick(), 0.0625 * TAU / 131_000.0);
        assert_relative_eq!(dd.meters_per_tick(), 2.99e-6, max_relative = 0.01);
    }

    #[test]
    fn test_forward_motion() {
        let dd = rss_kinematics();

        // Both wheels same distance = straight line
        let motion = dd.motion(TickDelta::new(1000, 1000));

        assert_eq!(motion.rotation, 0.0);
        assert_relative_eq!(motion.forward, 1000.0 * dd.meters_per_tick());
        assert_relative_eq!(motion.forward, 2.99e-3, max_relative = 0.01);
    }

    #[test]
    fn test_rotation_in_place() {
        let dd = rss_kinematics();

        // Opposite wheel travel = rotation
        let motion = dd.motion(TickDelta::new(500, -500));

        assert_eq!(motion.forward, 0.0);
        assert_relative_eq!(motion.rotation, 2.0 * 500.0 * dd.meters_per_tick() / 0.43);
    }

    #[test]
    fn test_left_faster_gives_positive_rotation() {
        let dd = rss_kinematics();

        let motion = dd.motion(TickDelta::new(1200, 800));

        assert!(motion.forward > 0.0);
        assert!(motion.rotation > 0.0);
    }

    #[test]
    fn test_zero_delta_is_zero_motion() {
        assert_eq!(rss_kinematics().motion(TickDelta::default()), Motion::default());
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let cases = [
            WheelGeometry::new(0.0, 2000.0, 65.5, 0.43),
            WheelGeometry::new(0.0625, -2000.0, 65.5, 0.43),
            WheelGeometry::new(0.0625, 2000.0, f64::NAN, 0.43),
            WheelGeometry::new(0.0625, 2000.0, 65.5, f64::INFINITY),
        ];
        for geometry in cases {
            assert!(matches!(
                DifferentialDriveKinematics::new(geometry),
                Err(TreadError::Config(_))
            ));
        }
    }
}
