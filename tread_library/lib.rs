//! # TREAD Standard Library
//!
//! Messages, algorithms and nodes for wheel-encoder odometry.
//!
//! ## Structure
//!
//! ```text
//! tread_library/
//! ── messages/       # EncoderTicks, OdometryPose
//! ── algorithms/     # Kinematics and dead reckoning (no I/O)
//! ── nodes/          # OdometryNode
//! ── config.rs       # OdometryConfig and presets
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tread_library::{EncoderTicks, OdometryNode, OdometryPose};
//! use tread_library::config::{ConfigPreset, OdometryConfig};
//!
//! let odom = OdometryNode::from_config(&OdometryConfig::preset(ConfigPreset::Resettable))?;
//! ```

pub mod algorithms;
pub mod config;
pub mod messages;
pub mod nodes;

// Re-export core traits needed for message types
pub use tread_core::core::LogSummary;

// Re-export message types at the crate root for convenience
pub use messages::*;

pub use config::{ConfigPreset, OdometryConfig, ZeroDeltaPolicy};
pub use nodes::OdometryNode;

/// Prelude module for convenient imports
///
/// # Usage
/// ```rust,ignore
/// use tread_library::prelude::*;
/// ```
pub mod prelude {
    // Core traits
    pub use crate::LogSummary;

    // Message types
    pub use crate::messages::{EncoderTicks, OdometryPose};

    // Algorithms
    pub use crate::algorithms::differential_drive::{DifferentialDriveKinematics, WheelGeometry};
    pub use crate::algorithms::odometry::{
        OdometryEstimator, Pose, ResetDecision, TickCount, TickDelta,
    };

    // Configuration
    pub use crate::config::{ConfigPreset, OdometryConfig, ZeroDeltaPolicy};

    // Nodes
    pub use crate::nodes::OdometryNode;
}
