//! Message types exchanged by TREAD nodes
//!
//! - `EncoderTicks`: cumulative left/right wheel counts (input)
//! - `OdometryPose`: planar pose estimate (output) and reset command payload
//!
//! All message types are re-exported at the crate root for convenience.

pub mod encoder;
pub mod odometry;

pub use encoder::EncoderTicks;
pub use odometry::OdometryPose;
