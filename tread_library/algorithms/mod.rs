//! Pure computational algorithms
//!
//! No I/O: nodes feed these with messages and publish what they return.
//!
//! - **differential_drive**: Tick deltas to chassis motion
//! - **odometry**: Tick baseline, reset gating and pose integration

pub mod differential_drive;
pub mod odometry;
