//! # TREAD Core
//!
//! The runtime layer underneath the TREAD odometry stack.
//!
//! This crate provides the building blocks the estimator nodes are hosted on:
//!
//! - **Nodes**: Independent computational units that process data
//! - **Communication**: Named in-process topics (`Hub`) between nodes
//! - **Scheduling**: Single-threaded, priority-ordered tick loop
//! - **Parameters**: YAML-backed runtime parameter store
//!
//! ## Quick Start
//!
//! ```rust
//! use tread_core::{Hub, Node, NodeInfo};
//!
//! struct ExampleNode {
//!     output: Hub<String>,
//! }
//!
//! impl Node for ExampleNode {
//!     fn name(&self) -> &'static str { "example" }
//!
//!     fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
//!         let _ = self.output.send("hello".into(), ctx);
//!     }
//! }
//! ```

pub mod communication;
pub mod core;
pub mod error;
pub mod params;
pub mod scheduling;

// Re-export commonly used types for easy access
pub use communication::Hub;
pub use core::{LogLevel, LogSummary, Node, NodeConfig, NodeInfo, NodeInfoExt, NodeState};
pub use error::{TreadError, TreadResult};
pub use params::RuntimeParams;
pub use scheduling::Scheduler;

// Re-export communication traits for backend-agnostic usage
pub use communication::traits::{Publisher, Subscriber};

/// Get current timestamp in nanoseconds since the Unix epoch
pub fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
