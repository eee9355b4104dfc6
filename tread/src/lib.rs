//! # TREAD - wheel-encoder dead reckoning
//!
//! Estimates the planar pose of a differential drive robot from cumulative
//! wheel encoder ticks and publishes it on a topic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tread::prelude::*;
//!
//! fn main() -> AnyResult<()> {
//!     let odometry = OdometryNode::from_config(&OdometryConfig::preset(ConfigPreset::Resettable))?;
//!     let ticks: Hub<EncoderTicks> = Hub::new("rss/encoder")?;
//!     let poses: Hub<OdometryPose> = Hub::new("rss/odometry")?;
//!
//!     let mut scheduler = Scheduler::new();
//!     scheduler.add(Box::new(odometry), 0, Some(true));
//!
//!     let _ = ticks.send(EncoderTicks::new(0, 0), None);
//!     scheduler.tick_once();
//!     assert!(poses.recv(None).is_some());
//!     Ok(())
//! }
//! ```

// Re-export core components
pub use tread_core::{self, *};

// Re-export standard library with alias
pub use tread_library as library;

/// The TREAD prelude - everything you need to get started
pub mod prelude {
    // Core node types
    pub use tread_core::core::{Node, NodeConfig, NodeInfo, NodeInfoExt, NodeState};

    // Communication types
    pub use tread_core::communication::{Hub, Publisher, Subscriber};

    // Scheduling
    pub use tread_core::scheduling::Scheduler;

    // Configuration
    pub use tread_core::params::RuntimeParams;

    // Error types
    pub use tread_core::error::{TreadError, TreadResult};
    pub type Result<T> = TreadResult<T>;

    // Common std types
    pub use std::time::Duration;

    // Common traits
    pub use serde::{Deserialize, Serialize};

    // Re-export anyhow for error handling
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};

    // Messages, algorithms, config and nodes
    pub use tread_library::prelude::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get TREAD version
pub fn version() -> &'static str {
    VERSION
}
