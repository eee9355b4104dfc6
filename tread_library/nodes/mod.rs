//! TREAD Library Nodes
//!
//! Pre-built nodes that wire the odometry algorithms to topics.
//! Nodes follow the same API pattern: `NodeName::new()` for the default
//! configuration or `NodeName::from_config()` for custom settings.
//!
//! - `OdometryNode` - Wheel encoder dead reckoning
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use tread_library::nodes::OdometryNode;
//! use tread_core::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(OdometryNode::new()?), 10, Some(true));
//! scheduler.run()?;
//! ```

pub mod odometry;

pub use odometry::{OdometryNode, ODOMETRY_NODE_NAME};
