//! # Core types and traits for the TREAD runtime
//!
//! - **Node**: The base trait for all computational units
//! - **NodeInfo**: Runtime context (logging, metrics, state) handed to nodes
//!
//! ## Node Lifecycle
//!
//! 1. **Construction** - Node is created with configuration
//! 2. **Initialization** - `init()` is called to set up resources
//! 3. **Execution** - `tick()` is called repeatedly by the scheduler
//! 4. **Shutdown** - `shutdown()` is called to clean up resources

pub mod node;
pub mod node_info_ext;

pub use node::{LogLevel, LogSummary, Node, NodeConfig, NodeInfo, NodeMetrics, NodeState};
pub use node_info_ext::NodeInfoExt;
