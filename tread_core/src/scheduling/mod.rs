//! # Scheduling
//!
//! Single-threaded node orchestration:
//!
//! - **Scheduler**: Ticks registered nodes in priority order
//! - **Simple Priorities**: Numeric priorities (0 = ticked first)
//! - **Optional Logging**: Per-node logging configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tread_core::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(encoder_node), 0, Some(true));   // producer first
//! scheduler.add(Box::new(odometry_node), 10, Some(true)); // then the estimator
//! scheduler.run(); // Handles initialization automatically
//! ```
//!
//! Each inbound message is handled inside exactly one node tick, and no two
//! ticks overlap, so node state needs no locking.

pub mod scheduler;

pub use scheduler::{Scheduler, DEFAULT_TICK_PERIOD};
