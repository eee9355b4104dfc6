//! # Communication layer for TREAD
//!
//! Nodes talk through named in-process topics:
//!
//! ```rust,no_run
//! use tread_core::communication::Hub;
//! let hub: Hub<String> = Hub::new("topic_name").unwrap();
//! ```
//!
//! Opening the same topic name twice yields two handles on one bounded
//! queue, so a producer node and a consumer node only need to agree on the
//! name. Delivery order is send order.

pub mod hub;
pub mod traits;

pub use hub::{Hub, HubMetrics};
pub use traits::{Publisher, Subscriber};
