//! Transport-agnostic publish/subscribe traits
//!
//! Code outside a node tick (test drivers, tooling) has no `NodeInfo` to
//! report to and can move messages through these instead.

use crate::communication::hub::Hub;
use crate::core::node::LogSummary;
use crate::error::{TreadError, TreadResult};

/// Common trait for publisher/sender implementations
pub trait Publisher<T> {
    /// Send a message - returns Ok on success, Err on failure
    fn publish(&self, msg: T) -> TreadResult<()>;
}

/// Common trait for subscriber/receiver implementations
pub trait Subscriber<T> {
    /// Receive a message without blocking
    fn try_next(&self) -> Option<T>;

    /// Drain everything currently queued, oldest first
    fn drain(&self) -> Vec<T> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

impl<T> Publisher<T> for Hub<T>
where
    T: LogSummary + Send + 'static,
{
    fn publish(&self, msg: T) -> TreadResult<()> {
        self.send(msg, None).map_err(|_| {
            TreadError::Communication(format!("topic '{}' is full", self.get_topic_name()))
        })
    }
}

impl<T> Subscriber<T> for Hub<T>
where
    T: LogSummary + Send + 'static,
{
    fn try_next(&self) -> Option<T> {
        self.recv(None)
    }
}
