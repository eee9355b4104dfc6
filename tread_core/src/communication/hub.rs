use crate::core::node::{LogSummary, NodeInfo};
use crate::error::{TreadError, TreadResult};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default queue depth of a topic
pub const DEFAULT_CAPACITY: usize = 1024;

/// Process-wide table of named topics. Two `Hub::new` calls with the same
/// name share one queue.
static TOPICS: Lazy<Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Bounded MPMC queue backing one topic
struct Topic<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
}

/// Lock-free counters for Hub monitoring
#[derive(Debug, Default)]
pub struct AtomicHubMetrics {
    pub messages_sent: AtomicU64,
    pub messages_received: AtomicU64,
    pub send_failures: AtomicU64,
}

impl AtomicHubMetrics {
    pub fn snapshot(&self) -> HubMetrics {
        HubMetrics {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

/// Plain snapshot of a Hub's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubMetrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub send_failures: u64,
}

/// Named pub/sub endpoint.
///
/// Every handle on a topic both publishes and consumes; a message is
/// delivered to exactly one `recv` call, in send order.
pub struct Hub<T> {
    topic: Arc<Topic<T>>,
    topic_name: String,
    metrics: Arc<AtomicHubMetrics>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            topic: self.topic.clone(),
            topic_name: self.topic_name.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Hub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("topic_name", &self.topic_name)
            .field("capacity", &self.topic.capacity)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Hub<T> {
    /// Open (or join) the topic `topic_name`
    pub fn new(topic_name: &str) -> TreadResult<Self> {
        Self::new_with_capacity(topic_name, DEFAULT_CAPACITY)
    }

    /// Open (or join) a topic. The capacity only applies when this call
    /// creates the topic.
    pub fn new_with_capacity(topic_name: &str, capacity: usize) -> TreadResult<Self> {
        if topic_name.is_empty() {
            return Err(TreadError::config("topic name must not be empty"));
        }
        if capacity == 0 {
            return Err(TreadError::config(format!(
                "topic '{}' needs a capacity of at least 1",
                topic_name
            )));
        }

        let mut topics = TOPICS.lock();
        let topic = match topics.get(topic_name) {
            Some(existing) => existing
                .clone()
                .downcast::<Topic<T>>()
                .map_err(|_| {
                    TreadError::Communication(format!(
                        "topic '{}' already carries a different message type",
                        topic_name
                    ))
                })?,
            None => {
                let (sender, receiver) = channel::bounded(capacity);
                let topic = Arc::new(Topic {
                    sender,
                    receiver,
                    capacity,
                });
                topics.insert(
                    topic_name.to_string(),
                    topic.clone() as Arc<dyn Any + Send + Sync>,
                );
                log::debug!("created topic '{}' (capacity {})", topic_name, capacity);
                topic
            }
        };

        Ok(Hub {
            topic,
            topic_name: topic_name.to_string(),
            metrics: Arc::new(AtomicHubMetrics::default()),
        })
    }

    /// Publish without blocking. A full queue hands the message back.
    pub fn send(&self, msg: T, ctx: Option<&mut NodeInfo>) -> Result<(), T>
    where
        T: LogSummary,
    {
        // Summary must be taken before the message moves into the queue
        let summary = ctx.as_ref().map(|_| msg.log_summary());

        match self.topic.sender.try_send(msg) {
            Ok(()) => {
                self.metrics.messages_sent.fetch_add(1, Ordering::Relaxed);
                if let (Some(ctx), Some(summary)) = (ctx, summary) {
                    ctx.log_pub_summary(&self.topic_name, &summary);
                }
                Ok(())
            }
            Err(TrySendError::Full(msg)) | Err(TrySendError::Disconnected(msg)) => {
                self.metrics.send_failures.fetch_add(1, Ordering::Relaxed);
                Err(msg)
            }
        }
    }

    /// Take the oldest pending message, if any
    pub fn recv(&self, ctx: Option<&mut NodeInfo>) -> Option<T>
    where
        T: LogSummary,
    {
        let msg = self.topic.receiver.try_recv().ok()?;
        self.metrics.messages_received.fetch_add(1, Ordering::Relaxed);
        if let Some(ctx) = ctx {
            ctx.log_sub_summary(&self.topic_name, &msg.log_summary());
        }
        Some(msg)
    }

    /// Number of messages waiting on the topic
    pub fn pending(&self) -> usize {
        self.topic.receiver.len()
    }

    pub fn get_metrics(&self) -> HubMetrics {
        self.metrics.snapshot()
    }

    pub fn get_topic_name(&self) -> &str {
        &self.topic_name
    }
}
