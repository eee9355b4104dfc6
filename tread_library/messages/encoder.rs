use serde::{Deserialize, Serialize};
use tread_core::core::LogSummary;

/// Cumulative wheel encoder counts sampled at one instant
///
/// Counters are raw hardware values: they only ever mean something relative
/// to an earlier sample from the same hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct EncoderTicks {
    pub left: i64,
    pub right: i64,
    /// Sample time in nanoseconds, arbitrary epoch
    #[serde(default)]
    pub stamp_nanos: u64,
}

impl EncoderTicks {
    /// Create a sample stamped with the current time
    pub fn new(left: i64, right: i64) -> Self {
        Self::with_timestamp(left, right, tread_core::timestamp_now())
    }

    /// Create a sample with an explicit timestamp
    pub fn with_timestamp(left: i64, right: i64, stamp_nanos: u64) -> Self {
        Self {
            left,
            right,
            stamp_nanos,
        }
    }
}

impl Default for EncoderTicks {
    fn default() -> Self {
        Self::with_timestamp(0, 0, 0)
    }
}

impl LogSummary for EncoderTicks {
    fn log_summary(&self) -> String {
        format!("EncoderTicks(L:{}, R:{})", self.left, self.right)
    }
}

// Enable zero-copy serialization with bytemuck
unsafe impl bytemuck::Pod for EncoderTicks {}
unsafe impl bytemuck::Zeroable for EncoderTicks {}
