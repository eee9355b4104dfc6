//! Tick deltas relative to a stored baseline sample

use crate::messages::EncoderTicks;

/// Raw cumulative counter values for both wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickCount {
    pub left: i64,
    pub right: i64,
}

impl TickCount {
    pub fn new(left: i64, right: i64) -> Self {
        Self { left, right }
    }
}

impl From<EncoderTicks> for TickCount {
    fn from(ticks: EncoderTicks) -> Self {
        Self::new(ticks.left, ticks.right)
    }
}

/// Signed per-wheel tick difference between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickDelta {
    pub left: i64,
    pub right: i64,
}

impl TickDelta {
    pub fn new(left: i64, right: i64) -> Self {
        Self { left, right }
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

/// Owns the last-seen tick sample and turns new samples into deltas.
///
/// Subtraction wraps in two's complement, so a counter that rolls over never
/// panics. No rollover correction is attempted.
#[derive(Debug, Clone, Default)]
pub struct TickDeltaComputer {
    baseline: Option<TickCount>,
}

impl TickDeltaComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta of `ticks` against the baseline, then advance the baseline.
    ///
    /// With no baseline yet, or when `reseed` is set, `ticks` becomes the
    /// baseline and the delta is zero.
    pub fn compute_delta(&mut self, ticks: TickCount, reseed: bool) -> TickDelta {
        let delta = match self.baseline {
            Some(baseline) if !reseed => TickDelta::new(
                ticks.left.wrapping_sub(baseline.left),
                ticks.right.wrapping_sub(baseline.right),
            ),
            _ => TickDelta::default(),
        };
        self.baseline = Some(ticks);
        delta
    }

    /// True until the first sample has been seen
    pub fn needs_seed(&self) -> bool {
        self.baseline.is_none()
    }

    pub fn baseline(&self) -> Option<TickCount> {
        self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_seeds_baseline() {
        let mut computer = TickDeltaComputer::new();
        assert!(computer.needs_seed());

        let delta = computer.compute_delta(TickCount::new(5000, -20), false);

        assert!(delta.is_zero());
        assert_eq!(computer.baseline(), Some(TickCount::new(5000, -20)));
    }

    #[test]
    fn test_delta_against_previous_sample() {
        let mut computer = TickDeltaComputer::new();
        computer.compute_delta(TickCount::new(100, 100), false);

        assert_eq!(
            computer.compute_delta(TickCount::new(130, 90), false),
            TickDelta::new(30, -10)
        );
        assert_eq!(
            computer.compute_delta(TickCount::new(130, 90), false),
            TickDelta::new(0, 0)
        );
    }

    #[test]
    fn test_reseed_discards_motion() {
        let mut computer = TickDeltaComputer::new();
        computer.compute_delta(TickCount::new(100, 100), false);

        let delta = computer.compute_delta(TickCount::new(900, 700), true);

        assert!(delta.is_zero());
        assert_eq!(computer.baseline(), Some(TickCount::new(900, 700)));
        assert_eq!(
            computer.compute_delta(TickCount::new(901, 702), false),
            TickDelta::new(1, 2)
        );
    }

    #[test]
    fn test_counter_rollover_wraps() {
        let mut computer = TickDeltaComputer::new();
        computer.compute_delta(TickCount::new(i64::MAX, i64::MIN), false);

        let delta = computer.compute_delta(TickCount::new(i64::MIN, i64::MAX), false);

        assert_eq!(delta, TickDelta::new(1, -1));
    }
}
