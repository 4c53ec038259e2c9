//! Stage timing hooks.
//!
//! A [`PostProcessor`](crate::PostProcessor) reports how long each stage took
//! to its observer. The default [`NoopObserver`] discards everything;
//! [`TimingStats`] accumulates call counts and totals per stage and can be
//! shared across threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Post-processing stage reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Raw tensor to candidates.
    Decode,
    /// Non-maximum suppression.
    Suppress,
    /// Semantic arg-max decoding.
    Segment,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Suppress => "suppress",
            Self::Segment => "segment",
        }
    }
}

/// Receives per-stage timings.
pub trait StageObserver {
    fn record(&self, stage: Stage, elapsed: Duration);
}

/// Observer that ignores all timings.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    #[inline]
    fn record(&self, _stage: Stage, _elapsed: Duration) {}
}

impl<T: StageObserver + ?Sized> StageObserver for &T {
    fn record(&self, stage: Stage, elapsed: Duration) {
        (**self).record(stage, elapsed);
    }
}

impl<T: StageObserver + ?Sized> StageObserver for Arc<T> {
    fn record(&self, stage: Stage, elapsed: Duration) {
        (**self).record(stage, elapsed);
    }
}

/// Accumulated timing for one stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTiming {
    pub calls: u64,
    pub total: Duration,
}

impl StageTiming {
    /// Mean duration per call, zero when nothing was recorded.
    pub fn average(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.calls);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Thread-safe per-stage timing accumulator.
#[derive(Debug, Default)]
pub struct TimingStats {
    stages: Mutex<HashMap<Stage, StageTiming>>,
}

impl TimingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the timing for `stage`, if it was ever recorded.
    pub fn get(&self, stage: Stage) -> Option<StageTiming> {
        self.lock().get(&stage).copied()
    }

    /// Returns all recorded stages sorted by name.
    pub fn snapshot(&self) -> Vec<(Stage, StageTiming)> {
        let mut out: Vec<_> = self.lock().iter().map(|(s, t)| (*s, *t)).collect();
        out.sort_by_key(|(stage, _)| stage.name());
        out
    }

    /// Clears all recorded timings.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Stage, StageTiming>> {
        self.stages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StageObserver for TimingStats {
    fn record(&self, stage: Stage, elapsed: Duration) {
        let mut stages = self.lock();
        let entry = stages.entry(stage).or_default();
        entry.calls += 1;
        entry.total += elapsed;
    }
}
