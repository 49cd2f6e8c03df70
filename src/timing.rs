use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TimestampError;

/// Capture time in picoseconds.
///
/// Values handed to the analyzer stay at or below [`Timestamp::MAX`]; the
/// headroom above it is what corrections advance into.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u128", into = "u128")]
pub struct Timestamp(pub u128);

/// Smallest step used when a correction cannot be derived from a span.
pub const MIN_STEP: u128 = 1;

/// Largest single correction step.
pub const MAX_STEP: u128 = u64::MAX as u128;

const PS_PER_SEC: f64 = 1e12;

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// 2^96 ps, a little over 2.5e14 s.
    pub const MAX: Timestamp = Timestamp(1 << 96);

    /// Host timestamps come in as seconds; negatives clamp to zero.
    pub fn from_secs_f64(secs: f64) -> Result<Self, TimestampError> {
        if !secs.is_finite() {
            return Err(TimestampError::NotFinite(secs));
        }
        if secs <= 0.0 {
            return Ok(Self::ZERO);
        }
        let ps = (secs * PS_PER_SEC).round();
        if ps > Self::MAX.0 as f64 {
            return Err(TimestampError::SecsOutOfRange(secs));
        }
        Ok(Self(ps as u128))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / PS_PER_SEC
    }

    /// Distance to `end`, zero when `end` is not after `self`.
    pub fn span_to(self, end: Timestamp) -> u128 {
        end.0.saturating_sub(self.0)
    }

    pub fn plus(self, ticks: u128) -> Self {
        Self(self.0.saturating_add(ticks))
    }
}

impl TryFrom<u128> for Timestamp {
    type Error = TimestampError;

    fn try_from(ps: u128) -> Result<Self, Self::Error> {
        if ps > Self::MAX.0 {
            return Err(TimestampError::TicksOutOfRange(ps));
        }
        Ok(Self(ps))
    }
}

impl From<Timestamp> for u128 {
    fn from(t: Timestamp) -> Self {
        t.0
    }
}

impl From<u64> for Timestamp {
    fn from(ps: u64) -> Self {
        Self(u128::from(ps))
    }
}

/// Keeps the start times of everything one decoder emits strictly increasing.
#[derive(Debug, Clone, Default)]
pub struct Monotonic {
    last_start: Option<Timestamp>,
}

impl Monotonic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_start(&self) -> Option<Timestamp> {
        self.last_start
    }

    /// Corrects `(start, end)` so that `start` lies after the previous call's
    /// start and `end` lies after `start`, then records the new start.
    ///
    /// `fallback_span` is the span of the enclosing bus event; it sizes the
    /// correction step when the proposed interval itself is empty.
    ///
    /// Inputs above [`Timestamp::MAX`] are clamped to it, and a corrected start
    /// lies at most [`MAX_STEP`] past the previous one, so the recorded start
    /// stays far below `u128::MAX` and `plus` never saturates.
    pub fn normalize(
        &mut self,
        start: Timestamp,
        end: Timestamp,
        fallback_span: u128,
    ) -> (Timestamp, Timestamp) {
        let (mut start, mut end) = (start.min(Timestamp::MAX), end.min(Timestamp::MAX));
        let span = match start.span_to(end) {
            0 => fallback_span,
            s => s,
        };
        let delta = (span / 16).clamp(MIN_STEP, MAX_STEP);

        if let Some(last) = self.last_start {
            if start <= last {
                trace!(from = %start.0, last = %last.0, delta = %delta, "start moved forward");
                start = last.plus(delta);
                if start >= end {
                    end = start.plus(delta);
                }
            }
        }
        if end <= start {
            end = start.plus(delta);
        }

        self.last_start = Some(start);
        (start, end)
    }
}
