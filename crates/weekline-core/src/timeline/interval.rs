//! Half-open time intervals and their arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeRangeError;

/// A `[start, end)` range of instants.
///
/// Intervals built through [`Interval::try_new`] always satisfy
/// `start < end`. [`Interval::new_unchecked`] exists for candidate ranges
/// that still have to pass through the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns [`TimeRangeError::Inverted`] if `end <= start`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if end <= start {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval without checking ordering.
    pub fn new_unchecked(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Interval of `duration` beginning at `start`.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in milliseconds. Negative for inverted candidates.
    pub fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    /// True iff the two intervals share at least one instant.
    ///
    /// Ends are exclusive, so 09:00-10:00 and 10:00-11:00 do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Same interval moved so that it begins at `start`.
    pub fn moved_to(&self, start: DateTime<Utc>) -> Self {
        Self::starting_at(start, self.duration())
    }
}

/// Free-function form of [`Interval::overlaps`].
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Free-function form of [`Interval::duration_ms`].
pub fn duration_ms(interval: &Interval) -> i64 {
    interval.duration_ms()
}
