//! Validation and auto-adjustment of candidate time ranges.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::error::TimeRangeError;

/// Result of [`TimeRangeValidator::adjust`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjusted {
    pub interval: Interval,
    pub was_adjusted: bool,
}

/// Checks intervals against a minimum duration.
#[derive(Debug, Clone, Copy)]
pub struct TimeRangeValidator {
    minimum: Duration,
}

impl TimeRangeValidator {
    /// # Panics
    /// Panics if `minimum` is not positive. That is a programming error,
    /// not a data problem.
    pub fn new(minimum: Duration) -> Self {
        assert!(
            minimum > Duration::zero(),
            "TimeRangeValidator: minimum duration must be positive"
        );
        Self { minimum }
    }

    pub fn minimum(&self) -> Duration {
        self.minimum
    }

    /// Check `interval` without changing it.
    ///
    /// # Errors
    /// [`TimeRangeError::Inverted`] when `end <= start`,
    /// [`TimeRangeError::TooShort`] when shorter than the minimum.
    pub fn validate(&self, interval: &Interval) -> Result<(), TimeRangeError> {
        if interval.end <= interval.start {
            return Err(TimeRangeError::Inverted {
                start: interval.start,
                end: interval.end,
            });
        }
        if interval.duration() < self.minimum {
            return Err(TimeRangeError::TooShort {
                duration_ms: interval.duration_ms(),
                minimum_ms: self.minimum.num_milliseconds(),
            });
        }
        Ok(())
    }

    /// Repair `interval` if it is invalid.
    ///
    /// The start never moves. A short or inverted range is extended to
    /// `start + minimum`.
    ///
    /// # Errors
    /// [`TimeRangeError::Unrecoverable`] if the extended end cannot be
    /// represented.
    pub fn adjust(&self, interval: &Interval) -> Result<Adjusted, TimeRangeError> {
        match self.validate(interval) {
            Ok(()) => Ok(Adjusted {
                interval: *interval,
                was_adjusted: false,
            }),
            Err(reason) => {
                let end = interval
                    .start
                    .checked_add_signed(self.minimum)
                    .ok_or(TimeRangeError::Unrecoverable)?;
                let repaired = Interval::try_new(interval.start, end)
                    .map_err(|_| TimeRangeError::Unrecoverable)?;
                tracing::debug!(
                    %reason,
                    start = %repaired.start,
                    end = %repaired.end,
                    "adjusted time range"
                );
                Ok(Adjusted {
                    interval: repaired,
                    was_adjusted: true,
                })
            }
        }
    }
}
