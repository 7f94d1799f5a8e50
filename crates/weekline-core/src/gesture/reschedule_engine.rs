use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::GestureSettings;
use crate::error::TimeRangeError;
use crate::timeline::{Interval, Slot, TimeRangeValidator};

/// Grid cell a task block was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub slot: Slot,
}

impl DropTarget {
    pub fn new(date: NaiveDate, hour: u32, quarter_index: u32) -> Self {
        Self {
            date,
            slot: Slot::new(hour, quarter_index),
        }
    }

    /// Instant at which the target slot begins.
    pub fn start(&self, settings: &GestureSettings) -> Option<DateTime<Utc>> {
        let minute = self.slot.minute(settings.grid.quarter_count);
        let local = self.date.and_hms_opt(self.slot.hour, minute, 0)?;
        settings
            .offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Move `original` so it starts at `target`, keeping its duration.
///
/// # Errors
/// [`TimeRangeError::OutsideGrid`] if the target hour or quarter does not
/// exist on the grid, [`TimeRangeError::Unrecoverable`] if the result cannot
/// be made valid.
pub fn reschedule(
    original: &Interval,
    target: &DropTarget,
    settings: &GestureSettings,
) -> Result<Interval, TimeRangeError> {
    let Slot {
        hour,
        quarter_index,
    } = target.slot;
    if hour >= 24 || quarter_index >= settings.grid.quarter_count {
        return Err(TimeRangeError::OutsideGrid {
            hour,
            quarter_index,
        });
    }
    let start = target.start(settings).ok_or(TimeRangeError::Unrecoverable)?;
    let duration = Duration::milliseconds(original.duration_ms());
    let end = start
        .checked_add_signed(duration)
        .ok_or(TimeRangeError::Unrecoverable)?;

    // a task already shorter than the minimum keeps its length
    let minimum = if duration > Duration::zero() {
        settings.minimum_duration.min(duration)
    } else {
        settings.minimum_duration
    };
    let adjusted = TimeRangeValidator::new(minimum).adjust(&Interval::new_unchecked(start, end))?;
    Ok(adjusted.interval)
}
