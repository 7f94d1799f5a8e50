//! Conversion between wall-clock time and pixel offsets on the day grid.
//!
//! The grid is a fixed-height column per day: hour `h` starts at
//! `h * hour_height_px` and each hour is split into `quarter_count` snap slots.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Slack applied before flooring so that offsets computed from a slot map
/// back onto that slot despite float rounding.
const SLOT_EPSILON: f64 = 1e-9;

/// Dimensions of the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    #[serde(default = "default_hour_height")]
    pub hour_height_px: f64,
    /// Smallest height a block is drawn with, whatever its duration.
    #[serde(default = "default_min_slot_height")]
    pub min_slot_height_px: f64,
    #[serde(default = "default_quarter_count")]
    pub quarter_count: u32,
}

fn default_hour_height() -> f64 {
    60.0
}
fn default_min_slot_height() -> f64 {
    20.0
}
fn default_quarter_count() -> u32 {
    4
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            hour_height_px: default_hour_height(),
            min_slot_height_px: default_min_slot_height(),
            quarter_count: default_quarter_count(),
        }
    }
}

impl GridMetrics {
    /// Minutes covered by one snap slot (15 with the default four slots).
    pub fn minutes_per_slot(&self) -> u32 {
        60 / self.quarter_count.max(1)
    }

    /// Full height of one day column.
    pub fn day_height_px(&self) -> f64 {
        24.0 * self.hour_height_px
    }
}

/// A snapped grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub hour: u32,
    #[serde(rename = "quarter")]
    pub quarter_index: u32,
}

impl Slot {
    pub fn new(hour: u32, quarter_index: u32) -> Self {
        Self {
            hour,
            quarter_index,
        }
    }

    /// Minute within the hour at which this slot begins.
    pub fn minute(&self, quarter_count: u32) -> u32 {
        self.quarter_index * (60 / quarter_count.max(1))
    }
}

/// Pixel offset of `hour:minute` from the top of the day column.
pub fn time_to_offset(hour: u32, minute: u32, hour_height_px: f64) -> f64 {
    f64::from(hour) * hour_height_px + (f64::from(minute) / 60.0) * hour_height_px
}

/// Snap a pixel offset to the slot containing it.
///
/// Hours clamp to `[0, 23]` and quarters to `[0, quarter_count - 1]`, so
/// positions above or below the grid land on its first or last slot.
pub fn offset_to_slot(pixels: f64, hour_height_px: f64, quarter_count: u32) -> Slot {
    let quarter_count = quarter_count.max(1);
    if !pixels.is_finite() || hour_height_px <= 0.0 {
        return Slot::new(0, 0);
    }

    let hour = ((pixels / hour_height_px) + SLOT_EPSILON).floor().clamp(0.0, 23.0);
    let within_hour = pixels - hour * hour_height_px;
    let slot_height = hour_height_px / f64::from(quarter_count);
    let quarter = ((within_hour / slot_height) + SLOT_EPSILON)
        .floor()
        .clamp(0.0, f64::from(quarter_count - 1));

    Slot::new(hour as u32, quarter as u32)
}

/// Largest time delta a single pointer movement can produce: one day grid.
const MAX_DELTA_MINUTES: f64 = 24.0 * 60.0;

/// Convert a vertical pointer delta into a time delta, rounded to the
/// nearest `snap_minutes` and bounded to one day either way.
pub fn pixels_to_duration(pixels: f64, hour_height_px: f64, snap_minutes: u32) -> Duration {
    if !pixels.is_finite() || hour_height_px <= 0.0 {
        return Duration::zero();
    }
    let snap = f64::from(snap_minutes.max(1));
    let minutes = pixels / hour_height_px * 60.0;
    let snapped = ((minutes / snap).round() * snap)
        .clamp(-MAX_DELTA_MINUTES, MAX_DELTA_MINUTES);
    Duration::minutes(snapped as i64)
}
