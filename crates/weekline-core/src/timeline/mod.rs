//! Weekly timeline layout.
//!
//! This module provides:
//! - Time/pixel geometry for the day grid
//! - Interval overlap and duration math
//! - Per-day bucketing of tasks within a week window
//! - Greedy column assignment for overlapping tasks
//! - Projection of tasks onto positioned blocks
//! - Validation and repair of candidate time ranges

mod bucket;
mod columns;
mod geometry;
mod interval;
mod projection;
mod validator;
mod week;

pub use bucket::{bucketize, BucketEntry, DayBuckets, DroppedTask};
pub use columns::{assign_columns, column_count, Placed, TieBreak};
pub use geometry::{offset_to_slot, pixels_to_duration, time_to_offset, GridMetrics, Slot};
pub use interval::{duration_ms, overlaps, Interval};
pub use projection::{layout_week, project, DayLayout, PositionedTask, WeekLayout};
pub use validator::{Adjusted, TimeRangeValidator};
pub use week::{Clock, FixedClock, SystemClock, WeekWindow};
