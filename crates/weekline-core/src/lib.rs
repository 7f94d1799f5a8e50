//! # Weekline Core Library
//!
//! This library provides the weekly Timeline engine behind the Weekline task
//! manager: it places time-ranged tasks on a day/hour grid, separates
//! overlapping tasks into columns, and turns drag and resize gestures on a
//! task block back into calendar time.
//!
//! ## Architecture
//!
//! - **Timeline**: pure layout pipeline. Tasks are bucketed by the day their
//!   interval ends on, assigned columns greedily, and projected to pixels
//! - **Gesture**: reschedule/resize engines and a per-block gesture state
//!   machine; results are candidate intervals the caller persists
//! - **Task**: the canonical task shape, normalized once at deserialization
//! - **Config**: TOML-based grid, gesture and week settings
//!
//! Nothing here performs I/O except [`TimelineConfig`] loading and saving.
//!
//! ## Key Components
//!
//! - [`layout_week`]: full relayout of a task list for one week
//! - [`assign_columns`]: overlap-free column assignment for a day
//! - [`GestureMachine`]: drag/resize state per task block
//! - [`TimeRangeValidator`]: minimum-duration checks and repair

pub mod config;
pub mod error;
pub mod gesture;
pub mod task;
pub mod timeline;

pub use config::TimelineConfig;
pub use error::{ConfigError, CoreError, GestureError, TimeRangeError, TimestampError};
pub use gesture::{
    reschedule, resize, DropTarget, Edge, GestureMachine, GestureResult, GestureSettings,
    GestureState, TaskTimeUpdater,
};
pub use task::{flatten, Task, TaskStatus};
pub use timeline::{
    assign_columns, bucketize, layout_week, Clock, DayLayout, FixedClock, GridMetrics, Interval,
    PositionedTask, SystemClock, TieBreak, TimeRangeValidator, WeekLayout, WeekWindow,
};
