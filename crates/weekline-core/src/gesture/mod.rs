//! Drag-to-reschedule and edge-resize gestures.
//!
//! The engines here are pure: they turn a gesture's inputs into a candidate
//! interval. Persisting that interval is up to the caller, through a
//! [`TaskTimeUpdater`].

mod machine;
mod reschedule_engine;
mod resize_engine;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub use machine::{GestureMachine, GestureState};
pub use reschedule_engine::{reschedule, DropTarget};
pub use resize_engine::resize;

use crate::error::Result;
use crate::task::Task;
use crate::timeline::{GridMetrics, Interval};

/// Edge of a task block grabbed by a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Start,
    End,
}

impl std::str::FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" | "top" => Ok(Self::Start),
            "end" | "bottom" => Ok(Self::End),
            other => Err(format!("unknown edge '{other}', expected 'start' or 'end'")),
        }
    }
}

/// Outcome of a completed gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureResult {
    /// Task moved; duration unchanged.
    Reschedule { task_id: String, interval: Interval },
    /// One edge moved; the other stayed put.
    Resize {
        task_id: String,
        edge: Edge,
        interval: Interval,
    },
}

impl GestureResult {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Reschedule { task_id, .. } | Self::Resize { task_id, .. } => task_id,
        }
    }

    pub fn interval(&self) -> Interval {
        match self {
            Self::Reschedule { interval, .. } | Self::Resize { interval, .. } => *interval,
        }
    }
}

/// Parameters shared by the gesture engines.
#[derive(Debug, Clone, Copy)]
pub struct GestureSettings {
    /// Offset in which drop-target dates and hours are expressed.
    pub offset: FixedOffset,
    pub grid: GridMetrics,
    pub minimum_duration: Duration,
    /// Granularity resize deltas are rounded to.
    pub snap_minutes: u32,
    /// How long clicks are swallowed after a resize ends.
    pub click_suppress: Duration,
}

/// Persists a new time range for a task.
///
/// The core never calls this; callers invoke it with a [`GestureResult`]'s
/// interval once a gesture completes, and relayout from the returned state.
pub trait TaskTimeUpdater {
    fn update_task_time(
        &mut self,
        task_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Task>;
}
