//! Projection of column-assigned tasks onto pixel rectangles, and the
//! week-level layout pass that ties bucketing, columns and projection
//! together.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;

use super::bucket::{bucketize, DroppedTask};
use super::columns::{assign_columns, column_count, Placed};
use super::geometry::{time_to_offset, GridMetrics};
use super::interval::Interval;
use super::week::WeekWindow;
use crate::config::TimelineConfig;
use crate::task::Task;

/// A task placed on the grid of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedTask<'a> {
    pub task: &'a Task,
    /// Effective interval, unclipped.
    pub interval: Interval,
    pub column: usize,
    /// Columns in use on this day; the block is `1 / column_count` wide.
    pub column_count: usize,
    pub top: f64,
    pub height: f64,
}

impl PositionedTask<'_> {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Layout of a single day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<PositionedTask<'a>>,
    pub column_count: usize,
}

impl<'a> DayLayout<'a> {
    pub fn find(&self, task_id: &str) -> Option<&PositionedTask<'a>> {
        self.tasks.iter().find(|p| p.task.id == task_id)
    }
}

/// Layout of a whole week, one [`DayLayout`] per day in date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout<'a> {
    pub days: Vec<DayLayout<'a>>,
    pub dropped: Vec<DroppedTask>,
}

impl<'a> WeekLayout<'a> {
    pub fn day(&self, date: NaiveDate) -> Option<&DayLayout<'a>> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Locate a task anywhere in the week.
    pub fn find(&self, task_id: &str) -> Option<(NaiveDate, &PositionedTask<'a>)> {
        self.days
            .iter()
            .find_map(|d| d.find(task_id).map(|p| (d.date, p)))
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|d| d.tasks.len()).sum()
    }
}

/// Pixel offset of `instant` within `date`'s column.
///
/// Instants before the day's midnight are clipped to the top of the column.
fn offset_within_day(
    instant: DateTime<Utc>,
    date: NaiveDate,
    window: &WeekWindow,
    hour_height_px: f64,
) -> f64 {
    let clipped = instant.max(window.day_start(date));
    let local = clipped.with_timezone(&window.offset);
    time_to_offset(local.hour(), local.minute(), hour_height_px)
}

/// Turn one day's column assignment into positioned blocks.
pub fn project<'a>(
    placed: &[Placed<'a>],
    date: NaiveDate,
    window: &WeekWindow,
    metrics: &GridMetrics,
) -> Vec<PositionedTask<'a>> {
    let columns = column_count(placed);
    placed
        .iter()
        .map(|p| {
            let top = offset_within_day(p.interval.start, date, window, metrics.hour_height_px);
            let bottom = offset_within_day(p.interval.end, date, window, metrics.hour_height_px);
            PositionedTask {
                task: p.task,
                interval: p.interval,
                column: p.column,
                column_count: columns,
                top,
                height: (bottom - top).max(metrics.min_slot_height_px),
            }
        })
        .collect()
}

/// Full relayout of `tasks` for `window`.
///
/// Recomputed from scratch on every call; nothing carries over between
/// passes.
pub fn layout_week<'a>(
    tasks: &'a [Task],
    window: &WeekWindow,
    config: &TimelineConfig,
) -> WeekLayout<'a> {
    let buckets = bucketize(tasks, window);

    let days = window
        .days()
        .into_iter()
        .map(|date| {
            let placed = assign_columns(buckets.get(date), config.layout.tie_break);
            DayLayout {
                date,
                column_count: column_count(&placed),
                tasks: project(&placed, date, window, &config.grid),
            }
        })
        .collect();

    WeekLayout {
        days,
        dropped: buckets.dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Weekday};

    fn window() -> WeekWindow {
        WeekWindow::containing(
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            Weekday::Sun,
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    #[test]
    fn projects_top_and_height_from_times() {
        let tasks = vec![Task::new("a", "A")
            .with_start("2026-10-20T09:30:00Z")
            .with_end("2026-10-20T11:00:00Z")];
        let layout = layout_week(&tasks, &window(), &TimelineConfig::default());

        let a = layout.day(tuesday()).unwrap().find("a").unwrap();
        assert_eq!(a.top, 570.0);
        assert_eq!(a.height, 90.0);
        assert_eq!(a.bottom(), 660.0);
        assert_eq!(a.column, 0);
        assert_eq!(a.column_count, 1);
    }

    #[test]
    fn short_tasks_get_minimum_height() {
        let tasks = vec![Task::new("a", "A")
            .with_start("2026-10-20T09:00:00Z")
            .with_end("2026-10-20T09:05:00Z")];
        let layout = layout_week(&tasks, &window(), &TimelineConfig::default());
        let a = layout.find("a").unwrap().1;
        assert_eq!(a.height, 20.0);
    }

    #[test]
    fn interval_starting_on_previous_day_is_clipped_to_midnight() {
        let tasks = vec![Task::new("overnight", "Overnight")
            .with_start("2026-10-19T22:00:00Z")
            .with_end("2026-10-20T02:00:00Z")];
        let layout = layout_week(&tasks, &window(), &TimelineConfig::default());

        let (date, block) = layout.find("overnight").unwrap();
        assert_eq!(date, tuesday());
        assert_eq!(block.top, 0.0);
        assert_eq!(block.height, 120.0);
        assert_eq!(block.interval.duration_ms(), 4 * 3_600_000);
    }

    #[test]
    fn every_day_of_the_week_is_present() {
        let layout = layout_week(&[], &window(), &TimelineConfig::default());
        assert_eq!(layout.days.len(), 7);
        assert!(layout.days.iter().all(|d| d.tasks.is_empty() && d.column_count == 0));
        assert_eq!(layout.task_count(), 0);
    }
}
