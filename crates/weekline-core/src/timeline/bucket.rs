//! Grouping of tasks into per-day buckets for one week.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::Interval;
use super::week::WeekWindow;
use crate::task::{flatten, Task};

/// A task together with the interval it occupies on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketEntry<'a> {
    pub task: &'a Task,
    pub interval: Interval,
}

/// A task excluded from layout because one of its timestamps is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedTask {
    pub task_id: String,
    pub reason: String,
}

/// Output of [`bucketize`].
#[derive(Debug, Clone, Default)]
pub struct DayBuckets<'a> {
    /// Entries keyed by the calendar date of their interval's end.
    pub days: BTreeMap<NaiveDate, Vec<BucketEntry<'a>>>,
    pub dropped: Vec<DroppedTask>,
}

impl<'a> DayBuckets<'a> {
    pub fn get(&self, date: NaiveDate) -> &[BucketEntry<'a>] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Place every task of the tree (children included) into the bucket for
/// the day its interval ends on, keeping only those ending inside `window`.
///
/// Tasks without an end are skipped silently. Tasks whose end cannot be
/// parsed are logged and reported in [`DayBuckets::dropped`]; they never
/// abort the pass. Entries keep task-tree order within a bucket.
pub fn bucketize<'a>(tasks: &'a [Task], window: &WeekWindow) -> DayBuckets<'a> {
    let mut buckets = DayBuckets::default();

    for task in flatten(tasks) {
        let interval = match task.effective_interval(window.offset) {
            Ok(Some(interval)) => interval,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(
                    task_id = %task.id,
                    field = %err.field,
                    value = %err.value,
                    "dropping task with unparsable timestamp from layout"
                );
                buckets.dropped.push(DroppedTask {
                    task_id: task.id.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if !window.contains(interval.end) {
            continue;
        }

        buckets
            .days
            .entry(window.local_date(interval.end))
            .or_default()
            .push(BucketEntry { task, interval });
    }

    buckets
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

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn buckets_by_end_date_within_the_week() {
        let tasks = vec![
            Task::new("tue", "Tue")
                .with_start("2026-10-20T09:00:00Z")
                .with_end("2026-10-20T10:00:00Z"),
            Task::new("overnight", "Overnight")
                .with_start("2026-10-20T23:00:00Z")
                .with_end("2026-10-21T01:00:00Z"),
            Task::new("next-week", "Next week").with_end("2026-10-25T09:00:00Z"),
            Task::new("last-week", "Last week").with_end("2026-10-17T23:59:59Z"),
            Task::new("no-time", "No time"),
        ];

        let buckets = bucketize(&tasks, &window());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.get(date(20))[0].task.id, "tue");
        assert_eq!(buckets.get(date(21))[0].task.id, "overnight");
        assert!(buckets.dropped.is_empty());
    }

    #[test]
    fn buckets_by_local_end_date_in_the_window_offset() {
        let tokyo = WeekWindow::containing(
            date(20),
            Weekday::Sun,
            FixedOffset::east_opt(9 * 3600).unwrap(),
        );
        let tasks = vec![
            // Tue 20:00 UTC is Wed 05:00 in +09:00
            Task::new("evening", "Evening")
                .with_start("2026-10-20T19:00:00Z")
                .with_end("2026-10-20T20:00:00Z"),
            // Sat 16:00 UTC is already Sun 01:00 locally, next week
            Task::new("late-sat", "Late Saturday").with_end("2026-10-24T16:00:00Z"),
            // Sat 15:30 UTC before the window is Sun 00:30 locally
            Task::new("early-sun", "Early Sunday").with_end("2026-10-17T15:30:00Z"),
        ];

        let buckets = bucketize(&tasks, &tokyo);
        assert_eq!(buckets.len(), 2);
        assert!(buckets.get(date(20)).is_empty());
        assert_eq!(buckets.get(date(21))[0].task.id, "evening");
        assert_eq!(buckets.get(date(18))[0].task.id, "early-sun");
        assert!(buckets.get(date(24)).is_empty());

        let utc_buckets = bucketize(&tasks, &window());
        assert_eq!(utc_buckets.get(date(20))[0].task.id, "evening");
        assert_eq!(utc_buckets.get(date(24))[0].task.id, "late-sat");
    }

    #[test]
    fn week_edges_are_inclusive() {
        let tasks = vec![
            Task::new("first", "First").with_end("2026-10-18T00:00:00Z"),
            Task::new("last", "Last").with_end("2026-10-24T23:59:59.999Z"),
        ];
        let buckets = bucketize(&tasks, &window());
        assert_eq!(buckets.get(date(18)).len(), 1);
        assert_eq!(buckets.get(date(24)).len(), 1);
    }

    #[test]
    fn completed_timestamp_and_children_are_used() {
        let tasks = vec![Task::new("parent", "Parent")
            .with_completed_at("2026-10-22T15:00:00Z")
            .with_child(Task::new("child", "Child").with_end("2026-10-22T16:00:00Z"))];

        let ids: Vec<_> = bucketize(&tasks, &window())
            .get(date(22))
            .iter()
            .map(|e| e.task.id.as_str())
            .collect();
        assert_eq!(ids, ["parent", "child"]);
    }

    #[test]
    fn unparsable_end_is_dropped_not_fatal() {
        let tasks = vec![
            Task::new("bad", "Bad")
                .with_start("2026-10-20T09:00:00Z")
                .with_end("not-a-date"),
            Task::new("good", "Good").with_end("2026-10-20T10:00:00Z"),
        ];
        let buckets = bucketize(&tasks, &window());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.dropped.len(), 1);
        assert_eq!(buckets.dropped[0].task_id, "bad");
    }
}
