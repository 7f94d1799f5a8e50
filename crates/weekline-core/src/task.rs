//! Canonical task model.
//!
//! Tasks arrive from the task source with a mix of field spellings
//! (`endDate`, `end_date`, `end`, ...). All variants are folded into one
//! [`Task`] shape during deserialization so the layout code never has to
//! care which one was used. Timestamps stay as strings until layout parses
//! them, because a single malformed value must only drop that task.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TimestampError;
use crate::timeline::Interval;

/// Duration assumed for tasks that have an end but no usable start.
pub const FALLBACK_DURATION_MINUTES: i64 = 30;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Cancelled,
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "in_progress" | "inprogress" | "doing" | "running" => Self::InProgress,
            "done" | "completed" | "complete" => Self::Done,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Todo,
        }
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Which timestamp of a task a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampField {
    Start,
    End,
    Completed,
}

impl fmt::Display for TimestampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Completed => "completed",
        })
    }
}

/// A task as seen by the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTask")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub completed_at: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Task>,
}

/// Wire shape of a task with every accepted spelling as its own field, so
/// a record carrying two spellings of one timestamp still reads.
#[derive(Deserialize)]
struct RawTask {
    #[serde(deserialize_with = "text")]
    id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    start: Option<String>,
    #[serde(default, rename = "startDate", deserialize_with = "lenient_text")]
    start_date_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    start_date: Option<String>,
    #[serde(default, rename = "startTime", deserialize_with = "lenient_text")]
    start_time_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    start_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    end: Option<String>,
    #[serde(default, rename = "endDate", deserialize_with = "lenient_text")]
    end_date_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    end_date: Option<String>,
    #[serde(default, rename = "endTime", deserialize_with = "lenient_text")]
    end_time_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    end_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    completed_at: Option<String>,
    #[serde(default, rename = "completedAt", deserialize_with = "lenient_text")]
    completed_at_camel: Option<String>,
    #[serde(default, rename = "completedDate", deserialize_with = "lenient_text")]
    completed_date_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    completed_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_status")]
    status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Option<u8>,
    #[serde(default)]
    children: Option<Vec<Task>>,
    #[serde(default)]
    subtasks: Option<Vec<Task>>,
}

/// First spelling that carries a non-blank value.
fn first_present<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().flatten().find(|v| !v.trim().is_empty())
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        let mut children = raw.children.unwrap_or_default();
        children.extend(raw.subtasks.unwrap_or_default());
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            start: first_present([
                raw.start,
                raw.start_date_camel,
                raw.start_date,
                raw.start_time_camel,
                raw.start_time,
            ]),
            end: first_present([
                raw.end,
                raw.end_date_camel,
                raw.end_date,
                raw.end_time_camel,
                raw.end_time,
            ]),
            completed_at: first_present([
                raw.completed_at,
                raw.completed_at_camel,
                raw.completed_date_camel,
                raw.completed_date,
            ]),
            status: raw.status,
            priority: raw.priority,
            children,
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Keep any scalar as text. Non-string timestamps then fail to parse at
/// layout time and drop only their own task.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => TaskStatus::from(s),
        _ => TaskStatus::Todo,
    })
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|p| p.is_finite())
        .map(|p| p.round().clamp(0.0, 100.0) as u8))
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start: None,
            end: None,
            completed_at: None,
            status: TaskStatus::Todo,
            priority: None,
            children: Vec::new(),
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_completed_at(mut self, completed_at: impl Into<String>) -> Self {
        self.completed_at = Some(completed_at.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set priority (clamped to 0-100)
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority.min(100));
        self
    }

    pub fn with_child(mut self, child: Task) -> Self {
        self.children.push(child);
        self
    }

    /// Derive the interval this task occupies on the timeline.
    ///
    /// `end` falls back to `completed_at`; with neither, the task has no
    /// interval. A missing, unparsable or non-preceding `start` is replaced
    /// by `end - 30 minutes`.
    ///
    /// # Errors
    /// Returns [`TimestampError`] when the end (or completed) timestamp is
    /// present but cannot be parsed.
    pub fn effective_interval(
        &self,
        offset: FixedOffset,
    ) -> Result<Option<Interval>, TimestampError> {
        let (field, raw_end) = match (&self.end, &self.completed_at) {
            (Some(end), _) => (TimestampField::End, end),
            (None, Some(completed)) => (TimestampField::Completed, completed),
            (None, None) => return Ok(None),
        };
        let end = parse_timestamp(field, raw_end, offset)?;
        let fallback_start = end - Duration::minutes(FALLBACK_DURATION_MINUTES);

        let start = match self.start.as_deref() {
            None => fallback_start,
            Some(raw) => match parse_timestamp(TimestampField::Start, raw, offset) {
                Ok(start) if start < end => start,
                Ok(start) => {
                    tracing::debug!(
                        task_id = %self.id,
                        %start,
                        %end,
                        "start not before end, using fallback start"
                    );
                    fallback_start
                }
                Err(err) => {
                    tracing::warn!(task_id = %self.id, error = %err, "using fallback start");
                    fallback_start
                }
            },
        };

        Ok(Some(Interval::new_unchecked(start, end)))
    }

    /// Write a new time range back onto the task as RFC 3339 strings.
    pub fn set_interval(&mut self, interval: &Interval, offset: FixedOffset) {
        self.start = Some(interval.start.with_timezone(&offset).to_rfc3339());
        self.end = Some(interval.end.with_timezone(&offset).to_rfc3339());
    }
}

/// Depth-first, parent-before-children listing of a task tree.
pub fn flatten(tasks: &[Task]) -> Vec<&Task> {
    fn walk<'a>(tasks: &'a [Task], out: &mut Vec<&'a Task>) {
        for task in tasks {
            out.push(task);
            walk(&task.children, out);
        }
    }

    let mut out = Vec::new();
    walk(tasks, &mut out);
    out
}

/// Find a task anywhere in a tree by id.
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    flatten(tasks).into_iter().find(|t| t.id == id)
}

/// Mutable variant of [`find_task`].
pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.children, id) {
            return Some(found);
        }
    }
    None
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// RFC 3339 values carry their own offset. Values without one are read as
/// wall-clock time in `offset`, and a bare date means midnight.
///
/// # Errors
/// Returns [`TimestampError`] if no accepted format matches.
pub fn parse_timestamp(
    field: TimestampField,
    value: &str,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|n| offset.from_local_datetime(&n).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimestampError {
            field,
            value: value.to_string(),
        })
}
