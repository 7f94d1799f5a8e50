//! JSON task file used as the persistence side of the CLI.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use weekline_core::error::Result;
use weekline_core::task::find_task_mut;
use weekline_core::{CoreError, Interval, Task, TaskTimeUpdater};

/// A task tree read from, and written back to, a JSON array file.
pub struct JsonTaskFile {
    path: PathBuf,
    tasks: Vec<Task>,
    offset: FixedOffset,
}

impl JsonTaskFile {
    /// Read `path`. Timestamps written back use `offset`.
    pub fn open(path: &Path, offset: FixedOffset) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            tasks,
            offset,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.tasks)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TaskTimeUpdater for JsonTaskFile {
    fn update_task_time(
        &mut self,
        task_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Task> {
        let interval = Interval::try_new(start, end)?;
        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| CoreError::TaskNotFound(task_id.to_string()))?;
        task.set_interval(&interval, self.offset);
        let updated = task.clone();
        self.save()?;
        tracing::info!(task_id, %start, %end, "task time updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn updates_nested_task_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id":"p","title":"Parent","subtasks":[{"id":"c","title":"Child","endDate":"2026-10-20T10:00:00Z"}]}]"#,
        )
        .unwrap();

        let utc = FixedOffset::east_opt(0).unwrap();
        let mut file = JsonTaskFile::open(&path, utc).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 10, 20, 14, 15, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 10, 20, 15, 15, 0).unwrap();
        let updated = file.update_task_time("c", start, end).unwrap();
        assert_eq!(updated.start.as_deref(), Some("2026-10-20T14:15:00+00:00"));

        let reopened = JsonTaskFile::open(&path, utc).unwrap();
        let child = &reopened.tasks()[0].children[0];
        assert_eq!(child.end.as_deref(), Some("2026-10-20T15:15:00+00:00"));

        assert!(matches!(
            file.update_task_time("missing", start, end),
            Err(CoreError::TaskNotFound(_))
        ));
        assert!(file.update_task_time("c", end, start).is_err());
    }
}
