//! Greedy lane assignment for overlapping tasks within one day.
//!
//! Entries are visited in start order. Each takes the lowest column not held
//! by an already-placed entry it overlaps. Overlapping tasks therefore never
//! share a column, while tasks that merely sit back to back reuse one, so a
//! day never needs more columns than its deepest overlap.

use serde::{Deserialize, Serialize};

use super::bucket::BucketEntry;
use super::interval::Interval;
use crate::task::Task;

/// How entries with identical start times are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order entries were given in.
    #[default]
    InputOrder,
    /// Order by task id, independent of input order.
    TaskId,
}

/// An entry with its assigned column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed<'a> {
    pub task: &'a Task,
    pub interval: Interval,
    pub column: usize,
}

/// Assign a column to every entry. The result is in start order.
pub fn assign_columns<'a>(entries: &[BucketEntry<'a>], tie_break: TieBreak) -> Vec<Placed<'a>> {
    let mut sorted: Vec<&BucketEntry<'a>> = entries.iter().collect();
    match tie_break {
        // stable: equal starts keep input order
        TieBreak::InputOrder => sorted.sort_by_key(|e| e.interval.start),
        TieBreak::TaskId => sorted.sort_by(|a, b| {
            a.interval
                .start
                .cmp(&b.interval.start)
                .then_with(|| a.task.id.cmp(&b.task.id))
        }),
    }

    let mut placed: Vec<Placed<'a>> = Vec::with_capacity(sorted.len());
    let mut occupied: Vec<bool> = Vec::new();

    for entry in sorted {
        occupied.clear();
        occupied.resize(placed.len() + 1, false);
        for prior in placed.iter().filter(|p| p.interval.overlaps(&entry.interval)) {
            // a column beyond placed.len() can't be the lowest free one
            if let Some(slot) = occupied.get_mut(prior.column) {
                *slot = true;
            }
        }
        let column = occupied.iter().position(|taken| !taken).unwrap_or(placed.len());

        placed.push(Placed {
            task: entry.task,
            interval: entry.interval,
            column,
        });
    }

    placed
}

/// Number of columns a day needs to render `placed`.
pub fn column_count(placed: &[Placed<'_>]) -> usize {
    placed.iter().map(|p| p.column + 1).max().unwrap_or(0)
}
