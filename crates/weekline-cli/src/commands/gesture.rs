use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::Args;
use weekline_core::{
    DropTarget, Edge, GestureError, GestureMachine, GestureResult, Interval, Task,
    TaskTimeUpdater,
};

use super::load_config;
use crate::store::JsonTaskFile;

#[derive(Args)]
pub struct RescheduleArgs {
    /// JSON file holding an array of tasks
    #[arg(long)]
    tasks: PathBuf,
    /// Task id
    #[arg(long)]
    task: String,
    /// Target day (YYYY-MM-DD)
    #[arg(long)]
    day: NaiveDate,
    /// Target hour (0-23)
    #[arg(long)]
    hour: u32,
    /// Target quarter within the hour (0-3 with the default grid)
    #[arg(long, default_value_t = 0)]
    quarter: u32,
    /// Print the new interval without saving it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
pub struct ResizeArgs {
    /// JSON file holding an array of tasks
    #[arg(long)]
    tasks: PathBuf,
    /// Task id
    #[arg(long)]
    task: String,
    /// Edge to move: "start" or "end"
    #[arg(long)]
    edge: Edge,
    /// Vertical pointer movement in pixels (negative is upwards)
    #[arg(long, allow_hyphen_values = true)]
    pixels: f64,
    /// Print the new interval without saving it
    #[arg(long)]
    dry_run: bool,
}

fn current_interval(
    file: &JsonTaskFile,
    task_id: &str,
) -> Result<Interval, Box<dyn std::error::Error>> {
    let task: &Task = weekline_core::task::find_task(file.tasks(), task_id)
        .ok_or_else(|| weekline_core::CoreError::TaskNotFound(task_id.to_string()))?;
    task.effective_interval(file.offset())?
        .ok_or_else(|| GestureError::NoInterval(task_id.to_string()).into())
}

fn commit(
    file: &mut JsonTaskFile,
    result: &GestureResult,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(result)?);
    if !dry_run {
        let interval = result.interval();
        file.update_task_time(result.task_id(), interval.start, interval.end)?;
    }
    Ok(())
}

pub fn reschedule(
    args: RescheduleArgs,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let mut file = JsonTaskFile::open(&args.tasks, config.offset()?)?;
    let original = current_interval(&file, &args.task)?;

    let mut machine = GestureMachine::new(config.gesture_settings()?);
    machine.begin_drag(args.task.as_str(), original, Utc::now())?;
    let result = machine.drop_on(&DropTarget::new(args.day, args.hour, args.quarter))?;

    commit(&mut file, &result, args.dry_run)
}

pub fn resize(
    args: ResizeArgs,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let mut file = JsonTaskFile::open(&args.tasks, config.offset()?)?;
    let original = current_interval(&file, &args.task)?;

    let now = Utc::now();
    let mut machine = GestureMachine::new(config.gesture_settings()?);
    machine.begin_resize(args.task.as_str(), original, args.edge, now)?;
    let result = machine.finish_resize(args.edge, args.pixels, now)?;

    commit(&mut file, &result, args.dry_run)
}
