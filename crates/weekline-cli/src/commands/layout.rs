use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Args;
use weekline_core::{layout_week, SystemClock, WeekLayout};

use super::load_config;
use crate::store::JsonTaskFile;

#[derive(Args)]
pub struct LayoutArgs {
    /// JSON file holding an array of tasks
    #[arg(long)]
    tasks: PathBuf,
    /// Any date inside the week to show (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LayoutArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let offset = config.offset()?;
    let week = match args.date {
        Some(date) => config.week_containing(date)?,
        None => config.current_week(&SystemClock)?,
    };

    let file = JsonTaskFile::open(&args.tasks, offset)?;
    let layout = layout_week(file.tasks(), &week, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print!("{}", render_text(&layout, offset));
    }
    Ok(())
}

fn hhmm(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format("%H:%M").to_string()
}

fn render_text(layout: &WeekLayout<'_>, offset: FixedOffset) -> String {
    let mut out = String::new();
    for day in &layout.days {
        out.push_str(&day.date.format("%a %Y-%m-%d").to_string());
        if day.column_count > 1 {
            out.push_str(&format!("  [{} columns]", day.column_count));
        }
        out.push('\n');
        if day.tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for block in &day.tasks {
            out.push_str(&format!(
                "  {}-{}  col {}  top {:.0}px  height {:.0}px  {} {}\n",
                hhmm(block.interval.start, offset),
                hhmm(block.interval.end, offset),
                block.column,
                block.top,
                block.height,
                block.task.id,
                block.task.title,
            ));
        }
    }
    for dropped in &layout.dropped {
        out.push_str(&format!("skipped {}: {}\n", dropped.task_id, dropped.reason));
    }
    out
}
