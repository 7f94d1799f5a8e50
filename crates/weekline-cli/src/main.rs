use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "weekline", version, about = "Weekline timeline CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/weekline/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the week layout of a task file
    Layout(commands::layout::LayoutArgs),
    /// Move a task to a new day and time slot, keeping its duration
    Reschedule(commands::gesture::RescheduleArgs),
    /// Move the start or end edge of a task
    Resize(commands::gesture::ResizeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("WEEKLINE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Layout(args) => commands::layout::run(args, config_path),
        Commands::Reschedule(args) => commands::gesture::reschedule(args, config_path),
        Commands::Resize(args) => commands::gesture::resize(args, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
