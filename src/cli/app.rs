//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use super::habit;
use super::output::{Output, OutputFormat};
use crate::storage::{Config, HabitStore, StateFile};

#[derive(Parser)]
#[command(name = "hbit")]
#[command(author, version, about = "Track habits, streaks and lifelines")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the config's default_format, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "HBIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// State file to use instead of the configured one
    #[arg(long, global = true, env = "HBIT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start tracking a new habit
    Add {
        /// Habit name (surrounding whitespace is trimmed)
        name: String,
    },

    /// Stop tracking a habit and drop its streak
    #[command(visible_alias = "rm")]
    Delete {
        /// Habit name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Mark a habit as done for today
    Done {
        /// Habit name
        name: String,

        /// Day to record instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List habits with their streaks
    List,

    /// Show lifelines, fails and the current lifeline interval
    Status,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.or(config.default_format).unwrap_or_default();
    let output = Output::new(format, cli.verbose);

    output.verbose("hbit starting");

    let data_file = config.resolve_data_file(cli.data_file.as_deref())?;
    output.verbose_ctx("storage", &format!("Using state file: {}", data_file.display()));

    let mut store = HabitStore::open(StateFile::new(data_file))?;
    let state = store.state();
    output.verbose_ctx(
        "storage",
        &format!(
            "Loaded {} habits (lifelines={}, fails={}, interval={})",
            state.len(),
            state.lifelines(),
            state.fails(),
            state.lifeline_interval()
        ),
    );

    match cli.command {
        Commands::Add { name } => habit::add(&mut store, &output, &name)?,
        Commands::Delete { name, yes } => habit::delete(&mut store, &output, &name, yes)?,
        Commands::Done { name, date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            output.verbose_ctx("done", &format!("Recording completion on {}", today));
            habit::done(&mut store, &output, &name, today)?
        }
        Commands::List => habit::list(&store, &output, &config.display),
        Commands::Status => habit::status(&store, &output),
    }

    output.verbose("Command completed successfully");
    Ok(())
}
