//! Command-line front end for the habit tracker core.
//!
//! # Responsibility
//! - Map subcommands to route calls and print one JSON envelope per call.
//! - Exit non-zero whenever the envelope carries an error.

mod api;
mod config;
mod envelope;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use envelope::{respond, ApiResponse};
use rusqlite::Connection;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracker_core::db::open_db;
use tracker_core::{init_logging_with, LogConfig};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(version, about = "Habit tracker with a configurable day boundary")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "TRACKER_DB_PATH")]
    db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "TRACKER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Mirror warnings and errors to stderr
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an instant to its logical day
    Day {
        /// Local instant `YYYY-MM-DDTHH:MM[:SS]`; defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// List day ids from start to end, inclusive
    Range { start: String, end: String },

    /// List the day ids of the week holding a day
    Week {
        #[arg(long)]
        day: Option<String>,
    },

    /// Show the day's habits in display order
    Today {
        #[arg(long)]
        day: Option<String>,
    },

    /// Set or cycle an entry status
    #[command(subcommand)]
    Status(StatusCommands),

    /// Replace the notes of an entry
    Notes {
        habit: String,
        #[arg(long)]
        day: Option<String>,
        /// Omit to clear the notes
        #[arg(long)]
        text: Option<String>,
    },

    /// Evaluate monthly pace for a habit
    Trend {
        habit: String,
        #[arg(long)]
        day: Option<String>,
    },

    /// Manage habits
    #[command(subcommand)]
    Habit(HabitCommands),

    /// List active categories
    Categories,

    /// Import a markdown habit list (`-` reads stdin)
    Import {
        file: PathBuf,
        /// Parse and report without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Check a markdown habit list without writing
    Validate { file: PathBuf },

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum StatusCommands {
    /// Overwrite the status of an entry
    Set {
        habit: String,
        status: String,
        #[arg(long)]
        day: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        count: Option<String>,
    },
    /// Advance an entry one step in the quick-toggle cycle
    Cycle {
        habit: String,
        #[arg(long)]
        day: Option<String>,
    },
}

#[derive(Subcommand)]
enum HabitCommands {
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        daily_target: Option<String>,
        #[arg(long)]
        monthly_target: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i64>,
    },
    List,
    Rename {
        habit: String,
        name: String,
    },
    /// Re-parent a habit; omit `--parent` to make it top-level
    Move {
        habit: String,
        #[arg(long)]
        parent: Option<String>,
    },
    Delete {
        habit: String,
    },
    Restore {
        habit: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Set {
        #[arg(long, allow_negative_numbers = true)]
        boundary_hour: Option<i64>,
        #[arg(long)]
        week_start: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    start_logging(&cli);

    let code = match run(cli) {
        Ok(response) => {
            match serde_json::to_string_pretty(&response.body) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{}", response.body),
            }
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    };
    tracker_core::flush_logging();
    code
}

fn start_logging(cli: &Cli) {
    let level = log_level(cli);
    let log_dir = config::resolve_log_dir(cli.log_dir.as_deref());
    let started = LogConfig::new(level, &log_dir.to_string_lossy())
        .and_then(|config| init_logging_with(config.with_stderr_mirror(cli.log_stderr)));
    if let Err(err) = started {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn log_level(cli: &Cli) -> &str {
    cli.log_level
        .as_deref()
        .unwrap_or(tracker_core::default_log_level())
}

fn run(cli: Cli) -> Result<ApiResponse> {
    let db_path = config::resolve_db_path(cli.db.as_deref());
    let connect = || {
        open_db(&db_path)
            .with_context(|| format!("failed to open database `{}`", db_path.display()))
    };

    let response = match cli.command {
        Commands::Day { at } => respond(api::logical_day(&connect()?, at.as_deref())),
        Commands::Range { start, end } => respond(api::range(&start, &end)),
        Commands::Week { day } => respond(api::week(&connect()?, day.as_deref())),
        Commands::Today { day } => respond(api::daily(&connect()?, day.as_deref())),
        Commands::Status(StatusCommands::Set {
            habit,
            status,
            day,
            count,
        }) => respond(api::set_status(
            &connect()?,
            &habit,
            day.as_deref(),
            &status,
            count.as_deref(),
        )),
        Commands::Status(StatusCommands::Cycle { habit, day }) => {
            respond(api::cycle(&connect()?, &habit, day.as_deref()))
        }
        Commands::Notes { habit, day, text } => {
            respond(api::set_notes(&connect()?, &habit, day.as_deref(), text))
        }
        Commands::Trend { habit, day } => {
            respond(api::trend(&connect()?, &habit, day.as_deref()))
        }
        Commands::Habit(command) => run_habit(&connect()?, command),
        Commands::Categories => respond(api::list_categories(&connect()?)),
        Commands::Import { file, dry_run } => {
            let content = read_input(&file)?;
            if dry_run {
                respond(api::preview_import(&connect()?, &content))
            } else {
                respond(api::import_list(&connect()?, &content))
            }
        }
        Commands::Validate { file } => {
            let content = read_input(&file)?;
            respond(api::validate_import(&connect()?, &content))
        }
        Commands::Settings(SettingsCommands::Show) => respond(api::show_settings(&connect()?)),
        Commands::Settings(SettingsCommands::Set {
            boundary_hour,
            week_start,
        }) => respond(api::update_settings(
            &connect()?,
            boundary_hour,
            week_start.as_deref(),
        )),
    };
    Ok(response)
}

fn run_habit(conn: &Connection, command: HabitCommands) -> ApiResponse {
    match command {
        HabitCommands::Add {
            name,
            category,
            parent,
            daily_target,
            monthly_target,
            priority,
        } => respond(api::add_habit(
            conn,
            api::NewHabitArgs {
                name,
                category,
                parent,
                daily_target,
                monthly_target,
                priority,
            },
        )),
        HabitCommands::List => respond(api::list_habits(conn)),
        HabitCommands::Rename { habit, name } => respond(api::rename_habit(conn, &habit, &name)),
        HabitCommands::Move { habit, parent } => {
            respond(api::move_habit(conn, &habit, parent.as_deref()))
        }
        HabitCommands::Delete { habit } => respond(api::delete_habit(conn, &habit)),
        HabitCommands::Restore { habit } => respond(api::restore_habit(conn, &habit)),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{log_level, Cli, Commands};
    use clap::Parser;

    #[test]
    fn log_level_defaults_from_build_mode() {
        let cli = Cli::parse_from(["tracker", "categories"]);
        assert_eq!(log_level(&cli), tracker_core::default_log_level());
        assert!(!cli.log_stderr);

        let cli = Cli::parse_from(["tracker", "--log-level", "warn", "--log-stderr", "categories"]);
        assert_eq!(log_level(&cli), "warn");
        assert!(cli.log_stderr);
    }

    #[test]
    fn week_and_dry_run_commands_parse() {
        let cli = Cli::parse_from(["tracker", "week", "--day", "2025-03-12"]);
        assert!(matches!(cli.command, Commands::Week { day: Some(ref day) } if day == "2025-03-12"));

        let cli = Cli::parse_from(["tracker", "import", "-", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Import { dry_run: true, .. }));
    }
}
