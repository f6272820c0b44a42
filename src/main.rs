use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ta_allocator::display::print_allocation;
use ta_allocator::{check_assignments, run_project, ProjectPaths, RunError, RunResult};

/// Assigns student project groups to TAs
#[derive(Parser)]
#[command(name = "ta-allocator", version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assign groups to TAs and update the project history
    Assign {
        /// Read the existing project history before assigning
        #[arg(long)]
        history: bool,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// Check an assignment directory against the block list
    Check {
        #[command(flatten)]
        paths: PathArgs,
    },
}

#[derive(Args)]
struct PathArgs {
    /// Directory holding the input files; outputs are written there too
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Block list CSV (ta,student rows)
    #[arg(long)]
    blocks: Option<PathBuf>,

    /// TA list CSV
    #[arg(long)]
    tas: Option<PathBuf>,

    /// Student groups CSV, one group per row
    #[arg(long)]
    groups: Option<PathBuf>,

    /// Output directory for per-TA assignment files
    #[arg(long)]
    assignment_dir: Option<PathBuf>,

    /// Project history JSON
    #[arg(long)]
    history_file: Option<PathBuf>,
}

impl PathArgs {
    fn into_paths(self) -> ProjectPaths {
        let defaults = ProjectPaths::with_root(&self.dir);
        ProjectPaths {
            blocks: self.blocks.unwrap_or(defaults.blocks),
            staff: self.tas.unwrap_or(defaults.staff),
            groups: self.groups.unwrap_or(defaults.groups),
            assignment_dir: self.assignment_dir.unwrap_or(defaults.assignment_dir),
            history: self.history_file.unwrap_or(defaults.history),
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ta_allocator={log_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(command: Command) -> RunResult<()> {
    match command {
        Command::Assign { history, paths } => {
            let paths = paths.into_paths();
            let outcome = run_project(&paths, history)?;
            print_allocation(&outcome);
            println!("\nAssignments saved to: {}", paths.assignment_dir.display());
            println!("History saved to: {}", paths.history.display());
            Ok(())
        }
        Command::Check { paths } => {
            let conflicts = check_assignments(&paths.into_paths())?;
            if conflicts.is_empty() {
                info!("no conflicts found");
                Ok(())
            } else {
                for conflict in &conflicts {
                    println!("Conflict: {conflict}");
                }
                Err(RunError::ConflictsFound { count: conflicts.len() })
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
