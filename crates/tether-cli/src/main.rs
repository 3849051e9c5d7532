#![forbid(unsafe_code)]

mod cmd;
mod git;
mod ledger;
mod output;
mod snapshot;

use std::env;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tether_core::config;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tether: correlate git history with a beads issue ledger",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Repository root (defaults to the current directory).
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Bead ledger path (defaults to [scan].ledger from config).
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lookup",
        about = "Show beads that touched a file or directory",
        after_help = "EXAMPLES:\n    # Beads that touched one file\n    tether files src/auth/login.rs\n\n    # Beads that touched anything under a directory\n    tether files src/auth\n\n    # Emit machine-readable output\n    tether files src/auth --json"
    )]
    Files(cmd::files::FilesArgs),

    #[command(
        next_help_heading = "Lookup",
        about = "Show beads for files matching a glob pattern",
        after_help = "EXAMPLES:\n    # All Rust sources under src/\n    tether glob 'src/**/*.rs'\n\n    # Emit machine-readable output\n    tether glob 'src/*.rs' --json"
    )]
    Glob(cmd::glob::GlobArgs),

    #[command(
        next_help_heading = "Report",
        about = "Rank files touched by the most beads",
        after_help = "EXAMPLES:\n    # Top ten hotspots\n    tether hotspots\n\n    # Every indexed file\n    tether hotspots --limit 0"
    )]
    Hotspots(cmd::hotspots::HotspotsArgs),

    #[command(
        next_help_heading = "Report",
        about = "Detect commits that lack a bead linkage",
        after_help = "EXAMPLES:\n    # Scan all history\n    tether orphans\n\n    # Recent commits only, lower bar\n    tether orphans --since '2 weeks ago' --threshold 20\n\n    # Emit machine-readable output\n    tether orphans --json"
    )]
    Orphans(cmd::orphans::OrphansArgs),

    #[command(
        next_help_heading = "Report",
        about = "Show snapshot and index statistics",
        after_help = "EXAMPLES:\n    tether stats\n    tether stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TETHER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tether=debug,info"
        } else {
            "tether=info,warn"
        })
    });

    let format = env::var("TETHER_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let repo_root = match &cli.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let config = config::load_project_config(&repo_root)?;
    let ledger_override = cli.ledger.as_deref();

    match &cli.command {
        Commands::Files(args) => {
            cmd::files::run_files(args, output, &repo_root, &config, ledger_override)
        }
        Commands::Glob(args) => {
            cmd::glob::run_glob(args, output, &repo_root, &config, ledger_override)
        }
        Commands::Hotspots(args) => {
            cmd::hotspots::run_hotspots(args, output, &repo_root, &config, ledger_override)
        }
        Commands::Orphans(args) => {
            cmd::orphans::run_orphans(args, output, &repo_root, &config, ledger_override)
        }
        Commands::Stats(args) => {
            cmd::stats::run_stats(args, output, &repo_root, &config, ledger_override)
        }
        Commands::Completions(_) => unreachable!("handled above"),
    }
}
