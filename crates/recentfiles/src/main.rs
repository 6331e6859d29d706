//! RecentFiles command-line front end
//!
//! - **scan**: list files modified within a date range, streamed in batches
//! - **config**: show resolved paths and scan defaults
//!
//! SIGINT/SIGTERM (Ctrl+C on Windows) stop a running scan; the process then
//! exits with status 130.

use anyhow::Result;
use clap::{Parser, Subcommand};
use recentfiles_logging::{config_path, init_logging, LogConfig};
use recentfiles_scout::RecentConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

mod cli;

use cli::error::HelpfulError;
use cli::scan::Outcome;

/// Conventional exit status for a run ended by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "recentfiles", version, about = "Find recently modified files")]
struct Cli {
    /// Mirror info-level logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.recentfiles/config.toml)
    #[arg(long, global = true, env = "RECENTFILES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory tree for recently modified files
    Scan {
        /// Directory to scan (default: configured root)
        root: Option<PathBuf>,

        /// File name glob, e.g. "*.txt" (default: configured pattern)
        #[arg(short, long)]
        pattern: Option<String>,

        /// Do not exclude ROOT/<system folder>
        #[arg(long)]
        include_system_folder: bool,

        /// Earliest modification time: YYYY-MM-DD, "YYYY-MM-DD HH:MM:SS" or RFC 3339
        #[arg(long, conflicts_with = "days")]
        from: Option<String>,

        /// Latest modification time; a bare date includes the whole day
        #[arg(long)]
        to: Option<String>,

        /// Only files modified in the last N days
        #[arg(short, long)]
        days: Option<u32>,

        /// Ignore modification times entirely
        #[arg(long, conflicts_with_all = ["from", "to", "days"])]
        all_dates: bool,

        /// Print one JSON document when the scan ends
        #[arg(long)]
        json: bool,

        /// Output file paths only
        #[arg(short, long, conflicts_with = "json")]
        quiet: bool,

        /// Also write results to FILE (path, modified, size; tab-separated)
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: &Path) -> Result<RecentConfig> {
    RecentConfig::load_or_default(path)
        .map_err(|e| anyhow::Error::from(HelpfulError::invalid_config(path, &e.to_string())))
}

/// Raise the returned flag on SIGINT/SIGTERM (Ctrl+C on Windows).
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        std::thread::spawn(move || {
            for sig in signals.forever() {
                info!("Received signal {}, stopping scan...", sig);
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    #[cfg(windows)]
    {
        ctrlc::set_handler(move || {
            info!("Received Ctrl+C, stopping scan...");
            flag.store(true, Ordering::SeqCst);
        })?;
    }

    Ok(interrupted)
}

fn run_command(cli: Cli) -> Result<ExitCode> {
    let config_file = cli.config.unwrap_or_else(config_path);
    let config = load_config(&config_file)?;

    match cli.command {
        Commands::Scan {
            root,
            pattern,
            include_system_folder,
            from,
            to,
            days,
            all_dates,
            json,
            quiet,
            export,
        } => {
            let interrupted = install_interrupt_handler()?;
            let args = cli::scan::ScanArgs {
                root,
                pattern,
                include_system_folder,
                from,
                to,
                days,
                all_dates,
                json,
                quiet,
                export,
            };
            match cli::scan::run(args, &config, interrupted)? {
                Outcome::Completed => Ok(ExitCode::SUCCESS),
                Outcome::Aborted => Ok(ExitCode::from(EXIT_INTERRUPTED)),
            }
        }
        Commands::Config { json } => {
            cli::config::run(cli::config::ConfigArgs { json }, &config_file, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "recentfiles",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    match run_command(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
