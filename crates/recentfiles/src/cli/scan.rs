//! Scan command - List recently modified files under a directory
//!
//! Drives a [`ScanController`] session from the main thread: batches are
//! printed as they arrive and Ctrl+C is turned into `stop()`.

use crate::cli::dates::{parse_bound, Bound};
use crate::cli::error::HelpfulError;
use crate::cli::output::{format_duration_ms, format_record_line, print_summary_table};
use chrono::{Duration as ChronoDuration, Local};
use recentfiles_scout::{
    export, FileRecord, RecentConfig, ScanController, ScanEvent, ScanRequest, ScanSummary,
    ScoutError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How often the main thread checks for Ctrl+C while waiting on the session
const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Arguments for the scan command
#[derive(Debug, Default)]
pub struct ScanArgs {
    pub root: Option<PathBuf>,
    pub pattern: Option<String>,
    pub include_system_folder: bool,
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<u32>,
    pub all_dates: bool,
    pub json: bool,
    pub quiet: bool,
    pub export: Option<PathBuf>,
}

/// How the session ended, as far as the exit code is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Aborted,
}

/// Document printed by `--json`
#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    root: &'a Path,
    files: &'a [FileRecord],
    summary: Option<&'a ScanSummary>,
    outcome: Outcome,
}

/// Merge command-line flags over the configured defaults.
///
/// Date precedence: `--all-dates`, then `--from`, then `--days`, then the
/// configured `days_back`.
pub fn build_request(args: &ScanArgs, config: &RecentConfig) -> Result<ScanRequest, HelpfulError> {
    let defaults = config.default_request();

    let date_from = if args.all_dates {
        None
    } else if let Some(value) = &args.from {
        Some(
            parse_bound(value, Bound::Start)
                .map_err(|reason| HelpfulError::invalid_date("--from", value, &reason))?,
        )
    } else if let Some(days) = args.days {
        Some(Local::now() - ChronoDuration::days(i64::from(days)))
    } else {
        defaults.date_from
    };

    let date_to = match &args.to {
        Some(value) if !args.all_dates => Some(
            parse_bound(value, Bound::End)
                .map_err(|reason| HelpfulError::invalid_date("--to", value, &reason))?,
        ),
        _ => None,
    };

    let skip_system_folder = defaults.skip_system_folder && !args.include_system_folder;

    Ok(ScanRequest::new(args.root.clone().unwrap_or(defaults.root))
        .with_pattern(args.pattern.clone().unwrap_or(defaults.pattern))
        .skip_system_folder(skip_system_folder)
        .modified_between(date_from, date_to))
}

fn validate_root(root: &Path) -> Result<(), HelpfulError> {
    if !root.exists() {
        return Err(HelpfulError::path_not_found(root));
    }
    if !root.is_dir() {
        return Err(HelpfulError::not_a_directory(root));
    }
    Ok(())
}

/// Run one scan session to its end.
///
/// `interrupted` is raised by the process signal handler.
pub fn run(
    args: ScanArgs,
    config: &RecentConfig,
    interrupted: Arc<AtomicBool>,
) -> anyhow::Result<Outcome> {
    let request = build_request(&args, config)?;
    validate_root(&request.root)?;

    info!(
        root = %request.root.display(),
        pattern = %request.pattern,
        from = ?request.date_from,
        to = ?request.date_to,
        "Scan requested"
    );

    let root = request.root.clone();
    let pattern = request.pattern.clone();
    let mut controller = ScanController::new(config.scan_config());
    let (tx, rx) = mpsc::channel();

    let session = controller.start(request, tx).map_err(|e| match e {
        ScoutError::Pattern(reason) => {
            anyhow::Error::from(HelpfulError::invalid_pattern(&pattern, &reason))
        }
        other => anyhow::Error::from(other),
    })?;
    if let Some(session) = session {
        info!(session = %session, root = %root.display(), "Scan session started");
    }

    let mut records: Vec<FileRecord> = Vec::new();
    let mut stop_requested = false;

    let summary = loop {
        if !stop_requested && interrupted.load(Ordering::SeqCst) {
            info!("Interrupt received, stopping scan");
            controller.stop()?;
            stop_requested = true;
        }

        match rx.recv_timeout(INTERRUPT_POLL_INTERVAL) {
            Ok(ScanEvent::Started { .. }) => records.clear(),
            Ok(ScanEvent::Batch(batch)) => {
                if !args.json {
                    print_batch(&batch, args.quiet);
                }
                records.extend(batch);
            }
            Ok(ScanEvent::Completed(summary)) => break Some(summary),
            Ok(ScanEvent::Aborted) => break None,
            Ok(ScanEvent::Failed(e)) => {
                return Err(anyhow::Error::from(e).context("Scan failed"));
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                anyhow::bail!("scan worker exited without reporting an outcome");
            }
        }
    };
    controller.stop()?;

    let outcome = if summary.is_some() {
        Outcome::Completed
    } else {
        Outcome::Aborted
    };

    if let Some(destination) = &args.export {
        export::export_to_file(destination, &records).map_err(|e| {
            HelpfulError::cannot_write_export(destination, &e.to_string())
        })?;
        info!(path = %destination.display(), files = records.len(), "Exported results");
    }

    if args.json {
        let report = ScanReport {
            root: &root,
            files: &records,
            summary: summary.as_ref(),
            outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(outcome);
    }

    match &summary {
        Some(summary) if !args.quiet => print_summary(summary, &root),
        Some(_) => {}
        None => {
            warn!(delivered = records.len(), "Scan aborted");
            eprintln!("Scan aborted: {} file(s) delivered before stop", records.len());
        }
    }

    if let Some(destination) = args.export.as_ref().filter(|_| !args.quiet) {
        println!("Exported {} file(s) to {}", records.len(), destination.display());
    }

    Ok(outcome)
}

fn print_batch(batch: &[FileRecord], quiet: bool) {
    for record in batch {
        if quiet {
            println!("{}", record.path.display());
        } else {
            println!("{}", format_record_line(record));
        }
    }
}

fn print_summary(summary: &ScanSummary, root: &Path) {
    println!();
    print_summary_table(
        "SCAN SUMMARY",
        vec![
            ("Root", root.display().to_string()),
            ("Files matched", summary.files_matched.to_string()),
            ("Directories scanned", summary.dirs_visited.to_string()),
            ("Directories skipped", summary.dirs_skipped.to_string()),
            ("Batches", summary.batches.to_string()),
            ("Duration", format_duration_ms(summary.duration_ms)),
        ],
    );
}
