//! Scan session lifecycle.
//!
//! A [`ScanController`] runs at most one session at a time on a dedicated
//! worker thread. The worker pulls paths from the [`Walker`], runs them
//! through the [`ScanFilter`] and buffers matches in a [`BatchBuffer`] that
//! is handed to the observer whenever its window elapses.
//!
//! # Outcomes
//!
//! - walk exhausted: remaining matches are flushed once, then `on_completed`
//! - cancellation observed: the unflushed buffer is dropped, then `on_aborted`
//! - metadata read failure: `on_error`; the controller stays usable

use crate::batch::BatchBuffer;
use crate::cancel::ScanCancelToken;
use crate::config::ScanConfig;
use crate::error::{Result, ScoutError};
use crate::filter::ScanFilter;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::observer::ScanObserver;
use crate::pattern::NamePattern;
use crate::types::{ScanRequest, ScanSummary, SessionId};
use crate::walker::Walker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// The live session: its cancellation flag and worker thread.
struct ScanSession {
    id: SessionId,
    cancel: ScanCancelToken,
    handle: JoinHandle<()>,
}

/// Owner of scan sessions.
///
/// `start` is a no-op while a session is running; `stop` cancels and joins it.
/// Dropping the controller stops any running session.
pub struct ScanController {
    fs: Arc<dyn FileSystem>,
    config: ScanConfig,
    session: Option<ScanSession>,
}

impl ScanController {
    /// Controller over the local disk.
    pub fn new(config: ScanConfig) -> Self {
        let fs = LocalFileSystem::with_follow_symlinks(config.follow_symlinks);
        Self::with_filesystem(Arc::new(fs), config)
    }

    /// Controller over an injected filesystem.
    pub fn with_filesystem(fs: Arc<dyn FileSystem>, config: ScanConfig) -> Self {
        Self {
            fs,
            config,
            session: None,
        }
    }

    /// Whether a session's worker is still running.
    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.handle.is_finished())
    }

    /// Id of the current (possibly finished, not yet reaped) session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    /// Start a scan session.
    ///
    /// Returns `Ok(None)` without side effects when a session is already
    /// running. An invalid name pattern is rejected here, before any session
    /// exists. A relative root is resolved against the current directory.
    /// All further outcomes are reported to `observer`.
    pub fn start<O: ScanObserver>(
        &mut self,
        mut request: ScanRequest,
        observer: O,
    ) -> Result<Option<SessionId>> {
        if self.is_active() {
            info!(root = %request.root.display(), "Scan already running; start ignored");
            return Ok(None);
        }
        if let Err(e) = self.reap_finished() {
            warn!(error = %e, "Previous scan worker ended abnormally");
        }

        let pattern = NamePattern::new(&request.pattern)?;
        request.root = absolute_root(&request.root)?;
        let id = SessionId::new();
        let cancel = ScanCancelToken::new();

        let worker = SessionWorker {
            id,
            fs: Arc::clone(&self.fs),
            filter: ScanFilter::new(&request, &self.config.system_folder),
            config: self.config.clone(),
            pattern,
            request,
            cancel: cancel.clone(),
        };

        let handle = std::thread::Builder::new()
            .name("recentfiles-scan".to_string())
            .spawn(move || worker.run(observer))?;

        self.session = Some(ScanSession { id, cancel, handle });
        Ok(Some(id))
    }

    /// Cancel the running session and wait for its worker to exit.
    ///
    /// No observer callback runs after this returns. A no-op when there is
    /// no session.
    pub fn stop(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        info!(session = %session.id, "Stopping scan");
        session.cancel.cancel();
        session
            .handle
            .join()
            .map_err(|_| ScoutError::WorkerPanicked)
    }

    /// Join a worker that has already exited on its own.
    fn reap_finished(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => session
                .handle
                .join()
                .map_err(|_| ScoutError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

/// `root` as an absolute path, without `.` components.
fn absolute_root(root: &Path) -> Result<PathBuf> {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(joined.components().collect())
}

impl Drop for ScanController {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "Scan worker ended abnormally");
        }
    }
}

/// Everything one session's worker thread owns.
struct SessionWorker {
    id: SessionId,
    fs: Arc<dyn FileSystem>,
    filter: ScanFilter,
    config: ScanConfig,
    pattern: NamePattern,
    request: ScanRequest,
    cancel: ScanCancelToken,
}

/// How the walk loop ended.
enum Outcome {
    Completed(ScanSummary),
    Aborted,
    Failed(ScoutError),
}

impl SessionWorker {
    fn run<O: ScanObserver>(self, mut observer: O) {
        let span = info_span!("scan", session = %self.id);
        let _enter = span.enter();

        info!(
            root = %self.request.root.display(),
            pattern = %self.pattern.as_str(),
            skip_system_folder = self.request.skip_system_folder,
            "Starting scan"
        );
        observer.on_started(&self.request.root);

        match self.walk(&mut observer) {
            Outcome::Completed(summary) => {
                info!(
                    files = summary.files_matched,
                    dirs = summary.dirs_visited,
                    skipped_dirs = summary.dirs_skipped,
                    batches = summary.batches,
                    duration_ms = summary.duration_ms,
                    "Scan complete"
                );
                observer.on_completed(&summary);
            }
            Outcome::Aborted => {
                info!("Scan aborted");
                observer.on_aborted();
            }
            Outcome::Failed(e) => {
                warn!(error = %e, "Scan failed");
                observer.on_error(e);
            }
        }
    }

    fn walk<O: ScanObserver>(&self, observer: &mut O) -> Outcome {
        let start = Instant::now();
        let mut buffer = BatchBuffer::new(self.config.flush_interval, start);
        let mut files_matched: u64 = 0;
        let mut walker = Walker::new(
            Arc::clone(&self.fs),
            self.request.root.clone(),
            self.pattern.clone(),
            self.cancel.clone(),
        );

        for item in walker.by_ref() {
            let path = match item {
                Ok(path) => path,
                Err(_aborted) => return Outcome::Aborted,
            };
            if self.cancel.is_cancelled() {
                return Outcome::Aborted;
            }

            match self.filter.evaluate(self.fs.as_ref(), &path) {
                Ok(Some(record)) => {
                    files_matched += 1;
                    buffer.push(record);
                }
                Ok(None) => {}
                Err(e) => return Outcome::Failed(e),
            }

            if let Some(batch) = buffer.take_if_due(Instant::now()) {
                observer.on_batch(batch);
            }
        }

        // A stop that raced the end of the walk still counts as an abort
        if self.cancel.is_cancelled() {
            return Outcome::Aborted;
        }
        if let Some(batch) = buffer.take_remaining() {
            observer.on_batch(batch);
        }

        Outcome::Completed(ScanSummary {
            files_matched,
            dirs_visited: walker.dirs_visited(),
            dirs_skipped: walker.dirs_skipped(),
            batches: buffer.batches_flushed(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
