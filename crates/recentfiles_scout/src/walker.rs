//! Cancellable depth-first file walker.
//!
//! The walk uses an explicit stack of pending directories instead of
//! recursion so cancellation can be polled between every step:
//!
//! 1. before a popped directory is listed
//! 2. before each matching file is yielded
//! 3. before each subdirectory is pushed
//!
//! A directory whose listing fails (permission denied, removed mid-scan) is
//! skipped and the walk continues. Symlink loops are not detected.

use crate::cancel::ScanCancelToken;
use crate::fs::FileSystem;
use crate::pattern::NamePattern;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The walk was stopped through its [`ScanCancelToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aborted")
    }
}

/// Lazy producer of matching file paths below a root.
///
/// Yields `Ok(path)` for every reachable, listable file exactly once (order
/// unspecified), or a single `Err(Aborted)` after which it is exhausted.
pub struct Walker {
    fs: Arc<dyn FileSystem>,
    pattern: NamePattern,
    cancel: ScanCancelToken,
    pending: Vec<PathBuf>,
    /// Directory whose files are being yielded; its subdirectories are
    /// pushed once those files run out.
    current_dir: Option<PathBuf>,
    current_files: std::vec::IntoIter<PathBuf>,
    finished: bool,
    dirs_visited: u64,
    dirs_skipped: u64,
}

impl Walker {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        pattern: NamePattern,
        cancel: ScanCancelToken,
    ) -> Self {
        Self {
            fs,
            pattern,
            cancel,
            pending: vec![root.into()],
            current_dir: None,
            current_files: Vec::new().into_iter(),
            finished: false,
            dirs_visited: 0,
            dirs_skipped: 0,
        }
    }

    /// Directories popped from the stack so far.
    pub fn dirs_visited(&self) -> u64 {
        self.dirs_visited
    }

    /// Directories skipped because a listing failed.
    pub fn dirs_skipped(&self) -> u64 {
        self.dirs_skipped
    }

    fn abort(&mut self) -> Option<Result<PathBuf, Aborted>> {
        self.finished = true;
        self.pending.clear();
        self.current_dir = None;
        Some(Err(Aborted))
    }

    /// Push subdirectories of `dir`, polling cancellation before each push.
    fn push_subdirs(&mut self, dir: &Path) -> Result<(), Aborted> {
        let subdirs = match self.fs.list_dirs(dir) {
            Ok(subdirs) => subdirs,
            Err(e) => {
                self.dirs_skipped += 1;
                debug!(path = %dir.display(), error = %e, "Skipping subdirectories of unlistable directory");
                return Ok(());
            }
        };
        for subdir in subdirs {
            if self.cancel.is_cancelled() {
                return Err(Aborted);
            }
            self.pending.push(subdir);
        }
        Ok(())
    }
}

impl Iterator for Walker {
    type Item = Result<PathBuf, Aborted>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(file) = self.current_files.next() {
                if self.cancel.is_cancelled() {
                    return self.abort();
                }
                return Some(Ok(file));
            }

            if let Some(dir) = self.current_dir.take() {
                if self.push_subdirs(&dir).is_err() {
                    return self.abort();
                }
            }

            let Some(dir) = self.pending.pop() else {
                self.finished = true;
                return None;
            };

            if self.cancel.is_cancelled() {
                return self.abort();
            }

            self.dirs_visited += 1;
            match self.fs.list_files(&dir, &self.pattern) {
                Ok(files) => self.current_files = files.into_iter(),
                Err(e) => {
                    self.dirs_skipped += 1;
                    debug!(path = %dir.display(), error = %e, "Skipping files of unlistable directory");
                }
            }
            self.current_dir = Some(dir);
        }
    }
}
