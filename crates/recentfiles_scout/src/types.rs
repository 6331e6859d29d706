//! Core types for the Scout system

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;
use uuid::Uuid;

// ============================================================================
// Session
// ============================================================================

/// Identifier of one scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Request
// ============================================================================

/// Parameters of one scan, fixed for the lifetime of the session.
///
/// `date_from > date_to` is not rejected; such a scan simply matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Directory the walk starts from
    pub root: PathBuf,
    /// Shell glob matched against file names, e.g. `*.*` or `*.txt`
    pub pattern: String,
    /// Reject everything below `root/<system folder>` (case-insensitive prefix)
    pub skip_system_folder: bool,
    /// Inclusive lower bound on last-modified time
    pub date_from: Option<DateTime<Local>>,
    /// Inclusive upper bound on last-modified time
    pub date_to: Option<DateTime<Local>>,
}

impl ScanRequest {
    /// Request matching every file under `root`, with no filters.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: "*.*".to_string(),
            skip_system_folder: false,
            date_from: None,
            date_to: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn skip_system_folder(mut self, skip: bool) -> Self {
        self.skip_system_folder = skip;
        self
    }

    pub fn modified_between(
        mut self,
        from: Option<DateTime<Local>>,
        to: Option<DateTime<Local>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// A matched file. Created once per match and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: PathBuf, modified: SystemTime, size: u64) -> Self {
        Self {
            path,
            modified: DateTime::<Local>::from(modified),
            size,
        }
    }
}

/// Counters reported when a session completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files_matched: u64,
    pub dirs_visited: u64,
    /// Directories whose listing failed and were skipped
    pub dirs_skipped: u64,
    pub batches: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn request_builder_sets_fields() {
        let from = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let request = ScanRequest::new("/data")
            .with_pattern("*.txt")
            .skip_system_folder(true)
            .modified_between(Some(from), None);

        assert_eq!(request.root, PathBuf::from("/data"));
        assert_eq!(request.pattern, "*.txt");
        assert!(request.skip_system_folder);
        assert_eq!(request.date_from, Some(from));
        assert_eq!(request.date_to, None);
    }

    #[test]
    fn file_record_converts_system_time() {
        let when = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        let record = FileRecord::new(PathBuf::from("/a.txt"), when, 42);
        assert_eq!(record.modified.timestamp(), 1_000_000);
        assert_eq!(record.size, 42);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
