//! Match filter chain applied to every path the walker yields.
//!
//! Filters run in order and stop at the first rejection:
//!
//! 1. System subtree exclusion (string prefix, case-insensitive)
//! 2. Modification date range, from a fresh metadata read

use crate::error::{Result, ScoutError};
use crate::fs::FileSystem;
use crate::types::{FileRecord, ScanRequest};
use chrono::{DateTime, Local};
use std::path::Path;

/// Default name of the excluded system subtree below the scan root.
pub const DEFAULT_SYSTEM_FOLDER: &str = "Windows";

/// Filter state derived once per session from a [`ScanRequest`].
#[derive(Debug, Clone)]
pub struct ScanFilter {
    /// Lowercased `root/<system folder>` when exclusion is enabled
    excluded_prefix: Option<String>,
    date_from: Option<DateTime<Local>>,
    date_to: Option<DateTime<Local>>,
}

impl ScanFilter {
    pub fn new(request: &ScanRequest, system_folder: &str) -> Self {
        let excluded_prefix = request.skip_system_folder.then(|| {
            request
                .root
                .join(system_folder)
                .to_string_lossy()
                .to_lowercase()
        });
        Self {
            excluded_prefix,
            date_from: request.date_from,
            date_to: request.date_to,
        }
    }

    /// True when `path` lies in the excluded subtree.
    ///
    /// This is a plain prefix test, so with root `C:\` a sibling such as
    /// `C:\WindowsApps` is excluded too.
    pub fn is_excluded(&self, path: &Path) -> bool {
        match &self.excluded_prefix {
            Some(prefix) => path.to_string_lossy().to_lowercase().starts_with(prefix.as_str()),
            None => false,
        }
    }

    /// True when `modified` lies inside the inclusive, optionally open range.
    pub fn in_date_range(&self, modified: &DateTime<Local>) -> bool {
        if let Some(from) = &self.date_from {
            if modified < from {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if modified > to {
                return false;
            }
        }
        true
    }

    /// Run the chain for one candidate.
    ///
    /// Returns `Ok(None)` for a rejected path. A metadata read failure is
    /// fatal to the session and returned as an error.
    pub fn evaluate(&self, fs: &dyn FileSystem, path: &Path) -> Result<Option<FileRecord>> {
        if self.is_excluded(path) {
            return Ok(None);
        }

        let metadata = fs.metadata(path).map_err(|source| ScoutError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        let record = FileRecord::new(path.to_path_buf(), metadata.modified, metadata.size);

        if !self.in_date_range(&record.modified) {
            return Ok(None);
        }
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memfs::MemoryFileSystem;
    use chrono::Duration as ChronoDuration;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn days_ago(days: u64) -> SystemTime {
        SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60)
    }

    fn local(time: SystemTime) -> DateTime<Local> {
        DateTime::<Local>::from(time)
    }

    #[test]
    fn test_system_folder_prefix_is_case_insensitive() {
        let request = ScanRequest::new("/root").skip_system_folder(true);
        let filter = ScanFilter::new(&request, DEFAULT_SYSTEM_FOLDER);

        assert!(filter.is_excluded(Path::new("/root/Windows/system.txt")));
        assert!(filter.is_excluded(Path::new("/root/WINDOWS/deep/x.dll")));
        assert!(filter.is_excluded(Path::new("/root/windows/x")));
        assert!(!filter.is_excluded(Path::new("/root/Users/a.txt")));
        assert!(!filter.is_excluded(Path::new("/root/sub/Windows/a.txt")));
    }

    #[test]
    fn test_exclusion_disabled_by_default() {
        let filter = ScanFilter::new(&ScanRequest::new("/root"), DEFAULT_SYSTEM_FOLDER);
        assert!(!filter.is_excluded(Path::new("/root/Windows/system.txt")));
    }

    #[test]
    fn test_custom_system_folder() {
        let request = ScanRequest::new("/root").skip_system_folder(true);
        let filter = ScanFilter::new(&request, "proc");
        assert!(filter.is_excluded(Path::new("/root/proc/1/status")));
        assert!(!filter.is_excluded(Path::new("/root/Windows/a.txt")));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let from = local(days_ago(7));
        let to = local(days_ago(1));
        let request = ScanRequest::new("/root").modified_between(Some(from), Some(to));
        let filter = ScanFilter::new(&request, DEFAULT_SYSTEM_FOLDER);

        assert!(filter.in_date_range(&from));
        assert!(filter.in_date_range(&to));
        assert!(filter.in_date_range(&(from + ChronoDuration::days(1))));
        assert!(!filter.in_date_range(&(from - ChronoDuration::seconds(1))));
        assert!(!filter.in_date_range(&(to + ChronoDuration::seconds(1))));
    }

    #[test]
    fn test_open_ended_ranges() {
        let from = local(days_ago(7));
        let only_from = ScanFilter::new(
            &ScanRequest::new("/root").modified_between(Some(from), None),
            DEFAULT_SYSTEM_FOLDER,
        );
        assert!(only_from.in_date_range(&local(SystemTime::now())));
        assert!(!only_from.in_date_range(&local(days_ago(30))));

        let only_to = ScanFilter::new(
            &ScanRequest::new("/root").modified_between(None, Some(from)),
            DEFAULT_SYSTEM_FOLDER,
        );
        assert!(only_to.in_date_range(&local(days_ago(30))));
        assert!(!only_to.in_date_range(&local(SystemTime::now())));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let request = ScanRequest::new("/root")
            .modified_between(Some(local(days_ago(1))), Some(local(days_ago(7))));
        let filter = ScanFilter::new(&request, DEFAULT_SYSTEM_FOLDER);

        assert!(!filter.in_date_range(&local(days_ago(3))));
        assert!(!filter.in_date_range(&local(days_ago(1))));
    }

    #[test]
    fn test_evaluate_builds_record() {
        let modified = days_ago(2);
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/a.txt", modified, 12);
        let filter = ScanFilter::new(&ScanRequest::new("/root"), DEFAULT_SYSTEM_FOLDER);

        let record = filter
            .evaluate(&fs, Path::new("/root/a.txt"))
            .unwrap()
            .unwrap();

        assert_eq!(record.path, PathBuf::from("/root/a.txt"));
        assert_eq!(record.size, 12);
        assert_eq!(record.modified, local(modified));
    }

    #[test]
    fn test_evaluate_rejects_old_file() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/old.txt", days_ago(30), 1);
        let request = ScanRequest::new("/root").modified_between(Some(local(days_ago(7))), None);
        let filter = ScanFilter::new(&request, DEFAULT_SYSTEM_FOLDER);

        assert!(filter.evaluate(&fs, Path::new("/root/old.txt")).unwrap().is_none());
    }

    #[test]
    fn test_excluded_path_skips_metadata_read() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/Windows/x.txt", days_ago(0), 1)
            .break_metadata("/root/Windows/x.txt");
        let request = ScanRequest::new("/root").skip_system_folder(true);
        let filter = ScanFilter::new(&request, DEFAULT_SYSTEM_FOLDER);

        assert!(filter
            .evaluate(&fs, Path::new("/root/Windows/x.txt"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_metadata_failure_is_an_error() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/x.txt", days_ago(0), 1)
            .break_metadata("/root/x.txt");
        let filter = ScanFilter::new(&ScanRequest::new("/root"), DEFAULT_SYSTEM_FOLDER);

        let err = filter.evaluate(&fs, Path::new("/root/x.txt")).unwrap_err();
        assert!(matches!(err, ScoutError::Metadata { .. }));
    }
}
