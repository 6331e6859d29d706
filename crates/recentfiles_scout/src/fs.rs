//! Filesystem capability used by the walker and the filter chain.
//!
//! The scan engine never touches `std::fs` directly; it goes through
//! [`FileSystem`] so tests can substitute an in-memory tree
//! (see [`crate::memfs`]).

use crate::pattern::NamePattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Metadata the filter chain needs for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub modified: SystemTime,
    pub size: u64,
}

/// Directory listing and metadata source.
///
/// Listings are returned in the underlying listing order; callers must not
/// rely on any particular order.
pub trait FileSystem: Send + Sync {
    /// Files directly inside `dir` whose names match `pattern`.
    fn list_files(&self, dir: &Path, pattern: &NamePattern) -> io::Result<Vec<PathBuf>>;

    /// Subdirectories directly inside `dir`.
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Last-modified time and size of `path`.
    fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;
}

/// [`FileSystem`] backed by the local disk.
///
/// Symlinked files are always listed by their target. Symlinked directories
/// are descended only with `follow_symlinks`, and then with no cycle guard.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    pub follow_symlinks: bool,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follow_symlinks(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    /// Resolve the entry kind; a symlink takes the kind of its target.
    fn entry_kind(&self, entry: &fs::DirEntry) -> io::Result<EntryKind> {
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            // Dangling links are neither files nor directories
            return Ok(match fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() && self.follow_symlinks => EntryKind::Dir,
                Ok(target) if target.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            });
        }
        Ok(if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    /// Entries of `dir` with their kinds. An entry that cannot be read is
    /// skipped; only a failure to open `dir` itself is an error.
    fn entries(&self, dir: &Path) -> io::Result<Vec<(fs::DirEntry, EntryKind)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            match self.entry_kind(&entry) {
                Ok(kind) => entries.push((entry, kind)),
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Skipping entry with unknown type");
                }
            }
        }
        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
    Other,
}

impl FileSystem for LocalFileSystem {
    fn list_files(&self, dir: &Path, pattern: &NamePattern) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .entries(dir)?
            .into_iter()
            .filter(|(entry, kind)| {
                *kind == EntryKind::File && pattern.matches(&entry.file_name().to_string_lossy())
            })
            .map(|(entry, _)| entry.path())
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .entries(dir)?
            .into_iter()
            .filter(|(_, kind)| *kind == EntryKind::Dir)
            .map(|(entry, _)| entry.path())
            .collect())
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let metadata = fs::metadata(path)?;
        Ok(FileMetadata {
            modified: metadata.modified()?,
            size: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(path)
    }

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    #[test]
    fn test_list_files_applies_pattern() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "a.txt", "a").unwrap();
        create_test_file(temp_dir.path(), "b.csv", "b").unwrap();
        create_test_file(temp_dir.path(), "nested/c.txt", "c").unwrap();

        let fs = LocalFileSystem::new();
        let pattern = NamePattern::new("*.txt").unwrap();
        let files = fs.list_files(temp_dir.path(), &pattern).unwrap();

        assert_eq!(files, vec![temp_dir.path().join("a.txt")]);
    }

    #[test]
    fn test_list_dirs_returns_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "a.txt", "a").unwrap();
        fs::create_dir_all(temp_dir.path().join("one")).unwrap();
        fs::create_dir_all(temp_dir.path().join("two/three")).unwrap();

        let dirs = LocalFileSystem::new().list_dirs(temp_dir.path()).unwrap();

        assert_eq!(
            sorted(dirs),
            vec![temp_dir.path().join("one"), temp_dir.path().join("two")]
        );
    }

    #[test]
    fn test_listing_missing_directory_fails() {
        let fs = LocalFileSystem::new();
        assert!(fs.list_dirs(Path::new("/nonexistent/path")).is_err());
    }

    #[test]
    fn test_metadata_reads_mtime_and_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_file(temp_dir.path(), "data.txt", "hello").unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(1_000_000, 0)).unwrap();

        let metadata = LocalFileSystem::new().metadata(&path).unwrap();

        assert_eq!(metadata.size, 5);
        assert_eq!(
            metadata.modified,
            SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_listed_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let target = create_test_file(temp_dir.path(), "real.txt", "x").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone.txt"), temp_dir.path().join("dangling.txt"))
            .unwrap();

        let pattern = NamePattern::new("*.txt").unwrap();
        let files = LocalFileSystem::new().list_files(temp_dir.path(), &pattern).unwrap();

        assert_eq!(
            sorted(files),
            vec![temp_dir.path().join("link.txt"), temp_dir.path().join("real.txt")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_descended_only_when_followed() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "real/data.txt", "x").unwrap();
        let links = temp_dir.path().join("links");
        fs::create_dir_all(&links).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("real"), links.join("dir-link")).unwrap();

        assert!(LocalFileSystem::new().list_dirs(&links).unwrap().is_empty());
        assert_eq!(
            LocalFileSystem::with_follow_symlinks(true).list_dirs(&links).unwrap(),
            vec![links.join("dir-link")]
        );
    }
}
