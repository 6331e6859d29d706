//! In-memory [`FileSystem`] for deterministic tests.
//!
//! Builds a tree of directories and files with fixed timestamps, and can
//! inject the failure modes the scanner has to tolerate or report:
//! unlistable directories, unreadable metadata and slow metadata reads.

use crate::fs::{FileMetadata, FileSystem};
use crate::pattern::NamePattern;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[derive(Debug, Default)]
struct DirNode {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

/// Immutable-after-build in-memory tree. Listing order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    dirs: HashMap<PathBuf, DirNode>,
    files: HashMap<PathBuf, FileMetadata>,
    denied: HashSet<PathBuf>,
    broken_metadata: HashSet<PathBuf>,
    metadata_latency: Duration,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and any missing ancestors.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.ensure_dir(path.as_ref());
        self
    }

    /// Add a file (and its parent directories) with the given mtime and size.
    pub fn add_file(
        &mut self,
        path: impl AsRef<Path>,
        modified: SystemTime,
        size: u64,
    ) -> &mut Self {
        let path = path.as_ref().to_path_buf();
        let metadata = FileMetadata { modified, size };
        if self.files.insert(path.clone(), metadata).is_none() {
            if let Some(parent) = non_empty_parent(&path) {
                self.ensure_dir(parent);
                if let Some(node) = self.dirs.get_mut(parent) {
                    node.files.push(path);
                }
            }
        }
        self
    }

    /// Listing `dir` (files or subdirectories) fails with `PermissionDenied`.
    pub fn deny(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.denied.insert(dir.as_ref().to_path_buf());
        self
    }

    /// Reading metadata of `path` fails.
    pub fn break_metadata(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.broken_metadata.insert(path.as_ref().to_path_buf());
        self
    }

    /// Every metadata read sleeps for `latency`, producing a steady stream.
    pub fn set_metadata_latency(&mut self, latency: Duration) -> &mut Self {
        self.metadata_latency = latency;
        self
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn ensure_dir(&mut self, path: &Path) {
        if self.dirs.contains_key(path) {
            return;
        }
        self.dirs.insert(path.to_path_buf(), DirNode::default());
        if let Some(parent) = non_empty_parent(path) {
            self.ensure_dir(parent);
            if let Some(node) = self.dirs.get_mut(parent) {
                node.dirs.push(path.to_path_buf());
            }
        }
    }

    fn node(&self, dir: &Path) -> io::Result<&DirNode> {
        if self.denied.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access denied: {}", dir.display()),
            ));
        }
        self.dirs.get(dir).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            )
        })
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

impl FileSystem for MemoryFileSystem {
    fn list_files(&self, dir: &Path, pattern: &NamePattern) -> io::Result<Vec<PathBuf>> {
        let node = self.node(dir)?;
        Ok(node
            .files
            .iter()
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
            })
            .cloned()
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self.node(dir)?.dirs.clone())
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        if !self.metadata_latency.is_zero() {
            std::thread::sleep(self.metadata_latency);
        }
        if self.broken_metadata.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("metadata unavailable: {}", path.display()),
            ));
        }
        self.files.get(path).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> SystemTime {
        SystemTime::now()
    }

    #[test]
    fn add_file_creates_ancestors() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/a/b/c.txt", now(), 3);

        let pattern = NamePattern::new("*").unwrap();
        assert_eq!(fs.list_dirs(Path::new("/root")).unwrap(), vec![PathBuf::from("/root/a")]);
        assert_eq!(
            fs.list_files(Path::new("/root/a/b"), &pattern).unwrap(),
            vec![PathBuf::from("/root/a/b/c.txt")]
        );
        assert_eq!(fs.file_count(), 1);
    }

    #[test]
    fn re_adding_a_file_does_not_duplicate_listing() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/a.txt", now(), 1)
            .add_file("/root/a.txt", now(), 2);

        let pattern = NamePattern::new("*").unwrap();
        assert_eq!(fs.list_files(Path::new("/root"), &pattern).unwrap().len(), 1);
        assert_eq!(fs.metadata(Path::new("/root/a.txt")).unwrap().size, 2);
    }

    #[test]
    fn denied_directory_fails_listing() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/secret/x.txt", now(), 1).deny("/root/secret");

        let err = fs.list_dirs(Path::new("/root/secret")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs
            .list_files(Path::new("/root/secret"), &NamePattern::new("*").unwrap())
            .is_err());
    }

    #[test]
    fn broken_metadata_fails() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/x.txt", now(), 1).break_metadata("/root/x.txt");
        assert!(fs.metadata(Path::new("/root/x.txt")).is_err());
    }

    #[test]
    fn pattern_filters_listing() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/a.txt", now(), 1)
            .add_file("/root/b.csv", now(), 1);

        let files = fs
            .list_files(Path::new("/root"), &NamePattern::new("*.csv").unwrap())
            .unwrap();
        assert_eq!(files, vec![PathBuf::from("/root/b.csv")]);
    }
}
