//! RecentFiles Scout - cancellable recursive file scanner
//!
//! Scout walks a directory tree looking for files whose names match a glob and
//! whose modification time falls inside an optional date range. Matches are
//! delivered incrementally, in time-windowed batches, to an observer that
//! usually lives on another thread.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │   Walker    │     │ ScanFilter  │     │ BatchBuffer │     │ ScanObserver  │
//! │ (explicit   │────▶│ (subtree +  │────▶│ (1s window) │────▶│ (consumer     │
//! │   stack)    │     │  date range)│     │             │     │  boundary)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └───────────────┘
//!        ▲
//!        └──────── ScanCancelToken (polled) ◀──── ScanController::stop
//! ```
//!
//! # Core Concepts
//!
//! - **Walker**: lazy, depth-first producer of file paths; a directory that
//!   cannot be listed is skipped, never fatal
//! - **ScanController**: owns one session at a time on a dedicated worker thread
//! - **Batch**: matches accumulated since the last flush, delivered about once a second
//! - **Cancellation**: cooperative; checked before every directory, file and push

pub mod batch;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod filter;
pub mod fs;
pub mod memfs;
pub mod observer;
pub mod pattern;
pub mod types;
pub mod walker;

// Re-exports for convenience
pub use cancel::ScanCancelToken;
pub use config::{RecentConfig, ScanConfig};
pub use controller::ScanController;
pub use error::{Result, ScoutError};
pub use fs::{FileMetadata, FileSystem, LocalFileSystem};
pub use memfs::MemoryFileSystem;
pub use observer::{ScanEvent, ScanObserver};
pub use pattern::NamePattern;
pub use types::{FileRecord, ScanRequest, ScanSummary, SessionId};
pub use walker::{Aborted, Walker};
