//! CLI module for RecentFiles
//!
//! `scan` drives a scan session and renders its batches; `config` shows the
//! resolved settings.

pub mod config;
pub mod dates;
pub mod error;
pub mod output;
pub mod scan;
