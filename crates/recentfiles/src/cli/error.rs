//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions
            .extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Scan root does not exist
    pub fn path_not_found(path: &Path) -> Self {
        Self::new(format!("Path not found: {}", path.display()))
            .with_context("The scan root does not exist on the filesystem")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Check for typos in the path".to_string(),
                "TRY: Omit ROOT to scan the configured default root".to_string(),
            ])
    }

    /// Scan root exists but is not a directory
    pub fn not_a_directory(path: &Path) -> Self {
        let parent = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        Self::new(format!("Not a directory: {}", path.display()))
            .with_context("The scan command expects a directory, not a file")
            .with_suggestion(format!("TRY: Scan the parent directory: recentfiles scan {}", parent))
    }

    /// `--from` / `--to` value could not be parsed
    pub fn invalid_date(flag: &str, value: &str, reason: &str) -> Self {
        Self::new(format!("Invalid date for {}: '{}'", flag, value))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Use a date: 2024-03-09".to_string(),
                "TRY: Or a local date and time: \"2024-03-09 14:30:00\"".to_string(),
                "TRY: Or RFC 3339: 2024-03-09T14:30:00+01:00".to_string(),
            ])
    }

    /// Name pattern is not a valid glob
    pub fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Self::new(format!("Invalid file name pattern: '{}'", pattern))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Use shell wildcards: *.txt, report-??.csv, *.{log,txt}".to_string(),
                "TRY: Quote the pattern so the shell does not expand it: -p '*.txt'".to_string(),
            ])
    }

    /// Config file exists but cannot be used
    pub fn invalid_config(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot load config: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Inspect the file: cat {}", path.display()),
                "TRY: Remove the file to fall back to defaults".to_string(),
                "TRY: Show the resolved settings: recentfiles config".to_string(),
            ])
    }

    /// Export destination could not be written
    pub fn cannot_write_export(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot write export file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Check that the parent directory exists and is writable".to_string(),
                "TRY: Choose another destination with --export".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}
