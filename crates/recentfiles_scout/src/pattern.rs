//! File-name glob matching.

use crate::error::{Result, ScoutError};
use globset::{GlobBuilder, GlobMatcher};

/// Normalize a raw name pattern.
///
/// Rules:
/// - Empty, "*" and "*.*" become "*" (match every name, dotted or not)
/// - Surrounding whitespace is trimmed
pub fn normalize_name_pattern(raw: &str) -> String {
    let pattern = raw.trim();
    if pattern.is_empty() || pattern == "*" || pattern == "*.*" {
        return "*".to_string();
    }
    pattern.to_string()
}

/// Compiled shell-glob matched against a file name (never a full path).
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl NamePattern {
    /// Compile a case-insensitive name pattern such as `*.txt` or `report-??.csv`.
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = normalize_name_pattern(raw);
        let matcher = GlobBuilder::new(&normalized)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map(|g| g.compile_matcher())
            .map_err(|e| ScoutError::Pattern(format!("invalid pattern '{}': {}", raw, e)))?;
        Ok(Self {
            raw: raw.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}
