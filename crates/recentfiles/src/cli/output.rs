//! Output formatting utilities for CLI commands
//!
//! Provides consistent formatting for:
//! - File sizes (human-readable)
//! - Timestamps (absolute, local time)
//! - Streamed result lines and the summary table

use chrono::{DateTime, Local};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use recentfiles_scout::FileRecord;

/// Format a file size in human-readable form
///
/// Examples:
/// - 500 -> "500 B"
/// - 1024 -> "1.0 KB"
/// - 1536000 -> "1.5 MB"
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a duration in milliseconds, e.g. "850 ms" or "2.4 s"
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{} ms", ms)
    } else {
        format!("{:.1} s", ms as f64 / 1000.0)
    }
}

/// One streamed line: `modified  size  path`
pub fn format_record_line(record: &FileRecord) -> String {
    format!(
        "{}  {:>10}  {}",
        format_time(&record.modified),
        format_size(record.size),
        record.path.display()
    )
}

/// Print a two-column key/value table
pub fn print_summary_table(title: &str, rows: Vec<(&str, String)>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan),
        Cell::new("").fg(Color::Cyan),
    ]);

    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }

    println!("{}", table);
}
