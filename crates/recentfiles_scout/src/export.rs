//! Plain-text export of matched files.
//!
//! One record per line: `path<TAB>modified<TAB>size`, with the timestamp in
//! local time as `YYYY-MM-DD HH:MM:SS`.

use crate::error::Result;
use crate::types::FileRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Timestamp layout used in export lines.
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one record as an export line (without the trailing newline).
pub fn format_record(record: &FileRecord) -> String {
    format!(
        "{}\t{}\t{}",
        record.path.display(),
        record.modified.format(EXPORT_TIME_FORMAT),
        record.size
    )
}

/// Write every record as a line to `writer`.
pub fn write_records<W: Write>(writer: &mut W, records: &[FileRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, "{}", format_record(record))?;
    }
    writer.flush()
}

/// Create (or truncate) `destination` and write every record to it.
pub fn export_to_file(destination: &Path, records: &[FileRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(destination)?);
    write_records(&mut writer, records)?;
    Ok(())
}
