//! Delimited study record files
//!
//! Layout: identity header row, identity values row, a blank separator row,
//! then the scan table header followed by one row per scan.

use crate::error::{Result, ScancatError};
use crate::study::StudyRecord;
use crate::types::{SCAN_TABLE_COLUMNS, STUDY_HEADER_COLUMNS};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Record file extension
pub const RECORD_EXTENSION: &str = "csv";

/// Index of the scan table header among the records of a file
const TABLE_HEADER_INDEX: usize = 3;

/// Writes a study record to any writer
pub fn write_study_record<W: io::Write>(writer: W, record: &StudyRecord) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(STUDY_HEADER_COLUMNS)?;
    wtr.write_record(record.header.to_row())?;
    wtr.write_record([""])?;

    wtr.write_record(SCAN_TABLE_COLUMNS)?;
    for row in &record.rows {
        wtr.write_record(row.to_row())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `<dest_dir>/<stem>.csv` for a finalized study
///
/// The file is written under a temporary name first and renamed once
/// complete, so a partially written record never carries the final name.
/// Callers own `stem`; two studies must never be given the same one.
///
/// # Returns
///
/// Path of the written record file
pub fn write_study_record_file(
    dest_dir: &Path,
    stem: &str,
    record: &StudyRecord,
) -> Result<PathBuf> {
    let final_path = dest_dir.join(format!("{}.{}", stem, RECORD_EXTENSION));
    let partial_path = final_path.with_extension(format!("{}.partial", RECORD_EXTENSION));

    let file = fs::File::create(&partial_path)?;
    write_study_record(io::BufWriter::new(file), record)?;
    fs::rename(&partial_path, &final_path)?;

    Ok(final_path)
}

/// Re-parses the scan table header row of a record
pub fn read_table_header<R: io::Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let header = rdr
        .records()
        .nth(TABLE_HEADER_INDEX)
        .ok_or_else(|| ScancatError::InvalidValue("record has no scan table".to_string()))??;

    Ok(header.iter().map(str::to_string).collect())
}

/// Checks a parsed header row against the fixed scan table schema
pub fn is_scan_table_header(header: &[String]) -> bool {
    header.len() == SCAN_TABLE_COLUMNS.len()
        && header.iter().zip(SCAN_TABLE_COLUMNS).all(|(a, b)| a == b)
}
