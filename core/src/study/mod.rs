//! Per-study record assembly
//!
//! Reads the instances of one study directory in a stable order, detects
//! series boundaries and accumulates one row per detected scan.

mod builder;
mod reader;

pub use builder::{SkippedInstance, StudyRecord, StudyRecordBuilder};
pub use reader::{collect_instance_files, read_study, DicomHeaderReader, HeaderReader};
