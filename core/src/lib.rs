pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod output;
pub mod run;
pub mod study;
pub mod types;

pub use api::ScanExtractor;
pub use archive::{Archiver, SevenZipArchiver};
pub use cli::report::TextReport;
pub use config::RunConfig;
pub use error::{Result, ScancatError};
pub use run::{run, RunSummary, StudyOutcome, StudyStatus};
pub use study::{DicomHeaderReader, HeaderReader, StudyRecord, StudyRecordBuilder};
pub use types::*;
