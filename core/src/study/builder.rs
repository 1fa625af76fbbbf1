use crate::api::ScanExtractor;
use crate::extraction::{extract_study_header, is_series_start};
use crate::types::{sanitize_file_component, ScanRecord, StudyHeader, StudyModality};
use dicom_object::InMemDicomObject;
use log::{debug, info, warn};

/// Instance that could not be read and was left out of the study
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SkippedInstance {
    pub file_name: String,
    pub reason: String,
}

/// Accumulates the record of one study in traversal order
///
/// The identity block comes from the first instance visited. Every instance
/// passes through series boundary detection; each boundary adds exactly one
/// row. Rows keep the order in which instances were visited.
#[derive(Debug, Default)]
pub struct StudyRecordBuilder {
    header: Option<StudyHeader>,
    rows: Vec<ScanRecord>,
    modality: StudyModality,
    skipped: Vec<SkippedInstance>,
    instances: usize,
}

impl StudyRecordBuilder {
    /// Creates an empty builder with the study modality at CT
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits one instance
    ///
    /// # Returns
    ///
    /// `true` if the instance started a new scan and a row was added
    pub fn visit(&mut self, file_name: &str, dcm: &InMemDicomObject) -> bool {
        self.instances += 1;
        if self.header.is_none() {
            self.header = Some(extract_study_header(dcm));
        }

        if !is_series_start(dcm) {
            return false;
        }

        let record = ScanExtractor::extract(dcm, file_name);
        debug!("Scan boundary at {}: {}", file_name, record.kind);

        if self.modality.observe(record.kind) {
            info!("Found a PET scan at {}, study modality is now PET", file_name);
        }
        for issue in &record.issues {
            warn!("{} (series {}): {}", file_name, record.series_number, issue);
        }

        self.rows.push(record);
        true
    }

    /// Records an instance that could not be read
    pub fn skip(&mut self, file_name: &str, reason: impl ToString) {
        self.skipped.push(SkippedInstance {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Current study modality
    pub fn modality(&self) -> StudyModality {
        self.modality
    }

    /// Finalizes the study
    ///
    /// Returns `None` if no instance was visited.
    pub fn finish(self) -> Option<StudyRecord> {
        let header = self.header?;
        Some(StudyRecord {
            header,
            rows: self.rows,
            modality: self.modality,
            skipped: self.skipped,
            instances: self.instances,
        })
    }
}

/// Finalized record of one study
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StudyRecord {
    pub header: StudyHeader,
    pub rows: Vec<ScanRecord>,
    pub modality: StudyModality,
    pub skipped: Vec<SkippedInstance>,
    /// Number of instances read successfully
    pub instances: usize,
}

impl StudyRecord {
    /// Output base name: `<patient>_<project>_<CT|PET>`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.header.file_stem(), self.modality.suffix())
    }

    /// Output base name qualified by the study directory name, used when
    /// several studies share the same [`StudyRecord::file_stem`]
    pub fn qualified_file_stem(&self, study_name: &str) -> String {
        format!("{}_{}", self.file_stem(), sanitize_file_component(study_name))
    }

    /// Rows carrying a failure-level issue
    pub fn flagged_rows(&self) -> impl Iterator<Item = &ScanRecord> {
        self.rows.iter().filter(|r| r.is_flagged())
    }
}
