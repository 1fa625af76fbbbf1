use super::enums::ScanKind;
use std::fmt;

/// Column names of the identity block at the top of a study record
pub const STUDY_HEADER_COLUMNS: [&str; 8] = [
    "Patient Name",
    "PI",
    "Operator",
    "Project",
    "Species",
    "Sex",
    "Breed",
    "Comments",
];

/// Column names of the per-scan table, in output order
pub const SCAN_TABLE_COLUMNS: [&str; 24] = [
    "Series Number",
    "Acquisition Date",
    "Acquisition Time",
    "Modality",
    "Image Type",
    "kVp",
    "Current",
    "Pixel Spacing",
    "Slice Thickness",
    "Dist. Source to detector",
    "Dist. Source to object",
    "Zoom factor",
    "Rotations",
    "Rows",
    "Columns",
    "Radionuclide",
    "Radiopharmaceutical",
    "Inj. Dose",
    "Meas. Time",
    "Inj. time",
    "Applied activity (in Bq?)",
    "Protocol Name",
    "Series Description",
    "First filename",
];

/// Patient/study identity, read once from the first instance of a study
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StudyHeader {
    pub patient_name: String,
    /// Referring physician, "Family, Given"
    pub pi: String,
    /// Performing physician, "Family, Given"
    pub operator: String,
    pub project: String,
    pub species: String,
    pub sex: String,
    pub breed: String,
    pub comments: String,
}

impl StudyHeader {
    /// Values in [`STUDY_HEADER_COLUMNS`] order
    pub fn to_row(&self) -> [&str; 8] {
        [
            self.patient_name.as_str(),
            self.pi.as_str(),
            self.operator.as_str(),
            self.project.as_str(),
            self.species.as_str(),
            self.sex.as_str(),
            self.breed.as_str(),
            self.comments.as_str(),
        ]
    }

    /// Base name shared by the record and archive files: `<patient>_<project>`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            sanitize_file_component(&self.patient_name),
            sanitize_file_component(&self.project)
        )
    }
}

pub(crate) fn sanitize_file_component(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "NA".to_string()
    } else {
        cleaned
    }
}

/// Kind-dependent acquisition parameters
///
/// Every field is optional; fields that do not apply to the scan kind stay
/// `None` and are written as empty cells.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ScanParameters {
    pub kvp: Option<String>,
    pub current: Option<String>,
    pub slice_thickness: Option<String>,
    pub dist_source_detector: Option<String>,
    pub dist_source_object: Option<String>,
    pub zoom_factor: Option<i64>,
    pub rotations: Option<String>,
    pub radionuclide: Option<String>,
    pub radiopharmaceutical: Option<String>,
    pub injected_dose: Option<String>,
    pub measurement_time: Option<String>,
    pub injection_time: Option<String>,
    pub applied_activity: Option<String>,
}

impl ScanParameters {
    /// PET columns in table order: radionuclide through applied activity
    pub fn pet_fields(&self) -> [&Option<String>; 6] {
        [
            &self.radionuclide,
            &self.radiopharmaceutical,
            &self.injected_dose,
            &self.measurement_time,
            &self.injection_time,
            &self.applied_activity,
        ]
    }
}

/// Problem attached to a single row of the scan table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum RowIssue {
    /// A tag required by the scan kind was absent; dependent fields are empty
    RequiredTagMissing { tag: String, context: String },
    /// A tag required by the scan kind held an unusable value
    InvalidValue(String),
    /// Source-to-object distance was zero, so no zoom factor was computed
    DegenerateZoom,
}

impl RowIssue {
    /// Whether the issue marks the row (and its study) as failed
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RowIssue::RequiredTagMissing { .. } | RowIssue::InvalidValue(_)
        )
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::RequiredTagMissing { tag, context } => {
                write!(f, "required tag {} missing for {}", tag, context)
            }
            RowIssue::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
            RowIssue::DegenerateZoom => write!(f, "source-to-object distance is zero"),
        }
    }
}

/// One row of the scan table, built at a detected series boundary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ScanRecord {
    pub kind: ScanKind,
    pub series_number: String,
    pub acquisition_date: String,
    pub acquisition_time: String,
    pub modality: String,
    pub image_type: String,
    pub pixel_spacing: String,
    pub rows: String,
    pub columns: String,
    pub protocol_name: String,
    pub series_description: String,
    pub first_filename: String,
    pub params: ScanParameters,
    pub issues: Vec<RowIssue>,
}

impl ScanRecord {
    /// Returns whether the row carries a failure-level issue
    pub fn is_flagged(&self) -> bool {
        self.issues.iter().any(RowIssue::is_failure)
    }

    /// Values in [`SCAN_TABLE_COLUMNS`] order
    ///
    /// The shape is fixed: inapplicable fields are empty strings.
    pub fn to_row(&self) -> Vec<String> {
        let p = &self.params;
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.series_number.clone(),
            self.acquisition_date.clone(),
            self.acquisition_time.clone(),
            self.modality.clone(),
            self.image_type.clone(),
            opt(&p.kvp),
            opt(&p.current),
            self.pixel_spacing.clone(),
            opt(&p.slice_thickness),
            opt(&p.dist_source_detector),
            opt(&p.dist_source_object),
            p.zoom_factor.map(|z| z.to_string()).unwrap_or_default(),
            opt(&p.rotations),
            self.rows.clone(),
            self.columns.clone(),
            opt(&p.radionuclide),
            opt(&p.radiopharmaceutical),
            opt(&p.injected_dose),
            opt(&p.measurement_time),
            opt(&p.injection_time),
            opt(&p.applied_activity),
            self.protocol_name.clone(),
            self.series_description.clone(),
            self.first_filename.clone(),
        ]
    }
}
