use std::path::PathBuf;
use thiserror::Error;

/// Result type for scancat operations
pub type Result<T> = std::result::Result<T, ScancatError>;

/// Error types for scancat operations
#[derive(Error, Debug)]
pub enum ScancatError {
    /// DICOM reading error (the instance could not be parsed at all)
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// A tag needed for the scan kind is absent on a boundary instance
    #[error("Required tag {tag} missing for {context}")]
    RequiredTagMissing { tag: String, context: String },

    /// No readable instance in a study directory
    #[error("No readable DICOM instances in {}", .0.display())]
    EmptyStudy(PathBuf),

    /// External archiver exited unsuccessfully
    #[error("Archive tool {tool} failed with status {status}")]
    ArchiveTool { tool: String, status: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScancatError {
    /// Builds a [`ScancatError::RequiredTagMissing`]
    pub fn required(tag: impl Into<String>, context: impl Into<String>) -> Self {
        ScancatError::RequiredTagMissing {
            tag: tag.into(),
            context: context.into(),
        }
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for ScancatError {
    fn from(e: dicom_object::ReadError) -> Self {
        ScancatError::DicomError(format!("{}", e))
    }
}

impl From<toml::de::Error> for ScancatError {
    fn from(e: toml::de::Error) -> Self {
        ScancatError::Config(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_tag_message() {
        let err = ScancatError::required("(0054,0016)", "PET series 3");
        assert_eq!(
            err.to_string(),
            "Required tag (0054,0016) missing for PET series 3"
        );
    }

    #[test]
    fn test_empty_study_message() {
        let err = ScancatError::EmptyStudy(PathBuf::from("/data/study1"));
        assert!(err.to_string().contains("/data/study1"));
    }
}
