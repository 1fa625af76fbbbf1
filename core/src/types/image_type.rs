use std::fmt;

/// DICOM ImageType value list
///
/// For CT the interesting values come after the usual
/// `ORIGINAL|PRIMARY` prefix, e.g. `AXIAL`, `LOCALIZER` or `PROJECTION`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageType {
    pub values: Vec<String>,
}

impl ImageType {
    /// Creates a new ImageType from its individual values
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.trim().to_string()).collect(),
        }
    }

    /// Checks if one of the values equals `val` (case-insensitive)
    pub fn contains(&self, val: &str) -> bool {
        self.values.iter().any(|x| x.eq_ignore_ascii_case(val))
    }

    /// Last value of the list, reported in the "Image Type" column
    pub fn last_value(&self) -> Option<&str> {
        self.values.last().map(String::as_str)
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values.join("\\"))
    }
}
