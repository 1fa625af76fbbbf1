use dicom_object::InMemDicomObject;

use super::tags::{get_string_value, INSTANCE_NUMBER};

/// Instance positions that open a new scan
///
/// 0 is used for single-frame series, 1 for the first instance of a
/// multi-frame series.
pub const SERIES_START_POSITIONS: [i64; 2] = [0, 1];

/// Checks whether an instance starts a new scan within its study
///
/// Reads InstanceNumber and compares it numerically against
/// [`SERIES_START_POSITIONS`]. A missing or unparseable position continues
/// the current series.
pub fn is_series_start(dcm: &InMemDicomObject) -> bool {
    get_string_value(dcm, INSTANCE_NUMBER)
        .and_then(|raw| parse_position(&raw))
        .is_some_and(|pos| SERIES_START_POSITIONS.contains(&pos))
}

/// Parses an instance position to its normalized numeric value
///
/// Accepts formatting variants such as `"1"`, `" 01"`, `"+1"` and `"1.0"`.
/// Fractional values are not valid ordinals and yield `None`.
pub fn parse_position(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(pos) = trimmed.parse::<i64>() {
        return Some(pos);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}
