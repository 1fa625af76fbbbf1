use crate::types::StudyHeader;
use dicom_object::InMemDicomObject;
use log::warn;

use super::tags::{
    get_non_empty_string, get_string_value, PATIENT_BREED_DESCRIPTION, PATIENT_COMMENTS,
    PATIENT_NAME, PATIENT_SEX, PATIENT_SPECIES_DESCRIPTION, PERFORMING_PHYSICIAN_NAME,
    PRIVATE_PROJECT_CODE, REFERRING_PHYSICIAN_NAME,
};

/// Placeholder for identity fields absent from the first instance
pub const NOT_AVAILABLE: &str = "NA";

/// Extracts the patient/study identity block from the first instance of a study
///
/// Absent fields become [`NOT_AVAILABLE`]. The patient name and project code
/// name the output files, so their absence is logged.
pub fn extract_study_header(dcm: &InMemDicomObject) -> StudyHeader {
    let patient_name = get_string_value(dcm, PATIENT_NAME)
        .map(|pn| family_name(&pn))
        .filter(|s| !s.is_empty());
    if patient_name.is_none() {
        warn!("Patient name missing, using '{}'", NOT_AVAILABLE);
    }

    let project = get_non_empty_string(dcm, PRIVATE_PROJECT_CODE);
    if project.is_none() {
        warn!("Project code missing, using '{}'", NOT_AVAILABLE);
    }

    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    StudyHeader {
        patient_name: or_na(patient_name),
        pi: or_na(person_name(dcm, REFERRING_PHYSICIAN_NAME)),
        operator: or_na(person_name(dcm, PERFORMING_PHYSICIAN_NAME)),
        project: or_na(project),
        species: or_na(get_non_empty_string(dcm, PATIENT_SPECIES_DESCRIPTION)),
        sex: or_na(get_non_empty_string(dcm, PATIENT_SEX)),
        breed: or_na(get_non_empty_string(dcm, PATIENT_BREED_DESCRIPTION)),
        comments: or_na(get_non_empty_string(dcm, PATIENT_COMMENTS)),
    }
}

fn person_name(dcm: &InMemDicomObject, tag: dicom_core::Tag) -> Option<String> {
    get_string_value(dcm, tag)
        .map(|pn| family_comma_given(&pn))
        .filter(|s| !s.is_empty())
}

/// Alphabetic component groups of a PN value: family, given, middle, prefix, suffix
fn name_components(pn: &str) -> Vec<&str> {
    // Only the first of multiple values, alphabetic representation only
    let value = pn.split('\\').next().unwrap_or_default();
    let alphabetic = value.split('=').next().unwrap_or_default();
    alphabetic.split('^').map(str::trim).collect()
}

/// Family name component of a DICOM person name
pub fn family_name(pn: &str) -> String {
    name_components(pn)
        .first()
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Renders a DICOM person name as "Family, Given"
///
/// Falls back to the family name alone when no given name is present.
pub fn family_comma_given(pn: &str) -> String {
    let components = name_components(pn);
    let family = components.first().copied().unwrap_or_default();
    match components.get(1).copied() {
        Some(given) if !given.is_empty() => format!("{}, {}", family, given),
        _ => family.to_string(),
    }
}
