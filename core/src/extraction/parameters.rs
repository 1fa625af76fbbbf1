use crate::error::{Result, ScancatError};
use crate::types::{RowIssue, ScanKind, ScanParameters};
use dicom_object::InMemDicomObject;

use super::nested::{resolve_sequence_item, TagPath};
use super::tags::{
    get_non_empty_string, tag_label, CODE_MEANING, DISTANCE_SOURCE_TO_DETECTOR,
    DISTANCE_SOURCE_TO_PATIENT, KVP, PRIVATE_INJECTED_DOSE, PRIVATE_INJECTED_DOSE_UNIT,
    PRIVATE_MEASUREMENT_TIME, PRIVATE_ROTATION_COUNT, RADIONUCLIDE_CODE_SEQUENCE,
    RADIONUCLIDE_TOTAL_DOSE, RADIOPHARMACEUTICAL_CODE_SEQUENCE,
    RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, RADIOPHARMACEUTICAL_START_DATE_TIME, SLICE_THICKNESS,
    X_RAY_TUBE_CURRENT_IN_MA,
};

const RPI: &[dicom_core::Tag] = &[RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE];

// PET field paths, relative to the instance root
pub const RADIONUCLIDE_NAME: TagPath = TagPath::new(
    &[RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, RADIONUCLIDE_CODE_SEQUENCE],
    CODE_MEANING,
);
pub const RADIOPHARMACEUTICAL_NAME: TagPath = TagPath::new(
    &[RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, RADIOPHARMACEUTICAL_CODE_SEQUENCE],
    CODE_MEANING,
);
pub const INJECTED_DOSE: TagPath = TagPath::new(RPI, PRIVATE_INJECTED_DOSE);
pub const INJECTED_DOSE_UNIT: TagPath = TagPath::new(RPI, PRIVATE_INJECTED_DOSE_UNIT);
pub const MEASUREMENT_TIME: TagPath = TagPath::new(RPI, PRIVATE_MEASUREMENT_TIME);
pub const INJECTION_TIME: TagPath = TagPath::new(RPI, RADIOPHARMACEUTICAL_START_DATE_TIME);
pub const APPLIED_ACTIVITY: TagPath = TagPath::new(RPI, RADIONUCLIDE_TOTAL_DOSE);

/// Kind-dependent parameters of one boundary instance, with row issues
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedParameters {
    pub params: ScanParameters,
    pub issues: Vec<RowIssue>,
}

/// Extracts the parameters that apply to `kind` from a boundary instance
///
/// Soft misses leave a field empty. Missing PET radiopharmaceutical data and
/// missing projection geometry are reported as [`RowIssue`]s; the affected
/// fields stay empty and the remaining fields are still extracted.
pub fn extract_parameters(kind: ScanKind, dcm: &InMemDicomObject) -> ExtractedParameters {
    match kind {
        ScanKind::Pet => extract_pet_parameters(dcm),
        _ => extract_ct_parameters(kind, dcm),
    }
}

fn extract_pet_parameters(dcm: &InMemDicomObject) -> ExtractedParameters {
    // Without the information record no PET field can be filled
    if let Err(tag) = resolve_sequence_item(dcm, RPI) {
        return ExtractedParameters {
            params: ScanParameters::default(),
            issues: vec![missing(tag, "PET radiopharmaceutical information")],
        };
    }

    let mut issues = Vec::new();
    let mut lookup = |path: &TagPath, field: &str| match path.string_value(dcm) {
        Ok(value) => Some(value),
        Err(tag) => {
            issues.push(missing(tag, field));
            None
        }
    };

    let radionuclide = lookup(&RADIONUCLIDE_NAME, "radionuclide");
    let radiopharmaceutical = lookup(&RADIOPHARMACEUTICAL_NAME, "radiopharmaceutical");
    let dose = lookup(&INJECTED_DOSE, "injected dose");
    let dose_unit = lookup(&INJECTED_DOSE_UNIT, "injected dose unit");
    let measurement_time = lookup(&MEASUREMENT_TIME, "measurement time");
    let injection_time = lookup(&INJECTION_TIME, "injection time");
    let applied_activity = lookup(&APPLIED_ACTIVITY, "applied activity");

    let injected_dose = match (dose, dose_unit) {
        (Some(value), Some(unit)) => Some(format!("{} {}", value, unit)),
        _ => None,
    };

    ExtractedParameters {
        params: ScanParameters {
            radionuclide,
            radiopharmaceutical,
            injected_dose,
            measurement_time,
            injection_time,
            applied_activity,
            ..Default::default()
        },
        issues,
    }
}

fn extract_ct_parameters(kind: ScanKind, dcm: &InMemDicomObject) -> ExtractedParameters {
    let mut params = ScanParameters::default();
    let mut issues = Vec::new();

    if kind.derives_geometry() {
        params.dist_source_detector = get_non_empty_string(dcm, DISTANCE_SOURCE_TO_DETECTOR);
        params.dist_source_object = get_non_empty_string(dcm, DISTANCE_SOURCE_TO_PATIENT);
    }

    if kind.derives_projection_params() {
        params.current = get_non_empty_string(dcm, X_RAY_TUBE_CURRENT_IN_MA);
        params.rotations = get_non_empty_string(dcm, PRIVATE_ROTATION_COUNT);
        params.slice_thickness = get_non_empty_string(dcm, SLICE_THICKNESS);

        match projection_zoom(&params) {
            Ok(Some(zoom)) => params.zoom_factor = Some(zoom),
            Ok(None) => issues.push(RowIssue::DegenerateZoom),
            Err(e) => issues.push(row_issue(e)),
        }
    }

    if kind.derives_tube_voltage() {
        params.kvp = get_non_empty_string(dcm, KVP);
    }

    ExtractedParameters { params, issues }
}

/// Computes the zoom factor of a projection scan from its extracted distances
///
/// # Returns
///
/// `Ok(None)` when the source-to-object distance is zero
fn projection_zoom(params: &ScanParameters) -> Result<Option<i64>> {
    let det = required_distance(
        params.dist_source_detector.as_deref(),
        DISTANCE_SOURCE_TO_DETECTOR,
    )?;
    let obj = required_distance(
        params.dist_source_object.as_deref(),
        DISTANCE_SOURCE_TO_PATIENT,
    )?;
    Ok(zoom_factor(det, obj))
}

fn required_distance(raw: Option<&str>, tag: dicom_core::Tag) -> Result<f64> {
    let raw = raw.ok_or_else(|| ScancatError::required(tag_label(tag), "zoom factor"))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ScancatError::InvalidValue(format!("{} = '{}'", tag_label(tag), raw)))
}

/// Magnification of a projection: detector distance over object distance,
/// truncated toward zero
///
/// Returns `None` if the ratio is undefined (zero or non-finite object distance).
pub fn zoom_factor(dist_source_detector: f64, dist_source_object: f64) -> Option<i64> {
    if dist_source_object == 0.0 || !dist_source_object.is_finite() {
        return None;
    }
    let ratio = dist_source_detector / dist_source_object;
    ratio.is_finite().then(|| ratio.trunc() as i64)
}

fn missing(tag: dicom_core::Tag, context: &str) -> RowIssue {
    RowIssue::RequiredTagMissing {
        tag: tag_label(tag),
        context: context.to_string(),
    }
}

fn row_issue(err: ScancatError) -> RowIssue {
    match err {
        ScancatError::RequiredTagMissing { tag, context } => {
            RowIssue::RequiredTagMissing { tag, context }
        }
        other => RowIssue::InvalidValue(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::{DataSetSequence, PrimitiveValue};
    use dicom_core::{DataElement, Tag, VR};
    use rstest::rstest;

    fn ds(tag: Tag, value: &str) -> DataElement<InMemDicomObject> {
        DataElement::new(tag, VR::DS, PrimitiveValue::from(value))
    }

    fn ct_instance(det: Option<&str>, obj: Option<&str>) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(ds(KVP, "55"));
        dcm.put(ds(X_RAY_TUBE_CURRENT_IN_MA, "0.17"));
        dcm.put(ds(SLICE_THICKNESS, "0.04"));
        dcm.put(DataElement::new(
            PRIVATE_ROTATION_COUNT,
            VR::IS,
            PrimitiveValue::from("1"),
        ));
        if let Some(det) = det {
            dcm.put(ds(DISTANCE_SOURCE_TO_DETECTOR, det));
        }
        if let Some(obj) = obj {
            dcm.put(ds(DISTANCE_SOURCE_TO_PATIENT, obj));
        }
        dcm
    }

    fn code_item(meaning: &str) -> InMemDicomObject {
        InMemDicomObject::from_element_iter([DataElement::new(
            CODE_MEANING,
            VR::LO,
            PrimitiveValue::from(meaning),
        )])
    }

    fn pet_instance(with_dose_unit: bool) -> InMemDicomObject {
        let mut info = InMemDicomObject::from_element_iter([
            DataElement::new(
                RADIONUCLIDE_CODE_SEQUENCE,
                VR::SQ,
                DataSetSequence::from(vec![code_item("^18^Fluorine")]),
            ),
            DataElement::new(
                RADIOPHARMACEUTICAL_CODE_SEQUENCE,
                VR::SQ,
                DataSetSequence::from(vec![code_item("Fluorodeoxyglucose")]),
            ),
            ds(PRIVATE_INJECTED_DOSE, "12.5"),
            DataElement::new(
                PRIVATE_MEASUREMENT_TIME,
                VR::DT,
                PrimitiveValue::from("20220128101500"),
            ),
            DataElement::new(
                RADIOPHARMACEUTICAL_START_DATE_TIME,
                VR::DT,
                PrimitiveValue::from("20220128103000"),
            ),
            ds(RADIONUCLIDE_TOTAL_DOSE, "11800000"),
        ]);
        if with_dose_unit {
            info.put(DataElement::new(
                PRIVATE_INJECTED_DOSE_UNIT,
                VR::LO,
                PrimitiveValue::from("MBq"),
            ));
        }
        InMemDicomObject::from_element_iter([DataElement::new(
            RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![info]),
        )])
    }

    #[test]
    fn test_zoom_factor_truncates() {
        assert_eq!(zoom_factor(1000.0, 700.0), Some(1));
        assert_eq!(zoom_factor(1000.0, 400.0), Some(2));
        assert_eq!(zoom_factor(1000.0, 1000.0), Some(1));
        assert_eq!(zoom_factor(500.0, 700.0), Some(0));
    }

    #[test]
    fn test_zoom_factor_degenerate() {
        assert_eq!(zoom_factor(1000.0, 0.0), None);
        assert_eq!(zoom_factor(1000.0, f64::NAN), None);
    }

    #[test]
    fn test_projection_parameters() {
        let dcm = ct_instance(Some("1000"), Some("700"));
        let out = extract_parameters(ScanKind::CtProjection, &dcm);
        assert!(out.issues.is_empty());
        assert_eq!(out.params.zoom_factor, Some(1));
        assert_eq!(out.params.kvp.as_deref(), Some("55"));
        assert_eq!(out.params.current.as_deref(), Some("0.17"));
        assert_eq!(out.params.rotations.as_deref(), Some("1"));
        assert_eq!(out.params.slice_thickness.as_deref(), Some("0.04"));
        assert_eq!(out.params.dist_source_detector.as_deref(), Some("1000"));
        assert_eq!(out.params.dist_source_object.as_deref(), Some("700"));
    }

    #[test]
    fn test_projection_zero_object_distance() {
        let dcm = ct_instance(Some("1000"), Some("0"));
        let out = extract_parameters(ScanKind::CtProjection, &dcm);
        assert_eq!(out.params.zoom_factor, None);
        assert_eq!(out.issues, vec![RowIssue::DegenerateZoom]);
    }

    #[test]
    fn test_projection_missing_geometry_is_flagged() {
        let dcm = ct_instance(Some("1000"), None);
        let out = extract_parameters(ScanKind::CtProjection, &dcm);
        assert_eq!(out.params.zoom_factor, None);
        assert_eq!(out.issues.len(), 1);
        assert!(out.issues[0].is_failure());
        // Unrelated projection fields are still filled
        assert_eq!(out.params.current.as_deref(), Some("0.17"));
    }

    #[rstest]
    #[case(ScanKind::CtAxial, None, Some("700"))]
    #[case(ScanKind::CtAxial, Some("1000"), None)]
    #[case(ScanKind::CtOther, None, None)]
    #[case(ScanKind::CtOther, Some("1000"), None)]
    fn test_missing_distance_outside_projection_is_soft(
        #[case] kind: ScanKind,
        #[case] det: Option<&str>,
        #[case] obj: Option<&str>,
    ) {
        let dcm = ct_instance(det, obj);
        let out = extract_parameters(kind, &dcm);
        assert!(out.issues.is_empty());
        assert_eq!(out.params.dist_source_detector.as_deref(), det);
        assert_eq!(out.params.dist_source_object.as_deref(), obj);
        assert_eq!(out.params.zoom_factor, None);
    }

    #[test]
    fn test_axial_has_no_tube_voltage() {
        let dcm = ct_instance(Some("1000"), Some("700"));
        let out = extract_parameters(ScanKind::CtAxial, &dcm);
        assert_eq!(out.params.kvp, None);
        assert_eq!(out.params.zoom_factor, None);
        assert_eq!(out.params.current, None);
        assert_eq!(out.params.dist_source_detector.as_deref(), Some("1000"));
        assert!(out.issues.is_empty());
    }

    #[test]
    fn test_other_ct_has_tube_voltage() {
        let dcm = ct_instance(Some("1000"), Some("700"));
        let out = extract_parameters(ScanKind::CtOther, &dcm);
        assert_eq!(out.params.kvp.as_deref(), Some("55"));
        assert_eq!(out.params.rotations, None);
    }

    #[test]
    fn test_localizer_has_no_geometry() {
        let dcm = ct_instance(Some("1000"), Some("700"));
        let out = extract_parameters(ScanKind::CtLocalizer, &dcm);
        assert_eq!(out.params.dist_source_detector, None);
        assert_eq!(out.params.dist_source_object, None);
        assert_eq!(out.params.kvp.as_deref(), Some("55"));
    }

    #[test]
    fn test_pet_parameters() {
        let out = extract_parameters(ScanKind::Pet, &pet_instance(true));
        assert!(out.issues.is_empty());
        let p = &out.params;
        assert_eq!(p.radionuclide.as_deref(), Some("^18^Fluorine"));
        assert_eq!(p.radiopharmaceutical.as_deref(), Some("Fluorodeoxyglucose"));
        assert_eq!(p.injected_dose.as_deref(), Some("12.5 MBq"));
        assert_eq!(p.measurement_time.as_deref(), Some("20220128101500"));
        assert_eq!(p.injection_time.as_deref(), Some("20220128103000"));
        assert_eq!(p.applied_activity.as_deref(), Some("11800000"));
        assert!(p.pet_fields().iter().all(|f| f.is_some()));
        assert_eq!(p.kvp, None);
    }

    #[test]
    fn test_pet_missing_information_sequence() {
        let out = extract_parameters(ScanKind::Pet, &InMemDicomObject::new_empty());
        assert_eq!(
            out.issues,
            vec![RowIssue::RequiredTagMissing {
                tag: "(0054,0016)".to_string(),
                context: "PET radiopharmaceutical information".to_string(),
            }]
        );
        assert!(out.params.pet_fields().iter().all(|f| f.is_none()));
    }

    #[test]
    fn test_pet_missing_leaf_is_flagged() {
        let out = extract_parameters(ScanKind::Pet, &pet_instance(false));
        assert_eq!(out.params.injected_dose, None);
        assert_eq!(out.issues.len(), 1);
        assert!(out.issues[0].is_failure());
    }
}
