use crate::types::{ImageType, ScanKind};
use dicom_object::InMemDicomObject;

use super::tags::{get_multi_string_value, get_string_or_empty, IMAGE_TYPE, MODALITY};

/// Extracts the scan kind of a boundary instance
pub fn classify_scan(dcm: &InMemDicomObject) -> ScanKind {
    let modality = get_string_or_empty(dcm, MODALITY);
    classify(&modality, &extract_image_type(dcm))
}

/// Classifies a scan from its Modality and ImageType
///
/// # Algorithm
///
/// 1. Modality contains "PT" → PET
/// 2. Otherwise CT, sub-classified by ImageType:
///    a) contains LOCALIZER → CT-Localizer
///    b) contains PROJECTION → CT-Projection
///    c) does not contain AXIAL → CT-Other
///    d) else → CT-Axial
pub fn classify(modality: &str, image_type: &ImageType) -> ScanKind {
    if modality.to_uppercase().contains("PT") {
        return ScanKind::Pet;
    }

    if image_type.contains("LOCALIZER") {
        ScanKind::CtLocalizer
    } else if image_type.contains("PROJECTION") {
        ScanKind::CtProjection
    } else if !image_type.contains("AXIAL") {
        ScanKind::CtOther
    } else {
        ScanKind::CtAxial
    }
}

/// Extracts ImageType structure from DICOM file
pub fn extract_image_type(dcm: &InMemDicomObject) -> ImageType {
    get_multi_string_value(dcm, IMAGE_TYPE)
        .map(ImageType::new)
        .unwrap_or_default()
}
