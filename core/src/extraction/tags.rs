use dicom_core::{Tag, VR};
use dicom_object::mem::InMemElement;
use dicom_object::InMemDicomObject;

// Patient/Study Identity Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const PERFORMING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x1050);
pub const PATIENT_SPECIES_DESCRIPTION: Tag = Tag(0x0010, 0x2201);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
pub const PATIENT_BREED_DESCRIPTION: Tag = Tag(0x0010, 0x2292);
pub const PATIENT_COMMENTS: Tag = Tag(0x0010, 0x4000);

// Series Identification Tags
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const PROTOCOL_NAME: Tag = Tag(0x0018, 0x1030);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);

// Core Image Tags
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);

// Image Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);

// CT Acquisition Tags
pub const KVP: Tag = Tag(0x0018, 0x0060);
pub const X_RAY_TUBE_CURRENT_IN_MA: Tag = Tag(0x0018, 0x9330);
pub const DISTANCE_SOURCE_TO_DETECTOR: Tag = Tag(0x0018, 0x1110);
pub const DISTANCE_SOURCE_TO_PATIENT: Tag = Tag(0x0018, 0x1111);

// PET Radiopharmaceutical Tags
pub const RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE: Tag = Tag(0x0054, 0x0016);
pub const RADIONUCLIDE_CODE_SEQUENCE: Tag = Tag(0x0054, 0x0300);
pub const RADIOPHARMACEUTICAL_CODE_SEQUENCE: Tag = Tag(0x0054, 0x0304);
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
pub const RADIONUCLIDE_TOTAL_DOSE: Tag = Tag(0x0018, 0x1074);
pub const RADIOPHARMACEUTICAL_START_DATE_TIME: Tag = Tag(0x0018, 0x1078);

// Vendor Private Tags (Mediso nanoScan)
pub const PRIVATE_PROJECT_CODE: Tag = Tag(0x0009, 0x10D5);
pub const PRIVATE_ROTATION_COUNT: Tag = Tag(0x0009, 0x1037);
pub const PRIVATE_INJECTED_DOSE: Tag = Tag(0x0009, 0x10F2);
pub const PRIVATE_INJECTED_DOSE_UNIT: Tag = Tag(0x0009, 0x10FA);
pub const PRIVATE_MEASUREMENT_TIME: Tag = Tag(0x0009, 0x10EE);

/// Converts a data element to a trimmed string
///
/// Elements read with an unknown VR (private tags in implicit VR files) hold
/// raw bytes, which are decoded as text instead of being formatted as numbers.
pub fn element_to_string(elem: &InMemElement) -> Option<String> {
    if elem.vr() == VR::UN {
        return elem.to_bytes().ok().map(|bytes| {
            String::from_utf8_lossy(&bytes)
                .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        });
    }
    elem.to_str().ok().map(|s| s.trim().to_string())
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag).ok().and_then(element_to_string)
}

/// Helper to get a string value, substituting an empty string when absent
pub fn get_string_or_empty(dcm: &InMemDicomObject, tag: Tag) -> String {
    get_string_value(dcm, tag).unwrap_or_default()
}

/// Helper to get a non-empty string value
///
/// Present-but-blank values are treated as absent.
pub fn get_non_empty_string(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    get_string_value(dcm, tag).filter(|s| !s.is_empty())
}

/// Helper to get multi-string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<String>
pub fn get_multi_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<String>> {
    dcm.element(tag).ok().and_then(|elem| {
        // Try to get as multi-string
        if let Ok(strs) = elem.to_multi_str() {
            Some(strs.iter().map(|s| s.trim().to_string()).collect())
        } else {
            // Fallback: try to get as single string and split by backslash
            element_to_string(elem)
                .map(|s| s.split('\\').map(|part| part.trim().to_string()).collect())
        }
    })
}

/// Formats a tag as `(GGGG,EEEE)` for messages
pub fn tag_label(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue};

    #[test]
    fn test_tag_values() {
        assert_eq!(INSTANCE_NUMBER, Tag(0x0020, 0x0013));
        assert_eq!(MODALITY, Tag(0x0008, 0x0060));
        assert_eq!(RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, Tag(0x0054, 0x0016));
        assert_eq!(PRIVATE_PROJECT_CODE, Tag(0x0009, 0x10D5));
    }

    #[test]
    fn test_tag_label() {
        assert_eq!(tag_label(PRIVATE_PROJECT_CODE), "(0009,10D5)");
        assert_eq!(tag_label(DISTANCE_SOURCE_TO_PATIENT), "(0018,1111)");
    }

    #[test]
    fn test_get_string_value_trims() {
        let dcm = InMemDicomObject::from_element_iter([DataElement::new(
            PROTOCOL_NAME,
            VR::LO,
            PrimitiveValue::from("CT whole body "),
        )]);
        assert_eq!(
            get_string_value(&dcm, PROTOCOL_NAME),
            Some("CT whole body".to_string())
        );
        assert_eq!(get_string_or_empty(&dcm, SERIES_DESCRIPTION), "");
    }

    #[test]
    fn test_unknown_vr_decoded_as_text() {
        let dcm = InMemDicomObject::from_element_iter([DataElement::new(
            PRIVATE_PROJECT_CODE,
            VR::UN,
            PrimitiveValue::U8(b"PRJ42\0".iter().copied().collect()),
        )]);
        assert_eq!(
            get_string_value(&dcm, PRIVATE_PROJECT_CODE),
            Some("PRJ42".to_string())
        );
    }

    #[test]
    fn test_blank_value_is_absent() {
        let dcm = InMemDicomObject::from_element_iter([DataElement::new(
            PATIENT_SEX,
            VR::CS,
            PrimitiveValue::from("  "),
        )]);
        assert_eq!(get_non_empty_string(&dcm, PATIENT_SEX), None);
    }

    #[test]
    fn test_multi_string_value() {
        let dcm = InMemDicomObject::from_element_iter([DataElement::new(
            IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(
                vec!["ORIGINAL".to_string(), "PRIMARY".to_string(), "AXIAL".to_string()].into(),
            ),
        )]);
        assert_eq!(
            get_multi_string_value(&dcm, IMAGE_TYPE),
            Some(vec![
                "ORIGINAL".to_string(),
                "PRIMARY".to_string(),
                "AXIAL".to_string()
            ])
        );
    }
}
