use crate::extraction::tags::{
    get_string_or_empty, COLUMNS, MODALITY, PIXEL_SPACING, PROTOCOL_NAME, ROWS,
    SERIES_DESCRIPTION, SERIES_DATE, SERIES_NUMBER, SERIES_TIME,
};
use crate::extraction::{classify_scan, extract_image_type, extract_parameters, ExtractedParameters};
use crate::types::{PixelSpacing, ScanRecord};
use dicom_object::InMemDicomObject;

/// Builds the scan table row for a series boundary instance
///
/// Classifies the instance, extracts the parameters that apply to its kind,
/// and fills the descriptive columns shared by every kind.
///
/// # Example
///
/// ```
/// use scancat_core::{ScanExtractor, ScanKind};
/// use dicom_object::InMemDicomObject;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0060), // Modality
///     VR::CS,
///     PrimitiveValue::from("CT"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0008), // ImageType
///     VR::CS,
///     PrimitiveValue::Strs(vec!["ORIGINAL".to_string(), "PRIMARY".to_string(), "PROJECTION".to_string()].into()),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0018, 0x1110), // DistanceSourceToDetector
///     VR::DS,
///     PrimitiveValue::from("1000"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0018, 0x1111), // DistanceSourceToPatient
///     VR::DS,
///     PrimitiveValue::from("700"),
/// ));
///
/// let record = ScanExtractor::extract(&dcm, "0001.dcm");
///
/// assert_eq!(record.kind, ScanKind::CtProjection);
/// assert_eq!(record.image_type, "PROJECTION");
/// assert_eq!(record.params.zoom_factor, Some(1));
/// ```
pub struct ScanExtractor;

impl ScanExtractor {
    /// Extracts one scan row from a boundary instance
    ///
    /// Never fails: descriptive tags fall back to empty values, and problems
    /// with kind-specific required tags are recorded in [`ScanRecord::issues`].
    pub fn extract(dcm: &InMemDicomObject, file_name: &str) -> ScanRecord {
        let kind = classify_scan(dcm);
        let ExtractedParameters { params, issues } = extract_parameters(kind, dcm);

        ScanRecord {
            kind,
            series_number: get_string_or_empty(dcm, SERIES_NUMBER),
            acquisition_date: get_string_or_empty(dcm, SERIES_DATE),
            acquisition_time: get_string_or_empty(dcm, SERIES_TIME),
            modality: get_string_or_empty(dcm, MODALITY),
            image_type: extract_image_type(dcm)
                .last_value()
                .unwrap_or_default()
                .to_string(),
            pixel_spacing: PixelSpacing::normalize(&get_string_or_empty(dcm, PIXEL_SPACING)),
            rows: get_string_or_empty(dcm, ROWS),
            columns: get_string_or_empty(dcm, COLUMNS),
            protocol_name: get_string_or_empty(dcm, PROTOCOL_NAME),
            series_description: get_string_or_empty(dcm, SERIES_DESCRIPTION),
            first_filename: file_name.to_string(),
            params,
            issues,
        }
    }
}
