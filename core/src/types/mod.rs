//! Core type definitions for tomography acquisition logs
//!
//! This module provides the fundamental types used throughout the scancat library:
//! - [`ScanKind`]: Classification of a detected scan (PET, CT localizer/projection/axial/other)
//! - [`StudyModality`]: Study-wide modality, upgraded from CT to PET
//! - [`ImageType`]: DICOM ImageType value list
//! - [`PixelSpacing`]: Parsed pixel spacing
//! - [`ScanRecord`], [`ScanParameters`], [`StudyHeader`]: Rows of the output record
//! - [`RowIssue`]: Problems attached to an individual row

mod enums;
mod image_type;
mod pixel_spacing;
mod record;

pub use enums::{ScanKind, StudyModality};
pub use image_type::ImageType;
pub use pixel_spacing::PixelSpacing;
pub(crate) use record::sanitize_file_component;
pub use record::{
    RowIssue, ScanParameters, ScanRecord, StudyHeader, SCAN_TABLE_COLUMNS, STUDY_HEADER_COLUMNS,
};
