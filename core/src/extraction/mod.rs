pub mod boundary;
pub mod classify;
pub mod nested;
pub mod parameters;
pub mod study_header;
pub mod tags;

pub use boundary::{is_series_start, parse_position};
pub use classify::{classify, classify_scan, extract_image_type};
pub use nested::{resolve_sequence_item, TagPath};
pub use parameters::{extract_parameters, zoom_factor, ExtractedParameters};
pub use study_header::{extract_study_header, family_comma_given, family_name};
pub use tags::*;
