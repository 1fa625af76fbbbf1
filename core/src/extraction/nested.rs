//! Declarative lookups through nested sequences
//!
//! A [`TagPath`] names a chain of sequence tags (always taking the first
//! item of each) followed by a leaf tag. All nested field access goes through
//! [`TagPath::resolve`], so schema variations only touch the path tables.

use dicom_core::Tag;
use dicom_object::mem::InMemElement;
use dicom_object::InMemDicomObject;

use super::tags::element_to_string;

/// Path to a value reachable through first items of nested sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPath {
    /// Sequence tags entered in order; the first item of each is used
    pub sequences: &'static [Tag],
    /// Tag of the value inside the innermost item
    pub leaf: Tag,
}

impl TagPath {
    pub const fn new(sequences: &'static [Tag], leaf: Tag) -> Self {
        Self { sequences, leaf }
    }

    /// Walks the sequence chain down to the innermost item
    pub fn resolve_item<'a>(&self, dcm: &'a InMemDicomObject) -> Result<&'a InMemDicomObject, Tag> {
        resolve_sequence_item(dcm, self.sequences)
    }

    /// Resolves the leaf element
    ///
    /// # Returns
    ///
    /// The leaf element, or `Err(tag)` naming the first tag along the path
    /// that could not be found
    pub fn resolve<'a>(&self, dcm: &'a InMemDicomObject) -> Result<&'a InMemElement, Tag> {
        let item = self.resolve_item(dcm)?;
        item.element(self.leaf).map_err(|_| self.leaf)
    }

    /// Resolves the leaf as a trimmed string
    ///
    /// A present but blank leaf is reported as missing.
    pub fn string_value(&self, dcm: &InMemDicomObject) -> Result<String, Tag> {
        let elem = self.resolve(dcm)?;
        element_to_string(elem)
            .filter(|s| !s.is_empty())
            .ok_or(self.leaf)
    }
}

/// Walks a chain of sequence tags, taking the first item of each
///
/// # Returns
///
/// The innermost item, or `Err(tag)` naming the first sequence that is
/// missing or has no items
pub fn resolve_sequence_item<'a>(
    dcm: &'a InMemDicomObject,
    sequences: &[Tag],
) -> Result<&'a InMemDicomObject, Tag> {
    sequences.iter().try_fold(dcm, |item, &seq_tag| {
        item.element(seq_tag)
            .ok()
            .and_then(|elem| elem.items())
            .and_then(|items| items.first())
            .ok_or(seq_tag)
    })
}
