use crate::error::{Result, ScancatError};
use crate::study::builder::{StudyRecord, StudyRecordBuilder};
use dicom_dictionary_std::tags;
use dicom_object::file::{OpenFileOptions, ReadPreamble};
use dicom_object::InMemDicomObject;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Source of per-instance header metadata
pub trait HeaderReader: Sync {
    /// Reads the header of one instance without its pixel data
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed at all
    fn read(&self, path: &Path) -> Result<InMemDicomObject>;
}

/// Reads DICOM files from disk, stopping before the pixel data
///
/// The 128-byte preamble is optional, so files written without one are
/// still accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomHeaderReader;

impl HeaderReader for DicomHeaderReader {
    fn read(&self, path: &Path) -> Result<InMemDicomObject> {
        let obj = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Auto)
            .read_until(tags::PIXEL_DATA)
            .open_file(path)?;
        Ok(obj.into_inner())
    }
}

/// Lists the instance files of a study directory in traversal order
///
/// All regular, non-hidden files are candidates. They are ordered by file
/// name so the traversal is the same on every filesystem.
pub fn collect_instance_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if !hidden {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Reads every instance of a study directory and builds its record
///
/// Malformed instances are skipped and listed in [`StudyRecord::skipped`].
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or contains no
/// readable instance
pub fn read_study<R: HeaderReader + ?Sized>(directory: &Path, reader: &R) -> Result<StudyRecord> {
    let files = collect_instance_files(directory)?;
    info!(
        "Processing directory: {} ({} files)",
        directory.display(),
        files.len()
    );

    let mut builder = StudyRecordBuilder::new();
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match reader.read(path) {
            Ok(dcm) => {
                builder.visit(&file_name, &dcm);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                builder.skip(&file_name, e);
            }
        }
    }

    info!(
        "Finished {} as a {} study",
        directory.display(),
        builder.modality()
    );
    builder
        .finish()
        .ok_or_else(|| ScancatError::EmptyStudy(directory.to_path_buf()))
}
