//! Processing of a whole source root
//!
//! Each study directory is processed in its own failure domain: errors and
//! panics are captured into that study's [`StudyOutcome`] and never stop the
//! other studies. Studies run in parallel; instances within a study are
//! always visited sequentially.

use crate::archive::{archive_study, Archiver};
use crate::config::RunConfig;
use crate::error::{Result, ScancatError};
use crate::output::write_study_record_file;
use crate::study::{read_study, HeaderReader, StudyRecord};
use crate::types::StudyModality;
use log::{error, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Final state of one study
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum StudyStatus {
    /// Record written (and archived if requested), no flagged rows
    Succeeded,
    /// Record written, but some rows miss required data
    Flagged,
    /// Record or archive could not be produced
    Failed,
}

/// Result of processing one study directory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StudyOutcome {
    pub study_dir: PathBuf,
    pub modality: Option<StudyModality>,
    pub record_path: Option<PathBuf>,
    pub archive_path: Option<PathBuf>,
    pub rows: usize,
    pub skipped_instances: usize,
    /// Messages of flagged rows, `<file>: <issue>`
    pub flagged: Vec<String>,
    pub error: Option<String>,
}

impl StudyOutcome {
    fn new(study_dir: &Path) -> Self {
        Self {
            study_dir: study_dir.to_path_buf(),
            modality: None,
            record_path: None,
            archive_path: None,
            rows: 0,
            skipped_instances: 0,
            flagged: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, msg: String) {
        error!("Study {} failed: {}", self.study_dir.display(), msg);
        self.error = Some(msg);
    }

    pub fn status(&self) -> StudyStatus {
        if self.error.is_some() {
            StudyStatus::Failed
        } else if !self.flagged.is_empty() {
            StudyStatus::Flagged
        } else {
            StudyStatus::Succeeded
        }
    }

    /// Study directory name
    pub fn name(&self) -> String {
        self.study_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.study_dir.display().to_string())
    }
}

/// Outcomes of every study in a run, in study directory order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunSummary {
    pub outcomes: Vec<StudyOutcome>,
}

impl RunSummary {
    pub fn count(&self, status: StudyStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status() == status).count()
    }

    /// Returns whether every study succeeded without flagged rows
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status() == StudyStatus::Succeeded)
    }
}

/// Lists the study subdirectories of the source root, ordered by name
pub fn collect_study_dirs(source_root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(source_root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Processes every study under the configured source root
///
/// Studies are read in parallel first. Record names are then assigned for
/// the whole run, so studies sharing `<patient>_<project>_<modality>` never
/// write to the same record or archive. Writing and archiving run in
/// parallel again.
///
/// # Errors
///
/// Only fails if the source root cannot be listed or the worker pool cannot
/// be built; per-study failures are reported in the summary
pub fn run<R, A>(config: &RunConfig, reader: &R, archiver: Option<&A>) -> Result<RunSummary>
where
    R: HeaderReader + ?Sized,
    A: Archiver + ?Sized,
{
    let study_dirs = collect_study_dirs(&config.source_root)?;
    info!(
        "Found {} study directories in {}",
        study_dirs.len(),
        config.source_root.display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| ScancatError::Config(format!("cannot start worker pool: {}", e)))?;

    let outcomes = pool.install(|| {
        let mut studies: Vec<PendingStudy> = study_dirs
            .par_iter()
            .map(|dir| read_pending_study(dir, reader))
            .collect();

        assign_record_stems(&mut studies);

        studies
            .into_par_iter()
            .map(|study| finish_study(study, config, archiver))
            .collect::<Vec<_>>()
    });

    Ok(RunSummary { outcomes })
}

/// A study that has been read but not written yet
struct PendingStudy {
    outcome: StudyOutcome,
    record: Option<StudyRecord>,
    stem: Option<String>,
}

fn read_pending_study<R>(study_dir: &Path, reader: &R) -> PendingStudy
where
    R: HeaderReader + ?Sized,
{
    let mut outcome = StudyOutcome::new(study_dir);

    let record = match isolate(|| read_study(study_dir, reader)) {
        Ok(record) => {
            outcome.modality = Some(record.modality);
            outcome.rows = record.rows.len();
            outcome.skipped_instances = record.skipped.len();
            outcome.flagged = record
                .flagged_rows()
                .flat_map(|row| {
                    row.issues
                        .iter()
                        .filter(|issue| issue.is_failure())
                        .map(move |issue| format!("{}: {}", row.first_filename, issue))
                })
                .collect();
            Some(record)
        }
        Err(msg) => {
            outcome.fail(msg);
            None
        }
    };

    PendingStudy {
        outcome,
        record,
        stem: None,
    }
}

/// Gives every readable study a record name no other study in the run uses
///
/// Studies whose plain name is shared are all qualified with their
/// directory name. A study whose name is still taken fails instead of
/// overwriting another study's output.
fn assign_record_stems(studies: &mut [PendingStudy]) {
    let mut shared: HashMap<String, usize> = HashMap::new();
    for record in studies.iter().filter_map(|s| s.record.as_ref()) {
        *shared.entry(record.file_stem()).or_default() += 1;
    }

    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    for study in studies.iter_mut() {
        let Some(record) = &study.record else {
            continue;
        };

        let plain = record.file_stem();
        let stem = if shared.get(&plain).copied().unwrap_or(0) > 1 {
            let qualified = record.qualified_file_stem(&study.outcome.name());
            warn!(
                "{} shares the record name {} with another study, using {}",
                study.outcome.study_dir.display(),
                plain,
                qualified
            );
            qualified
        } else {
            plain
        };

        if let Some(owner) = claimed.get(&stem) {
            let msg = format!("record name {} is already used by {}", stem, owner.display());
            study.outcome.fail(msg);
            continue;
        }
        claimed.insert(stem.clone(), study.outcome.study_dir.clone());
        study.stem = Some(stem);
    }
}

fn finish_study<A>(study: PendingStudy, config: &RunConfig, archiver: Option<&A>) -> StudyOutcome
where
    A: Archiver + ?Sized,
{
    let PendingStudy {
        mut outcome,
        record,
        stem,
    } = study;

    if let (Some(record), Some(stem)) = (record, stem) {
        let result = isolate(|| write_study_output(&record, &stem, config, archiver, &mut outcome));
        if let Err(msg) = result {
            outcome.fail(msg);
        }
    }
    outcome
}

fn write_study_output<A>(
    record: &StudyRecord,
    stem: &str,
    config: &RunConfig,
    archiver: Option<&A>,
    outcome: &mut StudyOutcome,
) -> Result<()>
where
    A: Archiver + ?Sized,
{
    let record_path = write_study_record_file(&config.dest_root, stem, record)?;
    info!("Wrote {}", record_path.display());
    outcome.record_path = Some(record_path.clone());

    if !outcome.flagged.is_empty() {
        warn!(
            "{} has {} flagged row(s)",
            record_path.display(),
            outcome.flagged.len()
        );
    }

    if config.create_archives {
        if let Some(archiver) = archiver {
            let archive = archive_study(
                archiver,
                &config.dest_root,
                stem,
                &outcome.study_dir,
                &record_path,
            )?;
            outcome.archive_path = Some(archive);
        } else {
            warn!("Archiving requested but no archiver configured");
        }
    }

    Ok(())
}

/// Runs one step of a study, turning errors and panics into a message
fn isolate<T>(step: impl FnOnce() -> Result<T>) -> std::result::Result<T, String> {
    match catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
