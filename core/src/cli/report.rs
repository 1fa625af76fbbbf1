use crate::run::{RunSummary, StudyStatus};
use std::fmt;

/// Text report formatter for a run summary
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Study Summary")?;
        writeln!(f, "=============")?;
        writeln!(f)?;

        for outcome in &self.summary.outcomes {
            let status = match outcome.status() {
                StudyStatus::Succeeded => "ok",
                StudyStatus::Flagged => "FLAGGED",
                StudyStatus::Failed => "FAILED",
            };
            writeln!(f, "{}: {}", outcome.name(), status)?;

            if let Some(modality) = outcome.modality {
                writeln!(f, "  Modality: {}", modality)?;
                writeln!(f, "  Scans:    {}", outcome.rows)?;
            }
            if outcome.skipped_instances > 0 {
                writeln!(f, "  Skipped:  {} unreadable file(s)", outcome.skipped_instances)?;
            }
            if let Some(ref path) = outcome.record_path {
                writeln!(f, "  Record:   {}", path.display())?;
            }
            if let Some(ref path) = outcome.archive_path {
                writeln!(f, "  Archive:  {}", path.display())?;
            }
            for flag in &outcome.flagged {
                writeln!(f, "  Flagged:  {}", flag)?;
            }
            if let Some(ref error) = outcome.error {
                writeln!(f, "  Error:    {}", error)?;
            }
        }
        writeln!(f)?;

        writeln!(
            f,
            "{} studies: {} ok, {} flagged, {} failed",
            self.summary.outcomes.len(),
            self.summary.count(StudyStatus::Succeeded),
            self.summary.count(StudyStatus::Flagged),
            self.summary.count(StudyStatus::Failed)
        )?;

        Ok(())
    }
}
