//! Cold-storage archives of study directories
//!
//! The archiver is an external tool. Each study becomes one `.7z` archive
//! holding the raw instance directory and its record file.

use crate::error::{Result, ScancatError};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Archive file extension
pub const ARCHIVE_EXTENSION: &str = "7z";

/// Adds files or directories to an archive
pub trait Archiver: Sync {
    /// Adds `input` to `archive`, creating the archive if needed
    ///
    /// # Errors
    ///
    /// Returns [`ScancatError::ArchiveTool`] if the tool cannot be started or
    /// exits unsuccessfully
    fn add(&self, archive: &Path, input: &Path) -> Result<()>;
}

/// Invokes the 7-Zip command line tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SevenZipArchiver {
    pub program: PathBuf,
    pub level: u8,
}

impl SevenZipArchiver {
    pub fn new(program: impl Into<PathBuf>, level: u8) -> Self {
        Self {
            program: program.into(),
            level,
        }
    }

    /// Command line for adding `input` to `archive`
    pub fn command(&self, archive: &Path, input: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("a")
            .arg("-t7z")
            .arg(archive)
            .arg(input)
            .arg(format!("-mx={}", self.level));
        cmd
    }
}

impl Archiver for SevenZipArchiver {
    fn add(&self, archive: &Path, input: &Path) -> Result<()> {
        let tool = self.program.display().to_string();
        debug!("{} a -t7z {} {}", tool, archive.display(), input.display());

        let output = self
            .command(archive, input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ScancatError::ArchiveTool {
                tool: tool.clone(),
                status: format!("failed to start: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} exited with {}: {}", tool, output.status, stderr.trim());
            return Err(ScancatError::ArchiveTool {
                tool,
                status: output.status.to_string(),
            });
        }

        Ok(())
    }
}

/// Archives a study directory together with its record file
///
/// The directory is added first, then the record file. The record file is
/// left in place whatever the outcome.
///
/// # Returns
///
/// Path of the archive, `<dest_dir>/<stem>.7z`
pub fn archive_study<A: Archiver + ?Sized>(
    archiver: &A,
    dest_dir: &Path,
    stem: &str,
    study_dir: &Path,
    record_file: &Path,
) -> Result<PathBuf> {
    let archive = dest_dir.join(format!("{}.{}", stem, ARCHIVE_EXTENSION));
    info!("Creating archive {}", archive.display());

    archiver.add(&archive, study_dir)?;
    archiver.add(&archive, record_file)?;

    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and fails on a chosen call index
    struct RecordingArchiver {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
        fail_on: Option<usize>,
    }

    impl Archiver for RecordingArchiver {
        fn add(&self, archive: &Path, input: &Path) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((archive.to_path_buf(), input.to_path_buf()));
            if self.fail_on == Some(calls.len() - 1) {
                return Err(ScancatError::ArchiveTool {
                    tool: "fake".to_string(),
                    status: "exit status: 2".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_command_line() {
        let archiver = SevenZipArchiver::new("/usr/bin/7z", 7);
        let cmd = archiver.command(Path::new("/out/M1_P_CT.7z"), Path::new("/src/study1"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "/usr/bin/7z");
        assert_eq!(args, vec!["a", "-t7z", "/out/M1_P_CT.7z", "/src/study1", "-mx=7"]);
    }

    #[test]
    fn test_archive_study_adds_directory_then_record() {
        let archiver = RecordingArchiver {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        };
        let archive = archive_study(
            &archiver,
            Path::new("/out"),
            "M1_P_CT",
            Path::new("/src/study1"),
            Path::new("/out/M1_P_CT.csv"),
        )
        .unwrap();

        assert_eq!(archive, PathBuf::from("/out/M1_P_CT.7z"));
        let calls = archiver.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, PathBuf::from("/src/study1"));
        assert_eq!(calls[1].1, PathBuf::from("/out/M1_P_CT.csv"));
    }

    #[test]
    fn test_archive_failure_is_reported() {
        let archiver = RecordingArchiver {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(0),
        };
        let result = archive_study(
            &archiver,
            Path::new("/out"),
            "M1_P_CT",
            Path::new("/src/study1"),
            Path::new("/out/M1_P_CT.csv"),
        );
        assert!(matches!(result, Err(ScancatError::ArchiveTool { .. })));
        assert_eq!(archiver.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let archiver = SevenZipArchiver::new("/nonexistent/scancat-7z", 5);
        let result = archiver.add(Path::new("/tmp/x.7z"), Path::new("/tmp"));
        assert!(matches!(result, Err(ScancatError::ArchiveTool { .. })));
    }
}
