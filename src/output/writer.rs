//! Filesystem report sink
//!
//! Each seed report lands in a fresh directory named
//! `<YYYY_MM_DD_HH_MM>_<sanitized seed>` under the results directory, holding
//! `map.txt`, `content.txt` and `log.txt`.

use crate::output::traits::{OutputError, OutputResult, ReportSink};
use crate::output::FinishedReport;
use crate::url::safe_dir_name;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const MAP_FILE_NAME: &str = "map.txt";
pub const CONTENT_FILE_NAME: &str = "content.txt";
pub const LOG_FILE_NAME: &str = "log.txt";

/// Timestamp format used in directory names
const DIR_TIME_FORMAT: &str = "%Y_%m_%d_%H_%M";

/// Timestamp format used inside `log.txt`
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes seed reports as plain-text files on disk
#[derive(Debug, Clone)]
pub struct FsReportSink {
    root: PathBuf,
}

impl FsReportSink {
    /// Creates a sink rooted at the given results directory
    ///
    /// The directory itself is created lazily, on the first persisted report.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a directory that did not exist before, adding a numeric suffix when a
    /// report for the same seed was already written within the same minute
    fn create_fresh_dir(&self, base_name: &str) -> OutputResult<String> {
        let mut name = base_name.to_string();
        let mut attempt = 1;

        loop {
            match fs::create_dir(self.root.join(&name)) {
                Ok(()) => return Ok(name),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                    name = format!("{}_{}", base_name, attempt);
                }
                Err(e) => {
                    return Err(OutputError::Write {
                        path: self.root.join(&name).display().to_string(),
                        source: e,
                    })
                }
            }
        }
    }
}

impl ReportSink for FsReportSink {
    fn persist(
        &self,
        report: &FinishedReport,
        run_started: DateTime<Local>,
    ) -> OutputResult<String> {
        fs::create_dir_all(&self.root).map_err(|e| OutputError::Write {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let base_name = format!(
            "{}_{}",
            Local::now().format(DIR_TIME_FORMAT),
            safe_dir_name(&report.seed)
        );
        let dir_name = self.create_fresh_dir(&base_name)?;
        let dir = self.root.join(&dir_name);

        write_file(&dir.join(MAP_FILE_NAME), &report.map)?;
        write_file(&dir.join(CONTENT_FILE_NAME), &report.content)?;

        let log = format!(
            "{}\n{}\nOK\n",
            run_started.format(LOG_TIME_FORMAT),
            Local::now().format(LOG_TIME_FORMAT)
        );
        write_file(&dir.join(LOG_FILE_NAME), &log)?;

        tracing::debug!(
            "Persisted report for {} to {}",
            report.seed,
            dir.display()
        );

        Ok(dir_name)
    }
}

fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    fs::write(path, content).map_err(|e| OutputError::Write {
        path: path.display().to_string(),
        source: e,
    })
}
