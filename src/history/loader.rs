//! Discovery and parsing of exported history files.
//!
//! Every `.json` file in the source directory is one batch. A batch that
//! cannot be read or parsed is reported as a [`LoadWarning`] and skipped;
//! only an empty corpus stops the load.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::record::StreamRecord;
use crate::error::{Error, Result};

/// One source file's worth of parsed records.
#[derive(Debug, Clone)]
pub struct Batch {
    pub source: PathBuf,
    pub records: Vec<StreamRecord>,
}

impl Batch {
    /// File name of the batch, for messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }
}

/// A non-fatal problem met during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The whole file was skipped.
    File { file: String, message: String },
    /// A single record was dropped from an otherwise usable file.
    Record {
        file: String,
        index: usize,
        message: String,
    },
}

impl LoadWarning {
    /// Name of the file the warning refers to.
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::File { file, .. } | Self::Record { file, .. } => file,
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { file, message } => write!(f, "Error loading {file}: {message}"),
            Self::Record {
                file,
                index,
                message,
            } => write!(f, "Skipped record {index} in {file}: {message}"),
        }
    }
}

/// Outcome of loading every qualifying file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub batches: Vec<Batch>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// Total records across all parsed batches.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(|b| b.records.len()).sum()
    }
}

/// Reads exported history batches from a directory.
#[derive(Debug, Clone)]
pub struct BatchLoader {
    dir: PathBuf,
}

impl BatchLoader {
    /// Create a loader for the given source directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The source directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List qualifying files, sorted by file name.
    ///
    /// A missing directory is created and reported as empty.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            warn!("Created missing directory: {}", self.dir.display());
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_batch_file(path))
            .collect();
        files.sort();

        Ok(files)
    }

    /// Parse every qualifying file.
    ///
    /// Fails with [`Error::NoInputFiles`] when there is nothing to parse and
    /// with [`Error::NoValidData`] when every file failed.
    pub fn load(&self) -> Result<LoadReport> {
        let files = self.discover()?;
        if files.is_empty() {
            return Err(Error::NoInputFiles {
                dir: self.dir.clone(),
            });
        }

        let report = files
            .into_iter()
            .fold(LoadReport::default(), |mut report, path| {
                match read_batch(&path) {
                    Ok(batch) => {
                        debug!(
                            "Parsed {} records from {}",
                            batch.records.len(),
                            batch.file_name()
                        );
                        report.batches.push(batch);
                    }
                    Err(e) => {
                        let warning = LoadWarning::File {
                            file: display_name(&path),
                            message: e.to_string(),
                        };
                        debug!("{warning}");
                        report.warnings.push(warning);
                    }
                }
                report
            });

        if report.batches.is_empty() {
            return Err(Error::NoValidData {
                dir: self.dir.clone(),
                failed: report.warnings.len(),
            });
        }

        info!(
            "Loaded {} records from {} file(s) in {} ({} skipped)",
            report.record_count(),
            report.batches.len(),
            self.dir.display(),
            report.warnings.len()
        );

        Ok(report)
    }
}

/// Whether a path names a history batch (`*.json`, any case).
pub(crate) fn is_batch_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_batch(path: &Path) -> Result<Batch> {
    let contents = fs::read_to_string(path)?;
    let records: Vec<StreamRecord> = serde_json::from_str(&contents)?;
    Ok(Batch {
        source: path.to_path_buf(),
        records,
    })
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
