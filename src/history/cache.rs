//! Memoization of the loaded history, keyed by the source directory's
//! contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::loader::{display_name, is_batch_file};
use super::{load_history, History};
use crate::error::Result;

/// Identity of a source directory's qualifying files.
///
/// Two scans compare equal only if the same files exist with the same
/// sizes and modification times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    dir: PathBuf,
    files: Vec<FileStamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    name: String,
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceSignature {
    /// Scan a directory. A missing directory has an empty signature.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();

        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if !is_batch_file(&path) {
                    continue;
                }
                let metadata = fs::metadata(&path)?;
                if !metadata.is_file() {
                    continue;
                }
                files.push(FileStamp {
                    name: display_name(&path),
                    len: metadata.len(),
                    modified: metadata.modified().ok(),
                });
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Number of qualifying files seen.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Holds the most recently loaded history and reuses it while the source
/// directory is unchanged.
#[derive(Debug, Default)]
pub struct HistoryCache {
    entry: Option<(SourceSignature, History)>,
}

impl HistoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the history for `dir`, rebuilding only if its signature changed.
    ///
    /// Fatal load errors are not cached.
    pub fn load(&mut self, dir: &Path) -> Result<History> {
        let signature = SourceSignature::scan(dir)?;

        if let Some((cached, history)) = &self.entry {
            if *cached == signature {
                debug!("History cache hit for {}", dir.display());
                return Ok(history.clone());
            }
        }

        debug!(
            "History cache miss for {} ({} files)",
            dir.display(),
            signature.file_count()
        );
        self.entry = None;
        self.rebuild(dir, signature)
    }

    /// Parse `dir` and key the result by `signature`, scanned before parsing.
    /// A file rewritten mid-load therefore misses on the next call.
    fn rebuild(&mut self, dir: &Path, signature: SourceSignature) -> Result<History> {
        let history = load_history(dir)?;
        self.entry = Some((signature, history.clone()));
        Ok(history)
    }

    /// Whether a load of `dir` would be served from the cache.
    pub fn is_cached(&self, dir: &Path) -> Result<bool> {
        match &self.entry {
            Some((cached, _)) => Ok(*cached == SourceSignature::scan(dir)?),
            None => Ok(false),
        }
    }

    /// Drop the cached history.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
