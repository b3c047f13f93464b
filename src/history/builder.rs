//! The in-memory event log built from parsed batches.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use tracing::{debug, info};

use super::loader::{Batch, LoadWarning};
use super::record::PlayEvent;
use crate::error::{Error, Result};
use crate::filter::TimeBasis;
use crate::types::Hours;

/// Every play event of a session, in batch concatenation order.
///
/// Order is not chronological. Once built the log is never mutated;
/// reloading produces a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<PlayEvent>,
}

impl EventLog {
    /// Concatenate batches into a log.
    ///
    /// A record whose timestamp does not parse is dropped and reported as a
    /// [`LoadWarning::Record`]; the rest of its batch is kept.
    #[must_use]
    pub fn build(batches: Vec<Batch>) -> (Self, Vec<LoadWarning>) {
        let capacity = batches.iter().map(|b| b.records.len()).sum();
        let mut events = Vec::with_capacity(capacity);
        let mut warnings = Vec::new();

        for batch in batches {
            let file = batch.file_name();
            for (index, record) in batch.records.into_iter().enumerate() {
                match PlayEvent::try_from(record) {
                    Ok(event) => events.push(event),
                    Err(e) => {
                        let warning = LoadWarning::Record {
                            file: file.clone(),
                            index,
                            message: e.to_string(),
                        };
                        debug!("{warning}");
                        warnings.push(warning);
                    }
                }
            }
        }

        (Self { events }, warnings)
    }

    /// Build a log and reject it if no event survived.
    pub fn build_non_empty(
        batches: Vec<Batch>,
        source: &Path,
        failed_files: usize,
    ) -> Result<(Self, Vec<LoadWarning>)> {
        let (log, warnings) = Self::build(batches);
        if log.is_empty() {
            return Err(Error::NoValidData {
                dir: source.to_path_buf(),
                failed: failed_files,
            });
        }
        info!(
            "Event log built: {} plays, {} dropped, {:.1} hours",
            log.len(),
            warnings.len(),
            log.total_hours().get()
        );
        Ok((log, warnings))
    }

    /// Create a log directly from events.
    #[must_use]
    pub const fn from_events(events: Vec<PlayEvent>) -> Self {
        Self { events }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayEvent> {
        self.events.iter()
    }

    /// Distinct calendar years, ascending.
    #[must_use]
    pub fn years(&self, basis: TimeBasis) -> Vec<i32> {
        self.events
            .iter()
            .map(|e| basis.year(e.timestamp))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of hours played over the whole log.
    #[must_use]
    pub fn total_hours(&self) -> Hours {
        self.events.iter().map(PlayEvent::hours_played).sum()
    }

    /// Number of distinct non-absent artist names.
    #[must_use]
    pub fn distinct_artists(&self) -> usize {
        self.events
            .iter()
            .filter_map(|e| e.artist_name.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a PlayEvent;
    type IntoIter = std::slice::Iter<'a, PlayEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
