//! Ingestion of exported streaming history.
//!
//! [`BatchLoader`] reads the JSON batches, [`EventLog::build`] normalizes
//! them into play events, and [`HistoryCache`] keeps the result for as long
//! as the source directory is unchanged.

mod builder;
mod cache;
mod loader;
mod record;

pub use builder::EventLog;
pub use cache::{HistoryCache, SourceSignature};
pub use loader::{Batch, BatchLoader, LoadReport, LoadWarning};
pub use record::{parse_timestamp, PlayEvent, StreamRecord};

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// A loaded event log together with everything skipped while building it.
#[derive(Debug, Clone)]
pub struct History {
    pub log: Arc<EventLog>,
    pub warnings: Vec<LoadWarning>,
}

/// Load and build the event log for a source directory.
pub fn load_history(dir: &Path) -> Result<History> {
    let report = BatchLoader::new(dir).load()?;
    let failed_files = report.warnings.len();
    let mut warnings = report.warnings;

    let (log, dropped) = EventLog::build_non_empty(report.batches, dir, failed_files)?;
    warnings.extend(dropped);

    Ok(History {
        log: Arc::new(log),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn test_sample_two_files_one_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("a.json"),
            r#"[
                {"ts": "2020-02-01T08:00:00Z", "ms_played": 600000, "master_metadata_album_artist_name": "X"},
                {"ts": "2020-03-01T09:00:00Z", "ms_played": 1800000, "master_metadata_album_artist_name": "X"},
                {"ts": "2020-04-01T10:00:00Z", "ms_played": 3600000, "master_metadata_album_artist_name": "Y"}
            ]"#,
        )
        .unwrap();
        fs::write(tmp.path().join("b.json"), r#"[{"ts": "2020-05-01T10:00:00Z", "ms_pl"#).unwrap();

        let history = load_history(tmp.path()).unwrap();
        assert_eq!(history.log.len(), 3);
        assert_eq!(history.warnings.len(), 1);
        assert_eq!(history.warnings[0].file(), "b.json");
    }

    #[test]
    fn test_record_warnings_follow_file_warnings() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("a.json"),
            r#"[
                {"ts": "2020-02-01T08:00:00Z", "ms_played": 1},
                {"ts": "31/12/2020", "ms_played": 1}
            ]"#,
        )
        .unwrap();
        fs::write(tmp.path().join("b.json"), "oops").unwrap();

        let history = load_history(tmp.path()).unwrap();
        assert_eq!(history.log.len(), 1);
        assert!(matches!(history.warnings[0], LoadWarning::File { .. }));
        assert!(matches!(
            history.warnings[1],
            LoadWarning::Record { index: 1, .. }
        ));
    }

    #[test]
    fn test_null_timestamp_drops_only_its_record() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("a.json"),
            r#"[
                {"ts": "2020-01-01T00:00:00Z", "ms_played": 1000, "master_metadata_album_artist_name": "X"},
                {"ts": null, "ms_played": 1000}
            ]"#,
        )
        .unwrap();

        let history = load_history(tmp.path()).unwrap();
        assert_eq!(history.log.len(), 1);
        assert_eq!(history.warnings.len(), 1);
        assert!(matches!(
            &history.warnings[0],
            LoadWarning::Record { file, index: 1, .. } if file == "a.json"
        ));
    }

    #[test]
    fn test_only_empty_batches_is_no_valid_data() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.json"), "[]").unwrap();

        let err = load_history(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::NoValidData { failed: 0, .. }));
    }
}
