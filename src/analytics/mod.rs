//! Aggregations over a filtered event log.
//!
//! Every function here is a pure reduction: the same filtered log and limit
//! always produce the same result, and nothing is cached.

mod heatmap;
mod ranked;

pub use heatmap::{heatmap, Heatmap, HeatmapPeak, DAYS_PER_WEEK, HOURS_PER_DAY};
pub use ranked::{top_artists, top_tracks, RankedEntry, RankedList, TrackKey};

use crate::filter::{FilteredLog, TimeBasis, YearSelection};
use crate::history::EventLog;
use crate::types::Hours;

/// Headline numbers for a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    /// Plays in the selection.
    pub total_plays: usize,
    /// Hours played in the selection.
    pub total_hours: Hours,
    /// Distinct artists in the selection.
    pub unique_artists: usize,
    /// Distinct artists across the whole log.
    pub unique_artists_overall: usize,
}

/// Everything the presentation layer shows for one year/limit selection.
#[derive(Debug, Clone)]
pub struct Report {
    pub years: YearSelection,
    pub filtered: FilteredLog,
    pub overview: Overview,
    pub top_artists: RankedList<String>,
    pub top_tracks: RankedList<TrackKey>,
    pub heatmap: Heatmap,
}

impl Report {
    /// Filter the log and run all three aggregations.
    #[must_use]
    pub fn compute(log: &EventLog, years: YearSelection, limit: usize, basis: TimeBasis) -> Self {
        let filtered = FilteredLog::new(log, &years, basis);

        let overview = Overview {
            total_plays: filtered.len(),
            total_hours: filtered.total_hours(),
            unique_artists: filtered.distinct_artists(),
            unique_artists_overall: log.distinct_artists(),
        };

        Self {
            top_artists: top_artists(&filtered, limit),
            top_tracks: top_tracks(&filtered, limit),
            heatmap: heatmap(&filtered),
            years,
            filtered,
            overview,
        }
    }

    /// Whether the selection matched no plays. Not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DayOfWeek;
    use crate::history::{parse_timestamp, PlayEvent};
    use crate::types::Milliseconds;

    fn play(ts: &str, ms: u64, artist: Option<&str>, track: Option<&str>) -> PlayEvent {
        PlayEvent::new(
            parse_timestamp(ts).unwrap(),
            Milliseconds::new(ms),
            artist.map(String::from),
            track.map(String::from),
        )
    }

    fn log() -> EventLog {
        EventLog::from_events(vec![
            play("2020-01-06T09:00:00Z", 3_600_000, Some("A"), Some("One")),
            play("2020-01-06T09:10:00Z", 1_800_000, None, Some("Episode")),
            play("2021-01-04T20:00:00Z", 7_200_000, Some("B"), Some("Two")),
        ])
    }

    #[test]
    fn test_report_for_one_year() {
        let log = log();
        let report = Report::compute(&log, [2020].into_iter().collect(), 10, TimeBasis::Utc);

        assert_eq!(report.overview.total_plays, 2);
        assert!((report.overview.total_hours.get() - 1.5).abs() < 1e-12);
        assert_eq!(report.overview.unique_artists, 1);
        assert_eq!(report.overview.unique_artists_overall, 2);
        assert_eq!(report.top_artists.len(), 1);
        assert_eq!(report.top_tracks.len(), 1);
        // The artistless episode is excluded from rankings but not the heatmap.
        assert!((report.heatmap.cell(DayOfWeek::Monday, 9).get() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_selection_is_structurally_valid() {
        let log = log();
        let report = Report::compute(&log, YearSelection::empty(), 10, TimeBasis::Utc);

        assert!(report.is_empty());
        assert!(report.top_artists.is_empty());
        assert!(report.top_tracks.is_empty());
        assert_eq!(report.heatmap.rows().count(), 7);
        assert_eq!(report.heatmap.total(), Hours::ZERO);
        assert_eq!(report.overview.unique_artists_overall, 2);
    }
}
