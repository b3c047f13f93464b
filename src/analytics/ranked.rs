//! Top-N rankings by hours played.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::filter::FilteredLog;
use crate::types::Hours;

/// Grouping key for track rankings. The same title by two artists is two
/// tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrackKey {
    pub track_name: String,
    pub artist_name: String,
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.track_name, self.artist_name)
    }
}

/// One ranked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<K> {
    /// 1-based position; unique within a list even when totals tie.
    pub rank: usize,
    pub key: K,
    pub hours: Hours,
}

/// The top entries of a ranking, stored largest first.
///
/// Entries with equal totals keep the order in which their keys were first
/// seen in the filtered log. That order is stable but is not a strict
/// total order on the keys.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedList<K> {
    entries: Vec<RankedEntry<K>>,
    distinct_total: usize,
}

impl<K> Default for RankedList<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            distinct_total: 0,
        }
    }
}

impl<K> RankedList<K> {
    /// Rank grouped totals. `groups` must be in first-seen order.
    fn from_groups(mut groups: Vec<(K, Hours)>, limit: usize) -> Self {
        let distinct_total = groups.len();

        // `sort_by` is stable, so ties stay in first-seen order.
        groups.sort_by(|(_, a), (_, b)| b.get().total_cmp(&a.get()));
        groups.truncate(limit);

        let entries = groups
            .into_iter()
            .enumerate()
            .map(|(i, (key, hours))| RankedEntry {
                rank: i + 1,
                key,
                hours,
            })
            .collect();

        Self {
            entries,
            distinct_total,
        }
    }

    /// Entries by rank, largest total first.
    #[must_use]
    pub fn entries(&self) -> &[RankedEntry<K>] {
        &self.entries
    }

    /// Entries by rank, largest total first.
    pub fn descending(&self) -> std::slice::Iter<'_, RankedEntry<K>> {
        self.entries.iter()
    }

    /// Entries smallest total first, as horizontal bar charts lay them out.
    pub fn ascending(&self) -> std::iter::Rev<std::slice::Iter<'_, RankedEntry<K>>> {
        self.entries.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys before truncation to the limit.
    #[must_use]
    pub const fn distinct_total(&self) -> usize {
        self.distinct_total
    }

    /// Largest total in the list, or zero when empty.
    #[must_use]
    pub fn max_hours(&self) -> Hours {
        self.entries.first().map_or(Hours::ZERO, |e| e.hours)
    }
}

/// Sum hours per key, keeping keys in first-seen order.
fn sum_by_key<K, I>(items: I) -> Vec<(K, Hours)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, Hours)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Hours)> = Vec::new();

    for (key, hours) in items {
        if let Some(&i) = index.get(&key) {
            groups[i].1 += hours;
        } else {
            index.insert(key.clone(), groups.len());
            groups.push((key, hours));
        }
    }

    groups
}

/// Top `limit` artists by hours played. Events without an artist are
/// ignored.
#[must_use]
pub fn top_artists(log: &FilteredLog, limit: usize) -> RankedList<String> {
    let groups = sum_by_key(
        log.with_artist()
            .map(|(artist, event)| (artist, event.hours_played())),
    );
    let groups = groups
        .into_iter()
        .map(|(artist, hours)| (artist.to_owned(), hours))
        .collect();
    RankedList::from_groups(groups, limit)
}

/// Top `limit` tracks by hours played, keyed by track and artist. Events
/// missing either name are ignored.
#[must_use]
pub fn top_tracks(log: &FilteredLog, limit: usize) -> RankedList<TrackKey> {
    let groups = sum_by_key(
        log.with_track()
            .map(|(track, artist, event)| ((track, artist), event.hours_played())),
    );
    let groups = groups
        .into_iter()
        .map(|((track, artist), hours)| {
            (
                TrackKey {
                    track_name: track.to_owned(),
                    artist_name: artist.to_owned(),
                },
                hours,
            )
        })
        .collect();
    RankedList::from_groups(groups, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{TimeBasis, YearSelection};
    use crate::history::{parse_timestamp, EventLog, PlayEvent};
    use crate::types::Milliseconds;

    fn play(ms: u64, artist: Option<&str>, track: Option<&str>) -> PlayEvent {
        PlayEvent::new(
            parse_timestamp("2020-06-01T12:00:00Z").unwrap(),
            Milliseconds::new(ms),
            artist.map(String::from),
            track.map(String::from),
        )
    }

    fn filtered(events: Vec<PlayEvent>) -> FilteredLog {
        let log = EventLog::from_events(events);
        let years = YearSelection::all(&log, TimeBasis::Utc);
        FilteredLog::new(&log, &years, TimeBasis::Utc)
    }

    fn assert_dense(ranks: impl Iterator<Item = usize>, expected_len: usize) {
        let ranks: Vec<usize> = ranks.collect();
        assert_eq!(ranks, (1..=expected_len).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_artist_ranking() {
        let log = filtered(vec![
            play(600_000, Some("X"), Some("a")),
            play(1_800_000, Some("X"), Some("b")),
            play(3_600_000, Some("Y"), Some("c")),
        ]);

        let ranked = top_artists(&log, 2);
        let entries = ranked.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "Y");
        assert_eq!(entries[0].rank, 1);
        assert!((entries[0].hours.get() - 1.0).abs() < 1e-4);
        assert_eq!(entries[1].key, "X");
        assert_eq!(entries[1].rank, 2);
        assert!((entries[1].hours.get() - 0.6667).abs() < 1e-4);

        let ascending: Vec<&str> = ranked.ascending().map(|e| e.key.as_str()).collect();
        assert_eq!(ascending, vec!["X", "Y"]);
    }

    #[test]
    fn test_absent_artist_is_excluded_not_placeholdered() {
        let log = filtered(vec![
            play(3_600_000, None, Some("Episode")),
            play(600_000, Some("A"), Some("Song")),
        ]);

        let ranked = top_artists(&log, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.entries()[0].key, "A");
        assert_eq!(ranked.distinct_total(), 1);
    }

    #[test]
    fn test_same_title_different_artists_not_merged() {
        let log = filtered(vec![
            play(600_000, Some("A"), Some("Home")),
            play(1_200_000, Some("B"), Some("Home")),
            play(600_000, Some("A"), Some("Home")),
            play(600_000, None, Some("Home")),
            play(600_000, Some("A"), None),
        ]);

        let ranked = top_tracks(&log, 10);
        assert_eq!(ranked.len(), 2);
        let keys: Vec<String> = ranked.descending().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["Home - A", "Home - B"]);
        assert!((ranked.entries()[0].hours.get() - ranked.entries()[1].hours.get()).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let log = filtered(vec![
            play(600_000, Some("C"), None),
            play(600_000, Some("A"), None),
            play(600_000, Some("B"), None),
            play(1_200_000, Some("D"), None),
        ]);

        let ranked = top_artists(&log, 10);
        let keys: Vec<&str> = ranked.descending().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["D", "C", "A", "B"]);
        assert_dense(ranked.descending().map(|e| e.rank), 4);
    }

    #[test]
    fn test_ranks_dense_and_totals_non_increasing() {
        let events = (0..25u64)
            .map(|i| {
                let artist = format!("artist-{}", i % 7);
                play((i % 5 + 1) * 60_000, Some(artist.as_str()), Some("t"))
            })
            .collect();
        let log = filtered(events);

        for limit in [0, 1, 3, 7, 50] {
            let ranked = top_artists(&log, limit);
            let k = limit.min(7);
            assert_eq!(ranked.len(), k);
            assert_eq!(ranked.distinct_total(), 7);
            assert_dense(ranked.descending().map(|e| e.rank), k);
            for pair in ranked.entries().windows(2) {
                assert!(pair[0].hours >= pair[1].hours);
            }
        }
    }

    #[test]
    fn test_limit_above_distinct_returns_all() {
        let log = filtered(vec![play(1, Some("A"), Some("x")), play(2, Some("B"), Some("y"))]);
        assert_eq!(top_artists(&log, 100).len(), 2);
        assert_eq!(top_tracks(&log, 100).len(), 2);
    }

    #[test]
    fn test_empty_log_gives_empty_rankings() {
        let log = FilteredLog::default();
        let artists = top_artists(&log, 10);
        assert!(artists.is_empty());
        assert_eq!(artists.max_hours(), Hours::ZERO);
        assert!(top_tracks(&log, 10).is_empty());
    }
}
