//! Year selection over the event log.
//!
//! A [`FilteredLog`] is an owned, year-restricted copy of the event log
//! with the calendar fields the heatmap needs attached to every event. It
//! is rebuilt for every selection and never points back into the log.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, Local, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::history::{EventLog, PlayEvent};
use crate::types::Hours;

/// Clock used to derive calendar fields from UTC timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    /// Use timestamps as exported
    #[default]
    Utc,
    /// Convert to the system time zone first
    Local,
}

impl TimeBasis {
    /// Calendar year, hour of day and weekday of a timestamp.
    #[must_use]
    pub fn calendar(self, ts: DateTime<Utc>) -> (i32, u32, Weekday) {
        match self {
            Self::Utc => (ts.year(), ts.hour(), ts.weekday()),
            Self::Local => {
                let local = ts.with_timezone(&Local);
                (local.year(), local.hour(), local.weekday())
            }
        }
    }

    /// Calendar year of a timestamp.
    #[must_use]
    pub fn year(self, ts: DateTime<Utc>) -> i32 {
        self.calendar(ts).0
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in display order.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Row index, Monday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of calendar years to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearSelection {
    years: BTreeSet<i32>,
}

impl YearSelection {
    /// Select nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Select every year present in the log.
    #[must_use]
    pub fn all(log: &EventLog, basis: TimeBasis) -> Self {
        log.years(basis).into_iter().collect()
    }

    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl FromIterator<i32> for YearSelection {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self {
            years: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years.is_empty() {
            return f.write_str("no years");
        }
        let years: Vec<String> = self.years.iter().map(ToString::to_string).collect();
        f.write_str(&years.join(", "))
    }
}

/// A play event with its calendar fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredEvent {
    pub event: PlayEvent,
    pub year: i32,
    pub hour_of_day: u32,
    pub day_of_week: DayOfWeek,
}

impl FilteredEvent {
    #[must_use]
    pub const fn hours_played(&self) -> Hours {
        self.event.hours_played()
    }
}

/// The year-restricted view handed to the aggregations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredLog {
    events: Vec<FilteredEvent>,
}

impl FilteredLog {
    /// Keep events whose year is selected, in log order.
    #[must_use]
    pub fn new(log: &EventLog, years: &YearSelection, basis: TimeBasis) -> Self {
        if years.is_empty() {
            return Self::default();
        }

        let events = log
            .iter()
            .filter_map(|event| {
                let (year, hour_of_day, weekday) = basis.calendar(event.timestamp);
                years.contains(year).then(|| FilteredEvent {
                    event: event.clone(),
                    year,
                    hour_of_day,
                    day_of_week: weekday.into(),
                })
            })
            .collect();

        Self { events }
    }

    /// Apply a further year selection to an already filtered log.
    #[must_use]
    pub fn refilter(&self, years: &YearSelection) -> Self {
        Self {
            events: self
                .events
                .iter()
                .filter(|event| years.contains(event.year))
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilteredEvent> {
        self.events.iter()
    }

    /// Events that carry an artist name.
    pub fn with_artist(&self) -> impl Iterator<Item = (&str, &FilteredEvent)> {
        self.events
            .iter()
            .filter_map(|e| e.event.artist_name.as_deref().map(|artist| (artist, e)))
    }

    /// Events that carry both a track and an artist name.
    pub fn with_track(&self) -> impl Iterator<Item = (&str, &str, &FilteredEvent)> {
        self.events.iter().filter_map(|e| {
            match (e.event.track_name.as_deref(), e.event.artist_name.as_deref()) {
                (Some(track), Some(artist)) => Some((track, artist, e)),
                _ => None,
            }
        })
    }

    /// Sum of hours played over every event in the selection.
    #[must_use]
    pub fn total_hours(&self) -> Hours {
        self.events.iter().map(FilteredEvent::hours_played).sum()
    }

    /// Number of distinct artists in the selection.
    #[must_use]
    pub fn distinct_artists(&self) -> usize {
        self.with_artist()
            .map(|(artist, _)| artist)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a FilteredLog {
    type Item = &'a FilteredEvent;
    type IntoIter = std::slice::Iter<'a, FilteredEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
