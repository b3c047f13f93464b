//! Day-of-week by hour-of-day listening matrix.

use crate::filter::{DayOfWeek, FilteredLog};
use crate::types::Hours;

/// Hours in a day; one column each.
pub const HOURS_PER_DAY: usize = 24;

/// Days in a week; one row each, Monday first.
pub const DAYS_PER_WEEK: usize = 7;

/// Hours played per weekday and hour, every cell present.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    cells: [[f64; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

/// The busiest cell of a heatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapPeak {
    pub day: DayOfWeek,
    pub hour: usize,
    pub hours: Hours,
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            cells: [[0.0; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }
}

impl Heatmap {
    /// Sum hours played into their (weekday, hour) cell.
    #[must_use]
    pub fn from_log(log: &FilteredLog) -> Self {
        let mut heatmap = Self::default();
        for event in log {
            let hour = event.hour_of_day as usize;
            heatmap.cells[event.day_of_week.index()][hour] += event.hours_played().get();
        }
        heatmap
    }

    /// Value of one cell. Hours past 23 read as zero.
    #[must_use]
    pub fn cell(&self, day: DayOfWeek, hour: usize) -> Hours {
        Hours(self.cells[day.index()].get(hour).copied().unwrap_or(0.0))
    }

    /// One day's 24 hourly values.
    #[must_use]
    pub const fn row(&self, day: DayOfWeek) -> &[f64; HOURS_PER_DAY] {
        &self.cells[day.index()]
    }

    /// All rows, Monday to Sunday.
    pub fn rows(&self) -> impl Iterator<Item = (DayOfWeek, &[f64; HOURS_PER_DAY])> {
        DayOfWeek::ALL.into_iter().map(|day| (day, self.row(day)))
    }

    /// Sum over every cell.
    #[must_use]
    pub fn total(&self) -> Hours {
        Hours(self.cells.iter().flatten().sum())
    }

    /// Largest single cell value.
    #[must_use]
    pub fn max_cell(&self) -> f64 {
        self.cells.iter().flatten().copied().fold(0.0, f64::max)
    }

    /// The largest cell, first in row-major order on ties. `None` when the
    /// matrix is all zero.
    #[must_use]
    pub fn peak(&self) -> Option<HeatmapPeak> {
        let mut peak: Option<HeatmapPeak> = None;
        for (day, row) in self.rows() {
            for (hour, &value) in row.iter().enumerate() {
                if value > peak.map_or(0.0, |p| p.hours.get()) {
                    peak = Some(HeatmapPeak {
                        day,
                        hour,
                        hours: Hours(value),
                    });
                }
            }
        }
        peak
    }

    /// Column sums: total hours per hour of day across the week.
    #[must_use]
    pub fn hour_totals(&self) -> [f64; HOURS_PER_DAY] {
        let mut totals = [0.0; HOURS_PER_DAY];
        for row in &self.cells {
            for (total, value) in totals.iter_mut().zip(row) {
                *total += value;
            }
        }
        totals
    }

    /// Row sums: total hours per weekday, Monday first.
    #[must_use]
    pub fn day_totals(&self) -> [f64; DAYS_PER_WEEK] {
        let mut totals = [0.0; DAYS_PER_WEEK];
        for (total, row) in totals.iter_mut().zip(&self.cells) {
            *total = row.iter().sum();
        }
        totals
    }
}

/// Build the heatmap for a filtered log.
///
/// Every event counts, including those without artist or track names.
#[must_use]
pub fn heatmap(log: &FilteredLog) -> Heatmap {
    Heatmap::from_log(log)
}
