//! Display utilities for formatting statistics output.
//!
//! This module provides the terminal rendering used by the CLI for the
//! aggregates computed in [`crate::analytics`].
//!
//! # Functions
//!
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`shade`] - Map a heatmap cell to a shading character
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_overview`] / [`display_top_artists`] / etc. - Display formatted stats

use crate::analytics::{Heatmap, Overview, RankedEntry, RankedList, TrackKey, HOURS_PER_DAY};
use crate::filter::FilteredLog;
use crate::history::LoadWarning;

/// Shading ramp for heatmap cells, empty to full.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Order in which ranked lists are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Largest total first
    #[default]
    Descending,
    /// Smallest total first
    Ascending,
}

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Counts characters rather than bytes. For `max_len < 3`, truncates
/// without ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use streaming_stats::display::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("hello", 2), "he");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        // No room for ellipsis, just truncate
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Create a visual bar for displaying relative values.
///
/// # Arguments
///
/// * `value` - The value to represent (negative values treated as 0)
/// * `max_value` - The maximum value (determines 100% width)
/// * `width` - The total width of the bar in characters
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn make_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }
    let ratio = (value / max_value).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Shading character for a heatmap cell relative to the busiest cell.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn shade(value: f64, max_value: f64) -> char {
    if max_value <= 0.0 || value <= 0.0 {
        return SHADES[0];
    }
    let steps = (SHADES.len() - 1) as f64;
    let level = ((value / max_value).clamp(0.0, 1.0) * steps).ceil() as usize;
    SHADES[level.clamp(1, SHADES.len() - 1)]
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

/// Display per-file and per-record load warnings.
pub fn display_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        println!("  ! {warning}");
    }
}

/// Display overview statistics.
pub fn display_overview(overview: &Overview) {
    println!("  Total plays:      {:>10}", overview.total_plays);
    println!("  Listening time:   {:>10.1} hours", overview.total_hours.get());
    println!("  Unique artists:   {:>10}", overview.unique_artists);
}

fn ordered<K>(list: &RankedList<K>, order: ListOrder) -> Vec<&RankedEntry<K>> {
    match order {
        ListOrder::Descending => list.descending().collect(),
        ListOrder::Ascending => list.ascending().collect(),
    }
}

/// Display top artists list.
pub fn display_top_artists(artists: &RankedList<String>, order: ListOrder, show_bar: bool) {
    let max_hours = artists.max_hours().get();

    for entry in ordered(artists, order) {
        let hours = entry.hours.get();
        if show_bar {
            println!(
                "  {:2}. {:<30} {} {:>8.2}h",
                entry.rank,
                truncate(&entry.key, 30),
                make_bar(hours, max_hours, 20),
                hours
            );
        } else {
            println!(
                "  {:2}. {:<30} {:>8.2}h",
                entry.rank,
                truncate(&entry.key, 30),
                hours
            );
        }
    }
}

/// Display top tracks list.
pub fn display_top_tracks(tracks: &RankedList<TrackKey>, order: ListOrder, show_bar: bool) {
    let max_hours = tracks.max_hours().get();

    for entry in ordered(tracks, order) {
        let hours = entry.hours.get();
        if show_bar {
            println!(
                "  {:2}. {:<25} - {:<15} {} {:>7.2}h",
                entry.rank,
                truncate(&entry.key.track_name, 25),
                truncate(&entry.key.artist_name, 15),
                make_bar(hours, max_hours, 15),
                hours
            );
        } else {
            println!(
                "  {:2}. {:<25} - {:<15} {:>7.2}h",
                entry.rank,
                truncate(&entry.key.track_name, 25),
                truncate(&entry.key.artist_name, 15),
                hours
            );
        }
    }
}

fn shaded_cells(values: &[f64], max: f64) -> String {
    values
        .iter()
        .flat_map(|&v| {
            let c = shade(v, max);
            [c, c]
        })
        .collect()
}

/// Render the heatmap as a shaded grid, one row per weekday, followed by
/// an all-days row shaded by hour totals.
#[must_use]
pub fn render_heatmap(heatmap: &Heatmap) -> Vec<String> {
    let max = heatmap.max_cell();
    let mut lines = Vec::with_capacity(9);

    let header: String = (0..HOURS_PER_DAY)
        .map(|h| if h % 6 == 0 { format!("{h:<2}") } else { "  ".to_string() })
        .collect();
    lines.push(format!("  {:<10}{}", "", header.trim_end()));

    let day_totals = heatmap.day_totals();
    for (day, row) in heatmap.rows() {
        lines.push(format!(
            "  {:<10}{} {:>7.1}h",
            day.label(),
            shaded_cells(row, max),
            day_totals[day.index()]
        ));
    }

    let hour_totals = heatmap.hour_totals();
    let hour_max = hour_totals.iter().copied().fold(0.0, f64::max);
    lines.push(format!(
        "  {:<10}{} {:>7.1}h",
        "All days",
        shaded_cells(&hour_totals, hour_max),
        heatmap.total().get()
    ));

    lines
}

/// Display the heatmap and its busiest hour.
pub fn display_heatmap(heatmap: &Heatmap) {
    for line in render_heatmap(heatmap) {
        println!("{line}");
    }
    if let Some(peak) = heatmap.peak() {
        println!(
            "\n  Peak: {} {:02}:00 ({:.1}h)",
            peak.day,
            peak.hour,
            peak.hours.get()
        );
    }
}

/// Display the debug summary of a selection.
pub fn display_debug_info(overview: &Overview, filtered: &FilteredLog) {
    println!(
        "  Total unique artists in full dataset: {}",
        overview.unique_artists_overall
    );
    println!("  Filtered dataset contains {} plays", filtered.len());
    println!("  Sample of filtered data:");
    for event in filtered.iter().take(3) {
        println!(
            "    {}  {:<25} {:<20} {}",
            event.event.timestamp.format("%Y-%m-%d %H:%M"),
            truncate(event.event.track_name.as_deref().unwrap_or("-"), 25),
            truncate(event.event.artist_name.as_deref().unwrap_or("-"), 20),
            event.event.duration
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::heatmap;
    use crate::filter::{TimeBasis, YearSelection};
    use crate::history::{parse_timestamp, EventLog, PlayEvent};
    use crate::types::Milliseconds;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("日本語テスト", 5), "日本...");
    }

    #[test]
    fn test_truncate_small_max_len() {
        // max_len < 3 means no room for ellipsis
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("hello", 0), "");
    }

    #[test]
    fn test_make_bar_full() {
        assert_eq!(make_bar(1.5, 1.5, 10), "██████████");
    }

    #[test]
    fn test_make_bar_half() {
        assert_eq!(make_bar(0.5, 1.0, 10), "█████░░░░░");
    }

    #[test]
    fn test_make_bar_zero_max() {
        assert_eq!(make_bar(0.5, 0.0, 10), "          ");
    }

    #[test]
    fn test_shade_levels() {
        assert_eq!(shade(0.0, 1.0), ' ');
        assert_eq!(shade(0.01, 1.0), '░');
        assert_eq!(shade(0.6, 1.0), '▓');
        assert_eq!(shade(1.0, 1.0), '█');
        assert_eq!(shade(1.0, 0.0), ' ');
    }

    #[test]
    fn test_render_heatmap_has_day_rows_and_totals() {
        let log = EventLog::from_events(vec![PlayEvent::new(
            parse_timestamp("2021-03-01T08:00:00Z").unwrap(),
            Milliseconds::new(3_600_000),
            None,
            None,
        )]);
        let years = YearSelection::all(&log, TimeBasis::Utc);
        let filtered = FilteredLog::new(&log, &years, TimeBasis::Utc);
        let lines = render_heatmap(&heatmap(&filtered));

        assert_eq!(lines.len(), 9);
        assert!(lines[1].trim_start().starts_with("Monday"));
        assert!(lines[7].trim_start().starts_with("Sunday"));
        assert!(lines[1].contains('█'));
        assert!(lines[1].ends_with("1.0h"));
        assert!(!lines[2].contains('█'));
        assert!(lines[8].trim_start().starts_with("All days"));
        assert!(lines[8].contains('█'));
        assert!(lines[8].ends_with("1.0h"));
    }
}
