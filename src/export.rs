//! CSV export of ranked tracks.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::analytics::{RankedList, TrackKey};
use crate::error::{Error, Result};

/// Header row of the ranked-track export.
pub const TRACK_HEADER: [&str; 4] = ["rank", "track_name", "artist_name", "hours_played"];

/// Write ranked tracks as CSV, best first, hours to two decimals.
pub fn write_ranked_tracks<W: Write>(writer: W, tracks: &RankedList<TrackKey>) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TRACK_HEADER)?;

    for entry in tracks.descending() {
        csv.write_record([
            entry.rank.to_string(),
            entry.key.track_name.clone(),
            entry.key.artist_name.clone(),
            format!("{:.2}", entry.hours.get()),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Render ranked tracks as CSV text.
pub fn ranked_tracks_to_string(tracks: &RankedList<TrackKey>) -> Result<String> {
    let mut buffer = Vec::new();
    write_ranked_tracks(&mut buffer, tracks)?;
    String::from_utf8(buffer).map_err(|e| Error::other(e.to_string()))
}

/// Write ranked tracks to a CSV file, creating parent directories.
pub fn export_ranked_tracks(path: &Path, tracks: &RankedList<TrackKey>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_ranked_tracks(file, tracks)?;
    info!("Exported {} tracks to {}", tracks.len(), path.display());
    Ok(())
}
