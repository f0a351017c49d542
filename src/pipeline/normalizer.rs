use std::collections::HashSet;

use crate::types::{AlbumTrackRow, NormalizedRow};

/// Deduplicates hydrated rows by track id and reduces them to the
/// [`NormalizedRow`] columns.
///
/// The first occurrence of a track id wins and output order follows first
/// occurrences. Rows without a track id cannot be joined downstream and are
/// dropped.
pub fn normalize(rows: &[AlbumTrackRow]) -> Vec<NormalizedRow> {
    let projected = rows.iter().filter_map(|row| {
        let track_id = row.track_id.clone()?;
        Some(NormalizedRow {
            track_id,
            track_name: row.track_name.clone(),
            duration_ms: row.duration_ms,
            explicit: row.explicit,
            album_id: row.album_id.clone(),
            album_name: row.album_name.clone(),
            release_date: row.release_date.clone(),
            album_popularity: row.album_popularity,
            label: row.label.clone(),
            artist_id: row.artist_id.clone(),
        })
    });

    dedup_by_track_id(projected)
}

/// Keeps the first row per track id. Applying it to its own output is a no-op.
pub fn dedup_by_track_id<I>(rows: I) -> Vec<NormalizedRow>
where
    I: IntoIterator<Item = NormalizedRow>,
{
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.track_id.clone()))
        .collect()
}

/// Track ids of normalized rows, in row order. Already distinct after
/// [`normalize`].
pub fn track_ids(rows: &[NormalizedRow]) -> Vec<String> {
    rows.iter().map(|row| row.track_id.clone()).collect()
}

/// Distinct artist ids referenced by the rows, in order of first appearance.
pub fn artist_ids(rows: &[NormalizedRow]) -> Vec<String> {
    crate::utils::unique_in_order(rows.iter().filter_map(|row| row.artist_id.as_deref()))
}
