use crate::{
    config::Config,
    error::Result,
    paging::{OffsetCursor, batches, collect_pages},
    spotify::CatalogApi,
    types::{AlbumTrackRow, FullAlbum, SimplifiedTrack},
    warning,
};

/// Fetches full albums in batches and flattens them into one row per track.
///
/// Unknown album ids come back as `null` and are skipped with a warning.
/// Albums whose embedded track page is truncated get their remaining tracks
/// paged in from the album tracks endpoint.
///
/// # Arguments
///
/// * `api` - catalog to fetch from
/// * `album_ids` - album ids in the order they were collected
/// * `config` - provides `limits.albums` and `limits.track_page`
///
/// # Errors
///
/// Returns the first failed album or album tracks request.
pub async fn hydrate(
    api: &dyn CatalogApi,
    album_ids: &[String],
    config: &Config,
) -> Result<Vec<AlbumTrackRow>> {
    let mut rows = Vec::new();

    for batch in batches(album_ids, config.limits.albums) {
        let albums = api.fetch_albums(batch).await?;

        for (requested, album) in batch.iter().zip(albums) {
            let Some(album) = album else {
                warning!("Album '{}' could not be resolved, skipping", requested);
                continue;
            };

            let extra = remaining_tracks(api, &album, config).await?;
            rows.extend(flatten_album(album, extra));
        }
    }

    Ok(rows)
}

async fn remaining_tracks(
    api: &dyn CatalogApi,
    album: &FullAlbum,
    config: &Config,
) -> Result<Vec<SimplifiedTrack>> {
    let Some(page) = &album.tracks else {
        return Ok(Vec::new());
    };
    if page.next.is_none() || page.items.is_empty() {
        return Ok(Vec::new());
    }

    let cursor = OffsetCursor::starting_at(page.items.len() as u32, config.limits.track_page);
    collect_pages(cursor, |offset, limit| {
        api.album_tracks(&album.id, offset, limit)
    })
    .await
}

/// Turns an album and its tracks into track-level rows.
///
/// Album fields are repeated on every row; the album's first credited artist
/// becomes the row's artist. An album without tracks yields no rows.
pub fn flatten_album(album: FullAlbum, extra_tracks: Vec<SimplifiedTrack>) -> Vec<AlbumTrackRow> {
    let primary = album.artists.first().cloned();
    let tracks = album
        .tracks
        .map(|page| page.items)
        .unwrap_or_default()
        .into_iter()
        .chain(extra_tracks);

    tracks
        .map(|track| AlbumTrackRow {
            track_id: track.id,
            track_name: track.name,
            track_number: track.track_number,
            disc_number: track.disc_number,
            duration_ms: track.duration_ms,
            explicit: track.explicit,
            track_uri: track.uri,
            album_id: album.id.clone(),
            album_uri: album.uri.clone(),
            album_name: album.name.clone(),
            album_type: album.album_type.clone(),
            release_date: album.release_date.clone(),
            album_popularity: album.popularity,
            label: album.label.clone(),
            total_tracks: album.total_tracks,
            artist_id: primary.as_ref().map(|a| a.id.clone()),
            artist_name: primary.as_ref().and_then(|a| a.name.clone()),
        })
        .collect()
}
