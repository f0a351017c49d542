use crate::{
    config::Config,
    error::{EtlError, Result},
    paging::{OffsetCursor, collect_pages},
    spotify::CatalogApi,
    types::ArtistQuery,
    warning,
};

/// Resolves one artist name to the id of its top search match.
///
/// A name without any match is not an error here; the returned
/// [`ArtistQuery`] simply carries no id.
///
/// # Errors
///
/// Propagates [`EtlError::RemoteFetch`] from the search request.
pub async fn resolve_artist(api: &dyn CatalogApi, name: &str) -> Result<ArtistQuery> {
    let artist_id = api.resolve_artist(name).await?.map(|artist| artist.id);
    Ok(ArtistQuery {
        name: name.to_string(),
        artist_id,
    })
}

/// Resolves every name in order.
///
/// A name without a match is kept with `artist_id: None` and a warning is
/// printed. With `strict` set it fails with [`EtlError::UnresolvedArtist`]
/// instead.
///
/// # Arguments
///
/// * `api` - catalog to search
/// * `names` - artist names in query order
/// * `strict` - fail on the first unmatched name instead of skipping it
///
/// # Errors
///
/// Returns [`EtlError::UnresolvedArtist`] in strict mode, or the first failed
/// search request.
pub async fn resolve_artists(
    api: &dyn CatalogApi,
    names: &[String],
    strict: bool,
) -> Result<Vec<ArtistQuery>> {
    let mut queries = Vec::with_capacity(names.len());
    for name in names {
        let query = resolve_artist(api, name).await?;
        if query.artist_id.is_none() {
            if strict {
                return Err(EtlError::UnresolvedArtist(name.clone()));
            }
            warning!("No catalog match for artist '{}', skipping", name);
        }
        queries.push(query);
    }
    Ok(queries)
}

/// Pages through an artist's albums until the listing is exhausted.
///
/// Only albums in `config.album_groups` are listed; the page size is
/// `config.limits.album_page`.
///
/// # Errors
///
/// Returns the error of the first failing page.
pub async fn album_ids_for_artist(
    api: &dyn CatalogApi,
    artist_id: &str,
    config: &Config,
) -> Result<Vec<String>> {
    let groups = &config.album_groups;
    let albums = collect_pages(OffsetCursor::new(config.limits.album_page), |offset, limit| {
        api.artist_albums(artist_id, groups, offset, limit)
    })
    .await?;

    Ok(albums.into_iter().map(|album| album.id).collect())
}

/// Collects album ids for every resolved artist, in artist order.
///
/// Albums credited to several of the queried artists appear once per artist;
/// deduplication happens later, on track ids.
pub async fn collect_album_ids(
    api: &dyn CatalogApi,
    artists: &[ArtistQuery],
    config: &Config,
) -> Result<Vec<String>> {
    let mut album_ids = Vec::new();
    for artist_id in artists.iter().filter_map(|a| a.artist_id.as_deref()) {
        album_ids.extend(album_ids_for_artist(api, artist_id, config).await?);
    }
    Ok(album_ids)
}
