use std::collections::HashSet;

use crate::{
    config::Config,
    error::{EtlError, Result},
    paging::collect_batches,
    spotify::CatalogApi,
    types::{ArtistRow, FeatureRow, TrackRow},
    utils::unique_in_order,
    warning,
};

/// Fetches audio features for the given tracks.
///
/// Requests are batched by `config.limits.features`. Tracks without a
/// feature vector are dropped and reported by the coverage check.
///
/// # Errors
///
/// Returns the first failed request, or
/// [`EtlError::IncompleteEnrichment`] in strict mode when some tracks have no
/// features.
pub async fn features(
    api: &dyn CatalogApi,
    track_ids: &[String],
    config: &Config,
) -> Result<Vec<FeatureRow>> {
    let fetched = collect_batches(track_ids, config.limits.features, |batch| {
        api.fetch_features(batch)
    })
    .await?;

    let rows = retain_requested(
        track_ids,
        fetched.into_iter().map(FeatureRow::from),
        |r: &FeatureRow| &r.track_id,
    );
    check_coverage("features", track_ids.len(), rows.len(), config.strict)?;
    Ok(rows)
}

/// Fetches canonical track records for the given tracks.
///
/// Requests are batched by `config.limits.tracks`. Coverage is handled the
/// same way as in [`features`].
pub async fn track_details(
    api: &dyn CatalogApi,
    track_ids: &[String],
    config: &Config,
) -> Result<Vec<TrackRow>> {
    let fetched = collect_batches(track_ids, config.limits.tracks, |batch| {
        api.fetch_tracks(batch)
    })
    .await?;

    let rows = retain_requested(
        track_ids,
        fetched.into_iter().map(TrackRow::from),
        |r: &TrackRow| &r.track_id,
    );
    check_coverage("tracks", track_ids.len(), rows.len(), config.strict)?;
    Ok(rows)
}

/// Fetches artist details, one row per distinct artist id.
///
/// Duplicate ids are collapsed before any request is made, so an artist
/// credited on many albums is fetched once.
///
/// # Errors
///
/// Returns the first failed request, or
/// [`EtlError::IncompleteEnrichment`] in strict mode when an artist could not
/// be resolved.
pub async fn artists(
    api: &dyn CatalogApi,
    artist_ids: &[String],
    config: &Config,
) -> Result<Vec<ArtistRow>> {
    let unique = unique_in_order(artist_ids.iter().map(String::as_str));
    let fetched = collect_batches(&unique, config.limits.artists, |batch| {
        api.fetch_artists(batch)
    })
    .await?;

    let rows = retain_requested(
        &unique,
        fetched.into_iter().map(ArtistRow::from),
        |r: &ArtistRow| &r.artist_id,
    );
    check_coverage("artists", unique.len(), rows.len(), config.strict)?;
    Ok(rows)
}

/// Keeps rows whose key was requested, at most one row per key.
///
/// Relinked or repeated entries in a response can never add rows beyond the
/// requested id set.
fn retain_requested<R, I, K>(requested: &[String], rows: I, key: K) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    K: Fn(&R) -> &String,
{
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let id = key(row);
            wanted.contains(id.as_str()) && seen.insert(id.clone())
        })
        .collect()
}

fn check_coverage(
    stage: &'static str,
    requested: usize,
    received: usize,
    strict: bool,
) -> Result<()> {
    if received == requested {
        return Ok(());
    }
    if strict {
        return Err(EtlError::IncompleteEnrichment {
            stage,
            requested,
            received,
        });
    }
    warning!(
        "{}: {} of {} ids could not be resolved and were dropped",
        stage,
        requested - received,
        requested
    );
    Ok(())
}
