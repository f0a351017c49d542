//! Batching and pagination over the catalog API.
//!
//! Both loops are driven by sizes passed in at runtime (see
//! [`crate::config::BatchLimits`]), so the endpoint limits live in
//! configuration rather than in the stages that page through them.

use std::{future::Future, slice::Chunks};

use crate::{error::Result, types::Paging};

/// Splits identifiers into request-sized batches.
///
/// The returned iterator is lazy and `Clone`, so a caller can restart the
/// sequence from the beginning. A size of zero is treated as one.
pub fn batches<T>(items: &[T], size: usize) -> Chunks<'_, T> {
    items.chunks(size.max(1))
}

/// Position inside an offset-paginated listing.
///
/// The cursor only knows the next `(offset, limit)` window; the caller
/// fetches that window and feeds the page back with [`OffsetCursor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor {
    offset: u32,
    limit: u32,
    done: bool,
}

impl OffsetCursor {
    /// Starts a listing at offset zero with pages of `limit` items.
    pub fn new(limit: u32) -> Self {
        Self::starting_at(0, limit)
    }

    /// Starts a listing at `offset`, for listings whose first page was
    /// already delivered elsewhere. A limit of zero is treated as one.
    pub fn starting_at(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.max(1),
            done: false,
        }
    }

    /// The next window to request, or `None` once the listing is exhausted.
    pub fn window(&self) -> Option<(u32, u32)> {
        (!self.done).then_some((self.offset, self.limit))
    }

    /// Moves past `page`. An empty page or a page without `next` ends the listing.
    pub fn advance<T>(&mut self, page: &Paging<T>) {
        self.offset = self.offset.saturating_add(page.items.len() as u32);
        if page.next.is_none() || page.items.is_empty() {
            self.done = true;
        }
    }

    /// Rewinds to offset zero so the listing can be fetched again.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.done = false;
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Fetches every page starting at `cursor` and concatenates the items.
///
/// # Arguments
///
/// * `cursor` - where the listing starts and how large pages are
/// * `fetch` - issues the request for one `(offset, limit)` window
///
/// # Errors
///
/// Stops at the first failing page and returns its error; items of earlier
/// pages are discarded.
///
/// # Example
///
/// ```
/// let albums = collect_pages(OffsetCursor::new(50), |offset, limit| {
///     api.artist_albums(artist_id, &groups, offset, limit)
/// })
/// .await?;
/// ```
pub async fn collect_pages<T, F, Fut>(mut cursor: OffsetCursor, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Paging<T>>>,
{
    let mut items = Vec::new();
    while let Some((offset, limit)) = cursor.window() {
        let page = fetch(offset, limit).await?;
        cursor.advance(&page);
        items.extend(page.items);
    }
    Ok(items)
}

/// Issues one request per batch and concatenates the resolved entries.
///
/// Batch endpoints answer with `null` for identifiers they cannot resolve;
/// those entries are dropped here.
///
/// # Arguments
///
/// * `ids` - identifiers in request order
/// * `size` - identifiers per request, see [`batches`]
/// * `fetch` - issues the request for one batch
///
/// # Errors
///
/// Returns the error of the first failing batch.
pub async fn collect_batches<'a, T, F, Fut>(
    ids: &'a [String],
    size: usize,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(&'a [String]) -> Fut,
    Fut: Future<Output = Result<Vec<Option<T>>>>,
{
    let mut items = Vec::with_capacity(ids.len());
    for batch in batches(ids, size) {
        let resolved = fetch(batch).await?;
        items.extend(resolved.into_iter().flatten());
    }
    Ok(items)
}
