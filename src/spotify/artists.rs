use crate::{
    error::Result,
    types::{
        AlbumRef, ArtistRef, FullArtist, Paging, SearchArtistsResponse, SeveralArtistsResponse,
    },
    utils::AlbumGroups,
};

use super::{SpotifyClient, ids_param};

impl SpotifyClient {
    /// Searches artists by name and returns the top-ranked match.
    ///
    /// Ranking is left entirely to the API; there is no local disambiguation
    /// between artists with similar names.
    pub async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>> {
        let path = format!(
            "/search?q={query}&type=artist&limit=1",
            query = urlencoding::encode(name)
        );
        let res: SearchArtistsResponse = self.get_json(&path).await?;
        Ok(res.artists.items.into_iter().next())
    }

    /// Retrieves one page of an artist's discography.
    ///
    /// # Arguments
    ///
    /// * `artist_id` - catalog id of the artist
    /// * `groups` - album groups passed as `include_groups`
    /// * `offset` - index of the first album to return
    /// * `limit` - page size (1-50)
    pub async fn get_artist_albums(
        &self,
        artist_id: &str,
        groups: &AlbumGroups,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<AlbumRef>> {
        let path = format!(
            "/artists/{id}/albums?include_groups={include_groups}&offset={offset}&limit={limit}",
            id = artist_id,
            include_groups = groups,
        );
        self.get_json(&path).await
    }

    /// Retrieves up to 50 artists in a single request.
    pub async fn get_several_artists(&self, ids: &[String]) -> Result<Vec<Option<FullArtist>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/artists?ids={}", ids_param(ids));
        let res: SeveralArtistsResponse = self.get_json(&path).await?;
        Ok(res.artists)
    }
}
