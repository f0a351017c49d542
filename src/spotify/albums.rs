use crate::{
    error::Result,
    types::{FullAlbum, Paging, SeveralAlbumsResponse, SimplifiedTrack},
};

use super::{SpotifyClient, ids_param};

impl SpotifyClient {
    /// Retrieves up to 20 full albums, including the first page of their
    /// track listings, in a single request.
    pub async fn get_several_albums(&self, ids: &[String]) -> Result<Vec<Option<FullAlbum>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/albums?ids={}", ids_param(ids));
        let res: SeveralAlbumsResponse = self.get_json(&path).await?;
        Ok(res.albums)
    }

    /// Retrieves one page of an album's track listing.
    ///
    /// Only needed for albums whose embedded track page reports a `next`
    /// link, i.e. albums with more tracks than the embedded page holds.
    pub async fn get_album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<SimplifiedTrack>> {
        let path = format!("/albums/{album_id}/tracks?offset={offset}&limit={limit}");
        self.get_json(&path).await
    }
}
