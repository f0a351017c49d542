use crate::{
    error::Result,
    types::{AudioFeatures, AudioFeaturesResponse, FullTrack, SeveralTracksResponse},
};

use super::{SpotifyClient, ids_param};

impl SpotifyClient {
    /// Retrieves up to 50 tracks in a single request.
    pub async fn get_several_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/tracks?ids={}", ids_param(ids));
        let res: SeveralTracksResponse = self.get_json(&path).await?;
        Ok(res.tracks)
    }

    /// Retrieves audio features for up to 100 tracks in a single request.
    pub async fn get_audio_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeatures>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/audio-features?ids={}", ids_param(ids));
        let res: AudioFeaturesResponse = self.get_json(&path).await?;
        Ok(res.audio_features)
    }
}
