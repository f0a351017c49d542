use tabled::Table;

use crate::{
    config::Config,
    error,
    pipeline::resolver,
    spotify::{SpotifyClient, auth},
    types::ArtistTableRow,
    utils, warning,
};

/// Resolves the configured artist names and prints name and id as a table.
///
/// Handy for checking what the search ranking picks before a full run.
pub async fn resolve(config: Config) {
    if let Err(e) = config.validate() {
        error!("{}", e);
    }

    if config.artists.is_empty() {
        warning!("No artists configured, nothing to resolve.");
        return;
    }

    let token = match auth::request_token(&config.credentials, &config.token_url).await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };
    let client = SpotifyClient::new(&config, token);

    let pb = utils::spinner("Resolving artists...");
    let queries = match resolver::resolve_artists(&client, &config.artists, config.strict).await {
        Ok(queries) => queries,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to resolve artists: {}", e);
        }
    };
    pb.finish_and_clear();

    let rows: Vec<ArtistTableRow> = queries
        .into_iter()
        .map(|q| ArtistTableRow {
            name: q.name,
            id: q.artist_id.unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
