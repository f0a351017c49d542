use tabled::Table;

use crate::{
    config::Config,
    error::Result,
    error, info,
    management::CsvSink,
    pipeline::{Pipeline, Stage, Tables},
    spotify::{SpotifyClient, auth},
    success,
    types::OutputTableRow,
    utils, warning,
};

/// Runs the whole pipeline and writes the four CSV files.
///
/// Fetches a token, resolves the configured artists, hydrates their albums,
/// removes duplicate tracks, enriches them with features, track details and
/// artist details, and finally writes `albums.csv`, `features.csv`,
/// `tracks.csv` and `artists.csv` into the output directory.
///
/// Any failure is fatal: the error is printed and the process exits with a
/// non-zero status. Files written before the failure stay on disk.
pub async fn run(config: Config) {
    if let Err(e) = config.validate() {
        error!("{}", e);
    }

    info!(
        "Collecting catalog data for {} artist(s) into {}",
        config.artists.len(),
        config.output_dir.display()
    );

    let pb = utils::spinner("Starting...");
    let tables = match collect_tables(&config, |stage| pb.set_message(stage.to_string())).await {
        Ok(tables) => tables,
        Err(e) => {
            pb.finish_and_clear();
            error!("Pipeline failed: {}", e);
        }
    };
    pb.finish_and_clear();

    let sink = CsvSink::new(&config.output_dir);
    let written = match sink.persist(&tables).await {
        Ok(written) => written,
        Err(e) => error!("{}", e),
    };

    let rows: Vec<OutputTableRow> = written
        .into_iter()
        .map(|w| OutputTableRow {
            file: w.path.display().to_string(),
            rows: w.rows,
        })
        .collect();

    println!("{}", Table::new(rows));
    success!(
        "Pipeline finished, files written to {}",
        sink.output_dir().display()
    );
}

/// Fetches a token and runs every pipeline stage against the live catalog.
///
/// With an empty artist list there is nothing to look up: no token is
/// requested, no catalog call is made and empty tables are returned, so the
/// caller still writes header-only files.
///
/// # Arguments
///
/// * `config` - validated run configuration
/// * `report` - called with each [`Stage`] as it starts
///
/// # Errors
///
/// Returns [`EtlError::Auth`](crate::error::EtlError::Auth) when the token
/// exchange fails, or the first error of any pipeline stage.
pub async fn collect_tables<F>(config: &Config, report: F) -> Result<Tables>
where
    F: FnMut(Stage),
{
    if config.artists.is_empty() {
        warning!("No artists configured, writing empty tables.");
        return Ok(Tables::default());
    }

    let token = auth::request_token(&config.credentials, &config.token_url).await?;
    let client = SpotifyClient::new(config, token);
    Pipeline::new(&client, config).run_with(report).await
}
