//! Spotify catalog ETL library
//!
//! This library pulls album, track, audio-feature and artist metadata for a
//! list of artists from the Spotify Web API, flattens the responses into
//! rows, deduplicates them and writes the resulting tables as CSV files.
//!
//! # Modules
//!
//! - `cli` - Command-line operations wired to the pipeline
//! - `config` - Configuration, environment variables and batch limits
//! - `error` - Error taxonomy shared by every stage
//! - `management` - CSV sink for the output tables
//! - `paging` - Batching and offset pagination helpers
//! - `pipeline` - Resolver, hydrator, normalizer and enrichers
//! - `spotify` - Spotify Web API client behind the `CatalogApi` trait
//! - `types` - API payloads and output row types
//! - `utils` - Album group parsing and small helpers
//!
//! # Example
//!
//! ```
//! use spotetl::{config, pipeline::Pipeline, spotify};
//!
//! #[tokio::main]
//! async fn main() -> spotetl::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env();
//!     let token = spotify::auth::request_token(&config.credentials, &config.token_url).await?;
//!     let client = spotify::SpotifyClient::new(&config, token);
//!     let tables = Pipeline::new(&client, &config).run().await?;
//!     println!("{} tracks", tables.albums.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod paging;
pub mod pipeline;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for top-level operations that may fail.
///
/// Library stages return [`error::Result`] with a typed [`error::EtlError`];
/// this boxed alias is for glue code that mixes error sources, such as the
/// binary entry point and the `.env` loader.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving {} artists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Wrote {} files", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only used
/// from the CLI layer for fatal failures such as a rejected token exchange or
/// a failed catalog request.
///
/// # Example
///
/// ```
/// error!("Failed to fetch albums: {}", err);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, for example an artist name without a catalog
/// match or an enrichment batch that came back short.
///
/// # Example
///
/// ```
/// warning!("No catalog match for artist '{}'", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
