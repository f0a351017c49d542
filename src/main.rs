use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotetl::{
    cli,
    config::{self, BatchLimits, Config},
    error, utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch, normalize and enrich catalog data and write the CSV files
    Run(RunOptions),

    /// Resolve artist names to catalog ids
    Resolve(ArtistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Artist to query; can be repeated. Defaults to SPOTETL_ARTISTS or the built-in list
    #[clap(long = "artist", num_args = 1)]
    pub artists: Vec<String>,

    /// Fail instead of skipping artists without a catalog match
    #[clap(long)]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    #[command(flatten)]
    pub artist: ArtistOptions,

    /// Directory the CSV files are written to
    #[clap(long, env = "SPOTETL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Album groups to include (album, single, appears_on, compilation or all)
    #[clap(long, default_value = "album,single", value_parser = utils::parse_album_groups)]
    pub groups: utils::AlbumGroups,

    /// Albums per request (max 20)
    #[clap(long, default_value_t = BatchLimits::MAX.albums)]
    pub album_batch: usize,

    /// Tracks per request (max 50)
    #[clap(long, default_value_t = BatchLimits::MAX.tracks)]
    pub track_batch: usize,

    /// Audio feature vectors per request (max 100)
    #[clap(long, default_value_t = BatchLimits::MAX.features)]
    pub feature_batch: usize,

    /// Artists per request (max 50)
    #[clap(long, default_value_t = BatchLimits::MAX.artists)]
    pub artist_batch: usize,

    /// Retries for rate-limited or bad-gateway responses
    #[clap(long, default_value_t = config::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn apply_artists(mut config: Config, opts: &ArtistOptions) -> Config {
    if !opts.artists.is_empty() {
        config = config.with_artists(opts.artists.iter().cloned());
    }
    config.strict = opts.strict;
    config
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Run(opt) => {
            let mut config = apply_artists(Config::from_env(), &opt.artist);
            if let Some(dir) = opt.output_dir {
                config.output_dir = dir;
            }
            config.album_groups = opt.groups;
            config.max_retries = opt.max_retries;
            config.limits = BatchLimits {
                albums: opt.album_batch,
                tracks: opt.track_batch,
                features: opt.feature_batch,
                artists: opt.artist_batch,
                ..BatchLimits::default()
            };
            cli::run(config).await
        }
        Command::Resolve(opt) => cli::resolve(apply_artists(Config::from_env(), &opt)).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
