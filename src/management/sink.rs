use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    error::{EtlError, Result},
    pipeline::Tables,
    types::{ArtistRow, FeatureRow, NormalizedRow, TrackRow},
};

pub const ALBUMS_FILE: &str = "albums.csv";
pub const FEATURES_FILE: &str = "features.csv";
pub const TRACKS_FILE: &str = "tracks.csv";
pub const ARTISTS_FILE: &str = "artists.csv";

/// A row type that can be written as a CSV record.
///
/// `HEADERS` lists the column names in field order. It is written explicitly
/// so a table without rows still gets its header line.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRow for NormalizedRow {
    const HEADERS: &'static [&'static str] = &[
        "track_id",
        "track_name",
        "duration_ms",
        "explicit",
        "album_id",
        "album_name",
        "release_date",
        "album_popularity",
        "label",
        "artist_id",
    ];
}

impl CsvRow for FeatureRow {
    const HEADERS: &'static [&'static str] = &[
        "track_id",
        "danceability",
        "energy",
        "key",
        "loudness",
        "mode",
        "speechiness",
        "acousticness",
        "instrumentalness",
        "liveness",
        "valence",
        "tempo",
        "duration_ms",
        "time_signature",
    ];
}

impl CsvRow for TrackRow {
    const HEADERS: &'static [&'static str] = &[
        "track_id",
        "track_name",
        "track_popularity",
        "explicit",
        "duration_ms",
    ];
}

impl CsvRow for ArtistRow {
    const HEADERS: &'static [&'static str] = &[
        "artist_id",
        "artist_name",
        "artist_genres",
        "artist_popularity",
        "followers",
    ];
}

/// A file written by [`CsvSink::persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes output tables into one directory.
///
/// Files are replaced on every write, never appended to. The four files of a
/// run are written one after the other, so a failure part-way leaves the
/// earlier files of the same run on disk.
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    /// Creates a sink for `output_dir`. The directory is created lazily on the
    /// first write.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory the tables are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes all four tables under their fixed file names.
    ///
    /// Returns the written files in the order albums, features, tracks,
    /// artists.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Sink`] if the directory or a file cannot be written,
    /// or [`EtlError::Csv`] if a row cannot be encoded. Files written before
    /// the failure are left in place.
    pub async fn persist(&self, tables: &Tables) -> Result<Vec<WrittenTable>> {
        Ok(vec![
            self.write_table(ALBUMS_FILE, &tables.albums).await?,
            self.write_table(FEATURES_FILE, &tables.features).await?,
            self.write_table(TRACKS_FILE, &tables.tracks).await?,
            self.write_table(ARTISTS_FILE, &tables.artists).await?,
        ])
    }

    /// Writes `rows` to `file_name` inside the output directory, creating the
    /// directory if needed and overwriting any existing file.
    pub async fn write_table<R: CsvRow>(
        &self,
        file_name: &str,
        rows: &[R],
    ) -> Result<WrittenTable> {
        async_fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| EtlError::Sink {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(file_name);
        let bytes = encode(rows)?;
        async_fs::write(&path, bytes)
            .await
            .map_err(|source| EtlError::Sink {
                path: path.clone(),
                source,
            })?;

        Ok(WrittenTable {
            path,
            rows: rows.len(),
        })
    }
}

/// Encodes rows as UTF-8 CSV with a header line and no index column.
pub fn encode<R: CsvRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::Csv(csv::Error::from(e.into_error())))
}
