use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

/// Album groups accepted by the `include_groups` filter of `/artists/{id}/albums`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlbumGroup {
    Album,
    Single,
    AppearsOn,
    Compilation,
}

impl AlbumGroup {
    pub const ALL: [AlbumGroup; 4] = [
        AlbumGroup::Album,
        AlbumGroup::Single,
        AlbumGroup::AppearsOn,
        AlbumGroup::Compilation,
    ];

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "album" => Some(AlbumGroup::Album),
            "single" => Some(AlbumGroup::Single),
            "appears_on" => Some(AlbumGroup::AppearsOn),
            "compilation" => Some(AlbumGroup::Compilation),
            _ => None,
        }
    }
}

impl fmt::Display for AlbumGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlbumGroup::Album => "album",
            AlbumGroup::Single => "single",
            AlbumGroup::AppearsOn => "appears_on",
            AlbumGroup::Compilation => "compilation",
        };
        f.write_str(s)
    }
}

/// Ordered, deduplicated set of album groups. Displays as the comma separated
/// value the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumGroups(pub BTreeSet<AlbumGroup>);

impl AlbumGroups {
    pub fn iter(&self) -> impl Iterator<Item = AlbumGroup> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AlbumGroups {
    fn default() -> Self {
        AlbumGroups(BTreeSet::from([AlbumGroup::Album, AlbumGroup::Single]))
    }
}

impl fmt::Display for AlbumGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// Parses a comma separated list of album groups for clap.
///
/// Accepts `all`, is case-insensitive and treats `-` like `_`, so
/// `appears-on` and `appears_on` are the same group.
pub fn parse_album_groups(input: &str) -> Result<AlbumGroups, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("album groups cannot be empty".to_string());
    }

    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(AlbumGroups(AlbumGroup::ALL.into_iter().collect()));
    }

    let mut groups = BTreeSet::new();
    for segment in trimmed.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(format!("empty segment in album groups '{input}'"));
        }
        match AlbumGroup::parse(segment) {
            Some(group) => {
                groups.insert(group);
            }
            None => {
                return Err(format!(
                    "invalid value '{segment}', expected one of: album, single, appears_on, compilation, all"
                ));
            }
        }
    }

    Ok(AlbumGroups(groups))
}

/// Returns the distinct values in order of first appearance.
pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Flattens a genre list into a single CSV cell.
pub fn join_genres(genres: &[String]) -> String {
    genres.join(";")
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
