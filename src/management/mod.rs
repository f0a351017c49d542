mod sink;

pub use sink::{
    ALBUMS_FILE, ARTISTS_FILE, CsvRow, CsvSink, FEATURES_FILE, TRACKS_FILE, WrittenTable, encode,
};
