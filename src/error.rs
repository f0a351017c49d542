use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the pipeline stages.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The client-credentials exchange could not produce a token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A catalog request failed at the transport, status or decoding level.
    #[error("request to {endpoint} failed{}: {message}", fmt_status(.status))]
    RemoteFetch {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// An artist name had no search result and strict mode is enabled.
    #[error("no catalog match for artist '{0}'")]
    UnresolvedArtist(String),

    /// An enrichment stage returned fewer rows than requested ids in strict mode.
    #[error("{stage}: requested {requested} ids but only {received} resolved")]
    IncompleteEnrichment {
        stage: &'static str,
        requested: usize,
        received: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
}

impl EtlError {
    pub fn remote(endpoint: impl Into<String>, status: Option<u16>, message: impl ToString) -> Self {
        EtlError::RemoteFetch {
            endpoint: endpoint.into(),
            status,
            message: message.to_string(),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {s}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EtlError>;
