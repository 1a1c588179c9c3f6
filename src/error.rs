use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the indexing core and its I/O collaborators.
///
/// Normalization never fails: tokens that cannot be handled are dropped.
/// Everything here comes from resource loading, ingestion validation,
/// markup parsing or HTTP retrieval.
#[derive(Debug, Error)]
pub enum Error {
    /// The stopword resource root could not be enumerated at all.
    #[error("failed to enumerate stopword resources at {}: {source}", path.display())]
    StopwordRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document id must not be empty")]
    EmptyDocumentId,

    #[error("failed to parse markup: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response status: {0}")]
    Status(reqwest::StatusCode),

    /// Streaming bodies cannot be replayed, so they cannot be retried.
    #[error("request cannot be cloned for retry")]
    RequestNotCloneable,

    #[error("request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
