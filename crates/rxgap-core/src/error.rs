//! Error types for RxGap

use thiserror::Error;

/// Result type alias using RxGap's Error
pub type Result<T> = std::result::Result<T, Error>;

/// RxGap error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Ontology errors
    #[error("Failed to read ontology from '{path}': {source}")]
    OntologyRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download ontology from '{0}' (HTTP {1})")]
    OntologyDownload(String, u16),

    #[error("Ontology parse error: {0}")]
    OntologyParse(String),

    // Network errors
    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("RxNav {endpoint} request returned HTTP {status}")]
    Api { endpoint: &'static str, status: u16 },

    // Report errors
    #[error("'{0}' is not a numeric RxCUI")]
    InvalidRxcui(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
