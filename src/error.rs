use thiserror::Error;

/// Why a single row was dropped from a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("cell {cell} contains a NUL byte")]
    NulByte { cell: usize },
}

/// Failure acquiring rows at all. Nothing is parsed when this happens.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid capture file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no table rows found at {0}")]
    NoRows(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush failed: {0}")]
    Io(#[from] std::io::Error),
}
