use thiserror::Error;

/// Failures that abort a load. Row-level problems are never errors; they
/// surface as [`crate::RowDiagnostic`]s instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("job data is empty")]
    EmptyInput,

    #[error("no valid job records found in the data")]
    NoValidRecords,

    #[error("header has none of the expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read job data header: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read job data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error fetching job data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
