//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Candidate records which could not be read or decoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failure of the candidate-record source other than a malformed row, e.g., an unreadable file
    #[error("data source error: {source_name}: {message}")]
    DataSource {
        source_name: String,
        message: String,
    },

    /// Malformed input to a constructor or operation, e.g., a row whose length differs from the column count
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// The requested test specification name has no known generator
    #[error("unsupported test specification: {0}")]
    UnsupportedSpec(String),

    /// The output directory is missing or the document could not be written
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn precondition_error(message: impl Into<String>) -> Error {
    Error::Precondition(message.into())
}

pub(crate) fn data_source_error(
    source_name: impl Into<String>,
    message: impl Into<String>,
) -> Error {
    Error::DataSource {
        source_name: source_name.into(),
        message: message.into(),
    }
}

pub(crate) fn storage_error(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    Error::Storage {
        path: path.into(),
        source,
    }
}
