//! Error types for the fleet data layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the drone simulation API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, read, timeout or non-success status.
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The body was not the JSON shape we expected.
    #[error("malformed response from {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A related-resource link whose id could not be read.
    #[error("cannot extract an id from resource url {0:?}")]
    BadResourceUrl(String),
}

/// Failure reading or writing the local history files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} does not hold a JSON array of records: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A page navigation request that cannot be honoured.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("already at the first page")]
    AtFirstPage,
    #[error("no further pages")]
    AtLastPage,
    #[error("this is already the last page")]
    AlreadyAtLast,
    #[error("row {row} is outside 1..={max}")]
    RowOutOfRange { row: usize, max: usize },
}

/// Anything a fleet screen action can fail with.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A newer fetch started while this one was still running.
    #[error("fetch superseded by a newer request")]
    Superseded,
}

impl FleetError {
    /// Title of the alert shown to the user for this error.
    pub fn alert_title(&self) -> &'static str {
        match self {
            FleetError::Store(StoreError::Io { .. }) => "IO Error",
            _ => "Error",
        }
    }

    /// User-facing message; details only go to the log.
    pub fn alert_message(&self) -> &'static str {
        match self {
            FleetError::Store(StoreError::Io { .. }) => {
                "An error occurred while performing an IO operation."
            }
            _ => "An unexpected error occurred.",
        }
    }
}
