use std::{io, time::Duration};

use chromiumoxide::error::CdpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScraperError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid browser configuration: {0}")]
    Config(String),

    #[error("Failed to launch browser: {0}")]
    Launch(#[source] CdpError),

    #[error("Failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: CdpError,
    },

    #[error("Timed out after {waited:?} waiting for `{selector}`")]
    Timeout { selector: String, waited: Duration },

    #[error("Failed to query `{selector}`: {message}")]
    Query { selector: String, message: String },

    #[error("Failed to read rendered page: {0}")]
    Snapshot(#[source] CdpError),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to render chart {chart}: {message}")]
    Render { chart: String, message: String },
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
