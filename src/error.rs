//! Error types for citelink.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run.
///
/// Nothing is written when one of these is returned. A run either produces
/// the complete, restored chapter or it produces nothing.
#[derive(Debug, Error)]
pub enum XrefError {
    #[error("no usable bibliography entries were found")]
    EmptyBibliography,

    #[error("the chapter has no body element")]
    NoBody,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error reading the file {}—{source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing the file {}—{source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error serializing the run report—{0}")]
    Report(#[from] serde_json::Error),
}

/// Reasons a single bibliography entry is skipped.
///
/// These never abort a run. The entry is left out of the index and the run
/// carries on with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntry {
    #[error("no four-digit year")]
    NoYear,

    #[error("nothing before the year")]
    EmptyAuthor,

    #[error("no surname in the author text {0:?}")]
    NoSurname(String),
}
