use std::io;
use std::path::PathBuf;

use crate::php::ManualKind;

/// Problems with the manual source configuration.  These are fatal and
/// are reported when the source is built, never at lookup time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown PHP manual type \"{0}\", expected one of online, single, many")]
    UnknownKind(String),

    #[error("No path specified for {0} PHP manual")]
    MissingPath(ManualKind),

    #[error("Could not find manual directory {0:?} for many HTML files manual")]
    NotADirectory(PathBuf),

    #[error("Could not find manual file {0:?} for single HTML file manual")]
    NotAFile(PathBuf),

    #[error("Invalid manual language code \"{0}\"")]
    InvalidLanguage(String),

    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),
}

/// Why a backend produced no HTML.  Only ever logged; lookups collapse
/// all of these into "no results".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0:?} is not a regular file")]
    NotAFile(PathBuf),
}
