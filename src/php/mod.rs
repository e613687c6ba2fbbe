//! PHP manual lookups.
//!
//! A `ManualSource` turns a function or method name typed by a user into
//! a `ManualEntry` holding its synopsis and one-line description, reading
//! pages from the online manual or from a downloaded copy.
//!
//! ```no_run
//! use irc_phpdoc::php::{ManualSource, ManualSourceConfig};
//!
//! let source = ManualSource::from_config(&ManualSourceConfig::default()).unwrap();
//! if let Some(entry) = source.find_function("strlen") {
//!     println!("{} - {}", entry.synopsis, entry.description);
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ConfigError;

mod config;
mod extract;
mod fetch;
mod reference;

pub use self::config::{ManualKind, ManualSourceConfig, DEFAULT_LANGUAGE, DEFAULT_MANUAL_URL};
pub use self::extract::{clean_string, extract};
pub use self::fetch::{Fetch, FileSystem, HttpGet, LocalFs, ManyFilesManual, OnlineManual, ReqwestHttp,
                      SingleFileManual, HTTP_TIMEOUT};
pub use self::reference::FunctionReference;

/// A documented function, as found in the manual.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualEntry {
    /// The name as the user asked for it.
    pub name: String,
    pub synopsis: String,
    pub description: String,
}

/// Looks functions up in one configured copy of the manual.
///
/// Holds no mutable state, so one source can be shared between threads
/// and queried concurrently.
pub struct ManualSource {
    kind: ManualKind,
    backend: Box<dyn Fetch>,
}

impl ManualSource {

    /// Builds a source with the stock HTTP client and filesystem.
    pub fn from_config(config: &ManualSourceConfig) -> Result<ManualSource, ConfigError> {
        let http = Arc::new(ReqwestHttp::new(HTTP_TIMEOUT)?);
        ManualSource::new(config, http, Arc::new(LocalFs))
    }

    /// Validates `config` and picks the backend it names.  A missing
    /// path, a many-files manual that is not a directory or a
    /// single-file manual that is not a file is an error here rather
    /// than at the first lookup.
    pub fn new(config: &ManualSourceConfig,
               http: Arc<dyn HttpGet>,
               fs: Arc<dyn FileSystem>) -> Result<ManualSource, ConfigError> {
        let path = config.resolved_path()?;
        info!("Using {} PHP manual at {}.", config.kind, path);
        let backend: Box<dyn Fetch> = match config.kind {
            ManualKind::Online => {
                let language = config.validated_language()?;
                Box::new(OnlineManual::new(&path, language, http))
            },
            ManualKind::SingleFile => {
                let path = PathBuf::from(path);
                if !fs.is_file(&path) {
                    return Err(ConfigError::NotAFile(path));
                }
                Box::new(SingleFileManual::new(path, fs))
            },
            ManualKind::ManyFiles => {
                let path = PathBuf::from(path);
                if !fs.is_dir(&path) {
                    return Err(ConfigError::NotADirectory(path));
                }
                Box::new(ManyFilesManual::new(path, fs))
            },
        };
        Ok(ManualSource{
            kind: config.kind,
            backend: backend,
        })
    }

    /// Wraps an arbitrary backend.
    pub fn with_backend(kind: ManualKind, backend: Box<dyn Fetch>) -> ManualSource {
        ManualSource{ kind: kind, backend: backend }
    }

    pub fn kind(&self) -> ManualKind {
        self.kind
    }

    /// Finds the manual entry for `name`, a function (`strlen`) or a
    /// method (`DateTime::format`).
    ///
    /// Returns `None` both when the manual has no such entry and when
    /// the page could not be fetched at all; the reason is logged.
    pub fn find_function(&self, name: &str) -> Option<ManualEntry> {
        let reference = FunctionReference::normalize(name);
        debug!("Looking up \"{}\" as {}.", name, reference);
        let html = match self.backend.fetch(&reference) {
            Ok(html) => html,
            Err(e) => {
                debug!("No manual page for {}: {}", reference, e);
                return None;
            },
        };
        extract(&html, &reference, name)
    }

}
