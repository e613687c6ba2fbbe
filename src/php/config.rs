use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Where the online manual lives when no path is configured.
pub const DEFAULT_MANUAL_URL: &str = "https://www.php.net/manual";

pub const DEFAULT_LANGUAGE: &str = "en";

/// Which copy of the manual to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualKind {
    /// The live manual, fetched over HTTP.
    Online,
    /// The "single HTML file" download.
    SingleFile,
    /// The "many HTML files" download.
    ManyFiles,
}

impl FromStr for ManualKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<ManualKind, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "online" | "onlinemanual" => Ok(ManualKind::Online),
            "single" | "singlefile" | "singlefilemanual" => Ok(ManualKind::SingleFile),
            "many" | "manyfiles" | "manyfilesmanual" => Ok(ManualKind::ManyFiles),
            _ => Err(ConfigError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ManualKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ManualKind::Online => "online",
            ManualKind::SingleFile => "single HTML file",
            ManualKind::ManyFiles => "many HTML files",
        })
    }
}

/// Settings for a `ManualSource`.  Checked once, when the source is
/// built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualSourceConfig {
    pub kind: ManualKind,
    /// Base URL for the online manual, or the file or directory of a
    /// downloaded one.
    pub path: Option<String>,
    pub language: String,
}

impl Default for ManualSourceConfig {
    fn default() -> ManualSourceConfig {
        ManualSourceConfig{
            kind: ManualKind::Online,
            path: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ManualSourceConfig {

    pub fn new(kind: ManualKind, path: Option<&str>, language: &str) -> ManualSourceConfig {
        ManualSourceConfig{
            kind: kind,
            path: path.map(|p| p.to_string()),
            language: language.to_string(),
        }
    }

    /// The configured path without trailing separators or spaces, or
    /// the default for the online manual.
    pub fn resolved_path(&self) -> Result<String, ConfigError> {
        let trimmed = self.path.as_deref()
            .map(|p| p.trim_end_matches(&['/', '\\', ' '][..]))
            .filter(|p| !p.is_empty());
        match (trimmed, self.kind) {
            (Some(p), _) => Ok(p.to_string()),
            (None, ManualKind::Online) => Ok(DEFAULT_MANUAL_URL.to_string()),
            (None, kind) => Err(ConfigError::MissingPath(kind)),
        }
    }

    /// Checks the language code is something that can go in a URL path.
    pub fn validated_language(&self) -> Result<&str, ConfigError> {
        let lang = self.language.as_str();
        let ok = !lang.is_empty()
            && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if ok {
            Ok(lang)
        } else {
            Err(ConfigError::InvalidLanguage(self.language.clone()))
        }
    }

}
