//! The three places a manual page can come from, behind one `Fetch`
//! trait, plus the HTTP and filesystem capabilities they are built on.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::FunctionReference;
use crate::error::{ConfigError, FetchError};

/// How long to wait on the online manual before giving up.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Retrieves the raw HTML holding a manual entry.
pub trait Fetch: Send + Sync {
    fn fetch(&self, reference: &FunctionReference) -> Result<String, FetchError>;
}

/// Something that can GET a URL and hand back the body of a successful
/// response.  Non-success statuses are errors.
pub trait HttpGet: Send + Sync {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Read-only access to the local filesystem.
pub trait FileSystem: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String, FetchError>;
}

/// `HttpGet` over a blocking `reqwest` client.
pub struct ReqwestHttp {
    client: reqwest::blocking::Client,
}

impl ReqwestHttp {

    pub fn new(timeout: Duration) -> Result<ReqwestHttp, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("phpdocbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(ReqwestHttp{ client: client })
    }

}

impl HttpGet for ReqwestHttp {

    fn get(&self, url: &str) -> Result<String, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self.client.get(url).send().map_err(transport)?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        response.text().map_err(transport)
    }

}

/// `FileSystem` backed by `std::fs`.
pub struct LocalFs;

impl FileSystem for LocalFs {

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<String, FetchError> {
        // The manual is not guaranteed to be valid UTF-8 throughout.
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

}

/// Pages from a live manual at `<base>/<lang>/<reference>.php`.
pub struct OnlineManual {
    base_url: String,
    language: String,
    http: Arc<dyn HttpGet>,
}

impl OnlineManual {

    pub fn new(base_url: &str, language: &str, http: Arc<dyn HttpGet>) -> OnlineManual {
        OnlineManual{
            base_url: base_url.to_string(),
            language: language.to_string(),
            http: http,
        }
    }

    pub fn url_for(&self, reference: &FunctionReference) -> String {
        format!("{}/{}/{}.php", self.base_url, self.language, reference)
    }

}

impl Fetch for OnlineManual {

    fn fetch(&self, reference: &FunctionReference) -> Result<String, FetchError> {
        let url = self.url_for(reference);
        debug!("Fetching {}...", url);
        self.http.get(&url)
    }

}

/// The whole manual downloaded as one big HTML file.  The file is read
/// again on every lookup.
// TODO: keep the parsed document around between lookups; the single
// file manual is tens of megabytes.
pub struct SingleFileManual {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl SingleFileManual {

    pub fn new(path: PathBuf, fs: Arc<dyn FileSystem>) -> SingleFileManual {
        SingleFileManual{ path: path, fs: fs }
    }

}

impl Fetch for SingleFileManual {

    fn fetch(&self, reference: &FunctionReference) -> Result<String, FetchError> {
        debug!("Reading {:?} for {}...", self.path, reference);
        self.fs.read(&self.path)
    }

}

/// The manual downloaded as one HTML file per page, named
/// `<reference>.html`.
pub struct ManyFilesManual {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ManyFilesManual {

    pub fn new(dir: PathBuf, fs: Arc<dyn FileSystem>) -> ManyFilesManual {
        ManyFilesManual{ dir: dir, fs: fs }
    }

    /// The page file for `reference`, or `None` when the reference would
    /// name a file outside the manual directory.
    pub fn path_for(&self, reference: &FunctionReference) -> Option<PathBuf> {
        let name = format!("{}.html", reference);
        if name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        let file = Path::new(&name);
        if !file.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.dir.join(file))
    }

}

impl Fetch for ManyFilesManual {

    fn fetch(&self, reference: &FunctionReference) -> Result<String, FetchError> {
        let path = match self.path_for(reference) {
            Some(path) => path,
            None => {
                warn!("Refusing to look {} up outside {:?}.", reference, self.dir);
                return Err(FetchError::NotAFile(PathBuf::from(reference.as_str())));
            },
        };
        debug!("Reading {:?}...", path);
        if !self.fs.is_file(&path) {
            return Err(FetchError::NotAFile(path));
        }
        self.fs.read(&path)
    }

}
