use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use thiserror::Error;

/// Why a source contributed no entries.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {location}: {message}")]
    Http { location: String, message: String },

    #[error("{location} returned error status: {status}")]
    Status { location: String, status: u16 },

    #[error("Failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{location} is not a JSON array")]
    NotArray { location: String },

    #[error("No such source: {location}")]
    NotFound { location: String },

    #[error("Loading {location} panicked")]
    Panicked { location: String },
}

/// Retrieves the raw bytes of a source location.
///
/// Implementations are shared between the per-source loader threads.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, SourceError>;
}

pub fn is_remote(location: &str) -> bool {
    let l = location.to_lowercase();
    l.starts_with("http://") || l.starts_with("https://")
}

/// Fetches `http(s)` locations over the network and reads everything else from disk.
pub struct DefaultFetcher {
    /// Relative paths are resolved against this directory.
    pub base_dir: PathBuf,
    pub timeout: Duration,
    /// Built on the first remote fetch and shared by the loader threads.
    client: OnceLock<Result<reqwest::blocking::Client, String>>,
}

impl DefaultFetcher {
    pub fn new(base_dir: &Path, timeout: Duration) -> Self {
        DefaultFetcher {
            base_dir: base_dir.to_path_buf(),
            timeout,
            client: OnceLock::new(),
        }
    }

    /// Resolves a file location. Percent-escapes in the location are decoded,
    /// so `Opinion%20and%20argument.json` names `Opinion and argument.json`.
    pub fn resolve_path(&self, location: &str) -> PathBuf {
        let location = location.strip_prefix("file://").unwrap_or(location);
        let decoded = urlencoding::decode(location)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| location.to_string());
        let p = PathBuf::from(decoded);
        if p.is_absolute() {
            p
        } else {
            self.base_dir.join(p)
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, String> {
        self.client
            .get_or_init(|| {
                reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| format!("Failed to create HTTP client: {}", e))
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    fn fetch_remote(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        let client = self.client().map_err(|message| SourceError::Http {
            location: location.to_string(),
            message,
        })?;

        let response = client
            .get(location)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .map_err(|e| SourceError::Http {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                location: location.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| SourceError::Http {
            location: location.to_string(),
            message: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }

    fn fetch_file(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve_path(location);
        std::fs::read(&path).map_err(|e| SourceError::Io {
            location: location.to_string(),
            source: e,
        })
    }
}

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        if is_remote(location) {
            self.fetch_remote(location)
        } else {
            self.fetch_file(location)
        }
    }
}

/// Serves sources from memory. Unknown locations fail with [`SourceError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, body: &str) -> Self {
        self.insert(location, body);
        self
    }

    pub fn insert(&mut self, location: &str, body: &str) {
        self.documents.insert(location.to_string(), body.as_bytes().to_vec());
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound { location: location.to_string() })
    }
}
