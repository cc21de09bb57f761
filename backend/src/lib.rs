pub mod types;
pub mod app_settings;
pub mod logger;
pub mod catalog;
pub mod fetch;
pub mod loader;
pub mod selector;
pub mod preferences;
pub mod lookup;
pub mod sources;
pub mod session;

use std::env;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use app_dirs::{get_app_root, AppDataType, AppInfo};
use tempfile::NamedTempFile;

pub static DEFAULT_SAMPLE_SIZE: usize = 5;
pub static DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const APP_INFO: AppInfo = AppInfo{name: "wordcards", author: "wordcards"};

/// Settings read once from the environment.
#[derive(Debug, Clone)]
pub struct AppGlobals {
    pub wordcards_dir: PathBuf,
    pub sample_size: usize,
    pub request_timeout: Duration,
}

impl AppGlobals {
    pub fn new() -> Self {
        let wordcards_dir = get_create_wordcards_dir().unwrap_or_else(|_| PathBuf::from("."));

        let sample_size = env_parse::<usize>("SAMPLE_SIZE").unwrap_or(DEFAULT_SAMPLE_SIZE);

        let timeout_secs = env_parse::<u64>("REQUEST_TIMEOUT_SECS").unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        AppGlobals {
            wordcards_dir,
            sample_size,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for AppGlobals {
    fn default() -> Self {
        Self::new()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

pub static APP_GLOBALS: OnceLock<AppGlobals> = OnceLock::new();

pub fn init_app_globals() {
    APP_GLOBALS.get_or_init(AppGlobals::new);
}

pub fn get_app_globals() -> &'static AppGlobals {
    APP_GLOBALS.get_or_init(AppGlobals::new)
}

/// The data directory: `WORDCARDS_DIR` if set, otherwise the platform user
/// data folder. Created if it doesn't exist.
pub fn get_create_wordcards_dir() -> Result<PathBuf> {
    let p = match env::var("WORDCARDS_DIR") {
        Ok(s) if !s.trim().is_empty() => PathBuf::from(s.trim()),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)
            .context("Can't determine the user data directory")?,
    };

    if !p.exists() {
        create_dir_all(&p).with_context(|| format!("Can't create {}", p.display()))?;
    }

    Ok(p)
}

pub fn create_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent).with_context(|| format!("Can't create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Writes the file through a temporary file in the same folder, so readers
/// never see a partial file.
pub fn save_to_file(data: &[u8], path: &Path) -> Result<()> {
    create_parent_directory(path)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Can't create a temporary file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("Can't write {}", path.display()))?;

    Ok(())
}
