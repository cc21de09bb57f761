use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

use crate::get_create_wordcards_dir;

pub const LOG_FILE_NAME: &str = "log.txt";
const KEEP_ROTATED_LOGS: usize = 5;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages
///
/// The level is read from the `LOG_LEVEL` environment variable and can be
/// changed at runtime with `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Level::Silent => "",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Rotates the log file to `log.<datetime>.txt`, keeping the last few rotated files.
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        _ => return Ok(()),
    }

    let modified = std::fs::metadata(log_file)?.modified()?;
    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));
    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with("log.") && name.ends_with(".txt") && name != LOG_FILE_NAME)
        })
        .collect();

    // Sorts by datetime
    log_files.sort();

    if log_files.len() > KEEP_ROTATED_LOGS {
        for file in &log_files[0..log_files.len() - KEEP_ROTATED_LOGS] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    log_file: PathBuf,
    disable_log: bool,
    enable_print_log: bool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = get_create_wordcards_dir()
            .map_err(|e| format!("Failed to get wordcards dir: {}", e))?;

        let log_file = data_dir.join(LOG_FILE_NAME);
        let disable_log = env_flag("DISABLE_LOG");

        if !disable_log {
            if let Err(e) = rotate_log_files(&log_file) {
                eprintln!("Failed to rotate log files: {}", e);
            }
        }

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_name(&v))
            .unwrap_or(Level::Info);

        Ok(Logger {
            log_file,
            disable_log,
            enable_print_log: env_flag("ENABLE_PRINT_LOG"),
            level: Arc::new(Mutex::new(level)),
        })
    }

    /// A logger which drops every message.
    pub fn disabled() -> Self {
        Logger {
            log_file: PathBuf::new(),
            disable_log: true,
            enable_print_log: false,
            level: Arc::new(Mutex::new(Level::Silent)),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.disable_log {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        file.write_all(format!("[{}] {}\n", timestamp, message).as_bytes())?;

        Ok(())
    }

    pub fn log(&self, level: Level, msg: &str) {
        if level == Level::Silent || self.get_level() < level {
            return;
        }

        if self.enable_print_log {
            match level {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        if let Err(e) = self.write_to_file(&format!("{}: {}", level.prefix(), msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    /// Returns Level::Info if the lock can't be acquired.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    let logger = LOGGER.get_or_init(|| {
        match Logger::new() {
            Ok(logger) => {
                if logger.enable_print_log {
                    TRACING_INITIALIZED.get_or_init(|| {
                        if let Err(e) = Logger::init_tracing() {
                            eprintln!("Failed to initialize tracing: {}", e);
                        }
                    });
                }
                logger
            }
            Err(e) => {
                eprintln!("Failed to create logger: {}", e);
                Logger::disabled()
            }
        }
    });

    f(logger)
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.log(Level::Info, msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.log(Level::Warn, msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.log(Level::Error, msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.log(Level::Debug, msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

/// Overrides the level read from `LOG_LEVEL` for the rest of the process.
pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}
