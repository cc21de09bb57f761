use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::logger::{error, info};
use crate::types::Source;

pub const SOURCES_FILE_NAME: &str = "sources.json";

/// The built-in word lists, relative to the data directory.
pub const DEFAULT_SOURCES: [(&str, &str); 4] = [
    ("Opinion%20and%20argument.json", "Opinion & Argument"),
    ("Doubt,%20guessing%20and%20certainty.json", "Doubt, guessing and certainty"),
    ("Discussion%20and%20agreement.json", "Discussion and agreement"),
    ("Personal%20Qualities.json", "Personal Qualities"),
];

pub fn default_sources() -> Vec<Source> {
    DEFAULT_SOURCES
        .iter()
        .map(|(location, topic)| Source::new(location, topic))
        .collect()
}

/// Reads a `[{"location": ..., "topic": ...}]` source list.
pub fn read_sources_file(path: &Path) -> Result<Vec<Source>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("Can't read {}", path.display()))?;
    let sources: Vec<Source> = serde_json::from_str(&s)
        .with_context(|| format!("Can't decode {}", path.display()))?;
    Ok(sources)
}

/// The sources configured in `sources.json` of the data directory, or the
/// built-in list when there is no such file or it can't be read.
pub fn configured_sources(dir: &Path) -> Vec<Source> {
    let path = dir.join(SOURCES_FILE_NAME);
    if !path.exists() {
        return default_sources();
    }

    match read_sources_file(&path) {
        Ok(sources) => {
            info(&format!("Using {} sources from {}", sources.len(), path.display()));
            sources
        }
        Err(e) => {
            error(&format!("{:#}", e));
            default_sources()
        }
    }
}

/// Topic labels in configuration order, without duplicates.
pub fn topic_labels(sources: &[Source]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for s in sources {
        if !labels.contains(&s.topic) {
            labels.push(s.topic.clone());
        }
    }
    labels
}
