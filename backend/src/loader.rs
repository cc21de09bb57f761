//! Catalog loading.
//!
//! Every source is fetched and parsed on its own scoped thread. A source which
//! can't be fetched, isn't valid JSON, or isn't a JSON array contributes no
//! entries and is reported as a warning. The parsed batches are merged in
//! source order after all threads have finished, so the first occurrence of a
//! de-dup key wins.

use std::thread;

use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::fetch::{SourceError, SourceFetcher};
use crate::logger::{debug, info, warn};
use crate::types::{CatalogEntry, Source};

pub const TERM_KEY: &str = "term";
pub const TERM_FALLBACK_KEY: &str = "word";
pub const POS_KEY: &str = "type";
pub const POS_FALLBACK_KEY: &str = "pos";
pub const LEVEL_KEY: &str = "level";

/// Loads and merges all sources into one catalog. Never fails.
pub fn load<F>(sources: &[Source], fetcher: &F) -> Catalog
where
    F: SourceFetcher + ?Sized,
{
    let batches: Vec<Result<Vec<CatalogEntry>, SourceError>> = thread::scope(|s| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| s.spawn(move || load_source(source, fetcher)))
            .collect();

        handles
            .into_iter()
            .zip(sources.iter())
            .map(|(handle, source)| {
                handle.join().unwrap_or_else(|_| Err(SourceError::Panicked {
                    location: source.location.clone(),
                }))
            })
            .collect()
    });

    let mut catalog = Catalog::new();

    for (source, batch) in sources.iter().zip(batches) {
        match batch {
            Ok(entries) => {
                let total = entries.len();
                let added = catalog.extend(entries);
                debug(&format!(
                    "{}: {} entries, {} duplicates dropped",
                    source.location, added, total - added
                ));
            }
            Err(e) => {
                warn(&format!("Failed to load {} ({}): {}", source.location, source.topic, e));
            }
        }
    }

    info(&format!("Loaded {} entries from {} sources", catalog.len(), sources.len()));

    catalog
}

/// Fetches and parses one source.
pub fn load_source<F>(source: &Source, fetcher: &F) -> Result<Vec<CatalogEntry>, SourceError>
where
    F: SourceFetcher + ?Sized,
{
    let bytes = fetcher.fetch(&source.location)?;
    parse_entries(&bytes, source)
}

/// Parses the bytes of one source into normalized entries, attributed to the source topic.
pub fn parse_entries(bytes: &[u8], source: &Source) -> Result<Vec<CatalogEntry>, SourceError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| SourceError::Parse {
        location: source.location.clone(),
        source: e,
    })?;

    let Value::Array(records) = value else {
        return Err(SourceError::NotArray { location: source.location.clone() });
    };

    Ok(records
        .iter()
        .filter_map(|raw| parse_record(raw, &source.topic))
        .collect())
}

/// Normalizes one raw record. Returns None for non-objects and records without a term.
pub fn parse_record(raw: &Value, topic: &str) -> Option<CatalogEntry> {
    let obj = raw.as_object()?;

    let term = text_with_fallback(obj, TERM_KEY, TERM_FALLBACK_KEY);
    if term.is_empty() {
        return None;
    }
    let part_of_speech = text_with_fallback(obj, POS_KEY, POS_FALLBACK_KEY);
    let level = text_field(obj, LEVEL_KEY);

    Some(CatalogEntry::new(&term, &part_of_speech, &level, topic))
}

fn text_with_fallback(obj: &Map<String, Value>, key: &str, fallback_key: &str) -> String {
    let primary = text_field(obj, key);
    if primary.is_empty() {
        text_field(obj, fallback_key)
    } else {
        primary
    }
}

/// Trimmed text of a scalar field. Missing, null, array and object values are empty.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
