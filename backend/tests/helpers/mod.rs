#![allow(dead_code)]

use std::env;
use std::sync::Once;

use wordcards_backend::catalog::Catalog;
use wordcards_backend::fetch::MemoryFetcher;
use wordcards_backend::types::{CatalogEntry, Source};

static SETUP: Once = Once::new();

/// Keeps the logger from writing into the user's data folder.
pub fn test_setup() {
    SETUP.call_once(|| {
        let dir = env::temp_dir().join("wordcards-tests");
        unsafe {
            env::set_var("DISABLE_LOG", "true");
            env::set_var("WORDCARDS_DIR", &dir);
        }
    });
}

pub const OPINION_JSON: &str = r#"[
    {"term": "argue", "type": "verb", "level": "B1"},
    {"term": "claim", "type": "noun", "level": "B2"},
    {"word": "on the other hand", "pos": "phrase", "level": "b1"},
    {"term": "  ", "type": "noun", "level": "A1"},
    {"term": "Argue", "type": "Verb", "level": "b1"}
]"#;

pub const DOUBT_JSON: &str = r#"[
    {"term": "assume", "type": "verb", "level": "B2"},
    {"term": "assume", "type": "verb", "level": "B2"},
    {"term": "rule of thumb", "level": "C1"},
    {"term": "maybe"}
]"#;

pub fn sample_sources() -> Vec<Source> {
    vec![
        Source::new("opinion.json", "Opinion & Argument"),
        Source::new("doubt.json", "Doubt"),
    ]
}

pub fn sample_fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("opinion.json", OPINION_JSON)
        .with("doubt.json", DOUBT_JSON)
}

pub fn entry(term: &str, pos: &str, level: &str, topic: &str) -> CatalogEntry {
    CatalogEntry::new(term, pos, level, topic)
}

pub fn catalog_of(entries: Vec<CatalogEntry>) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.extend(entries);
    catalog
}
