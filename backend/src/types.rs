use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The six CEFR codes, in slider order.
pub const LEVELS: [CefrLevel; 6] = [
    CefrLevel::A1,
    CefrLevel::A2,
    CefrLevel::B1,
    CefrLevel::B2,
    CefrLevel::C1,
    CefrLevel::C2,
];

/// The topic filter value which matches every topic.
pub const ALL_TOPICS: &str = "all";

/// One vocabulary item of the merged catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub term: String,
    pub part_of_speech: String,
    /// Uppercased, but not checked against the CEFR codes.
    pub level: String,
    /// Label of the source the entry was loaded from.
    pub topic: String,
}

impl CatalogEntry {
    pub fn new(term: &str, part_of_speech: &str, level: &str, topic: &str) -> Self {
        CatalogEntry {
            term: term.trim().to_string(),
            part_of_speech: part_of_speech.trim().to_string(),
            level: level.trim().to_uppercase(),
            topic: topic.to_string(),
        }
    }

    /// Key of the de-duplicated catalog: `term|part_of_speech|level|topic`,
    /// with term and part of speech case-folded.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.term.to_lowercase(),
            self.part_of_speech.to_lowercase(),
            self.level.to_uppercase(),
            self.topic,
        )
    }

    /// Key used by the favorite and hidden sets.
    pub fn term_key(&self) -> String {
        term_key(&self.term)
    }
}

/// Case-folded term, as stored in the favorite and hidden sets.
pub fn term_key(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Where to fetch one JSON array of raw entries, and the topic they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// An `http(s)://` URL or a filesystem path.
    pub location: String,
    pub topic: String,
}

impl Source {
    pub fn new(location: &str, topic: &str) -> Self {
        Source {
            location: location.to_string(),
            topic: topic.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Level at a slider position. Out of range positions are clamped.
    pub fn from_index(idx: usize) -> Self {
        LEVELS[idx.min(LEVELS.len() - 1)]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid CEFR level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for CefrLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        LEVELS
            .iter()
            .find(|level| level.as_str() == code)
            .copied()
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicFilter {
    All,
    Topic(String),
}

impl TopicFilter {
    /// Parses a stored or typed topic value. `"all"` and the empty string select every topic.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_TOPICS {
            TopicFilter::All
        } else {
            TopicFilter::Topic(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            TopicFilter::All => ALL_TOPICS,
            TopicFilter::Topic(t) => t,
        }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(t) => entry.topic == *t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    Any,
    Level(CefrLevel),
}

impl LevelFilter {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            LevelFilter::Any => true,
            LevelFilter::Level(level) => entry.level == level.as_str(),
        }
    }
}

/// The filters of one generate request.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub topic: TopicFilter,
    pub level: LevelFilter,
    pub favorites_only: bool,
    /// Case-folded term keys.
    pub favorites: HashSet<String>,
    /// Case-folded term keys of hidden (known) words.
    pub hidden: HashSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            topic: TopicFilter::All,
            level: LevelFilter::Any,
            favorites_only: false,
            favorites: HashSet::new(),
            hidden: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Sampled from the pool matching every filter.
    Primary,
    /// The primary pool was empty, sampled from the topic-only pool instead.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub entries: Vec<CatalogEntry>,
    pub pool: PoolKind,
}

impl Selection {
    /// An empty selection is the "no matches" state, not an error.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
