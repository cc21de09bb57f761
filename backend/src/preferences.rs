//! User preferences: theme, last selections, favorite and hidden terms.
//!
//! The storage is behind [`PreferencesStore`], so the session can run on the
//! JSON file in the data directory or on an in-memory store in tests.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

use crate::app_settings::ThemeName;
use crate::logger::error;
use crate::save_to_file;
use crate::types::{term_key, CefrLevel, FilterState, LevelFilter, TopicFilter, LEVELS};

pub const KEY_THEME: &str = "theme";
pub const KEY_TOPIC: &str = "topic";
pub const KEY_LEVEL_INDEX: &str = "levelIndex";
pub const KEY_ANY_LEVEL: &str = "anyLevel";
pub const KEY_FAVORITES_ONLY: &str = "favOnly";
pub const SET_FAVORITES: &str = "wg_favorites";
pub const SET_HIDDEN: &str = "wg_hidden";

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Key-value storage with named string values and named string sets.
pub trait PreferencesStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn set_members(&self, key: &str) -> BTreeSet<String>;

    fn set_contains(&self, key: &str, member: &str) -> bool {
        self.set_members(key).contains(member)
    }

    /// Returns true if the member was not present before.
    fn set_insert(&mut self, key: &str, member: &str) -> Result<bool>;

    /// Returns true if the member was present.
    fn set_remove(&mut self, key: &str, member: &str) -> Result<bool>;

    fn set_clear(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesData {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub sets: BTreeMap<String, BTreeSet<String>>,
}

impl PreferencesData {
    fn set_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn insert_member(&mut self, key: &str, member: &str) -> bool {
        self.sets.entry(key.to_string()).or_default().insert(member.to_string())
    }

    fn remove_member(&mut self, key: &str, member: &str) -> bool {
        self.sets.get_mut(key).map(|s| s.remove(member)).unwrap_or(false)
    }

    fn clear_set(&mut self, key: &str) {
        self.sets.remove(key);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    data: PreferencesData,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.data.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.set_value(key, value);
        Ok(())
    }

    fn set_members(&self, key: &str) -> BTreeSet<String> {
        self.data.sets.get(key).cloned().unwrap_or_default()
    }

    fn set_contains(&self, key: &str, member: &str) -> bool {
        self.data.sets.get(key).is_some_and(|s| s.contains(member))
    }

    fn set_insert(&mut self, key: &str, member: &str) -> Result<bool> {
        Ok(self.data.insert_member(key, member))
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<bool> {
        Ok(self.data.remove_member(key, member))
    }

    fn set_clear(&mut self, key: &str) -> Result<()> {
        self.data.clear_set(key);
        Ok(())
    }
}

/// Preferences persisted as JSON, rewritten after every change.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    data: PreferencesData,
}

impl JsonFilePreferences {
    /// Opens the store at `path`. A missing file is an empty store. An
    /// unreadable file is logged and also treated as empty.
    pub fn open(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(s) => match serde_json::from_str::<PreferencesData>(&s) {
                Ok(d) => d,
                Err(e) => {
                    error(&format!("Can't decode preferences {}: {}", path.display(), e));
                    PreferencesData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PreferencesData::default(),
            Err(e) => {
                error(&format!("Can't read preferences {}: {}", path.display(), e));
                PreferencesData::default()
            }
        };

        JsonFilePreferences {
            path: path.to_path_buf(),
            data,
        }
    }

    /// Opens `preferences.json` in the given directory.
    pub fn open_in_dir(dir: &Path) -> Self {
        Self::open(&dir.join(PREFERENCES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `data` to the file and only then makes it the current state.
    fn commit(&mut self, data: PreferencesData) -> Result<()> {
        let json = serde_json::to_string_pretty(&data)
            .context("Can't encode preferences")?;
        save_to_file(json.as_bytes(), &self.path)
            .with_context(|| format!("Can't save preferences to {}", self.path.display()))?;
        self.data = data;
        Ok(())
    }
}

impl PreferencesStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.data.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.clone();
        data.set_value(key, value);
        self.commit(data)
    }

    fn set_members(&self, key: &str) -> BTreeSet<String> {
        self.data.sets.get(key).cloned().unwrap_or_default()
    }

    fn set_contains(&self, key: &str, member: &str) -> bool {
        self.data.sets.get(key).is_some_and(|s| s.contains(member))
    }

    fn set_insert(&mut self, key: &str, member: &str) -> Result<bool> {
        let mut data = self.data.clone();
        let added = data.insert_member(key, member);
        if added {
            self.commit(data)?;
        }
        Ok(added)
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<bool> {
        let mut data = self.data.clone();
        let removed = data.remove_member(key, member);
        if removed {
            self.commit(data)?;
        }
        Ok(removed)
    }

    fn set_clear(&mut self, key: &str) -> Result<()> {
        let mut data = self.data.clone();
        data.clear_set(key);
        self.commit(data)
    }
}

fn flag_value(on: bool) -> &'static str {
    if on { "1" } else { "0" }
}

/// Typed access to the preference keys of the word generator.
#[derive(Debug, Clone)]
pub struct UserPreferences<S: PreferencesStore> {
    store: S,
}

impl<S: PreferencesStore> UserPreferences<S> {
    pub fn new(store: S) -> Self {
        UserPreferences { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn theme(&self) -> ThemeName {
        self.store
            .get(KEY_THEME)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: ThemeName) -> Result<()> {
        self.store.set(KEY_THEME, theme.as_str())
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeName> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn last_topic(&self) -> TopicFilter {
        self.store
            .get(KEY_TOPIC)
            .map(|s| TopicFilter::from_value(&s))
            .unwrap_or(TopicFilter::All)
    }

    pub fn set_last_topic(&mut self, topic: &TopicFilter) -> Result<()> {
        self.store.set(KEY_TOPIC, topic.as_value())
    }

    /// Saved level slider position, clamped to the CEFR range.
    pub fn level_index(&self) -> usize {
        self.store
            .get(KEY_LEVEL_INDEX)
            .and_then(|s| s.trim().parse::<usize>().ok())
            .map(|idx| idx.min(LEVELS.len() - 1))
            .unwrap_or(0)
    }

    pub fn set_level_index(&mut self, idx: usize) -> Result<()> {
        let idx = idx.min(LEVELS.len() - 1);
        self.store.set(KEY_LEVEL_INDEX, &idx.to_string())
    }

    pub fn level(&self) -> CefrLevel {
        CefrLevel::from_index(self.level_index())
    }

    pub fn any_level(&self) -> bool {
        self.store.get(KEY_ANY_LEVEL).is_some_and(|v| v == "1")
    }

    pub fn set_any_level(&mut self, on: bool) -> Result<()> {
        self.store.set(KEY_ANY_LEVEL, flag_value(on))
    }

    pub fn favorites_only(&self) -> bool {
        self.store.get(KEY_FAVORITES_ONLY).is_some_and(|v| v == "1")
    }

    pub fn set_favorites_only(&mut self, on: bool) -> Result<()> {
        self.store.set(KEY_FAVORITES_ONLY, flag_value(on))
    }

    pub fn favorites(&self) -> BTreeSet<String> {
        self.store.set_members(SET_FAVORITES)
    }

    pub fn hidden(&self) -> BTreeSet<String> {
        self.store.set_members(SET_HIDDEN)
    }

    pub fn is_favorite(&self, term: &str) -> bool {
        self.store.set_contains(SET_FAVORITES, &term_key(term))
    }

    pub fn is_hidden(&self, term: &str) -> bool {
        self.store.set_contains(SET_HIDDEN, &term_key(term))
    }

    /// Returns the new favorite state of the term.
    pub fn toggle_favorite(&mut self, term: &str) -> Result<bool> {
        let k = term_key(term);
        if self.store.set_remove(SET_FAVORITES, &k)? {
            Ok(false)
        } else {
            self.store.set_insert(SET_FAVORITES, &k)?;
            Ok(true)
        }
    }

    /// Hides the term across all topics and levels.
    pub fn hide(&mut self, term: &str) -> Result<bool> {
        self.store.set_insert(SET_HIDDEN, &term_key(term))
    }

    pub fn reset_hidden(&mut self) -> Result<()> {
        self.store.set_clear(SET_HIDDEN)
    }

    /// The saved level selection, or `Any` when the any-level flag is on.
    pub fn level_filter(&self) -> LevelFilter {
        if self.any_level() {
            LevelFilter::Any
        } else {
            LevelFilter::Level(self.level())
        }
    }

    pub fn filter_state(&self, topic: TopicFilter, level: LevelFilter, favorites_only: bool) -> FilterState {
        FilterState {
            topic,
            level,
            favorites_only,
            favorites: self.favorites().into_iter().collect::<HashSet<_>>(),
            hidden: self.hidden().into_iter().collect::<HashSet<_>>(),
        }
    }

    /// Filters from the saved selections.
    pub fn saved_filter_state(&self) -> FilterState {
        self.filter_state(self.last_topic(), self.level_filter(), self.favorites_only())
    }
}
