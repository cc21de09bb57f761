use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app_settings::ThemeName;
use crate::catalog::Catalog;
use crate::fetch::{DefaultFetcher, SourceFetcher};
use crate::loader;
use crate::logger::{debug, info, warn};
use crate::preferences::{JsonFilePreferences, PreferencesStore, UserPreferences};
use crate::selector::select_with_fallback;
use crate::sources::{configured_sources, topic_labels};
use crate::types::{FilterState, PoolKind, Selection, Source, TopicFilter};
use crate::DEFAULT_SAMPLE_SIZE;

/// One user session: the configured sources, the catalog built from them on
/// the first generate request, and the user's preferences.
pub struct WordSession<S: PreferencesStore> {
    sources: Vec<Source>,
    fetcher: Box<dyn SourceFetcher>,
    catalog: Option<Catalog>,
    prefs: UserPreferences<S>,
    rng: StdRng,
    sample_size: usize,
}

impl<S: PreferencesStore> WordSession<S> {
    pub fn new(sources: Vec<Source>, fetcher: Box<dyn SourceFetcher>, prefs: UserPreferences<S>) -> Self {
        WordSession {
            sources,
            fetcher,
            catalog: None,
            prefs,
            rng: StdRng::from_entropy(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Makes sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_sample_size(&mut self, sample_size: usize) {
        self.sample_size = sample_size;
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Topic labels of the configured sources, for the topic selector.
    pub fn topics(&self) -> Vec<String> {
        topic_labels(&self.sources)
    }

    /// Parses a topic value, failing for labels no source is configured with.
    pub fn resolve_topic(&self, value: &str) -> Result<TopicFilter> {
        let topic = TopicFilter::from_value(value);
        if let TopicFilter::Topic(ref t) = topic {
            if !self.topics().contains(t) {
                bail!("Unknown topic: {}. See the topics command.", t);
            }
        }
        Ok(topic)
    }

    /// Resets the saved topic to all topics when it is no longer configured.
    /// Returns the saved topic after the check.
    pub fn forget_unknown_topic(&mut self) -> Result<TopicFilter> {
        let saved = self.prefs.last_topic();
        if let TopicFilter::Topic(ref t) = saved {
            if !self.topics().contains(t) {
                warn(&format!("Saved topic '{}' is not configured, using all topics", t));
                self.prefs.set_last_topic(&TopicFilter::All)?;
                return Ok(TopicFilter::All);
            }
        }
        Ok(saved)
    }

    pub fn preferences(&self) -> &UserPreferences<S> {
        &self.prefs
    }

    pub fn preferences_mut(&mut self) -> &mut UserPreferences<S> {
        &mut self.prefs
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// The session catalog, loading it if this is the first use.
    pub fn catalog(&mut self) -> &Catalog {
        let sources = &self.sources;
        let fetcher = &self.fetcher;
        self.catalog.get_or_insert_with(|| loader::load(sources, fetcher.as_ref()))
    }

    /// Loads the catalog if needed, then samples it with the given filters.
    pub fn generate(&mut self, filters: &FilterState) -> Selection {
        let sources = &self.sources;
        let fetcher = &self.fetcher;
        let catalog = self.catalog.get_or_insert_with(|| loader::load(sources, fetcher.as_ref()));

        let selection = select_with_fallback(catalog, filters, self.sample_size, &mut self.rng);

        match selection.pool {
            PoolKind::Primary => debug(&format!("Selected {} entries", selection.len())),
            PoolKind::Fallback => info(&format!(
                "No entries matched the filters, selected {} entries of topic '{}'",
                selection.len(),
                filters.topic.as_value()
            )),
        }

        selection
    }

    /// Generates with the saved topic, level and favorites-only selections.
    pub fn generate_saved(&mut self) -> Selection {
        let filters = self.prefs.saved_filter_state();
        self.generate(&filters)
    }

    pub fn toggle_favorite(&mut self, term: &str) -> Result<bool> {
        self.prefs.toggle_favorite(term)
    }

    pub fn hide(&mut self, term: &str) -> Result<bool> {
        self.prefs.hide(term)
    }

    pub fn reset_hidden(&mut self) -> Result<()> {
        self.prefs.reset_hidden()
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeName> {
        self.prefs.toggle_theme()
    }
}

/// A session over the data directory: `sources.json` (or the built-in
/// sources), files relative to the directory, and `preferences.json`.
pub fn open_session(dir: &Path, timeout: Duration) -> WordSession<JsonFilePreferences> {
    let sources = configured_sources(dir);
    let fetcher = DefaultFetcher::new(dir, timeout);
    let prefs = UserPreferences::new(JsonFilePreferences::open_in_dir(dir));
    WordSession::new(sources, Box::new(fetcher), prefs)
}
