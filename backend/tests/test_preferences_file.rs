mod helpers;

use std::fs;

use serial_test::serial;
use tempfile::tempdir;

use wordcards_backend::app_settings::ThemeName;
use wordcards_backend::preferences::{JsonFilePreferences, PreferencesStore, UserPreferences, SET_HIDDEN};
use wordcards_backend::sources::{configured_sources, default_sources, SOURCES_FILE_NAME};
use wordcards_backend::types::TopicFilter;

use helpers::test_setup;

#[test]
#[serial]
fn test_preferences_survive_reopen() {
    test_setup();
    let dir = tempdir().unwrap();

    {
        let mut p = UserPreferences::new(JsonFilePreferences::open_in_dir(dir.path()));
        p.set_theme(ThemeName::Light).unwrap();
        p.set_last_topic(&TopicFilter::Topic("Doubt".to_string())).unwrap();
        p.set_level_index(4).unwrap();
        p.set_any_level(true).unwrap();
        p.toggle_favorite("Claim").unwrap();
        p.hide("maybe").unwrap();
    }

    let p = UserPreferences::new(JsonFilePreferences::open_in_dir(dir.path()));
    assert_eq!(p.theme(), ThemeName::Light);
    assert_eq!(p.last_topic(), TopicFilter::Topic("Doubt".to_string()));
    assert_eq!(p.level_index(), 4);
    assert!(p.any_level());
    assert!(p.is_favorite("claim"));
    assert!(p.is_hidden("MAYBE"));
}

#[test]
#[serial]
fn test_missing_and_corrupt_files_start_empty() {
    test_setup();
    let dir = tempdir().unwrap();

    let store = JsonFilePreferences::open_in_dir(dir.path());
    assert!(!store.has("theme"));

    fs::write(store.path(), "{ not json").unwrap();
    let mut store = JsonFilePreferences::open_in_dir(dir.path());
    assert!(store.set_members(SET_HIDDEN).is_empty());

    // the next change replaces the corrupt file
    store.set_insert(SET_HIDDEN, "argue").unwrap();
    let store = JsonFilePreferences::open_in_dir(dir.path());
    assert!(store.set_contains(SET_HIDDEN, "argue"));
}

#[test]
#[serial]
fn test_failed_save_leaves_state_unchanged() {
    test_setup();
    let dir = tempdir().unwrap();
    // a file where the preferences folder should be, so every save fails
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let mut store = JsonFilePreferences::open(&blocker.join("preferences.json"));
    assert!(store.set("theme", "light").is_err());
    assert!(!store.has("theme"));

    assert!(store.set_insert(SET_HIDDEN, "argue").is_err());
    assert!(!store.set_contains(SET_HIDDEN, "argue"));
    assert!(store.set_members(SET_HIDDEN).is_empty());
}

#[test]
#[serial]
fn test_sources_file() {
    test_setup();
    let dir = tempdir().unwrap();
    assert_eq!(configured_sources(dir.path()), default_sources());

    fs::write(
        dir.path().join(SOURCES_FILE_NAME),
        r#"[{"location": "https://example.org/idioms.json", "topic": "Idioms"}]"#,
    ).unwrap();
    let sources = configured_sources(dir.path());
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].topic, "Idioms");

    fs::write(dir.path().join(SOURCES_FILE_NAME), "[{]").unwrap();
    assert_eq!(configured_sources(dir.path()), default_sources());
}
