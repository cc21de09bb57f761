mod helpers;

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use wordcards_backend::catalog::Catalog;
use wordcards_backend::selector::{fallback_pool, primary_pool, select, select_with_fallback};
use wordcards_backend::types::{CefrLevel, FilterState, LevelFilter, PoolKind, TopicFilter};

use helpers::{catalog_of, entry};

const OPINION: &str = "Opinion & Argument";

fn mixed_catalog() -> Catalog {
    catalog_of(vec![
        entry("argue", "verb", "B1", OPINION),
        entry("claim", "noun", "B2", OPINION),
        entry("point of view", "phrase", "B1", OPINION),
        entry("assume", "verb", "B2", "Doubt"),
        entry("doubt", "noun", "A2", "Doubt"),
        entry("perhaps", "adverb", "A2", "Doubt"),
        entry("reliable", "adjective", "B1", "Personal Qualities"),
    ])
}

fn topic(t: &str) -> TopicFilter {
    TopicFilter::Topic(t.to_string())
}

fn filters(topic: TopicFilter, level: LevelFilter) -> FilterState {
    FilterState {
        topic,
        level,
        ..FilterState::default()
    }
}

#[test]
fn test_sample_never_exceeds_pool_or_size() {
    let catalog = mixed_catalog();
    let mut rng = StdRng::seed_from_u64(3);

    for n in 0..10 {
        let res = select(&catalog, &FilterState::default(), n, &mut rng);
        assert_eq!(res.len(), n.min(catalog.len()));
        let keys: HashSet<String> = res.iter().map(|e| e.dedup_key()).collect();
        assert_eq!(keys.len(), res.len());
    }
}

#[test]
fn test_zero_sample_size_stays_on_primary_pool() {
    let catalog = mixed_catalog();
    let f = filters(topic(OPINION), LevelFilter::Level(CefrLevel::B1));
    assert!(!primary_pool(&catalog, &f).is_empty());

    let mut rng = StdRng::seed_from_u64(5);
    let sel = select_with_fallback(&catalog, &f, 0, &mut rng);
    assert_eq!(sel.pool, PoolKind::Primary);
    assert!(sel.is_empty());
}

#[test]
fn test_topic_and_level_filters() {
    let catalog = mixed_catalog();
    let f = filters(topic(OPINION), LevelFilter::Level(CefrLevel::B1));
    let pool = primary_pool(&catalog, &f);
    let terms: HashSet<&str> = pool.iter().map(|e| e.term.as_str()).collect();
    assert_eq!(terms, HashSet::from(["argue", "point of view"]));

    let mut rng = StdRng::seed_from_u64(11);
    let sel = select_with_fallback(&catalog, &f, 5, &mut rng);
    assert_eq!(sel.pool, PoolKind::Primary);
    assert_eq!(sel.len(), 2);
    assert!(sel.entries.iter().all(|e| e.topic == OPINION && e.level == "B1"));
}

#[test]
fn test_all_topics_any_level() {
    let catalog = mixed_catalog();
    let pool = primary_pool(&catalog, &filters(TopicFilter::All, LevelFilter::Any));
    assert_eq!(pool.len(), catalog.len());
}

#[test]
fn test_hidden_terms_are_excluded() {
    let catalog = mixed_catalog();
    let mut f = filters(TopicFilter::Topic("Doubt".to_string()), LevelFilter::Any);
    f.hidden.insert("assume".to_string());
    f.hidden.insert("perhaps".to_string());

    let mut rng = StdRng::seed_from_u64(5);
    let res = select(&catalog, &f, 5, &mut rng);
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].term, "doubt");
}

#[test]
fn test_favorites_only() {
    let catalog = mixed_catalog();
    let mut f = filters(TopicFilter::All, LevelFilter::Any);
    f.favorites_only = true;
    f.favorites.insert("claim".to_string());
    f.favorites.insert("reliable".to_string());

    let pool = primary_pool(&catalog, &f);
    let terms: HashSet<&str> = pool.iter().map(|e| e.term.as_str()).collect();
    assert_eq!(terms, HashSet::from(["claim", "reliable"]));

    // favorites are ignored when the flag is off
    f.favorites_only = false;
    assert_eq!(primary_pool(&catalog, &f).len(), catalog.len());
}

#[test]
fn test_fallback_ignores_level() {
    let catalog = catalog_of(vec![
        entry("argue", "verb", "B1", OPINION),
        entry("debate", "noun", "B1", OPINION),
        entry("assume", "verb", "B1", "Doubt"),
    ]);
    let f = filters(topic(OPINION), LevelFilter::Level(CefrLevel::A1));

    let mut rng = StdRng::seed_from_u64(9);
    let sel = select_with_fallback(&catalog, &f, 5, &mut rng);
    assert_eq!(sel.pool, PoolKind::Fallback);
    assert_eq!(sel.len(), 2);
    assert!(sel.entries.iter().all(|e| e.topic == OPINION));
}

#[test]
fn test_fallback_ignores_hidden_and_favorites() {
    let catalog = catalog_of(vec![
        entry("argue", "verb", "B1", OPINION),
        entry("debate", "noun", "B1", OPINION),
    ]);
    let mut f = filters(topic(OPINION), LevelFilter::Any);
    f.hidden.insert("argue".to_string());
    f.hidden.insert("debate".to_string());

    assert!(primary_pool(&catalog, &f).is_empty());
    assert_eq!(fallback_pool(&catalog, &f).len(), 2);

    let mut rng = StdRng::seed_from_u64(1);
    let sel = select_with_fallback(&catalog, &f, 5, &mut rng);
    assert_eq!(sel.pool, PoolKind::Fallback);
    assert_eq!(sel.len(), 2);

    let mut f = filters(topic(OPINION), LevelFilter::Any);
    f.favorites_only = true;
    let sel = select_with_fallback(&catalog, &f, 1, &mut rng);
    assert_eq!(sel.pool, PoolKind::Fallback);
    assert_eq!(sel.len(), 1);
}

#[test]
fn test_fallback_can_be_empty() {
    let catalog = mixed_catalog();
    let f = filters(topic("No Such Topic"), LevelFilter::Level(CefrLevel::C2));
    let mut rng = StdRng::seed_from_u64(2);
    let sel = select_with_fallback(&catalog, &f, 5, &mut rng);
    assert_eq!(sel.pool, PoolKind::Fallback);
    assert!(sel.is_empty());
}

#[test]
fn test_empty_catalog() {
    let catalog = Catalog::new();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(select(&catalog, &FilterState::default(), 5, &mut rng).is_empty());

    let f = filters(topic(OPINION), LevelFilter::Level(CefrLevel::B2));
    assert!(select(&catalog, &f, 5, &mut rng).is_empty());
}

#[test]
fn test_duplicate_scenario() {
    let catalog = catalog_of(vec![
        entry("assume", "", "B2", "Doubt"),
        entry("assume", "", "B2", "Doubt"),
    ]);
    assert_eq!(catalog.len(), 1);

    let mut rng = StdRng::seed_from_u64(4);
    let res = select(&catalog, &FilterState::default(), 5, &mut rng);
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].term, "assume");
}

#[test]
fn test_same_seed_same_selection() {
    let catalog = mixed_catalog();
    let a = select(&catalog, &FilterState::default(), 3, &mut StdRng::seed_from_u64(77));
    let b = select(&catalog, &FilterState::default(), 3, &mut StdRng::seed_from_u64(77));
    assert_eq!(a, b);
}

#[test]
fn test_selection_does_not_touch_catalog() {
    let catalog = mixed_catalog();
    let before = catalog.clone();
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..5 {
        let _ = select(&catalog, &FilterState::default(), 3, &mut rng);
    }
    assert_eq!(catalog, before);
}
