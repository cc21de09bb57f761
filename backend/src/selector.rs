use rand::Rng;

use crate::catalog::Catalog;
use crate::types::{CatalogEntry, FilterState, PoolKind, Selection};

/// Entries of the catalog matching every filter.
pub fn primary_pool<'a>(catalog: &'a Catalog, filters: &FilterState) -> Vec<&'a CatalogEntry> {
    catalog
        .iter()
        .filter(|e| !filters.hidden.contains(&e.term_key()))
        .filter(|e| !filters.favorites_only || filters.favorites.contains(&e.term_key()))
        .filter(|e| filters.topic.matches(e))
        .filter(|e| filters.level.matches(e))
        .collect()
}

/// Entries of the catalog matching the topic filter only.
///
/// Level, favorites and hidden terms are ignored here.
pub fn fallback_pool<'a>(catalog: &'a Catalog, filters: &FilterState) -> Vec<&'a CatalogEntry> {
    catalog.iter().filter(|e| filters.topic.matches(e)).collect()
}

/// Draws `min(n, items.len())` items without replacement, in shuffled order.
///
/// Fisher-Yates from the last index down to 1, swapping `i` with a uniform
/// `j` in `0..=i`, then the first `n` are taken.
pub fn sample_unique<T, R>(items: &[T], n: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut a = items.to_vec();
    for i in (1..a.len()).rev() {
        let j = rng.gen_range(0..=i);
        a.swap(i, j);
    }
    a.truncate(n);
    a
}

/// Samples from the primary pool, or from the fallback pool when the primary pool is empty.
pub fn select_with_fallback<R>(
    catalog: &Catalog,
    filters: &FilterState,
    sample_size: usize,
    rng: &mut R,
) -> Selection
where
    R: Rng + ?Sized,
{
    let pool = primary_pool(catalog, filters);
    if !pool.is_empty() {
        return Selection {
            entries: sample_unique(&pool, sample_size, rng).into_iter().cloned().collect(),
            pool: PoolKind::Primary,
        };
    }

    let alt = fallback_pool(catalog, filters);
    Selection {
        entries: sample_unique(&alt, sample_size, rng).into_iter().cloned().collect(),
        pool: PoolKind::Fallback,
    }
}

pub fn select<R>(
    catalog: &Catalog,
    filters: &FilterState,
    sample_size: usize,
    rng: &mut R,
) -> Vec<CatalogEntry>
where
    R: Rng + ?Sized,
{
    select_with_fallback(catalog, filters, sample_size, rng).entries
}
