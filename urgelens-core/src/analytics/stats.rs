//! Small grouping helpers shared by the aggregation passes.
//!
//! Every ratio here is guarded: an empty denominator yields `None`, never
//! a zero or a NaN.

use std::collections::BTreeMap;

/// Running count of boolean hits within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub hits: usize,
    pub total: usize,
}

impl Tally {
    pub fn record(&mut self, hit: bool) {
        self.total += 1;
        if hit {
            self.hits += 1;
        }
    }

    /// Fraction of hits, or `None` when nothing was recorded.
    pub fn rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.hits as f64 / self.total as f64)
        }
    }

    /// Rate as a percentage.
    pub fn pct(&self) -> Option<f64> {
        self.rate().map(|r| r * 100.0)
    }
}

/// Group `(key, hit)` pairs into per-key tallies.
pub fn tally_by<K, I>(items: I) -> BTreeMap<K, Tally>
where
    K: Ord,
    I: IntoIterator<Item = (K, bool)>,
{
    let mut groups: BTreeMap<K, Tally> = BTreeMap::new();
    for (key, hit) in items {
        groups.entry(key).or_default().record(hit);
    }
    groups
}

/// Count occurrences of each key.
pub fn count_by<K, I>(items: I) -> BTreeMap<K, usize>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts = BTreeMap::new();
    for key in items {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Keys ranked by count descending, ties by ascending key, truncated to `limit`.
pub fn top_by_count<K: Ord + Clone>(counts: &BTreeMap<K, usize>, limit: usize) -> Vec<K> {
    let mut ranked: Vec<(&K, usize)> = counts.iter().map(|(k, &c)| (k, c)).collect();
    // Stable sort over key-ordered input keeps ascending keys within a tie.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(k, _)| k.clone())
        .collect()
}

/// Most frequent key; ties go to the smallest key.
pub fn mode<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Option<K> {
    top_by_count(counts, 1).into_iter().next()
}
