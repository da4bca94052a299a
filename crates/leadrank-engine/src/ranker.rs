//! Deduplication, stable ordering, and dense ranking.

use std::cmp::Reverse;
use std::collections::HashSet;

use leadrank_core::{OutputRow, RankedLead, ScoredLead};

/// Anything the ranker can order: an identity key and a probability.
pub trait Rankable {
    /// Exact-match identity key used for deduplication.
    fn identity(&self) -> &str;
    fn probability(&self) -> u8;
}

impl Rankable for ScoredLead {
    fn identity(&self) -> &str {
        &self.lead.name
    }

    fn probability(&self) -> u8 {
        self.probability
    }
}

impl Rankable for OutputRow {
    fn identity(&self) -> &str {
        &self.name
    }

    fn probability(&self) -> u8 {
        self.probability
    }
}

/// Keeps the first occurrence of each identity in input order.
///
/// Identity is compared byte-for-byte: `"Jane Doe"` and `"jane doe"` are
/// different people. Returns the kept items and the number dropped.
#[must_use]
pub fn dedupe<T: Rankable>(items: Vec<T>) -> (Vec<T>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for item in items {
        if seen.insert(item.identity().to_owned()) {
            kept.push(item);
        } else {
            tracing::debug!(name = item.identity(), "dropping duplicate lead");
            dropped += 1;
        }
    }

    (kept, dropped)
}

/// Sorts by probability, highest first. Equal probabilities keep their
/// relative input order (`sort_by_key` is stable).
pub fn sort_by_probability<T: Rankable>(items: &mut [T]) {
    items.sort_by_key(|item| Reverse(item.probability()));
}

/// Ranked leads and the number of duplicates dropped on the way.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub leads: Vec<RankedLead>,
    pub duplicates: usize,
}

/// Dedupes, sorts, and assigns dense 1-based ranks.
#[must_use]
pub fn rank_leads(leads: Vec<ScoredLead>) -> Ranking {
    let (mut kept, duplicates) = dedupe(leads);
    sort_by_probability(&mut kept);

    let leads = kept
        .into_iter()
        .enumerate()
        .map(|(idx, scored)| RankedLead {
            rank: idx + 1,
            scored,
        })
        .collect();

    Ranking { leads, duplicates }
}

/// Re-applies dedupe, ordering, and ranking to an already-projected table.
///
/// Ranking a table this function produced returns it unchanged.
#[must_use]
pub fn rerank_rows(rows: Vec<OutputRow>) -> Vec<OutputRow> {
    let (mut kept, _) = dedupe(rows);
    sort_by_probability(&mut kept);
    for (idx, row) in kept.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    kept
}

/// Projects ranked leads onto the fixed output schema.
#[must_use]
pub fn project(leads: &[RankedLead]) -> Vec<OutputRow> {
    leads.iter().map(RankedLead::to_output_row).collect()
}
