//! Ranking and top-k accessors.

use std::cmp::Ordering;

use febrilogic_common::entities::disease_key;
use febrilogic_common::{DiseaseProbability, ProbabilityDistribution};

/// Sort descending by probability. The sort is stable, so ties keep their
/// input (table) order; NaN compares equal to everything.
pub fn rank(distribution: &ProbabilityDistribution) -> ProbabilityDistribution {
    let mut entries = distribution.entries().to_vec();
    entries.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap_or(Ordering::Equal));
    ProbabilityDistribution::new(entries)
}

/// First `k` entries; all of them when fewer exist.
pub fn top_k(distribution: &ProbabilityDistribution, k: usize) -> &[DiseaseProbability] {
    let entries = distribution.entries();
    &entries[..k.min(entries.len())]
}

/// Comparison keys (trimmed, lower-case) of the first `k` entries.
pub fn top_names(distribution: &ProbabilityDistribution, k: usize) -> Vec<String> {
    top_k(distribution, k).iter().map(|e| disease_key(&e.disease)).collect()
}
