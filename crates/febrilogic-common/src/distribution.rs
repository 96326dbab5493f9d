//! Ordered (disease, probability) sequences produced by every engine stage.

use serde::{Deserialize, Serialize};

use crate::entities::same_disease;

/// Tolerance used when checking that a distribution sums to one.
pub const NORMALISATION_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseProbability {
    pub disease: String,
    pub probability: f64,
}

impl DiseaseProbability {
    pub fn new(disease: impl Into<String>, probability: f64) -> Self {
        Self {
            disease: disease.into(),
            probability,
        }
    }
}

/// Ordered probability list. Order is meaningful: it is either table order
/// (before ranking) or descending probability (after ranking).
///
/// A distribution is not required to sum to one; the severity expander
/// deliberately produces one that does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityDistribution {
    entries: Vec<DiseaseProbability>,
}

impl ProbabilityDistribution {
    pub fn new(entries: Vec<DiseaseProbability>) -> Self {
        Self { entries }
    }

    /// Pair names with values positionally. Extra items on either side are dropped.
    pub fn from_parts<S: AsRef<str>>(names: &[S], probabilities: &[f64]) -> Self {
        names
            .iter()
            .zip(probabilities)
            .map(|(n, &p)| DiseaseProbability::new(n.as_ref(), p))
            .collect()
    }

    pub fn entries(&self) -> &[DiseaseProbability] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DiseaseProbability> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiseaseProbability> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.disease.clone()).collect()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.probability).collect()
    }

    /// Probability of a disease, matched case-insensitively.
    pub fn get(&self, disease: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| same_disease(&e.disease, disease))
            .map(|e| e.probability)
    }

    pub fn first(&self) -> Option<&DiseaseProbability> {
        self.entries.first()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    pub fn is_normalised(&self, tolerance: f64) -> bool {
        self.entries.iter().all(|e| e.probability >= 0.0)
            && (self.total() - 1.0).abs() <= tolerance
    }

    /// Divide every probability by the total. Returns an unchanged copy when
    /// the total is not a positive finite number.
    pub fn normalised(&self) -> Self {
        let total = self.total();
        if !(total.is_finite() && total > 0.0) {
            return self.clone();
        }
        self.entries
            .iter()
            .map(|e| DiseaseProbability::new(e.disease.clone(), e.probability / total))
            .collect()
    }
}

impl FromIterator<DiseaseProbability> for ProbabilityDistribution {
    fn from_iter<I: IntoIterator<Item = DiseaseProbability>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ProbabilityDistribution {
    type Item = &'a DiseaseProbability;
    type IntoIter = std::slice::Iter<'a, DiseaseProbability>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
