//! Static reference tables: symptom weights and pooled biomarker statistics.
//!
//! Both are built once from an external source and never mutated. Every
//! derived view (e.g. excluding diseases a patient tested negative for) is a
//! new table.

use std::collections::{BTreeSet, HashMap};

use febrilogic_common::entities::{disease_key, display_name};
use febrilogic_common::{FebrilogicError, Result};
use serde::{Deserialize, Serialize};

// ── Symptom weights ─────────────────────────────────────────────────────────

/// Symptom weights for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseSymptomProfile {
    name: String,
    weights: HashMap<String, f64>,
}

impl DiseaseSymptomProfile {
    /// `name` is normalised to display form ("dengue fever" → "Dengue Fever").
    pub fn new<I, S>(name: &str, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            name: display_name(name),
            weights: weights.into_iter().map(|(s, w)| (s.into(), w)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self, symptom: &str) -> Option<f64> {
        self.weights.get(symptom).copied()
    }

    /// Weight lookup that treats a missing cell as a data-integrity failure.
    pub fn require_weight(&self, symptom: &str) -> Result<f64> {
        self.weight(symptom).ok_or_else(|| FebrilogicError::MalformedProfile {
            disease: self.name.clone(),
            symptom: symptom.to_string(),
        })
    }
}

/// Disease → symptom → weight, with a table-wide ordered symptom vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomWeightTable {
    symptoms: Vec<String>,
    profiles: Vec<DiseaseSymptomProfile>,
}

impl SymptomWeightTable {
    /// Build a table. Profiles are not checked against the vocabulary here;
    /// call [`validate`](Self::validate) or let the scorer report gaps.
    pub fn new(symptoms: Vec<String>, profiles: Vec<DiseaseSymptomProfile>) -> Self {
        Self { symptoms, profiles }
    }

    /// Symptom vocabulary in column order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// Disease profiles in table order.
    pub fn profiles(&self) -> &[DiseaseSymptomProfile] {
        &self.profiles
    }

    pub fn disease_names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// First (disease, symptom) pair lacking a weight, as `MalformedProfile`.
    pub fn validate(&self) -> Result<()> {
        for profile in &self.profiles {
            for symptom in &self.symptoms {
                profile.require_weight(symptom)?;
            }
        }
        Ok(())
    }

    /// New table without the named diseases (case-insensitive), order preserved.
    pub fn without_diseases<S: AsRef<str>>(&self, excluded: &[S]) -> Self {
        let excluded: BTreeSet<String> = excluded.iter().map(|d| disease_key(d.as_ref())).collect();
        Self {
            symptoms: self.symptoms.clone(),
            profiles: self
                .profiles
                .iter()
                .filter(|p| !excluded.contains(&disease_key(&p.name)))
                .cloned()
                .collect(),
        }
    }
}

// ── Biomarker statistics ────────────────────────────────────────────────────

/// Pooled Gaussian parameters for one (disease, biomarker) pair.
/// Either half may be missing in the source data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerStats {
    pub mean: Option<f64>,
    pub sd: Option<f64>,
}

impl BiomarkerStats {
    pub fn new(mean: f64, sd: f64) -> Self {
        Self {
            mean: Some(mean),
            sd: Some(sd),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Usable parameters: both present, finite, and `sd > 0`.
    pub fn params(&self) -> Option<(f64, f64)> {
        match (self.mean, self.sd) {
            (Some(mean), Some(sd)) if mean.is_finite() && sd.is_finite() && sd > 0.0 => Some((mean, sd)),
            _ => None,
        }
    }
}

/// Biomarker statistics for one disease (or severity variant) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerProfile {
    disease: String,
    stats: HashMap<String, BiomarkerStats>,
}

impl BiomarkerProfile {
    /// `disease` is trimmed but keeps its case (rows are keyed by severity
    /// variant names such as "dengue fever severe").
    pub fn new<I, S>(disease: &str, stats: I) -> Self
    where
        I: IntoIterator<Item = (S, BiomarkerStats)>,
        S: Into<String>,
    {
        Self {
            disease: disease.trim().to_string(),
            stats: stats.into_iter().map(|(b, s)| (b.into(), s)).collect(),
        }
    }

    pub fn disease(&self) -> &str {
        &self.disease
    }

    /// Stats for a biomarker; a biomarker the row has no column for is `missing()`.
    pub fn stats(&self, biomarker: &str) -> BiomarkerStats {
        self.stats.get(biomarker).copied().unwrap_or_default()
    }
}

/// Disease → biomarker → (pooled mean, pooled sd).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerTable {
    biomarkers: Vec<String>,
    rows: Vec<BiomarkerProfile>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl BiomarkerTable {
    /// Build a table. The biomarker list is sorted and de-duplicated; when two
    /// rows name the same disease, lookups resolve to the first.
    pub fn new(biomarkers: Vec<String>, rows: Vec<BiomarkerProfile>) -> Self {
        let biomarkers: Vec<String> = biomarkers.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            index.entry(disease_key(&row.disease)).or_insert(i);
        }
        Self { biomarkers, rows, index }
    }

    /// Biomarker identifiers in lexicographic order.
    pub fn biomarkers(&self) -> &[String] {
        &self.biomarkers
    }

    pub fn rows(&self) -> &[BiomarkerProfile] {
        &self.rows
    }

    /// Row for a disease, matched case-insensitively on the trimmed name.
    pub fn profile(&self, disease: &str) -> Option<&BiomarkerProfile> {
        match self.index.get(&disease_key(disease)) {
            Some(&i) => self.rows.get(i),
            // tables rebuilt by deserialisation carry no index
            None if self.index.is_empty() => {
                let key = disease_key(disease);
                self.rows.iter().find(|r| disease_key(&r.disease) == key)
            }
            None => None,
        }
    }

    /// Global data-quality gate: a biomarker is unusable when every row lacks
    /// a mean, or every row lacks a standard deviation.
    pub fn has_usable_stats(&self, biomarker: &str) -> bool {
        let any_mean = self.rows.iter().any(|r| r.stats(biomarker).mean.is_some_and(|m| !m.is_nan()));
        let any_sd = self.rows.iter().any(|r| r.stats(biomarker).sd.is_some_and(|s| !s.is_nan()));
        any_mean && any_sd
    }
}
