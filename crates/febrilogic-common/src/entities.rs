//! Per-patient observations and disease naming rules shared by the engine,
//! the table loaders and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Disease names
// ---------------------------------------------------------------------------

/// Display form of a disease name: trimmed, each word capitalised.
/// `" dengue fever "` becomes `"Dengue Fever"`.
pub fn display_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Comparison key for a disease name: trimmed and lower-cased.
pub fn disease_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive, whitespace-insensitive disease name equality.
pub fn same_disease(a: &str, b: &str) -> bool {
    disease_key(a) == disease_key(b)
}

// ---------------------------------------------------------------------------
// Symptom observation
// ---------------------------------------------------------------------------

/// Cell values that mark a symptom as present in a flag-encoded patient record.
pub const POSITIVE_FLAGS: [&str; 4] = ["yes", "y", "1", "true"];

/// Symptoms reported positive for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomObservation {
    positive: BTreeSet<String>,
}

impl SymptomObservation {
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positive: symptoms.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a flag-encoded record (symptom column → cell text).
    /// Only columns in `vocabulary` are considered.
    pub fn from_flags<'a, F>(vocabulary: &[String], cell: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let positive = vocabulary
            .iter()
            .filter(|symptom| {
                cell(symptom)
                    .map(|v| POSITIVE_FLAGS.contains(&v.trim().to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        Self { positive }
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.positive.contains(symptom)
    }

    pub fn len(&self) -> usize {
        self.positive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.positive.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Biomarker observation
// ---------------------------------------------------------------------------

/// Cell values treated as "not measured" in biomarker records.
pub const MISSING_MARKERS: [&str; 4] = ["", "NA", "nan", "None"];

/// Sparse biomarker measurements for one patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomarkerObservation {
    values: BTreeMap<String, f64>,
}

impl BiomarkerObservation {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Build from raw text cells, dropping missing markers and unparseable values.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values = cells
            .into_iter()
            .filter(|(_, raw)| !MISSING_MARKERS.contains(&raw.trim()))
            .filter_map(|(name, raw)| raw.trim().parse::<f64>().ok().map(|v| (name.to_string(), v)))
            .collect();
        Self { values }
    }

    pub fn with(mut self, biomarker: &str, value: f64) -> Self {
        self.values.insert(biomarker.to_string(), value);
        self
    }

    pub fn get(&self, biomarker: &str) -> Option<f64> {
        self.values.get(biomarker).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ---------------------------------------------------------------------------
// Raw symptom score
// ---------------------------------------------------------------------------

/// Sum of the weights of a patient's positive symptoms for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseScore {
    pub disease: String,
    pub score: f64,
}
