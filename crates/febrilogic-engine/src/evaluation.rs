//! Accuracy of the engine against a labelled patient cohort.
//!
//! Each patient's true label is compared with the top-1, top-2 and top-3
//! candidates after symptoms only and after biomarker refinement. Counters
//! are kept overall and per label.

use std::collections::BTreeMap;

use febrilogic_common::entities::disease_key;
use febrilogic_common::{DiseaseProbability, ProbabilityDistribution};
use serde::{Deserialize, Serialize};

use crate::pipeline::Diagnosis;
use crate::rank::{rank, top_names};

/// Deepest top-k cut-off tracked.
pub const EVALUATION_DEPTH: usize = 3;

/// Per-patient evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientOutcome {
    pub patient_id: String,
    /// Trimmed, lower-cased label.
    pub true_label: String,
    pub positive_symptoms: usize,
    /// Comparison keys of the top candidates after symptoms only.
    pub top_symptoms: Vec<String>,
    /// Comparison keys of the top candidates after biomarkers.
    pub top_biomarkers: Vec<String>,
    pub top_diagnosis_symptoms: Option<DiseaseProbability>,
    pub top_diagnosis_biomarkers: Option<DiseaseProbability>,
    pub all_probabilities_symptoms: ProbabilityDistribution,
    pub all_probabilities_biomarkers: ProbabilityDistribution,
}

impl PatientOutcome {
    /// Build an outcome from a diagnosis. The biomarker distribution is
    /// rescaled to sum to one before ranking.
    pub fn from_diagnosis(patient_id: &str, label: &str, positive_symptoms: usize, diagnosis: &Diagnosis) -> Self {
        let symptoms = diagnosis.symptom_probabilities.clone();
        let biomarkers = rank(&diagnosis.symptom_biomarker_probabilities.normalised());

        Self {
            patient_id: patient_id.trim().to_string(),
            true_label: disease_key(label),
            positive_symptoms,
            top_symptoms: top_names(&symptoms, EVALUATION_DEPTH),
            top_biomarkers: top_names(&biomarkers, EVALUATION_DEPTH),
            top_diagnosis_symptoms: symptoms.first().cloned(),
            top_diagnosis_biomarkers: biomarkers.first().cloned(),
            all_probabilities_symptoms: symptoms,
            all_probabilities_biomarkers: biomarkers,
        }
    }

    /// Label appears among the first `k` symptom-only candidates.
    pub fn symptom_hit(&self, k: usize) -> bool {
        self.top_symptoms.iter().take(k).any(|d| *d == self.true_label)
    }

    /// Label appears among the first `k` biomarker-refined candidates.
    pub fn biomarker_hit(&self, k: usize) -> bool {
        self.top_biomarkers.iter().take(k).any(|d| *d == self.true_label)
    }
}

/// Top-k hit counters for one group of patients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts {
    pub n: usize,
    pub symptoms_top1: usize,
    pub symptoms_top2: usize,
    pub symptoms_top3: usize,
    pub biomarkers_top1: usize,
    pub biomarkers_top2: usize,
    pub biomarkers_top3: usize,
}

impl HitCounts {
    fn record(&mut self, outcome: &PatientOutcome) {
        self.n += 1;
        self.symptoms_top1 += usize::from(outcome.symptom_hit(1));
        self.symptoms_top2 += usize::from(outcome.symptom_hit(2));
        self.symptoms_top3 += usize::from(outcome.symptom_hit(3));
        self.biomarkers_top1 += usize::from(outcome.biomarker_hit(1));
        self.biomarkers_top2 += usize::from(outcome.biomarker_hit(2));
        self.biomarkers_top3 += usize::from(outcome.biomarker_hit(3));
    }

    fn merge(mut self, other: &HitCounts) -> Self {
        self.n += other.n;
        self.symptoms_top1 += other.symptoms_top1;
        self.symptoms_top2 += other.symptoms_top2;
        self.symptoms_top3 += other.symptoms_top3;
        self.biomarkers_top1 += other.biomarkers_top1;
        self.biomarkers_top2 += other.biomarkers_top2;
        self.biomarkers_top3 += other.biomarkers_top3;
        self
    }
}

/// Per-label accuracy row, percentages in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRow {
    pub disease: String,
    pub n_patients: usize,
    pub top1_symptoms: f64,
    pub top2_symptoms: f64,
    pub top3_symptoms: f64,
    pub top1_biomarkers: f64,
    pub top2_biomarkers: f64,
    pub top3_biomarkers: f64,
}

fn percent(hits: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        100.0 * hits as f64 / n as f64
    }
}

/// Running evaluation over a cohort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortEvaluation {
    outcomes: Vec<PatientOutcome>,
    per_label: BTreeMap<String, HitCounts>,
}

impl CohortEvaluation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: PatientOutcome) {
        self.per_label
            .entry(outcome.true_label.clone())
            .or_default()
            .record(&outcome);
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[PatientOutcome] {
        &self.outcomes
    }

    pub fn per_label(&self) -> &BTreeMap<String, HitCounts> {
        &self.per_label
    }

    /// Totals across every label.
    pub fn summary(&self) -> HitCounts {
        self.per_label.values().fold(HitCounts::default(), |acc, c| acc.merge(c))
    }

    /// One row per label, sorted by label.
    pub fn accuracy_table(&self) -> Vec<AccuracyRow> {
        self.per_label
            .iter()
            .map(|(disease, c)| AccuracyRow {
                disease: disease.clone(),
                n_patients: c.n,
                top1_symptoms: percent(c.symptoms_top1, c.n),
                top2_symptoms: percent(c.symptoms_top2, c.n),
                top3_symptoms: percent(c.symptoms_top3, c.n),
                top1_biomarkers: percent(c.biomarkers_top1, c.n),
                top2_biomarkers: percent(c.biomarkers_top2, c.n),
                top3_biomarkers: percent(c.biomarkers_top3, c.n),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diagnosis(symptoms: &[(&str, f64)], biomarkers: &[(&str, f64)]) -> Diagnosis {
        let dist = |pairs: &[(&str, f64)]| {
            pairs.iter().map(|(d, p)| DiseaseProbability::new(*d, *p)).collect::<ProbabilityDistribution>()
        };
        Diagnosis {
            disease_scores: vec![],
            symptom_probabilities: dist(symptoms),
            symptom_biomarker_probabilities: dist(biomarkers),
            biomarkers_applied: vec![],
            degenerate_biomarker: None,
        }
    }

    #[test]
    fn test_outcome_normalises_biomarker_distribution() {
        let d = diagnosis(
            &[("dengue fever severe", 0.5), ("dengue fever non-severe", 0.5), ("Malaria", 0.3)],
            &[("dengue fever severe", 0.5), ("dengue fever non-severe", 0.5), ("Malaria", 0.3)],
        );
        let outcome = PatientOutcome::from_diagnosis("P1", "Malaria ", 2, &d);
        assert_eq!(outcome.true_label, "malaria");
        assert!((outcome.all_probabilities_biomarkers.total() - 1.0).abs() < 1e-12);
        assert!((outcome.all_probabilities_symptoms.total() - 1.3).abs() < 1e-12);
        assert_eq!(
            outcome.top_biomarkers,
            vec!["dengue fever severe", "dengue fever non-severe", "malaria"]
        );
    }

    #[test]
    fn test_hits_respect_depth() {
        let d = diagnosis(
            &[("Typhoid", 0.5), ("Malaria", 0.3), ("Leptospirosis", 0.2)],
            &[("Malaria", 0.9), ("Typhoid", 0.1)],
        );
        let outcome = PatientOutcome::from_diagnosis("P1", "malaria", 3, &d);
        assert!(!outcome.symptom_hit(1));
        assert!(outcome.symptom_hit(2));
        assert!(outcome.biomarker_hit(1));
    }

    #[test]
    fn test_cohort_counts_and_table() {
        let mut eval = CohortEvaluation::new();
        let malaria_first = diagnosis(&[("Malaria", 0.6), ("Typhoid", 0.4)], &[("Malaria", 0.7), ("Typhoid", 0.3)]);
        let typhoid_first = diagnosis(&[("Typhoid", 0.6), ("Malaria", 0.4)], &[("Typhoid", 0.7), ("Malaria", 0.3)]);

        eval.record(PatientOutcome::from_diagnosis("P1", "Malaria", 1, &malaria_first));
        eval.record(PatientOutcome::from_diagnosis("P2", "Malaria", 1, &typhoid_first));
        eval.record(PatientOutcome::from_diagnosis("P3", "Typhoid", 1, &typhoid_first));

        let summary = eval.summary();
        assert_eq!(summary.n, 3);
        assert_eq!(summary.symptoms_top1, 2);
        assert_eq!(summary.symptoms_top2, 3);
        assert_eq!(summary.biomarkers_top1, 2);

        let table = eval.accuracy_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].disease, "malaria");
        assert_eq!(table[0].n_patients, 2);
        assert!((table[0].top1_symptoms - 50.0).abs() < 1e-12);
        assert!((table[0].top2_symptoms - 100.0).abs() < 1e-12);
        assert_eq!(table[1].disease, "typhoid");
        assert!((table[1].top1_biomarkers - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_of_empty_group_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
    }
}
