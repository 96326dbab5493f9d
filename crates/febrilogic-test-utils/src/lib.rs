//! Shared fixtures for FebriLogic tests.
//!
//! Small hand-written tables for end-to-end scenarios, plus seeded random
//! table generators for property-style checks.

use febrilogic_common::{BiomarkerObservation, ProbabilityDistribution, SymptomObservation};
use febrilogic_engine::{BiomarkerProfile, BiomarkerStats, BiomarkerTable, DiseaseSymptomProfile, SymptomWeightTable};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Scenario fixtures
// ---------------------------------------------------------------------------

/// Three diseases over {fever, rash}.
pub fn scenario_weights() -> SymptomWeightTable {
    SymptomWeightTable::new(
        vec!["fever".into(), "rash".into()],
        vec![
            DiseaseSymptomProfile::new("Dengue Fever", [("fever", 2.0), ("rash", 1.0)]),
            DiseaseSymptomProfile::new("Malaria", [("fever", 1.0), ("rash", 0.0)]),
            DiseaseSymptomProfile::new("Typhoid", [("fever", 0.5), ("rash", 0.5)]),
        ],
    )
}

/// Dengue against a single competitor on {fever, headache}.
pub fn dengue_vs_malaria_weights() -> SymptomWeightTable {
    SymptomWeightTable::new(
        vec!["fever".into(), "headache".into()],
        vec![
            DiseaseSymptomProfile::new("Dengue Fever", [("fever", 1.0), ("headache", 1.0)]),
            DiseaseSymptomProfile::new("Malaria", [("fever", 1.0), ("headache", 1.0)]),
        ],
    )
}

/// Platelet statistics peaking for both dengue variants at 50 and for
/// malaria at 200.
pub fn platelet_stats() -> BiomarkerTable {
    BiomarkerTable::new(
        vec!["platelets".into()],
        vec![
            BiomarkerProfile::new("dengue fever severe", [("platelets", BiomarkerStats::new(50.0, 10.0))]),
            BiomarkerProfile::new("dengue fever non-severe", [("platelets", BiomarkerStats::new(50.0, 10.0))]),
            BiomarkerProfile::new("Malaria", [("platelets", BiomarkerStats::new(200.0, 10.0))]),
        ],
    )
}

pub fn symptoms(ids: &[&str]) -> SymptomObservation {
    SymptomObservation::new(ids.iter().copied())
}

// ---------------------------------------------------------------------------
// Random tables
// ---------------------------------------------------------------------------

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn symptom_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("symptom_{i}")).collect()
}

pub fn disease_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Disease {i}")).collect()
}

pub fn biomarker_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("marker_{i}")).collect()
}

/// Fully populated weight table with weights in [0, 5).
pub fn random_symptom_table<R: Rng>(rng: &mut R, n_diseases: usize, n_symptoms: usize) -> SymptomWeightTable {
    let vocabulary = symptom_ids(n_symptoms);
    let profiles = disease_names(n_diseases)
        .iter()
        .map(|name| {
            let weights: Vec<(String, f64)> = vocabulary
                .iter()
                .map(|s| (s.clone(), rng.gen_range(0.0..5.0)))
                .collect();
            DiseaseSymptomProfile::new(name, weights)
        })
        .collect();
    SymptomWeightTable::new(vocabulary, profiles)
}

/// Biomarker table with one row per disease name. Roughly one cell in ten
/// is left missing.
pub fn random_biomarker_table<R: Rng>(rng: &mut R, diseases: &[String], n_biomarkers: usize) -> BiomarkerTable {
    let biomarkers = biomarker_ids(n_biomarkers);
    let rows = diseases
        .iter()
        .map(|disease| {
            let stats: Vec<(String, BiomarkerStats)> = biomarkers
                .iter()
                .filter_map(|b| {
                    if rng.gen_bool(0.1) {
                        return None;
                    }
                    let stats = BiomarkerStats::new(rng.gen_range(0.0..100.0), rng.gen_range(1.0..20.0));
                    Some((b.clone(), stats))
                })
                .collect();
            BiomarkerProfile::new(disease, stats)
        })
        .collect();
    BiomarkerTable::new(biomarkers, rows)
}

/// Each vocabulary symptom positive with probability one half.
pub fn random_symptoms<R: Rng>(rng: &mut R, vocabulary: &[String]) -> SymptomObservation {
    SymptomObservation::new(vocabulary.iter().filter(|_| rng.gen_bool(0.5)).cloned())
}

/// Values in [0, 100) for a random subset of `biomarkers`.
pub fn random_biomarkers<R: Rng>(rng: &mut R, biomarkers: &[String]) -> BiomarkerObservation {
    let values: Vec<(String, f64)> = biomarkers
        .iter()
        .filter_map(|b| rng.gen_bool(0.7).then(|| (b.clone(), rng.gen_range(0.0..100.0))))
        .collect();
    BiomarkerObservation::new(values)
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Same names in the same order, probabilities within `tolerance`.
pub fn assert_distributions_close(left: &ProbabilityDistribution, right: &ProbabilityDistribution, tolerance: f64) {
    assert_eq!(left.names(), right.names());
    for (l, r) in left.iter().zip(right.iter()) {
        assert!(
            (l.probability - r.probability).abs() <= tolerance,
            "{}: {} vs {}",
            l.disease,
            l.probability,
            r.probability
        );
    }
}
