//! End-to-end diagnosis for one patient.
//!
//! exclusions → symptom prior → severity expansion → biomarker refinement →
//! ranking. Each stage returns a new value; the tables are only read.

use febrilogic_common::{
    BiomarkerObservation, DiseaseProbability, DiseaseScore, ProbabilityDistribution, Result, SymptomObservation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::provider::ReferenceTables;
use crate::rank::{rank, top_k};
use crate::scorer::{prior_from_scores, score};
use crate::severity::expand;
use crate::tables::{BiomarkerTable, SymptomWeightTable};
use crate::updater::refine;

/// Everything the engine needs to know about one patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientEvidence {
    /// Diseases already ruled out by testing; removed before scoring.
    #[serde(default)]
    pub negative_diseases: Vec<String>,
    #[serde(default)]
    pub symptoms: SymptomObservation,
    #[serde(default)]
    pub biomarkers: BiomarkerObservation,
}

impl PatientEvidence {
    pub fn new(symptoms: SymptomObservation) -> Self {
        Self {
            symptoms,
            ..Self::default()
        }
    }

    pub fn with_negative(mut self, disease: &str) -> Self {
        self.negative_diseases.push(disease.to_string());
        self
    }

    pub fn with_biomarkers(mut self, biomarkers: BiomarkerObservation) -> Self {
        self.biomarkers = biomarkers;
        self
    }
}

/// Ranked output of one diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Raw symptom scores, table order, after exclusions.
    pub disease_scores: Vec<DiseaseScore>,
    /// Symptom-only distribution, severity-expanded and ranked. Not normalised
    /// when a severity-stratified disease is present.
    pub symptom_probabilities: ProbabilityDistribution,
    /// Biomarker-refined distribution, ranked. Equals `symptom_probabilities`
    /// when the patient has no biomarker observations.
    pub symptom_biomarker_probabilities: ProbabilityDistribution,
    /// Biomarkers that shifted the distribution, in application order.
    pub biomarkers_applied: Vec<String>,
    /// Biomarker at which the refinement collapsed and was reverted, if any.
    pub degenerate_biomarker: Option<String>,
}

impl Diagnosis {
    pub fn top_symptom_only(&self, k: usize) -> &[DiseaseProbability] {
        top_k(&self.symptom_probabilities, k)
    }

    pub fn top_with_biomarkers(&self, k: usize) -> &[DiseaseProbability] {
        top_k(&self.symptom_biomarker_probabilities, k)
    }
}

/// Compute both ranked distributions for one patient.
pub fn calculate_probabilities(
    weights: &SymptomWeightTable,
    stats: &BiomarkerTable,
    patient: &PatientEvidence,
) -> Result<Diagnosis> {
    let candidates = weights.without_diseases(&patient.negative_diseases);
    debug!(
        n_candidates = candidates.len(),
        n_excluded = weights.len() - candidates.len(),
        "Applied negative-test exclusions"
    );

    let disease_scores = score(&candidates, &patient.symptoms)?;
    let prior = prior_from_scores(&disease_scores);
    let expanded = expand(&prior);

    let (refined, biomarkers_applied, degenerate_biomarker) = if patient.biomarkers.is_empty() {
        (expanded.clone(), Vec::new(), None)
    } else {
        let update = refine(&expanded, stats, &patient.biomarkers);
        (update.posterior, update.applied, update.degenerate.map(|d| d.biomarker))
    };

    let diagnosis = Diagnosis {
        disease_scores,
        symptom_probabilities: rank(&expanded),
        symptom_biomarker_probabilities: rank(&refined),
        biomarkers_applied,
        degenerate_biomarker,
    };

    if let Some(top) = diagnosis.symptom_biomarker_probabilities.first() {
        info!(
            top_disease = %top.disease,
            probability = top.probability,
            n_symptoms = patient.symptoms.len(),
            n_biomarkers = diagnosis.biomarkers_applied.len(),
            "Diagnosis complete"
        );
    }

    Ok(diagnosis)
}

/// Diagnosis front-end over an injected table provider.
#[derive(Debug, Clone)]
pub struct DiagnosticEngine<T> {
    tables: T,
}

impl<T: ReferenceTables> DiagnosticEngine<T> {
    pub fn new(tables: T) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &T {
        &self.tables
    }

    pub fn diagnose(&self, patient: &PatientEvidence) -> Result<Diagnosis> {
        calculate_probabilities(self.tables.symptom_weights(), self.tables.biomarker_stats(), patient)
    }
}
