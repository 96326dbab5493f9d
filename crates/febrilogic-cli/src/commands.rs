//! Subcommand implementations. Each returns a serialisable report; `main`
//! prints it.

use std::path::Path;

use anyhow::{bail, Context, Result};
use febrilogic_common::{BiomarkerObservation, DiseaseProbability, SymptomObservation};
use febrilogic_data::load_cohort;
use febrilogic_engine::evaluation::{AccuracyRow, CohortEvaluation, HitCounts, PatientOutcome};
use febrilogic_engine::{Diagnosis, DiagnosticEngine, PatientEvidence, ReferenceTables};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::DiagnoseArgs;

#[derive(Debug, Serialize)]
pub struct DiagnoseReport {
    pub top_symptom_only: Vec<DiseaseProbability>,
    pub top_with_biomarkers: Vec<DiseaseProbability>,
    pub diagnosis: Diagnosis,
}

#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub summary: HitCounts,
    pub accuracy_table: Vec<AccuracyRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<Vec<PatientOutcome>>,
}

pub fn diagnose<T: ReferenceTables>(tables: T, args: &DiagnoseArgs, top_k: usize) -> Result<DiagnoseReport> {
    if top_k == 0 {
        bail!("--top-k must be at least 1");
    }

    let vocabulary = tables.symptom_weights().symptoms();
    for symptom in &args.symptoms {
        if !vocabulary.contains(symptom) {
            warn!(symptom = %symptom, "Unknown symptom ignored");
        }
    }

    let patient = PatientEvidence {
        negative_diseases: args.negative.clone(),
        symptoms: SymptomObservation::new(args.symptoms.iter().cloned()),
        biomarkers: BiomarkerObservation::new(args.biomarkers.iter().cloned()),
    };

    let engine = DiagnosticEngine::new(tables);
    let diagnosis = engine.diagnose(&patient).context("Diagnosis failed")?;

    Ok(DiagnoseReport {
        top_symptom_only: diagnosis.top_symptom_only(top_k).to_vec(),
        top_with_biomarkers: diagnosis.top_with_biomarkers(top_k).to_vec(),
        diagnosis,
    })
}

pub fn evaluate<T: ReferenceTables>(
    tables: T,
    patients: &Path,
    biomarkers: &Path,
    details: bool,
) -> Result<EvaluationReport> {
    let cohort = load_cohort(patients, biomarkers, tables.symptom_weights().symptoms())?;
    let engine = DiagnosticEngine::new(tables);

    let mut evaluation = CohortEvaluation::new();
    for patient in &cohort {
        let diagnosis = engine
            .diagnose(&patient.evidence)
            .with_context(|| format!("Diagnosis failed for patient {}", patient.patient_id))?;
        evaluation.record(PatientOutcome::from_diagnosis(
            &patient.patient_id,
            &patient.label,
            patient.evidence.symptoms.len(),
            &diagnosis,
        ));
    }

    let summary = evaluation.summary();
    info!(
        n_patients = summary.n,
        symptoms_top1 = summary.symptoms_top1,
        biomarkers_top1 = summary.biomarkers_top1,
        "Cohort evaluation complete"
    );

    Ok(EvaluationReport {
        summary,
        accuracy_table: evaluation.accuracy_table(),
        patients: details.then(|| evaluation.outcomes().to_vec()),
    })
}
