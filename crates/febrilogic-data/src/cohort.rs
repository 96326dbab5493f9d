//! Labelled patient cohort loader.
//!
//! Two files: one row per patient with symptom flag columns (plus optional
//! `patient_id` and `label`), and a biomarker file keyed by `patient_id`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use febrilogic_common::entities::disease_key;
use febrilogic_common::{BiomarkerObservation, Result, SymptomObservation};
use febrilogic_engine::PatientEvidence;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{column, csv_reader, require_column};

pub const PATIENT_ID_COLUMN: &str = "patient_id";
pub const LABEL_COLUMN: &str = "label";

/// One labelled patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortPatient {
    pub patient_id: String,
    /// Trimmed, lower-cased true diagnosis; empty when unlabelled.
    pub label: String,
    pub evidence: PatientEvidence,
}

/// Load a cohort from a patient CSV and a biomarker CSV.
pub fn load_cohort(patients_path: &Path, biomarkers_path: &Path, vocabulary: &[String]) -> anyhow::Result<Vec<CohortPatient>> {
    let patients = File::open(patients_path)
        .with_context(|| format!("Failed to open patient file {}", patients_path.display()))?;
    let biomarkers = File::open(biomarkers_path)
        .with_context(|| format!("Failed to open biomarker file {}", biomarkers_path.display()))?;

    let cohort = parse_cohort(patients, biomarkers, vocabulary).with_context(|| {
        format!(
            "Failed to parse cohort {} / {}",
            patients_path.display(),
            biomarkers_path.display()
        )
    })?;

    info!(
        patients_file = %patients_path.display(),
        n_patients = cohort.len(),
        n_with_biomarkers = cohort.iter().filter(|p| !p.evidence.biomarkers.is_empty()).count(),
        "Loaded patient cohort"
    );
    Ok(cohort)
}

/// Parse a cohort.
///
/// A patient without a `patient_id` cell is named `Patient_<n>` (1-based
/// row number). Symptom flags are read for every `vocabulary` symptom with a
/// matching column. A patient with no biomarker row gets no observations.
pub fn parse_cohort<P: Read, B: Read>(patients: P, biomarkers: B, vocabulary: &[String]) -> Result<Vec<CohortPatient>> {
    let observations = parse_biomarker_rows(biomarkers)?;

    let mut reader = csv_reader(patients);
    let headers = reader.headers()?.clone();
    let id_idx = column(&headers, PATIENT_ID_COLUMN);
    let label_idx = column(&headers, LABEL_COLUMN);
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    let missing: Vec<&String> = vocabulary.iter().filter(|s| !columns.contains_key(*s)).collect();
    if !missing.is_empty() {
        debug!(symptoms = ?missing, "Patient file has no column for some symptoms");
    }

    let mut cohort = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let patient_id = id_idx
            .and_then(|i| record.get(i))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Patient_{}", row + 1));
        let label = label_idx.and_then(|i| record.get(i)).map(disease_key).unwrap_or_default();

        let symptoms = SymptomObservation::from_flags(vocabulary, |s| columns.get(s).and_then(|&i| record.get(i)));
        let biomarkers = observations.get(&patient_id).cloned().unwrap_or_default();

        cohort.push(CohortPatient {
            patient_id,
            label,
            evidence: PatientEvidence::new(symptoms).with_biomarkers(biomarkers),
        });
    }
    Ok(cohort)
}

/// patient_id → observations; the first row for a patient wins.
fn parse_biomarker_rows<R: Read>(rdr: R) -> Result<HashMap<String, BiomarkerObservation>> {
    let mut reader = csv_reader(rdr);
    let headers = reader.headers()?.clone();
    let id_idx = require_column(&headers, PATIENT_ID_COLUMN, "patient biomarkers")?;

    let mut observations = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(patient_id) = record.get(id_idx).filter(|id| !id.is_empty()) else {
            continue;
        };
        let cells = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| *i != id_idx)
            .map(|(_, cell)| cell);
        observations
            .entry(patient_id.to_string())
            .or_insert_with(|| BiomarkerObservation::from_cells(cells));
    }
    Ok(observations)
}
