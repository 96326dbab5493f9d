//! Symptom and biomarker probability engine.
//!
//! Stages, leaves first: reference tables → symptom scorer → severity
//! expander → biomarker likelihoods → Bayesian updater → ranker. The
//! `pipeline` module wires them into a single diagnosis per patient.

pub mod tables;
pub mod scorer;
pub mod severity;
pub mod likelihood;
pub mod updater;
pub mod rank;
pub mod provider;
pub mod pipeline;
pub mod evaluation;

pub use pipeline::{calculate_probabilities, Diagnosis, DiagnosticEngine, PatientEvidence};
pub use provider::{ReferenceTables, StaticTables};
pub use tables::{BiomarkerProfile, BiomarkerStats, BiomarkerTable, DiseaseSymptomProfile, SymptomWeightTable};
