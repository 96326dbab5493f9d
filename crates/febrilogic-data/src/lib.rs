//! CSV loading for the FebriLogic reference tables and patient cohorts.
//!
//! Data sources:
//! - symptom weight table: `disease` column plus one weight column per symptom
//! - biomarker statistics table: `disease` column plus
//!   `pooled_mean_<id>` / `pooled_sd_<id>` column pairs
//! - cohort: a patient CSV with symptom flags and a biomarker CSV keyed by
//!   `patient_id`
//!
//! `parse_*` functions work on any reader and return typed errors;
//! `load_*` functions open files and attach the path as context.

pub mod biomarker_stats;
pub mod cohort;
pub mod symptom_weights;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use febrilogic_common::FebrilogicError;
use febrilogic_engine::severity::{is_severity_stratified, variant_names};
use febrilogic_engine::{BiomarkerTable, ReferenceTables, SymptomWeightTable};
use tracing::{info, warn};

pub use biomarker_stats::{load_biomarker_stats, parse_biomarker_stats};
pub use cohort::{load_cohort, parse_cohort, CohortPatient};
pub use symptom_weights::{load_symptom_weights, parse_symptom_weights};

/// Name of the disease key column in both reference tables.
pub const DISEASE_COLUMN: &str = "disease";

/// Reader with every field trimmed.
pub(crate) fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

/// Position of a column, matched case-insensitively.
pub(crate) fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

pub(crate) fn require_column(
    headers: &csv::StringRecord,
    name: &str,
    table: &str,
) -> febrilogic_common::Result<usize> {
    column(headers, name)
        .ok_or_else(|| FebrilogicError::InvalidTable(format!("{table}: missing '{name}' column")))
}

// ── Reference data ──────────────────────────────────────────────────────────

/// Both reference tables, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    weights: SymptomWeightTable,
    stats: BiomarkerTable,
    /// When the tables were loaded
    loaded_at: DateTime<Utc>,
    /// Source file paths
    sources: Vec<PathBuf>,
}

impl ReferenceData {
    /// Load both tables from CSV files.
    pub fn load(weights_path: &Path, stats_path: &Path) -> Result<Self> {
        info!(
            weights_file = %weights_path.display(),
            stats_file = %stats_path.display(),
            "Loading reference tables"
        );

        let weights = load_symptom_weights(weights_path)?;
        let stats = load_biomarker_stats(stats_path)?;

        let data = Self {
            weights,
            stats,
            loaded_at: Utc::now(),
            sources: vec![weights_path.to_path_buf(), stats_path.to_path_buf()],
        };
        data.warn_on_uncovered_diseases();
        Ok(data)
    }

    /// Wrap tables built in memory.
    pub fn from_tables(weights: SymptomWeightTable, stats: BiomarkerTable) -> Self {
        Self {
            weights,
            stats,
            loaded_at: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Candidate names (after severity expansion) with no biomarker row.
    /// Such candidates always get an uninformative likelihood.
    pub fn uncovered_diseases(&self) -> Vec<String> {
        self.weights
            .disease_names()
            .iter()
            .flat_map(|name| {
                if is_severity_stratified(name) {
                    let (severe, non_severe) = variant_names(name);
                    vec![severe, non_severe]
                } else {
                    vec![name.clone()]
                }
            })
            .filter(|candidate| self.stats.profile(candidate).is_none())
            .collect()
    }

    fn warn_on_uncovered_diseases(&self) {
        let uncovered = self.uncovered_diseases();
        if !uncovered.is_empty() {
            warn!(
                n_uncovered = uncovered.len(),
                diseases = ?uncovered,
                "Some candidates have no biomarker statistics row"
            );
        }
    }
}

impl ReferenceTables for ReferenceData {
    fn symptom_weights(&self) -> &SymptomWeightTable {
        &self.weights
    }

    fn biomarker_stats(&self) -> &BiomarkerTable {
        &self.stats
    }
}
