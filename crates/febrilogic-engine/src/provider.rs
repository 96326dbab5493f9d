//! Trait for reference table access.
//!
//! The engine never reaches for ambient global tables; callers inject a
//! provider. Tables are read-only, so one provider can back any number of
//! concurrent diagnoses.

use std::sync::Arc;

use crate::tables::{BiomarkerTable, SymptomWeightTable};

/// Source of the two static reference tables.
///
/// Implementations can use:
/// - CSV files loaded at startup
/// - Synthetic tables (testing)
pub trait ReferenceTables: Send + Sync {
    /// Disease → symptom weights.
    fn symptom_weights(&self) -> &SymptomWeightTable;

    /// Disease → biomarker → pooled (mean, sd).
    fn biomarker_stats(&self) -> &BiomarkerTable;
}

// ── In-memory implementation ────────────────────────────────────────────────

/// Owned pair of tables.
#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    weights: SymptomWeightTable,
    stats: BiomarkerTable,
}

impl StaticTables {
    pub fn new(weights: SymptomWeightTable, stats: BiomarkerTable) -> Self {
        Self { weights, stats }
    }
}

impl ReferenceTables for StaticTables {
    fn symptom_weights(&self) -> &SymptomWeightTable {
        &self.weights
    }

    fn biomarker_stats(&self) -> &BiomarkerTable {
        &self.stats
    }
}

impl<T: ReferenceTables + ?Sized> ReferenceTables for Arc<T> {
    fn symptom_weights(&self) -> &SymptomWeightTable {
        (**self).symptom_weights()
    }

    fn biomarker_stats(&self) -> &BiomarkerTable {
        (**self).biomarker_stats()
    }
}

impl<T: ReferenceTables + ?Sized> ReferenceTables for &T {
    fn symptom_weights(&self) -> &SymptomWeightTable {
        (**self).symptom_weights()
    }

    fn biomarker_stats(&self) -> &BiomarkerTable {
        (**self).biomarker_stats()
    }
}
