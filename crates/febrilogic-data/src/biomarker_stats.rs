//! Pooled biomarker statistics loader.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use febrilogic_common::entities::MISSING_MARKERS;
use febrilogic_common::{FebrilogicError, Result};
use febrilogic_engine::{BiomarkerProfile, BiomarkerStats, BiomarkerTable};
use tracing::{info, warn};

use crate::{csv_reader, require_column, DISEASE_COLUMN};

pub const MEAN_PREFIX: &str = "pooled_mean_";
pub const SD_PREFIX: &str = "pooled_sd_";

/// Load the biomarker statistics table from a CSV file.
pub fn load_biomarker_stats(path: &Path) -> anyhow::Result<BiomarkerTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open biomarker statistics table {}", path.display()))?;
    let table = parse_biomarker_stats(file)
        .with_context(|| format!("Failed to parse biomarker statistics table {}", path.display()))?;

    info!(
        path = %path.display(),
        n_rows = table.rows().len(),
        n_biomarkers = table.biomarkers().len(),
        "Loaded biomarker statistics"
    );
    Ok(table)
}

/// A statistic cell; blank, missing-marker, non-numeric and NaN cells are absent.
fn parse_stat(cell: &str) -> Option<f64> {
    if MISSING_MARKERS.contains(&cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a biomarker statistics table.
///
/// Biomarker ids come from `pooled_mean_<id>` and `pooled_sd_<id>` headers.
/// A biomarker with only one of the two columns gets an absent value for
/// the other half. Columns matching neither prefix are ignored.
pub fn parse_biomarker_stats<R: Read>(rdr: R) -> Result<BiomarkerTable> {
    let mut reader = csv_reader(rdr);
    let headers = reader.headers()?.clone();
    let disease_idx = require_column(&headers, DISEASE_COLUMN, "biomarker statistics")?;

    let mut mean_columns: BTreeMap<String, usize> = BTreeMap::new();
    let mut sd_columns: BTreeMap<String, usize> = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(id) = header.strip_prefix(MEAN_PREFIX) {
            mean_columns.entry(id.to_string()).or_insert(i);
        } else if let Some(id) = header.strip_prefix(SD_PREFIX) {
            sd_columns.entry(id.to_string()).or_insert(i);
        }
    }

    let biomarkers: BTreeSet<&String> = mean_columns.keys().chain(sd_columns.keys()).collect();
    for id in &biomarkers {
        if !mean_columns.contains_key(*id) || !sd_columns.contains_key(*id) {
            warn!(biomarker = %id, "Biomarker has a mean or sd column but not both");
        }
    }

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let disease = record.get(disease_idx).unwrap_or_default();
        if disease.is_empty() {
            return Err(FebrilogicError::InvalidTable(format!(
                "biomarker statistics row {}: empty disease name",
                row + 1
            )));
        }

        let cell = |columns: &BTreeMap<String, usize>, id: &str| {
            columns.get(id).and_then(|&i| record.get(i)).and_then(parse_stat)
        };
        let stats: Vec<(String, BiomarkerStats)> = biomarkers
            .iter()
            .map(|id| {
                let stats = BiomarkerStats {
                    mean: cell(&mean_columns, id.as_str()),
                    sd: cell(&sd_columns, id.as_str()),
                };
                (id.to_string(), stats)
            })
            .collect();
        rows.push(BiomarkerProfile::new(disease, stats));
    }

    let biomarkers = biomarkers.into_iter().cloned().collect();
    Ok(BiomarkerTable::new(biomarkers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "\
disease,pooled_mean_platelets,pooled_sd_platelets,pooled_mean_wbc,pooled_sd_wbc,n_studies
dengue fever severe,40,15,3.5,1.0,4
dengue fever non-severe,120,30,NA,,2
Malaria,150,40,nan,None,7
";

    #[test]
    fn test_pairs_mean_and_sd_columns() {
        let table = parse_biomarker_stats(TABLE.as_bytes()).unwrap();
        assert_eq!(table.biomarkers(), &["platelets".to_string(), "wbc".to_string()]);
        assert_eq!(table.rows().len(), 3);

        let severe = table.profile("Dengue Fever Severe").unwrap();
        assert_eq!(severe.stats("platelets"), BiomarkerStats::new(40.0, 15.0));
        assert_eq!(severe.stats("wbc"), BiomarkerStats::new(3.5, 1.0));
    }

    #[test]
    fn test_missing_markers_are_absent() {
        let table = parse_biomarker_stats(TABLE.as_bytes()).unwrap();
        assert_eq!(table.profile("dengue fever non-severe").unwrap().stats("wbc"), BiomarkerStats::missing());
        assert_eq!(table.profile("malaria").unwrap().stats("wbc"), BiomarkerStats::missing());
        assert!(table.has_usable_stats("wbc"));
    }

    #[test]
    fn test_unpaired_column_leaves_other_half_absent() {
        let csv = "disease,pooled_mean_crp\nMalaria,80\n";
        let table = parse_biomarker_stats(csv.as_bytes()).unwrap();
        let stats = table.profile("Malaria").unwrap().stats("crp");
        assert_eq!(stats.mean, Some(80.0));
        assert_eq!(stats.sd, None);
        assert!(!table.has_usable_stats("crp"));
    }

    #[test]
    fn test_non_numeric_stat_is_absent() {
        let csv = "disease,pooled_mean_crp,pooled_sd_crp\nMalaria,high,5\n";
        let table = parse_biomarker_stats(csv.as_bytes()).unwrap();
        assert_eq!(table.profile("Malaria").unwrap().stats("crp").mean, None);
    }

    #[test]
    fn test_disease_names_are_trimmed_not_recased() {
        let csv = "disease,pooled_mean_crp,pooled_sd_crp\n  dengue fever severe ,1,1\n";
        let table = parse_biomarker_stats(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].disease(), "dengue fever severe");
    }
}
