//! Symptom weight table loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use febrilogic_common::{FebrilogicError, Result};
use febrilogic_engine::{DiseaseSymptomProfile, SymptomWeightTable};
use tracing::{debug, info};

use crate::{csv_reader, require_column, DISEASE_COLUMN};

/// Load the symptom weight table from a CSV file.
pub fn load_symptom_weights(path: &Path) -> anyhow::Result<SymptomWeightTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open symptom weight table {}", path.display()))?;
    let table = parse_symptom_weights(file)
        .with_context(|| format!("Failed to parse symptom weight table {}", path.display()))?;

    info!(
        path = %path.display(),
        n_diseases = table.len(),
        n_symptoms = table.symptoms().len(),
        "Loaded symptom weights"
    );
    Ok(table)
}

/// Parse a symptom weight table.
///
/// Every column other than `disease` is a symptom, in header order. Every
/// weight cell must hold a finite number.
pub fn parse_symptom_weights<R: Read>(rdr: R) -> Result<SymptomWeightTable> {
    let mut reader = csv_reader(rdr);
    let headers = reader.headers()?.clone();
    let disease_idx = require_column(&headers, DISEASE_COLUMN, "symptom weights")?;

    let symptom_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != disease_idx)
        .map(|(i, h)| (i, h.to_string()))
        .collect();
    if symptom_columns.is_empty() {
        return Err(FebrilogicError::InvalidTable(
            "symptom weights: no symptom columns".to_string(),
        ));
    }
    debug!(n_symptoms = symptom_columns.len(), "Parsed symptom weight header");

    let mut profiles = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let row = row + 1;
        let disease = record.get(disease_idx).unwrap_or_default();
        if disease.is_empty() {
            return Err(FebrilogicError::InvalidTable(format!(
                "symptom weights row {row}: empty disease name"
            )));
        }

        let weights = symptom_columns
            .iter()
            .map(|(i, symptom)| {
                let cell = record.get(*i).unwrap_or_default();
                cell.parse::<f64>()
                    .ok()
                    .filter(|w| w.is_finite())
                    .map(|w| (symptom.clone(), w))
                    .ok_or_else(|| {
                        FebrilogicError::InvalidTable(format!(
                            "symptom weights row {row}: disease '{disease}', column '{symptom}': \
                             '{cell}' is not a number"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        profiles.push(DiseaseSymptomProfile::new(disease, weights));
    }

    let symptoms = symptom_columns.into_iter().map(|(_, s)| s).collect();
    Ok(SymptomWeightTable::new(symptoms, profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_weights_in_header_order() {
        let csv = "disease,fever,rash\n dengue fever ,2,1\nMalaria,1,0\n";
        let table = parse_symptom_weights(csv.as_bytes()).unwrap();

        assert_eq!(table.symptoms(), &["fever".to_string(), "rash".to_string()]);
        assert_eq!(table.disease_names(), vec!["Dengue Fever", "Malaria"]);
        assert_eq!(table.profiles()[0].weight("fever"), Some(2.0));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_disease_column_need_not_be_first() {
        let csv = "fever,Disease\n0.5,Typhoid\n";
        let table = parse_symptom_weights(csv.as_bytes()).unwrap();
        assert_eq!(table.symptoms(), &["fever".to_string()]);
        assert_eq!(table.profiles()[0].weight("fever"), Some(0.5));
    }

    #[test]
    fn test_non_numeric_weight_names_the_cell() {
        let csv = "disease,fever,rash\nMalaria,1,high\n";
        let err = parse_symptom_weights(csv.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("row 1"), "{err}");
        assert!(err.contains("Malaria"), "{err}");
        assert!(err.contains("rash"), "{err}");
    }

    #[test]
    fn test_blank_and_nan_weights_rejected() {
        assert!(parse_symptom_weights("disease,fever\nMalaria,\n".as_bytes()).is_err());
        assert!(parse_symptom_weights("disease,fever\nMalaria,nan\n".as_bytes()).is_err());
    }

    #[test]
    fn test_missing_disease_column() {
        let err = parse_symptom_weights("name,fever\nMalaria,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FebrilogicError::InvalidTable(_)));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let err = parse_symptom_weights("disease,fever,rash\nMalaria,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FebrilogicError::Csv(_)));
    }
}
