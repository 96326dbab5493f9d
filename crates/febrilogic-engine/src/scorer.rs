//! Symptom scorer: raw per-disease scores and the softmax prior.

use febrilogic_common::{DiseaseProbability, DiseaseScore, ProbabilityDistribution, Result, SymptomObservation};
use tracing::debug;

use crate::tables::SymptomWeightTable;

/// Sum, per disease, the weights of the vocabulary symptoms the patient
/// reported. Unreported symptoms add nothing.
///
/// Every vocabulary cell is read for every disease, so a profile with a gap
/// fails with `MalformedProfile` even when the missing symptom was not reported.
pub fn score(table: &SymptomWeightTable, observed: &SymptomObservation) -> Result<Vec<DiseaseScore>> {
    let mut totals = vec![0.0f64; table.len()];

    for symptom in table.symptoms() {
        let present = observed.contains(symptom);
        for (total, profile) in totals.iter_mut().zip(table.profiles()) {
            let weight = profile.require_weight(symptom)?;
            if present {
                *total += weight;
            }
        }
    }

    Ok(table
        .profiles()
        .iter()
        .zip(totals)
        .map(|(p, score)| DiseaseScore {
            disease: p.name().to_string(),
            score,
        })
        .collect())
}

/// `p_i = exp(s_i) / Σ exp(s_j)`, computed with the max subtracted first.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let Some(max) = scores.iter().copied().reduce(f64::max) else {
        return vec![];
    };
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Symptom-only prior over the table's diseases, in table order.
pub fn prior(table: &SymptomWeightTable, observed: &SymptomObservation) -> Result<ProbabilityDistribution> {
    let scores = score(table, observed)?;
    Ok(prior_from_scores(&scores))
}

/// Softmax over already-computed raw scores, order preserved.
pub fn prior_from_scores(scores: &[DiseaseScore]) -> ProbabilityDistribution {
    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let probabilities = softmax(&values);
    debug!(n_diseases = scores.len(), "Computed symptom prior");

    scores
        .iter()
        .zip(probabilities)
        .map(|(s, p)| DiseaseProbability::new(s.disease.clone(), p))
        .collect()
}
