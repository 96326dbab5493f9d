//! Sequential Bayesian refinement of a prior with observed biomarkers.
//!
//! The update is a fold over biomarkers in a fixed order. The accumulator is
//! the running posterior; each usable, observed biomarker multiplies in its
//! likelihood vector and renormalises. If the mass collapses (zero or
//! non-finite sum) the fold stops and the result is the original prior.

use std::ops::ControlFlow;

use febrilogic_common::{BiomarkerObservation, FebrilogicError, ProbabilityDistribution, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::likelihood::likelihoods;
use crate::tables::BiomarkerTable;

/// A biomarker update that collapsed the posterior. Recovered locally by
/// reverting to the prior; reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Degenerate update: posterior mass collapsed on biomarker '{biomarker}'")]
pub struct DegenerateUpdate {
    pub biomarker: String,
}

/// Result of refining a prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianUpdate {
    pub posterior: ProbabilityDistribution,
    /// Biomarkers whose likelihoods were multiplied in, in application order.
    pub applied: Vec<String>,
    pub degenerate: Option<DegenerateUpdate>,
}

#[derive(Debug, Clone)]
struct FoldState {
    posterior: Vec<f64>,
    applied: Vec<String>,
}

/// Posterior values for `disease_names`, same order, updating on every
/// usable observed biomarker in lexicographic order.
pub fn update<S: AsRef<str>>(
    disease_names: &[S],
    priors: &[f64],
    table: &BiomarkerTable,
    observed: &BiomarkerObservation,
) -> Result<Vec<f64>> {
    if disease_names.len() != priors.len() {
        return Err(FebrilogicError::ShapeMismatch {
            names: disease_names.len(),
            priors: priors.len(),
        });
    }
    let prior = ProbabilityDistribution::from_parts(disease_names, priors);
    Ok(refine(&prior, table, observed).posterior.probabilities())
}

/// Refine `prior` with every usable observed biomarker, in the table's
/// sorted biomarker order.
pub fn refine(
    prior: &ProbabilityDistribution,
    table: &BiomarkerTable,
    observed: &BiomarkerObservation,
) -> BayesianUpdate {
    refine_in_order(prior, table, observed, table.biomarkers())
}

/// Refine `prior` visiting biomarkers in the given order.
pub fn refine_in_order<S: AsRef<str>>(
    prior: &ProbabilityDistribution,
    table: &BiomarkerTable,
    observed: &BiomarkerObservation,
    order: &[S],
) -> BayesianUpdate {
    let diseases = prior.names();
    let initial = FoldState {
        posterior: prior.probabilities(),
        applied: Vec::new(),
    };

    let folded = order.iter().map(|b| b.as_ref()).try_fold(initial, |state, biomarker| {
        if !table.has_usable_stats(biomarker) {
            debug!(biomarker, "Skipping biomarker without usable statistics");
            return ControlFlow::Continue(state);
        }
        let Some(value) = observed.get(biomarker) else {
            return ControlFlow::Continue(state);
        };

        let step = likelihoods(&diseases, table, biomarker, value);
        match apply(&state.posterior, &step) {
            Some(posterior) => {
                let mut applied = state.applied;
                applied.push(biomarker.to_string());
                ControlFlow::Continue(FoldState { posterior, applied })
            }
            None => ControlFlow::Break(DegenerateUpdate {
                biomarker: biomarker.to_string(),
            }),
        }
    });

    match folded {
        ControlFlow::Continue(state) => {
            debug!(applied = ?state.applied, "Biomarker refinement complete");
            BayesianUpdate {
                posterior: ProbabilityDistribution::from_parts(&diseases, &state.posterior),
                applied: state.applied,
                degenerate: None,
            }
        }
        ControlFlow::Break(degenerate) => {
            warn!(
                biomarker = %degenerate.biomarker,
                "Posterior mass collapsed; reverting to prior and halting biomarker updates"
            );
            BayesianUpdate {
                posterior: prior.clone(),
                applied: Vec::new(),
                degenerate: Some(degenerate),
            }
        }
    }
}

/// One multiplicative step followed by renormalisation. `None` when the
/// resulting mass is zero or non-finite.
fn apply(posterior: &[f64], likelihood: &[f64]) -> Option<Vec<f64>> {
    let product: Vec<f64> = posterior.iter().zip(likelihood).map(|(p, l)| p * l).collect();
    let sum: f64 = product.iter().sum();
    if !sum.is_finite() || sum == 0.0 {
        return None;
    }
    Some(product.into_iter().map(|v| v / sum).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::likelihood::gaussian_pdf;
    use crate::tables::{BiomarkerProfile, BiomarkerStats};
    use pretty_assertions::assert_eq;

    fn table() -> BiomarkerTable {
        BiomarkerTable::new(
            vec!["platelets".into(), "wbc".into(), "crp".into()],
            vec![
                BiomarkerProfile::new(
                    "dengue fever severe",
                    [
                        ("platelets", BiomarkerStats::new(40.0, 15.0)),
                        ("wbc", BiomarkerStats::new(3.5, 1.0)),
                    ],
                ),
                BiomarkerProfile::new(
                    "dengue fever non-severe",
                    [
                        ("platelets", BiomarkerStats::new(120.0, 30.0)),
                        ("wbc", BiomarkerStats::new(4.5, 1.2)),
                    ],
                ),
                BiomarkerProfile::new(
                    "Malaria",
                    [
                        ("platelets", BiomarkerStats::new(150.0, 40.0)),
                        ("wbc", BiomarkerStats::new(6.0, 2.0)),
                    ],
                ),
            ],
        )
    }

    fn prior() -> ProbabilityDistribution {
        ProbabilityDistribution::from_parts(
            &["dengue fever severe", "dengue fever non-severe", "Malaria"],
            &[0.5, 0.5, 0.3],
        )
    }

    #[test]
    fn test_no_observations_returns_prior_unchanged() {
        let result = refine(&prior(), &table(), &BiomarkerObservation::default());
        assert_eq!(result.posterior, prior());
        assert!(result.applied.is_empty());
        assert!(result.degenerate.is_none());
    }

    #[test]
    fn test_single_update_matches_bayes_rule() {
        let observed = BiomarkerObservation::default().with("platelets", 60.0);
        let result = refine(&prior(), &table(), &observed);

        let l = [
            gaussian_pdf(60.0, 40.0, 15.0),
            gaussian_pdf(60.0, 120.0, 30.0),
            gaussian_pdf(60.0, 150.0, 40.0),
        ];
        let unnorm: Vec<f64> = prior().probabilities().iter().zip(l).map(|(p, l)| p * l).collect();
        let z: f64 = unnorm.iter().sum();

        for (got, want) in result.posterior.probabilities().iter().zip(unnorm.iter().map(|v| v / z)) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((result.posterior.total() - 1.0).abs() < 1e-12);
        assert_eq!(result.applied, vec!["platelets"]);
    }

    #[test]
    fn test_unusable_biomarker_is_skipped_even_when_observed() {
        // crp has no statistics anywhere
        let observed = BiomarkerObservation::default().with("crp", 80.0);
        let result = refine(&prior(), &table(), &observed);
        assert_eq!(result.posterior, prior());
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_unknown_biomarker_is_ignored() {
        let observed = BiomarkerObservation::default().with("ferritin", 900.0);
        assert_eq!(refine(&prior(), &table(), &observed).posterior, prior());
    }

    #[test]
    fn test_biomarkers_applied_in_sorted_order() {
        let observed = BiomarkerObservation::default().with("wbc", 4.0).with("platelets", 90.0);
        let result = refine(&prior(), &table(), &observed);
        assert_eq!(result.applied, vec!["platelets", "wbc"]);
    }

    #[test]
    fn test_disease_without_row_keeps_relative_weight_against_uninformative() {
        let prior = ProbabilityDistribution::from_parts(&["Typhoid", "Leptospirosis"], &[0.6, 0.4]);
        let observed = BiomarkerObservation::default().with("platelets", 60.0);
        let result = refine(&prior, &table(), &observed);
        let p = result.posterior.probabilities();
        assert!((p[0] - 0.6).abs() < 1e-12);
        assert!((p[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_mass_prior_is_degenerate() {
        let prior = ProbabilityDistribution::from_parts(&["dengue fever severe", "Malaria"], &[0.0, 0.0]);
        let observed = BiomarkerObservation::default().with("platelets", 60.0);
        let result = refine(&prior, &table(), &observed);
        assert_eq!(result.posterior, prior);
        assert_eq!(
            result.degenerate,
            Some(DegenerateUpdate {
                biomarker: "platelets".to_string()
            })
        );
    }

    #[test]
    fn test_overflow_reverts_to_prior_and_halts() {
        // platelets is visited first and overflows; wbc would otherwise shift mass
        let table = BiomarkerTable::new(
            vec!["platelets".into(), "wbc".into()],
            vec![
                BiomarkerProfile::new(
                    "A",
                    [
                        ("platelets", BiomarkerStats::new(0.0, 1e-3)),
                        ("wbc", BiomarkerStats::new(0.0, 1.0)),
                    ],
                ),
                BiomarkerProfile::new("B", [("wbc", BiomarkerStats::new(10.0, 1.0))]),
            ],
        );
        let prior = ProbabilityDistribution::from_parts(&["A", "B"], &[f64::MAX, 1.0]);
        let observed = BiomarkerObservation::default().with("platelets", 0.0).with("wbc", 10.0);

        let result = refine(&prior, &table, &observed);
        assert_eq!(result.posterior, prior);
        assert!(result.applied.is_empty());
        assert_eq!(result.degenerate.map(|d| d.biomarker), Some("platelets".to_string()));
    }

    #[test]
    fn test_update_rejects_shape_mismatch() {
        let err = update(&["a", "b"], &[1.0], &table(), &BiomarkerObservation::default()).unwrap_err();
        assert!(matches!(err, FebrilogicError::ShapeMismatch { names: 2, priors: 1 }));
    }

    #[test]
    fn test_update_returns_values_in_input_order() {
        let names = prior().names();
        let observed = BiomarkerObservation::default().with("platelets", 40.0);
        let values = update(&names, &prior().probabilities(), &table(), &observed).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[0] > values[1] && values[0] > values[2]);
    }
}
