//! Per-disease Gaussian likelihoods for one observed biomarker.

use std::f64::consts::PI;

use crate::tables::{BiomarkerStats, BiomarkerTable};

/// Likelihood used when no reliable statistics exist; leaves the disease's
/// relative standing unchanged.
pub const UNINFORMATIVE_LIKELIHOOD: f64 = 1.0;

/// Replacement for a density that is zero, negative or non-finite, so that one
/// biomarker cannot eliminate a disease outright.
pub const LIKELIHOOD_FLOOR: f64 = 1e-5;

/// Normal probability density `N(x; mean, sd)`.
pub fn gaussian_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    // Divide by sd last: sd * sqrt(2π) overflows for sd near f64::MAX
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt() / sd
}

/// Likelihood of `observed` for one disease.
///
/// - no row for the disease → uninformative
/// - mean/sd absent, non-finite, or `sd <= 0` → uninformative
/// - otherwise the Gaussian density, floored at [`LIKELIHOOD_FLOOR`]
pub fn disease_likelihood(stats: Option<BiomarkerStats>, observed: f64) -> f64 {
    let Some((mean, sd)) = stats.as_ref().and_then(BiomarkerStats::params) else {
        return UNINFORMATIVE_LIKELIHOOD;
    };
    let density = gaussian_pdf(observed, mean, sd);
    if density.is_finite() && density > 0.0 {
        density
    } else {
        LIKELIHOOD_FLOOR
    }
}

/// Likelihood vector for one biomarker across `diseases`, in the same order.
pub fn likelihoods<S: AsRef<str>>(
    diseases: &[S],
    table: &BiomarkerTable,
    biomarker: &str,
    observed: f64,
) -> Vec<f64> {
    diseases
        .iter()
        .map(|d| {
            let stats = table.profile(d.as_ref()).map(|row| row.stats(biomarker));
            disease_likelihood(stats, observed)
        })
        .collect()
}
