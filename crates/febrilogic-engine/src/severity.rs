//! Severity-variant expansion.
//!
//! Diseases whose biomarker models differ by clinical stage are widened into
//! a "severe" and a "non-severe" candidate. Both variants carry the full
//! probability of the original: the expanded distribution no longer sums to
//! one, and the biomarker update is what tells the variants apart.

use febrilogic_common::entities::disease_key;
use febrilogic_common::{DiseaseProbability, ProbabilityDistribution};

/// Diseases expanded into severity variants (compared lower-case).
pub const SEVERITY_STRATIFIED: [&str; 2] = ["dengue fever", "yellow fever"];

pub fn is_severity_stratified(disease: &str) -> bool {
    SEVERITY_STRATIFIED.contains(&disease_key(disease).as_str())
}

/// Variant names for a stratified disease: `("<name> severe", "<name> non-severe")`.
pub fn variant_names(disease: &str) -> (String, String) {
    let key = disease_key(disease);
    (format!("{key} severe"), format!("{key} non-severe"))
}

/// Replace each stratified disease, in place, by its two variants at the
/// same probability. Other entries pass through unchanged.
pub fn expand(prior: &ProbabilityDistribution) -> ProbabilityDistribution {
    prior
        .iter()
        .flat_map(|entry| {
            if is_severity_stratified(&entry.disease) {
                let (severe, non_severe) = variant_names(&entry.disease);
                vec![
                    DiseaseProbability::new(severe, entry.probability),
                    DiseaseProbability::new(non_severe, entry.probability),
                ]
            } else {
                vec![entry.clone()]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expansion_duplicates_probability() {
        let prior = ProbabilityDistribution::from_parts(&["Dengue Fever", "Malaria"], &[0.6, 0.4]);
        let expanded = expand(&prior);

        assert_eq!(
            expanded.names(),
            vec!["dengue fever severe", "dengue fever non-severe", "Malaria"]
        );
        assert_eq!(expanded.probabilities(), vec![0.6, 0.6, 0.4]);
        assert!(expanded.iter().all(|e| e.disease != "Dengue Fever"));
        assert!((expanded.total() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_expansion_keeps_relative_order() {
        let prior = ProbabilityDistribution::from_parts(
            &["Malaria", "YELLOW FEVER", "Typhoid", " dengue fever"],
            &[0.1, 0.2, 0.3, 0.4],
        );
        assert_eq!(
            expand(&prior).names(),
            vec![
                "Malaria",
                "yellow fever severe",
                "yellow fever non-severe",
                "Typhoid",
                "dengue fever severe",
                "dengue fever non-severe",
            ]
        );
    }

    #[test]
    fn test_unstratified_distribution_is_unchanged() {
        let prior = ProbabilityDistribution::from_parts(&["Malaria", "Typhoid"], &[0.5, 0.5]);
        assert_eq!(expand(&prior), prior);
    }

    #[test]
    fn test_partial_name_match_is_not_expanded() {
        assert!(!is_severity_stratified("dengue"));
        assert!(!is_severity_stratified("dengue fever severe"));
        assert!(is_severity_stratified(" Yellow Fever "));
    }
}
