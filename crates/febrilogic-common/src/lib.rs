//! Shared value types and errors used across all FebriLogic crates.

pub mod error;
pub mod entities;
pub mod distribution;

// Re-export commonly used types
pub use distribution::{DiseaseProbability, ProbabilityDistribution};
pub use entities::{BiomarkerObservation, DiseaseScore, SymptomObservation};
pub use error::{FebrilogicError, Result};
