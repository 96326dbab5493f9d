use thiserror::Error;

#[derive(Debug, Error)]
pub enum FebrilogicError {
    /// A disease profile lacks a weight for a symptom in the table vocabulary.
    #[error("Malformed profile: disease '{disease}' has no weight for symptom '{symptom}'")]
    MalformedProfile { disease: String, symptom: String },

    #[error("Shape mismatch: {names} disease names but {priors} prior values")]
    ShapeMismatch { names: usize, priors: usize },

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FebrilogicError>;
