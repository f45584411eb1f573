use thiserror::Error;

/// Failure taxonomy for analysis calls.
///
/// Failures are terminal for the call: no partial results, no retry in this
/// layer. Catalog errors propagate unchanged from the accessor.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("type not found in catalog: {name}")]
    NotFound { name: String },

    #[error("no {what} found in catalog")]
    EmptyCatalog { what: &'static str },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("catalog access failed: {0}")]
    CatalogAccess(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
