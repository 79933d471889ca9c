//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while compiling or executing a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A date token matched the grammar but none of the accepted formats
    /// (`YYYY-MM-DD`, `YYYY-MM`, `YYYY`)
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// The storage collaborator failed while producing candidates
    #[error("Store error: {0}")]
    Store(#[from] AppError),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidDateFormat(raw) => AppError::InvalidDateFormat(raw),
            SearchError::Store(inner) => inner,
        }
    }
}
