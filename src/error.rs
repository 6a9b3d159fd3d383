use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Cannot project with these assumptions: average {current_average:.2} never reaches {threshold:.2}"
    )]
    UnsolvableProjection { current_average: f64, threshold: f64 },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

impl ProjectionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ProjectionError::InvalidInput(message.into())
    }
}
