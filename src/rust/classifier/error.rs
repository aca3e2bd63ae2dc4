/// Represents the different types of errors that can occur in the emotion classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// Error occurred during the build (training) phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred while making predictions
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// Error occurred due to invalid input parameters or user input
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A feature vector does not match the vocabulary the model was trained on
    #[error("Invalid input: expected a vector of {expected} features, got {actual}")]
    InvalidInputError {
        expected: usize,
        actual: usize,
    },
}
