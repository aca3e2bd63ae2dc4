use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierError, Weighting, DEFAULT_ALPHA};

/// Settings for a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub weighting: Weighting,
    /// Additive smoothing for the Naive Bayes likelihoods
    pub alpha: f64,
    /// Keep only this many of the most frequent tokens
    pub max_features: Option<usize>,
    /// Fraction of each class held out for evaluation (0 disables evaluation)
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            weighting: Weighting::Count,
            alpha: DEFAULT_ALPHA,
            max_features: None,
            test_fraction: 0.1,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ClassifierError::ValidationError(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.max_features == Some(0) {
            return Err(ClassifierError::ValidationError("max_features must be at least 1".into()));
        }
        Ok(())
    }
}
