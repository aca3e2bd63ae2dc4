use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{argmax, softmax};

/// Default additive smoothing parameter (Laplace smoothing)
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Trained multinomial Naive Bayes parameters.
///
/// Classes are kept in lexicographic order. When two classes score exactly
/// the same, the one that sorts first wins, so an all-zero vector is assigned
/// to the class with the highest prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    classes: Vec<String>,
    class_counts: Vec<usize>,
    class_log_prior: Array1<f64>,
    /// Shape `[n_classes, n_features]`
    feature_log_prob: Array2<f64>,
    alpha: f64,
    vocabulary_fingerprint: String,
}

impl NaiveBayesModel {
    /// Fits class priors and smoothed per-class feature likelihoods.
    ///
    /// # Arguments
    /// * `vectors` - One feature vector per training document
    /// * `labels` - The label of each document
    /// * `alpha` - Additive smoothing, must be positive
    /// * `vocabulary_fingerprint` - Fingerprint of the vocabulary that produced `vectors`
    ///
    /// # Errors
    /// `ValidationError` if there are no documents, the counts differ, vectors
    /// disagree on dimension, a feature is negative, or `alpha` is not positive.
    pub fn fit(
        vectors: &[Array1<f64>],
        labels: &[String],
        alpha: f64,
        vocabulary_fingerprint: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        if vectors.is_empty() {
            return Err(ClassifierError::ValidationError("Cannot fit a model without training examples".into()));
        }
        if vectors.len() != labels.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Got {} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "Smoothing alpha must be positive and finite, got {}",
                alpha
            )));
        }

        let n_features = vectors[0].len();
        if let Some(pos) = vectors.iter().position(|v| v.len() != n_features) {
            return Err(ClassifierError::ValidationError(format!(
                "Vector {} has {} features, expected {}",
                pos + 1,
                vectors[pos].len(),
                n_features
            )));
        }
        if vectors.iter().any(|v| v.iter().any(|&x| x < 0.0)) {
            return Err(ClassifierError::ValidationError("Feature values must be non-negative".into()));
        }

        let mut grouped: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, label) in labels.iter().enumerate() {
            grouped.entry(label.as_str()).or_default().push(i);
        }

        let n_classes = grouped.len();
        let n_docs = vectors.len() as f64;
        let mut classes = Vec::with_capacity(n_classes);
        let mut class_counts = Vec::with_capacity(n_classes);
        let mut class_log_prior = Array1::<f64>::zeros(n_classes);
        let mut feature_log_prob = Array2::<f64>::zeros((n_classes, n_features));

        for (c, (label, members)) in grouped.into_iter().enumerate() {
            let mut feature_counts = Array1::<f64>::zeros(n_features);
            for &i in &members {
                feature_counts += &vectors[i];
            }
            let smoothed = feature_counts + alpha;
            let total = smoothed.sum();

            class_log_prior[c] = (members.len() as f64 / n_docs).ln();
            feature_log_prob.row_mut(c).assign(&smoothed.mapv(|x| (x / total).ln()));
            classes.push(label.to_string());
            class_counts.push(members.len());
        }

        log::info!(
            "Fitted Naive Bayes on {} documents, {} classes, {} features",
            vectors.len(),
            n_classes,
            n_features
        );

        Ok(Self {
            classes,
            class_counts,
            class_log_prior,
            feature_log_prob,
            alpha,
            vocabulary_fingerprint: vocabulary_fingerprint.into(),
        })
    }

    /// Unnormalized log posterior of each class, in class order.
    ///
    /// # Errors
    /// `InvalidInputError` if `x` does not have `n_features()` entries.
    pub fn joint_log_likelihood(&self, x: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::InvalidInputError {
                expected: self.n_features(),
                actual: x.len(),
            });
        }
        Ok(&self.class_log_prior + &self.feature_log_prob.dot(x))
    }

    /// Returns the most probable class for `x`.
    pub fn predict(&self, x: &Array1<f64>) -> Result<&str, ClassifierError> {
        let jll = self.joint_log_likelihood(x)?;
        argmax(&jll)
            .map(|i| self.classes[i].as_str())
            .ok_or_else(|| ClassifierError::PredictionError("Model has no classes".into()))
    }

    /// Posterior probability of every class, in class order.
    pub fn predict_proba(&self, x: &Array1<f64>) -> Result<Vec<(&str, f64)>, ClassifierError> {
        let jll = self.joint_log_likelihood(x)?;
        let probs = softmax(&jll);
        Ok(self.classes.iter().map(String::as_str).zip(probs.iter().copied()).collect())
    }

    /// Class labels in lexicographic order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of training documents per class, aligned with `classes()`
    pub fn class_counts(&self) -> &[usize] {
        &self.class_counts
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary_fingerprint
    }

    /// Checks that a deserialized model is internally consistent: one prior,
    /// one count and one likelihood row per class, unique class labels, and
    /// finite parameters.
    ///
    /// # Errors
    /// `ValidationError` describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(ClassifierError::ValidationError("Model has no classes".into()));
        }
        let lengths = [
            ("class_counts", self.class_counts.len()),
            ("class_log_prior", self.class_log_prior.len()),
            ("feature_log_prob rows", self.feature_log_prob.nrows()),
        ];
        for (name, len) in lengths {
            if len != n_classes {
                return Err(ClassifierError::ValidationError(format!(
                    "Model has {} classes but {} {}",
                    n_classes, len, name
                )));
            }
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClassifierError::ValidationError(
                "Model classes must be unique and in lexicographic order".into(),
            ));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "Smoothing alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if self.class_log_prior.iter().chain(self.feature_log_prob.iter()).any(|x| !x.is_finite()) {
            return Err(ClassifierError::ValidationError("Model parameters must be finite".into()));
        }
        Ok(())
    }
}
