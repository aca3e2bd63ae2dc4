use std::collections::HashMap;

mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod cleaner;
mod error;
mod model;
mod utils;
mod vectorizer;

pub use builder::{ClassDefinition, ClassifierBuilder};
pub use classifier::Classifier;
pub use cleaner::TextCleaner;
pub use error::ClassifierError;
pub use model::{NaiveBayesModel, DEFAULT_ALPHA};
pub use vectorizer::{Vectorizer, Vocabulary, Weighting, MIN_TOKEN_LEN};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in tie-break order
    pub class_labels: Vec<String>,
    /// Number of training examples per class
    pub class_counts: HashMap<String, usize>,
    /// Size of the feature vectors
    pub vocabulary_size: usize,
    /// How term counts are weighted
    pub weighting: Weighting,
}
