use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array1;

use super::cleaner::TextCleaner;
use super::error::ClassifierError;
use super::model::NaiveBayesModel;
use super::vectorizer::Vectorizer;

/// A trained emotion classifier: text cleaning, vectorization and a
/// multinomial Naive Bayes model behind one `predict` call.
///
/// # Thread Safety
///
/// The classifier never mutates after construction. The vectorizer and the
/// model sit behind `Arc`, so clones are cheap and the type is `Send + Sync`.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use solace::{Classifier, ClassDefinition};
///
/// let classifier = Classifier::builder()
///     .add_class(ClassDefinition::new("fear").with_examples(vec!["scared of the exam"]))?
///     .add_class(ClassDefinition::new("happiness").with_examples(vec!["happy sunny day"]))?
///     .build()?;
///
/// let (label, scores) = classifier.predict("So scared about my exam")?;
/// assert_eq!(label, "fear");
/// assert!(scores["fear"] > scores["happiness"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    cleaner: TextCleaner,
    vectorizer: Arc<Vectorizer>,
    model: Arc<NaiveBayesModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Pairs a fitted vectorizer with a model trained on its output.
    ///
    /// The pair is not checked here; `ArtifactStore::load` warns when the
    /// vocabulary fingerprints disagree.
    pub fn from_parts(vectorizer: Vectorizer, model: NaiveBayesModel) -> Self {
        Self {
            cleaner: TextCleaner,
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
        }
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        let classes = self.model.classes();
        super::ClassifierInfo {
            num_classes: classes.len(),
            class_labels: classes.to_vec(),
            class_counts: classes
                .iter()
                .cloned()
                .zip(self.model.class_counts().iter().copied())
                .collect(),
            vocabulary_size: self.vectorizer.dimension(),
            weighting: self.vectorizer.weighting(),
        }
    }

    /// Cleans raw text the same way the training corpus was cleaned
    pub fn clean(&self, text: &str) -> String {
        self.cleaner.clean(text)
    }

    /// Cleans and vectorizes raw text
    pub fn vectorize(&self, text: &str) -> Array1<f64> {
        self.vectorizer.transform(&self.clean(text))
    }

    /// Predicts the emotion of the input text and returns posterior scores.
    ///
    /// Text that cleans down to nothing (punctuation, stopwords) is still
    /// classified: its zero vector falls back to the class priors.
    ///
    /// # Returns
    /// A tuple containing:
    /// * The predicted label
    /// * A HashMap of labels to posterior probabilities (summing to 1.0)
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f64>), ClassifierError> {
        let x = self.vectorize(text);
        let label = self.model.predict(&x)?.to_string();
        let scores = self
            .model
            .predict_proba(&x)?
            .into_iter()
            .map(|(class, p)| (class.to_string(), p))
            .collect();
        Ok((label, scores))
    }

    /// Predicts the label of an already vectorized input.
    ///
    /// # Errors
    /// `InvalidInputError` if the vector length differs from the vocabulary size.
    pub fn predict_vector(&self, x: &Array1<f64>) -> Result<String, ClassifierError> {
        self.model.predict(x).map(str::to_string)
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &NaiveBayesModel {
        &self.model
    }
}
