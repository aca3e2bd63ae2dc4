use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::classifier::{Classifier, ClassifierError};
use crate::responses::{emoji_for, ResponseCatalog};

/// Number of supportive messages returned per request
pub const DEFAULT_RESPONSE_COUNT: usize = 4;

/// Message shown when the user submits nothing
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter how you are feeling.";

/// The answer to one check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportResponse {
    /// Predicted emotion, lowercased
    pub emotion: String,
    /// Supportive messages in display order
    pub messages: Vec<String>,
    /// Posterior probability per emotion, keyed by lowercased label like `emotion`
    pub scores: HashMap<String, f64>,
}

impl fmt::Display for SupportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut label = self.emotion.chars();
        let capitalized = match label.next() {
            Some(first) => first.to_uppercase().chain(label).collect::<String>(),
            None => String::new(),
        };
        match emoji_for(&self.emotion) {
            Some(emoji) => writeln!(f, "Detected emotion: {} {}", emoji, capitalized)?,
            None => writeln!(f, "Detected emotion: {}", capitalized)?,
        }
        writeln!(f)?;
        writeln!(f, "Supportive messages:")?;
        for message in &self.messages {
            writeln!(f, "  • {}", message)?;
        }
        Ok(())
    }
}

/// Rejects empty or whitespace-only input before anything is classified.
pub fn validate_input(text: &str) -> Result<&str, ClassifierError> {
    if text.trim().is_empty() {
        return Err(ClassifierError::ValidationError(EMPTY_INPUT_MESSAGE.into()));
    }
    Ok(text)
}

/// Serves check-ins: classify, look up the catalog, sample messages.
///
/// The classifier and catalog are built once at startup and shared
/// read-only; every call to [`SupportPipeline::respond`] is independent.
///
/// # Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use rand::SeedableRng;
/// use solace::{Classifier, ClassDefinition, ResponseCatalog, SupportPipeline};
///
/// let classifier = Classifier::builder()
///     .add_class(ClassDefinition::new("Fear").with_examples(vec!["scared of the exam"]))?
///     .add_class(ClassDefinition::new("happiness").with_examples(vec!["happy sunny day"]))?
///     .build()?;
/// let pipeline = SupportPipeline::new(Arc::new(classifier), Arc::new(ResponseCatalog::builtin()))
///     .with_response_count(2);
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let response = pipeline.respond("I'm scared about my exam", &mut rng)?;
/// assert_eq!(response.emotion, "fear");
/// assert_eq!(response.messages.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SupportPipeline {
    classifier: Arc<Classifier>,
    catalog: Arc<ResponseCatalog>,
    response_count: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<SupportPipeline>();
    }
};

impl SupportPipeline {
    pub fn new(classifier: Arc<Classifier>, catalog: Arc<ResponseCatalog>) -> Self {
        Self {
            classifier,
            catalog,
            response_count: DEFAULT_RESPONSE_COUNT,
        }
    }

    /// Loads the persisted classifier once. Any failure here is fatal for a
    /// serving process.
    pub fn from_store(store: &ArtifactStore, catalog: ResponseCatalog) -> Result<Self, ArtifactError> {
        let classifier = store.load()?;
        Ok(Self::new(Arc::new(classifier), Arc::new(catalog)))
    }

    pub fn with_response_count(mut self, count: usize) -> Self {
        self.response_count = count;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn catalog(&self) -> &ResponseCatalog {
        &self.catalog
    }

    /// Classifies `text` and picks supportive messages for the result.
    ///
    /// # Errors
    /// `ValidationError` if `text` is empty or whitespace; the classifier is
    /// not invoked in that case.
    pub fn respond<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<SupportResponse, ClassifierError> {
        let text = validate_input(text)?;
        let (label, raw_scores) = self.classifier.predict(text)?;
        let emotion = label.to_lowercase();
        // Labels differing only in case share one key
        let mut scores: HashMap<String, f64> = HashMap::with_capacity(raw_scores.len());
        for (class, p) in raw_scores {
            *scores.entry(class.to_lowercase()).or_insert(0.0) += p;
        }
        log::debug!("Predicted '{}' for input of {} chars", emotion, text.len());

        let messages = self
            .catalog
            .respond(&emotion, self.response_count, rng)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(SupportResponse { emotion, messages, scores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassDefinition;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pipeline() -> SupportPipeline {
        let classifier = Classifier::builder()
            .add_class(ClassDefinition::new("anger").with_examples(vec!["so angry furious"]))
            .unwrap()
            .add_class(ClassDefinition::new("Bewildered").with_examples(vec!["confused lost puzzled"]))
            .unwrap()
            .build()
            .unwrap();
        SupportPipeline::new(Arc::new(classifier), Arc::new(ResponseCatalog::builtin()))
    }

    #[test]
    fn test_validate_input() {
        assert!(validate_input("").is_err());
        assert!(validate_input("  \n\t").is_err());
        assert_eq!(validate_input("hello").unwrap(), "hello");
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = pipeline().respond("   ", &mut rng).unwrap_err();
        assert_eq!(err, ClassifierError::ValidationError(EMPTY_INPUT_MESSAGE.into()));
    }

    #[test]
    fn test_unknown_label_uses_default_set() {
        let pipeline = pipeline();
        let mut rng = StdRng::seed_from_u64(0);
        let response = pipeline.respond("I am so confused and lost", &mut rng).unwrap();
        assert_eq!(response.emotion, "bewildered");
        assert_eq!(response.messages.len(), 3);
        let defaults = pipeline.catalog().default_responses();
        assert!(response.messages.iter().all(|m| defaults.contains(m)));
    }

    #[test]
    fn test_scores_keyed_like_emotion() {
        let pipeline = pipeline();
        let mut rng = StdRng::seed_from_u64(0);
        let response = pipeline.respond("puzzled and confused", &mut rng).unwrap();
        assert_eq!(response.emotion, "bewildered");
        assert!(response.scores.contains_key(&response.emotion));
        assert!(!response.scores.contains_key("Bewildered"));
        let total: f64 = response.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_render() {
        let response = SupportResponse {
            emotion: "anger".into(),
            messages: vec!["Breathe.".into()],
            scores: HashMap::new(),
        };
        let rendered = response.to_string();
        assert!(rendered.starts_with("Detected emotion: 😡 Anger\n"));
        assert!(rendered.contains("  • Breathe.\n"));
    }
}
