use std::collections::BTreeMap;

use log::{info, warn};

use super::classifier::Classifier;
use super::cleaner::TextCleaner;
use super::error::ClassifierError;
use super::model::NaiveBayesModel;
use super::vectorizer::Vectorizer;
use crate::config::TrainingConfig;
use crate::dataset::TrainingExample;

/// Represents a class definition with a required label and training examples
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The emotion label, trimmed of surrounding whitespace when added
    pub label: String,
    /// Raw example texts that belong to this class
    pub examples: Vec<String>,
}

impl ClassDefinition {
    /// Creates a new class definition with no examples yet
    ///
    /// # Example
    /// ```
    /// use solace::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("fear")
    ///     .with_examples(vec!["I am scared of the dark", "terrified about tomorrow"]);
    /// assert_eq!(class.examples.len(), 2);
    /// ```
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            examples: Vec::new(),
        }
    }

    /// Adds examples to the class definition
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }
}

/// A builder that trains a [`Classifier`] from labeled examples.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    config: TrainingConfig,
    class_examples: BTreeMap<String, Vec<String>>,
}

impl ClassifierBuilder {
    const MAX_CLASSES: usize = 100;

    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self {
            config: TrainingConfig::default(),
            class_examples: BTreeMap::new(),
        }
    }

    /// Sets the training configuration
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates class data:
    /// - Label must not be empty
    /// - Must have at least one example
    /// - No example text can be empty
    fn validate_class_data(label: &str, examples: &[impl AsRef<str>]) -> Result<(), ClassifierError> {
        if label.is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if examples.is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' must have at least one example",
                label
            )));
        }
        if let Some(pos) = examples.iter().position(|e| e.as_ref().trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Example {} of class '{}' cannot be empty",
                pos + 1,
                label
            )));
        }
        Ok(())
    }

    fn check_class_limit(&self, label: &str) -> Result<(), ClassifierError> {
        if !self.class_examples.contains_key(label) && self.class_examples.len() >= Self::MAX_CLASSES {
            return Err(ClassifierError::ValidationError(format!(
                "Maximum number of classes ({}) exceeded",
                Self::MAX_CLASSES
            )));
        }
        Ok(())
    }

    /// Adds a class with its examples.
    ///
    /// # Errors
    /// `ValidationError` if the label is empty, there are no examples, an
    /// example is blank, the label was already added, or more than 100
    /// classes would be defined.
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        let label = class.label.trim().to_string();
        Self::validate_class_data(&label, &class.examples)?;

        if self.class_examples.contains_key(&label) {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' is already defined",
                label
            )));
        }
        self.check_class_limit(&label)?;

        self.class_examples.insert(label, class.examples);
        Ok(self)
    }

    /// Adds loaded training examples, grouping them by their emotion label.
    /// Examples for a label that already exists are appended to it.
    pub fn add_examples(mut self, examples: &[TrainingExample]) -> Result<Self, ClassifierError> {
        for example in examples {
            let label = example.emotion.trim();
            Self::validate_class_data(label, &[example.text.as_str()])?;
            self.check_class_limit(label)?;
            self.class_examples
                .entry(label.to_string())
                .or_default()
                .push(example.text.clone());
        }
        Ok(self)
    }

    /// Cleans every example, fits the vectorizer and trains the model.
    ///
    /// # Errors
    /// * `BuildError` if no classes were added
    /// * `ValidationError` if the configuration is invalid
    /// * `BuildError` if no example contains a single usable token
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.class_examples.is_empty() {
            return Err(ClassifierError::BuildError("At least one class must be added".to_string()));
        }
        self.config.validate()?;

        let cleaner = TextCleaner;
        let mut documents = Vec::new();
        let mut labels = Vec::new();
        for (label, examples) in &self.class_examples {
            info!("Processing class '{}' ({} examples)", label, examples.len());
            for text in examples {
                documents.push(cleaner.clean(text));
                labels.push(label.clone());
            }
        }

        let empty = documents.iter().filter(|d| d.is_empty()).count();
        if empty > 0 {
            warn!("{} training examples have no informative tokens after cleaning", empty);
        }

        let mut vectorizer = Vectorizer::new(self.config.weighting).with_max_features(self.config.max_features);
        let vocabulary = vectorizer.fit(&documents);
        if vocabulary.is_empty() {
            return Err(ClassifierError::BuildError(
                "Vocabulary is empty; training examples contain no usable tokens".into(),
            ));
        }
        let fingerprint = vocabulary.fingerprint();

        let vectors = vectorizer.transform_batch(&documents);
        let model = NaiveBayesModel::fit(&vectors, &labels, self.config.alpha, fingerprint)?;

        info!(
            "Trained classifier: {} classes, {} features, {} documents",
            model.classes().len(),
            vectorizer.dimension(),
            documents.len()
        );
        Ok(Classifier::from_parts(vectorizer, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_validation() {
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("").with_examples(vec!["text"]))
            .is_err());
        assert!(ClassifierBuilder::new().add_class(ClassDefinition::new("fear")).is_err());
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("fear").with_examples(vec!["  "]))
            .is_err());
    }

    #[test]
    fn test_duplicate_class() {
        let result = ClassifierBuilder::new()
            .add_class(ClassDefinition::new("fear").with_examples(vec!["scared"]))
            .and_then(|b| b.add_class(ClassDefinition::new(" fear ").with_examples(vec!["afraid"])));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_build_without_classes() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_build_with_only_stopwords() {
        let result = ClassifierBuilder::new()
            .add_class(ClassDefinition::new("neutral").with_examples(vec!["and the of it"]))
            .unwrap()
            .build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_add_examples_groups_and_trims_labels() -> Result<(), ClassifierError> {
        let examples = vec![
            TrainingExample::new("I am so scared of tomorrow", "fear "),
            TrainingExample::new("Terrified of the dark", " fear"),
            TrainingExample::new("What a wonderful happy day", "happiness"),
        ];
        let classifier = ClassifierBuilder::new().add_examples(&examples)?.build()?;
        let info = classifier.info();
        assert_eq!(info.class_labels, vec!["fear".to_string(), "happiness".to_string()]);
        assert_eq!(info.class_counts["fear"], 2);
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrainingConfig { alpha: -1.0, ..Default::default() };
        let result = ClassifierBuilder::new()
            .with_config(config)
            .add_class(ClassDefinition::new("fear").with_examples(vec!["scared"]))
            .unwrap()
            .build();
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }
}
