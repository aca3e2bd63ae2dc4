//! An emotion classifier that answers free-text check-ins with supportive
//! messages.
//!
//! Text is cleaned (lowercased, stripped of non-letters and stopwords),
//! turned into a bag-of-words or TF-IDF vector, and classified by a
//! multinomial Naive Bayes model. The predicted emotion selects a handful of
//! canned messages from a [`ResponseCatalog`].
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use solace::{Classifier, ClassDefinition};
//!
//! let classifier = Classifier::builder()
//!     .add_class(
//!         ClassDefinition::new("stress")
//!             .with_examples(vec!["deadline pressure at work", "too much work stress"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("loneliness")
//!             .with_examples(vec!["nobody to talk to", "alone every night"])
//!     )?
//!     .build()?;
//!
//! let (label, scores) = classifier.predict("So much pressure at work")?;
//! assert_eq!(label, "stress");
//! println!("scores: {:?}", scores);
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! A trained classifier is saved as a matched vectorizer/model pair with
//! [`ArtifactStore`] and loaded once at startup by [`SupportPipeline::from_store`].
//!
//! # Thread Safety
//!
//! [`Classifier`] and [`SupportPipeline`] are immutable after construction
//! and can be shared across threads with `Arc`.

pub mod artifacts;
pub mod classifier;
mod config;
pub mod dataset;
pub mod pipeline;
pub mod responses;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use classifier::{
    ClassDefinition, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, NaiveBayesModel,
    TextCleaner, Vectorizer, Vocabulary, Weighting,
};
pub use config::TrainingConfig;
pub use dataset::{DatasetError, TrainingExample};
pub use pipeline::{SupportPipeline, SupportResponse};
pub use responses::ResponseCatalog;

pub fn init_logger() {
    env_logger::init();
}
