//! Loading, preprocessing and splitting the labeled CSV corpus.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierError, TextCleaner};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Dataset contains no usable rows")]
    Empty,
}

/// One labeled row of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub cleaned_text: String,
    pub emotion: String,
}

impl TrainingExample {
    /// Builds an example from raw text, trimming the label and cleaning the text.
    pub fn new(text: impl Into<String>, emotion: &str) -> Self {
        let text = text.into();
        let cleaned_text = TextCleaner.clean(&text);
        Self {
            text,
            cleaned_text,
            emotion: emotion.trim().to_string(),
        }
    }
}

/// A raw CSV row. Extra columns (such as an old `cleaned_text`) are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    text: Option<String>,
    emotion: Option<String>,
}

/// Reads `text,emotion` rows. `cleaned_text` is always recomputed so the
/// corpus is cleaned by the same code that serves predictions. Rows with a
/// blank text or label are skipped.
pub fn read_examples<R: io::Read>(reader: R) -> Result<Vec<TrainingExample>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut examples = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.deserialize::<RawRecord>() {
        let record = record?;
        match (record.text, record.emotion) {
            (Some(text), Some(emotion)) if !text.trim().is_empty() && !emotion.trim().is_empty() => {
                examples.push(TrainingExample::new(text, &emotion));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with an empty text or emotion", skipped);
    }
    if examples.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(examples)
}

pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingExample>, DatasetError> {
    let path = path.as_ref();
    log::info!("Loading dataset from {:?}", path);
    let examples = read_examples(File::open(path)?)?;
    log::info!("Loaded {} examples", examples.len());
    Ok(examples)
}

/// Writes `text,cleaned_text,emotion` rows.
pub fn write_examples<W: io::Write>(writer: W, examples: &[TrainingExample]) -> Result<(), DatasetError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for example in examples {
        wtr.serialize(example)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_examples<P: AsRef<Path>>(path: P, examples: &[TrainingExample]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_examples(File::create(path)?, examples)?;
    log::info!("Wrote {} processed examples to {:?}", examples.len(), path);
    Ok(())
}

/// Splits examples into `(train, test)`, holding out roughly `test_fraction`
/// of every class. Each class keeps at least one training example. The
/// shuffle is seeded, so the same input always splits the same way.
pub fn stratified_split(
    examples: &[TrainingExample],
    test_fraction: f64,
    seed: u64,
) -> (Vec<TrainingExample>, Vec<TrainingExample>) {
    let mut by_label: BTreeMap<&str, Vec<&TrainingExample>> = BTreeMap::new();
    for example in examples {
        by_label.entry(example.emotion.as_str()).or_default().push(example);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut group) in by_label {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64 * test_fraction).round() as usize).min(group.len() - 1);
        let (held_out, kept) = group.split_at(n_test);
        test.extend(held_out.iter().map(|e| (*e).clone()));
        train.extend(kept.iter().map(|e| (*e).clone()));
    }
    (train, test)
}

/// Fraction of examples whose predicted label matches their emotion.
pub fn evaluate(classifier: &Classifier, examples: &[TrainingExample]) -> Result<f64, ClassifierError> {
    if examples.is_empty() {
        return Err(ClassifierError::ValidationError("Cannot evaluate on an empty set".into()));
    }
    let mut correct = 0usize;
    for example in examples {
        let (label, _) = classifier.predict(&example.text)?;
        if label == example.emotion {
            correct += 1;
        }
    }
    Ok(correct as f64 / examples.len() as f64)
}
