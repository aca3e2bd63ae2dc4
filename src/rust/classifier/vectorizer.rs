//! Bag-of-words and TF-IDF vectorization over cleaned text.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ClassifierError;
use super::utils::normalize_vector;

/// Tokens shorter than this are never part of the vocabulary.
pub const MIN_TOKEN_LEN: usize = 2;

/// How term counts are turned into feature values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Raw term counts
    #[default]
    Count,
    /// Counts scaled by smoothed inverse document frequency, then L2-normalized
    TfIdf,
}

/// Token to feature index mapping, fixed once the vectorizer is fit.
///
/// Indices follow lexicographic token order, so iterating the map yields
/// tokens in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    fn from_tokens<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        let sorted: BTreeSet<String> = tokens.into_iter().collect();
        let index = sorted.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        Self { index }
    }

    /// Feature index of `token`, if it is known
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Tokens in feature index order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// SHA-256 over the tokens in index order. A model stores the fingerprint
    /// of the vocabulary it was trained against.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for token in self.tokens() {
            hasher.update(token.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Maps cleaned text into a fixed-dimension count or TF-IDF vector.
///
/// # Example
/// ```
/// use solace::{Vectorizer, Weighting};
///
/// let mut vectorizer = Vectorizer::new(Weighting::Count);
/// vectorizer.fit(&["tired exam", "happy day"]);
/// let v = vectorizer.transform("exam exam unknown");
/// assert_eq!(v.len(), 4);
/// assert_eq!(v.sum(), 2.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vectorizer {
    vocabulary: Vocabulary,
    weighting: Weighting,
    max_features: Option<usize>,
    /// Inverse document frequency per feature; empty for `Weighting::Count`
    idf: Vec<f64>,
}

impl Vectorizer {
    pub fn new(weighting: Weighting) -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            weighting,
            max_features: None,
            idf: Vec::new(),
        }
    }

    /// Keeps only the `max_features` tokens with the highest document frequency.
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    fn tokenize(text: &str) -> impl Iterator<Item = &str> {
        text.split_whitespace().filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
    }

    /// Builds the vocabulary (and idf weights) from a cleaned corpus.
    ///
    /// Refitting replaces the previous vocabulary wholesale.
    pub fn fit(&mut self, corpus: &[impl AsRef<str>]) -> &Vocabulary {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in corpus {
            let unique: HashSet<&str> = Self::tokenize(doc.as_ref()).collect();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        let kept: Vec<&str> = match self.max_features {
            Some(limit) if limit < doc_freq.len() => {
                let mut ranked: Vec<(&str, usize)> = doc_freq.iter().map(|(t, &c)| (*t, c)).collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                ranked.into_iter().take(limit).map(|(t, _)| t).collect()
            }
            _ => doc_freq.keys().copied().collect(),
        };

        self.vocabulary = Vocabulary::from_tokens(kept.into_iter().map(str::to_string));

        self.idf = match self.weighting {
            Weighting::Count => Vec::new(),
            Weighting::TfIdf => {
                let n_docs = corpus.len() as f64;
                self.vocabulary
                    .tokens()
                    .map(|token| {
                        let df = doc_freq.get(token).copied().unwrap_or(0) as f64;
                        ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
                    })
                    .collect()
            }
        };

        log::debug!(
            "Fitted vectorizer on {} documents: {} features ({:?})",
            corpus.len(),
            self.vocabulary.len(),
            self.weighting
        );
        &self.vocabulary
    }

    /// Maps cleaned text into the fitted feature space. Unknown tokens are
    /// dropped; empty text gives an all-zero vector.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut counts = Array1::<f64>::zeros(self.vocabulary.len());
        for token in Self::tokenize(text) {
            if let Some(idx) = self.vocabulary.get(token) {
                counts[idx] += 1.0;
            }
        }

        match self.weighting {
            Weighting::Count => counts,
            Weighting::TfIdf => {
                let weighted = counts * &Array1::from_vec(self.idf.clone());
                normalize_vector(&weighted)
            }
        }
    }

    pub fn transform_batch(&self, texts: &[impl AsRef<str>]) -> Vec<Array1<f64>> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Number of features produced by `transform`
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Checks that a deserialized vectorizer is internally consistent.
    ///
    /// Vocabulary indices must be exactly `0..len` in token order. A TF-IDF
    /// vectorizer needs one finite, positive idf weight per token; a count
    /// vectorizer carries none.
    ///
    /// # Errors
    /// `ValidationError` describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if let Some((token, idx)) = self
            .vocabulary
            .index
            .iter()
            .enumerate()
            .find_map(|(expected, (token, &idx))| (idx != expected).then_some((token, idx)))
        {
            return Err(ClassifierError::ValidationError(format!(
                "Vocabulary index {} for '{}' is out of order",
                idx, token
            )));
        }
        if let Some(token) = self.vocabulary.tokens().find(|t| t.chars().count() < MIN_TOKEN_LEN) {
            return Err(ClassifierError::ValidationError(format!(
                "Vocabulary token '{}' is shorter than {} characters",
                token, MIN_TOKEN_LEN
            )));
        }

        let expected_idf = match self.weighting {
            Weighting::Count => 0,
            Weighting::TfIdf => self.vocabulary.len(),
        };
        if self.idf.len() != expected_idf {
            return Err(ClassifierError::ValidationError(format!(
                "Expected {} idf weights for {:?} weighting, got {}",
                expected_idf,
                self.weighting,
                self.idf.len()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ClassifierError::ValidationError("idf weights must be finite and positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "scared exam tomorrow",
            "happy sunny day",
            "exam stress deadline",
            "lonely day",
        ]
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let mut v = Vectorizer::new(Weighting::Count);
        let vocab = v.fit(&corpus());
        let tokens: Vec<&str> = vocab.tokens().collect();
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(tokens, sorted);
        assert_eq!(vocab.get("day"), Some(0));
        assert_eq!(vocab.len(), 9);
    }

    #[test]
    fn test_unknown_tokens_ignored() {
        let mut v = Vectorizer::new(Weighting::Count);
        v.fit(&corpus());
        let before = v.vocabulary().clone();
        let x = v.transform("exam exam zebra unicorn");
        assert_eq!(x.sum(), 2.0);
        assert_eq!(x[v.vocabulary().get("exam").unwrap()], 2.0);
        assert_eq!(v.vocabulary(), &before);
        assert!(v.vocabulary().get("zebra").is_none());
    }

    #[test]
    fn test_empty_text_gives_zero_vector() {
        for weighting in [Weighting::Count, Weighting::TfIdf] {
            let mut v = Vectorizer::new(weighting);
            v.fit(&corpus());
            let x = v.transform("");
            assert_eq!(x.len(), v.dimension());
            assert!(x.iter().all(|&f| f == 0.0));
        }
    }

    #[test]
    fn test_single_letter_tokens_skipped() {
        let mut v = Vectorizer::new(Weighting::Count);
        v.fit(&["x sad"]);
        assert_eq!(v.dimension(), 1);
        assert_eq!(v.vocabulary().get("sad"), Some(0));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mut v = Vectorizer::new(Weighting::TfIdf);
        v.fit(&corpus());
        let a = v.transform("exam stress tomorrow");
        let b = v.transform("exam stress tomorrow");
        assert_eq!(a, b);
    }

    #[test]
    fn test_tfidf_is_normalized_and_weighted() {
        let mut v = Vectorizer::new(Weighting::TfIdf);
        v.fit(&corpus());
        let x = v.transform("exam deadline");
        let norm: f64 = x.iter().map(|f| f * f).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        // "exam" appears in two documents, "deadline" in one
        let exam = x[v.vocabulary().get("exam").unwrap()];
        let deadline = x[v.vocabulary().get("deadline").unwrap()];
        assert!(deadline > exam);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut v = Vectorizer::new(Weighting::Count).with_max_features(Some(2));
        v.fit(&corpus());
        let tokens: Vec<&str> = v.vocabulary().tokens().collect();
        assert_eq!(tokens, vec!["day", "exam"]);
    }

    #[test]
    fn test_fingerprint_tracks_vocabulary() {
        let mut a = Vectorizer::new(Weighting::Count);
        a.fit(&corpus());
        let mut b = Vectorizer::new(Weighting::TfIdf);
        b.fit(&corpus());
        assert_eq!(a.vocabulary().fingerprint(), b.vocabulary().fingerprint());

        b.fit(&["other words entirely"]);
        assert_ne!(a.vocabulary().fingerprint(), b.vocabulary().fingerprint());
    }

    #[test]
    fn test_validate_fitted() {
        for weighting in [Weighting::Count, Weighting::TfIdf] {
            let mut v = Vectorizer::new(weighting);
            v.fit(&corpus());
            assert!(v.validate().is_ok());
        }
        assert!(Vectorizer::new(Weighting::TfIdf).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_broken_idf() {
        let mut v = Vectorizer::new(Weighting::TfIdf);
        v.fit(&corpus());
        let full = v.idf.clone();

        // A single weight would broadcast silently in `transform`
        v.idf = vec![1.0];
        assert!(matches!(v.validate(), Err(ClassifierError::ValidationError(_))));
        v.idf = vec![1.0, 1.0];
        assert!(v.validate().is_err());
        v.idf = full.iter().map(|_| f64::NAN).collect();
        assert!(v.validate().is_err());

        let mut counts = Vectorizer::new(Weighting::Count);
        counts.fit(&corpus());
        counts.idf = full;
        assert!(counts.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mut v = Vectorizer::new(Weighting::Count);
        v.fit(&corpus());
        v.vocabulary.index.insert("day".into(), 5);
        assert!(v.validate().is_err());

        let mut v = Vectorizer::new(Weighting::Count);
        v.fit(&corpus());
        v.vocabulary.index.insert("zzz".into(), 42);
        assert!(v.validate().is_err());
    }
}
