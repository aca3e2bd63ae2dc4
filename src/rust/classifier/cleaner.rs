use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// English stopwords, matching the NLTK corpus list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
    "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = ENGLISH_STOPWORDS.iter().copied().collect();
    static ref NON_LETTERS: Regex = Regex::new(r"[^a-z\s]").expect("valid cleaning pattern");
}

/// Normalizes raw text before vectorization.
///
/// Training and inference both go through this type, so the vocabulary is
/// always built from text cleaned exactly the way incoming messages are.
/// Cleaning lowercases the input, removes everything that is not an ASCII
/// letter or whitespace, drops stopwords and rejoins the remaining tokens
/// with single spaces.
///
/// # Example
/// ```
/// use solace::TextCleaner;
///
/// let cleaned = TextCleaner.clean("I feel terrible and scared about my exam!");
/// assert_eq!(cleaned, "feel terrible scared exam");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCleaner;

impl TextCleaner {
    /// Cleans a single piece of text. Returns an empty string when nothing
    /// informative is left.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let letters = NON_LETTERS.replace_all(&lowered, "");
        letters
            .split_whitespace()
            .filter(|token| !Self::is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true if `token` is on the stopword list
    pub fn is_stopword(token: &str) -> bool {
        STOPWORDS.contains(token)
    }
}
