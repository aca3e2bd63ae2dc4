//! Canned supportive messages keyed by emotion label.

use std::collections::HashMap;
use std::path::Path;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::artifacts::ArtifactError;
use crate::classifier::ClassifierError;

/// Key of the fallback set in catalog files
pub const DEFAULT_KEY: &str = "default";

/// Read-only mapping from emotion label to supportive messages, with a
/// default set used for labels the catalog does not know. The default set
/// is never empty.
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    responses: HashMap<String, Vec<String>>,
    default: Vec<String>,
}

fn owned(messages: &[&str]) -> Vec<String> {
    messages.iter().map(|m| m.to_string()).collect()
}

impl ResponseCatalog {
    /// Creates a catalog with only a default set.
    ///
    /// # Errors
    /// `ValidationError` if `default` is empty.
    pub fn new(default: Vec<String>) -> Result<Self, ClassifierError> {
        if default.is_empty() {
            return Err(ClassifierError::ValidationError(
                "The default response set cannot be empty".into(),
            ));
        }
        Ok(Self {
            responses: HashMap::new(),
            default,
        })
    }

    /// Adds (or replaces) the messages for a label. Labels are stored lowercased.
    pub fn with_responses(mut self, label: &str, messages: Vec<String>) -> Self {
        self.responses.insert(label.trim().to_lowercase(), messages);
        self
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Self {
        let entries: [(&str, &[&str]); 9] = [
            ("stress", &[
                "You're under a lot of pressure, and that can be exhausting.",
                "Try breaking tasks into small steps; you don't have to do everything at once.",
                "Short breaks and rest can actually help you regain focus.",
                "Remember to breathe deeply. Your mental health matters.",
            ]),
            ("anxiety", &[
                "It sounds like anxiety is weighing on you. Try taking slow, deep breaths to calm your nervous system.",
                "Anxiety can make everything feel urgent, but you're safe right now.",
                "You're doing your best, and that's enough for this moment.",
                "Focus on what you can control and let go of what you can't.",
            ]),
            ("sadness", &[
                "I'm really sorry you're feeling this way. You're not alone.",
                "Give yourself time; it's okay to feel sad sometimes.",
                "Reach out to someone you trust, talking helps.",
                "Allow yourself to feel and process your emotions.",
            ]),
            ("anger", &[
                "Strong emotions are natural, especially when things feel unfair.",
                "Pausing before reacting can help prevent regret later.",
                "Taking a few deep breaths may help release some of this tension.",
                "Consider journaling your feelings or taking a walk to calm down.",
            ]),
            ("fear", &[
                "Feeling afraid can be unsettling, but this feeling will not last forever.",
                "You're stronger than you think, even when fear says otherwise.",
                "Try grounding yourself in the present moment.",
                "Focus on your breath and what you can control right now.",
            ]),
            ("depression", &[
                "It sounds really heavy. You deserve care and understanding.",
                "Reach out to someone you trust; even small steps help.",
                "Focus on one small task at a time; it's okay to rest.",
                "Take gentle care of yourself and don't hesitate to ask for help.",
            ]),
            ("loneliness", &[
                "Feeling lonely can be painful, but it doesn't mean you're unwanted.",
                "Even small connections can make a difference.",
                "You deserve companionship and understanding.",
                "Reach out to a friend, family member, or online community.",
            ]),
            ("happiness", &[
                "Yay! That's wonderful. Cherish these joyful moments.",
                "Celebrate your happiness and share it with others if you can.",
                "Keep enjoying the little things that make you smile.",
                "Your positive emotions are important. Savor them fully.",
            ]),
            ("neutral", &[
                "Thank you for sharing how you feel.",
                "It's good that you're checking in with yourself.",
                "Keep taking care of your mental well-being.",
            ]),
        ];

        let default = owned(&[
            "Thank you for opening up. Your feelings matter.",
            "You're not alone; support is always available.",
            "It's okay to ask for help when things feel heavy.",
        ]);
        let responses = entries
            .iter()
            .map(|(label, messages)| (label.to_string(), owned(messages)))
            .collect();
        Self { responses, default }
    }

    /// Parses a JSON object of `label -> [messages]`. The `"default"` key is
    /// required and must be non-empty; labels are lowercased.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let mut entries: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let default = entries.remove(DEFAULT_KEY).unwrap_or_default();
        let mut catalog = Self::new(default)?;
        for (label, messages) in entries {
            catalog = catalog.with_responses(&label, messages);
        }
        Ok(catalog)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        log::info!("Loading response catalog from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Messages for `label`, or the default set when the label is unknown
    /// or has no messages.
    pub fn lookup(&self, label: &str) -> &[String] {
        match self.responses.get(label) {
            Some(messages) if !messages.is_empty() => messages,
            _ => {
                log::debug!("No responses for '{}', using the default set", label);
                &self.default
            }
        }
    }

    /// Picks `min(k, messages.len())` distinct messages uniformly without
    /// replacement.
    pub fn sample<'a, R: Rng + ?Sized>(messages: &'a [String], k: usize, rng: &mut R) -> Vec<&'a str> {
        messages
            .choose_multiple(rng, k)
            .map(String::as_str)
            .collect()
    }

    /// `lookup` followed by `sample`
    pub fn respond<R: Rng + ?Sized>(&self, label: &str, k: usize, rng: &mut R) -> Vec<&str> {
        Self::sample(self.lookup(label), k, rng)
    }

    pub fn default_responses(&self) -> &[String] {
        &self.default
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Display emoji for a known emotion label
pub fn emoji_for(label: &str) -> Option<&'static str> {
    match label {
        "happiness" => Some("🥳"),
        "sadness" => Some("😢"),
        "stress" => Some("😓"),
        "anxiety" => Some("😰"),
        "anger" => Some("😡"),
        "fear" => Some("😨"),
        "depression" => Some("😔"),
        "loneliness" => Some("😞"),
        "neutral" => Some("😐"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_known_and_unknown() {
        let catalog = ResponseCatalog::builtin();
        assert_eq!(catalog.lookup("fear").len(), 4);
        assert_eq!(catalog.lookup("neutral").len(), 3);

        let fallback = catalog.lookup("bewilderment");
        assert!(!fallback.is_empty());
        assert_eq!(fallback, catalog.default_responses());
    }

    #[test]
    fn test_sample_sizes_and_distinctness() {
        let catalog = ResponseCatalog::builtin();
        let messages = catalog.lookup("stress");
        let mut rng = StdRng::seed_from_u64(7);
        for k in 0..8 {
            let picked = ResponseCatalog::sample(messages, k, &mut rng);
            assert_eq!(picked.len(), k.min(messages.len()));
            let unique: HashSet<&str> = picked.iter().copied().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(picked.iter().all(|p| messages.iter().any(|m| m == p)));
        }
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let catalog = ResponseCatalog::builtin();
        let a = catalog.respond("anger", 2, &mut StdRng::seed_from_u64(99));
        let b = catalog.respond("anger", 2, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_default_rejected() {
        assert!(ResponseCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"Calm": ["Breathe in."], "default": ["You matter."], "empty": []}"#;
        let catalog = ResponseCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.lookup("calm"), &["Breathe in.".to_string()]);
        assert_eq!(catalog.lookup("empty"), &["You matter.".to_string()]);
        assert_eq!(catalog.lookup("fear"), &["You matter.".to_string()]);

        assert!(ResponseCatalog::from_json_str(r#"{"calm": ["x"]}"#).is_err());
        assert!(ResponseCatalog::from_json_str("not json").is_err());
    }

    #[test]
    fn test_emoji() {
        assert_eq!(emoji_for("fear"), Some("😨"));
        assert_eq!(emoji_for("default"), None);
    }
}
