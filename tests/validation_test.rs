use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use solace::dataset::{self, DatasetError};
use solace::{ClassDefinition, Classifier, ClassifierError, ResponseCatalog, TrainingConfig};

#[test]
fn test_duplicate_class() {
    let result = Classifier::builder()
        .add_class(ClassDefinition::new("test").with_examples(vec!["example one"]))
        .and_then(|builder| builder.add_class(ClassDefinition::new(" test ").with_examples(vec!["example two"])));

    assert!(result.is_err());
}

#[test]
fn test_class_without_examples() {
    let result = Classifier::builder().add_class(ClassDefinition::new("empty"));
    assert!(matches!(result.unwrap_err(), ClassifierError::ValidationError(_)));
}

#[test]
fn test_stopword_only_corpus() {
    // Every token is a stopword or shorter than two letters
    let result = Classifier::builder()
        .add_class(ClassDefinition::new("a").with_examples(vec!["the and of", "I a"]))
        .and_then(|b| b.add_class(ClassDefinition::new("b").with_examples(vec!["is it was"])))
        .and_then(|b| b.build());

    assert!(matches!(result.unwrap_err(), ClassifierError::BuildError(_)));
}

#[test]
fn test_invalid_config() {
    let config = TrainingConfig { alpha: 0.0, ..Default::default() };
    let result = Classifier::builder()
        .with_config(config)
        .add_class(ClassDefinition::new("x").with_examples(vec!["some words"]))
        .and_then(|b| b.build());
    assert!(matches!(result.unwrap_err(), ClassifierError::ValidationError(_)));

    let config = TrainingConfig { test_fraction: 1.0, ..Default::default() };
    assert!(config.validate().is_err());
}

#[test]
fn test_sample_properties() {
    let catalog = ResponseCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(42);

    for label in ["stress", "anxiety", "fear", "not-a-label"] {
        let messages = catalog.lookup(label);
        for k in 0..=6 {
            let picked = ResponseCatalog::sample(messages, k, &mut rng);
            assert_eq!(picked.len(), k.min(messages.len()));
            let distinct: HashSet<&str> = picked.iter().copied().collect();
            assert_eq!(distinct.len(), picked.len());
            assert!(picked.iter().all(|m| messages.iter().any(|s| s == m)));
        }
    }
}

#[test]
fn test_unknown_label_uses_default() {
    let catalog = ResponseCatalog::builtin();
    assert_eq!(catalog.lookup("bewildered"), catalog.default_responses());
    assert_ne!(catalog.lookup("stress"), catalog.default_responses());
}

#[test]
fn test_custom_catalog_from_json() {
    let json = r#"{
        "joy": ["Enjoy it!", "Share it with someone."],
        "empty": [],
        "default": ["Thanks for sharing."]
    }"#;
    let catalog = ResponseCatalog::from_json_str(json).unwrap();
    assert_eq!(catalog.lookup("joy").len(), 2);
    assert_eq!(catalog.lookup("empty"), ["Thanks for sharing.".to_string()]);
    assert_eq!(catalog.lookup("anger"), ["Thanks for sharing.".to_string()]);

    assert!(ResponseCatalog::from_json_str(r#"{"joy": ["x"]}"#).is_err());
    assert!(ResponseCatalog::from_json_str(r#"{"default": []}"#).is_err());
}

#[test]
fn test_dataset_rows() {
    let csv = "text,emotion\nI can't sleep!!,Anxiety\n,fear\nfine,\nSo HAPPY today,happiness\n";
    let examples = dataset::read_examples(csv.as_bytes()).unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].cleaned_text, "cant sleep");
    assert_eq!(examples[0].emotion, "Anxiety");
    assert_eq!(examples[1].cleaned_text, "happy today");

    let only_blank = "text,emotion\n,\n";
    assert!(matches!(dataset::read_examples(only_blank.as_bytes()), Err(DatasetError::Empty)));
}
