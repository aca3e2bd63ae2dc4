use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError, NaiveBayesModel, Vectorizer};

/// Environment variable overriding where artifacts live
pub const HOME_ENV: &str = "SOLACE_HOME";

const VECTORIZER_FILE: &str = "vectorizer.json";
const MODEL_FILE: &str = "model.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("No trained artifacts found in {0}")]
    NotTrained(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Malformed artifact {path}: {reason}")]
    Malformed { path: String, reason: ClassifierError },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Reads and writes the trained vectorizer/model pair.
///
/// Both artifacts are JSON files in one directory and are always saved and
/// loaded together.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a new ArtifactStore in the default artifacts directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(HOME_ENV) {
            return PathBuf::from(path).join("artifacts");
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("solace").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("solace").join("artifacts");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("solace").join("artifacts")
    }

    /// Points a store at `artifacts_dir`. The directory is created by
    /// [`ArtifactStore::save`], not here.
    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
        }
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn get_vectorizer_path(&self) -> PathBuf {
        self.artifacts_dir.join(VECTORIZER_FILE)
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.artifacts_dir.join(MODEL_FILE)
    }

    pub fn is_trained(&self) -> bool {
        let vectorizer_path = self.get_vectorizer_path();
        let model_path = self.get_model_path();
        log::debug!("Vectorizer path: {:?} (exists: {})", vectorizer_path, vectorizer_path.exists());
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        vectorizer_path.exists() && model_path.exists()
    }

    /// Writes `value` to a sibling `.tmp` file and returns its path.
    fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, ArtifactError> {
        let json = serde_json::to_string(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        Ok(tmp)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Reads both artifacts and checks each one is internally consistent.
    fn read_pair(&self) -> Result<(Vectorizer, NaiveBayesModel), ArtifactError> {
        let vectorizer_path = self.get_vectorizer_path();
        let model_path = self.get_model_path();

        let vectorizer: Vectorizer = Self::read_json(&vectorizer_path)?;
        vectorizer.validate().map_err(|reason| ArtifactError::Malformed {
            path: vectorizer_path.display().to_string(),
            reason,
        })?;
        let model: NaiveBayesModel = Self::read_json(&model_path)?;
        model.validate().map_err(|reason| ArtifactError::Malformed {
            path: model_path.display().to_string(),
            reason,
        })?;
        Ok((vectorizer, model))
    }

    /// Persists the classifier's vectorizer and model, replacing any previous pair.
    ///
    /// Both files are fully written to temporary files before either is
    /// renamed into place, so a failed write leaves the previous pair intact.
    pub fn save(&self, classifier: &Classifier) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.artifacts_dir)?;
        let vectorizer_path = self.get_vectorizer_path();
        let model_path = self.get_model_path();

        let staged_vectorizer = Self::stage_json(&vectorizer_path, classifier.vectorizer())?;
        let staged_model = match Self::stage_json(&model_path, classifier.model()) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&staged_vectorizer);
                return Err(e);
            }
        };

        log::info!("Saving vectorizer to {:?}", vectorizer_path);
        fs::rename(&staged_vectorizer, &vectorizer_path)?;
        log::info!("Saving model to {:?}", model_path);
        fs::rename(&staged_model, &model_path)?;
        Ok(())
    }

    /// Loads the persisted pair.
    ///
    /// # Errors
    /// * `NotTrained` if either file is missing
    /// * `Io` / `Serialization` if a file cannot be read or parsed
    /// * `Malformed` if a file parses but its parts do not agree
    ///
    /// A pair whose vocabulary fingerprints disagree is still loaded, with a
    /// warning; its predictions are meaningless.
    pub fn load(&self) -> Result<Classifier, ArtifactError> {
        if !self.is_trained() {
            return Err(ArtifactError::NotTrained(self.artifacts_dir.display().to_string()));
        }

        let (vectorizer, model) = self.read_pair()?;

        if !Self::is_matched_pair(&vectorizer, &model) {
            log::warn!(
                "Vectorizer and model in {:?} were not trained together; predictions will be unreliable",
                self.artifacts_dir
            );
        }
        log::info!(
            "Loaded classifier: {} classes, {} features",
            model.classes().len(),
            vectorizer.dimension()
        );
        Ok(Classifier::from_parts(vectorizer, model))
    }

    fn is_matched_pair(vectorizer: &Vectorizer, model: &NaiveBayesModel) -> bool {
        vectorizer.vocabulary().fingerprint() == model.vocabulary_fingerprint()
    }

    /// Returns true if both artifacts exist and belong together. A file that
    /// cannot be parsed or is malformed is an error.
    pub fn verify(&self) -> Result<bool, ArtifactError> {
        if !self.is_trained() {
            log::info!("One or both artifacts do not exist");
            return Ok(false);
        }
        let (vectorizer, model) = self.read_pair()?;
        let matched = Self::is_matched_pair(&vectorizer, &model);
        log::info!("Artifact fingerprint verification: {}", matched);
        Ok(matched)
    }

    pub fn remove_artifacts(&self) -> Result<(), ArtifactError> {
        let vectorizer_path = self.get_vectorizer_path();
        let model_path = self.get_model_path();

        if vectorizer_path.exists() {
            fs::remove_file(&vectorizer_path)?;
        }
        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_artifacts_dir() {
        env::set_var(HOME_ENV, "/tmp/test-solace");
        let path = ArtifactStore::get_default_artifacts_dir();
        assert!(path.to_str().unwrap().contains("/tmp/test-solace/artifacts"));
        env::remove_var(HOME_ENV);

        let path = ArtifactStore::get_default_artifacts_dir();
        assert!(path.to_str().unwrap().contains("solace"));
    }

    #[test]
    fn test_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.get_vectorizer_path().ends_with("vectorizer.json"));
        assert!(store.get_model_path().ends_with("model.json"));
        assert!(!store.is_trained());
        assert!(!store.verify().unwrap());
    }

    #[test]
    fn test_new_does_not_create_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts_dir = dir.path().join("nested").join("artifacts");
        let store = ArtifactStore::new(&artifacts_dir);
        assert!(!artifacts_dir.exists());
        assert!(matches!(store.load(), Err(ArtifactError::NotTrained(_))));
        assert!(!artifacts_dir.exists());
    }
}
