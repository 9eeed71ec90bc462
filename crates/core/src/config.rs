use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub classifier: ClassifierConfig,
    pub intake: IntakeConfig,
    pub review: ReviewConfig,
    pub disposal: DisposalConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: String,
    pub pending_file: String,
    pub registry_file: String,
    /// SQLite path or `sqlite:` URL; relative paths resolve against `data_dir`.
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            data_dir: "data".to_string(),
            pending_file: "video_paths.json".to_string(),
            registry_file: "videos.json".to_string(),
            database: "triage.db".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn pending_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.pending_file)
    }

    pub fn registry_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.registry_file)
    }

    pub fn database_url(&self) -> String {
        if self.database.starts_with("sqlite:") {
            return self.database.clone();
        }
        PathBuf::from(&self.data_dir)
            .join(&self.database)
            .to_string_lossy()
            .into_owned()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// `http` or `noop`.
    pub provider: String,
    pub endpoint: String,
    pub use_imagebind: bool,
    /// Zero disables the request timeout.
    pub timeout_secs: u64,
    /// Exact prediction label that marks a clip for deletion.
    pub delete_label: String,
    /// Label recorded when the classifier omits one.
    pub default_prediction: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: "http".to_string(),
            endpoint: "http://127.0.0.1:8000".to_string(),
            use_imagebind: false,
            timeout_secs: 0,
            delete_label: crate::classifier::CONFIDENT_DELETE_LABEL.to_string(),
            default_prediction: crate::classifier::DEFAULT_PREDICTION.to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub extensions: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mp4".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub page_size: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisposalConfig {
    /// Move deleted footage here instead of the system trash.
    pub trash_dir: Option<String>,
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("TRIAGE")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_yield_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Json);
        assert_eq!(cfg.classifier.endpoint, "http://127.0.0.1:8000");
        assert_eq!(cfg.classifier.delete_label, "Car Check|Confident");
        assert_eq!(cfg.intake.extensions, vec!["mp4".to_string()]);
        assert_eq!(cfg.review.page_size, 20);
        assert!(cfg.classifier.timeout().is_none());
        assert!(cfg.disposal.trash_dir.is_none());
    }

    #[test]
    fn file_overrides_selected_keys() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("triage.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            backend = "sqlite"
            data_dir = "/var/lib/triage"

            [classifier]
            use_imagebind = true
            timeout_secs = 30
            "#,
        )
        .unwrap();

        let cfg = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
        assert_eq!(
            cfg.storage.registry_path(),
            PathBuf::from("/var/lib/triage").join("videos.json")
        );
        assert_eq!(
            cfg.storage.database_url(),
            PathBuf::from("/var/lib/triage")
                .join("triage.db")
                .to_string_lossy()
        );
        assert!(cfg.classifier.use_imagebind);
        assert_eq!(cfg.classifier.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.classifier.provider, "http");
    }
}
