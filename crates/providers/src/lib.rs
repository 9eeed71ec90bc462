//! Provider abstractions for video classifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod http;
pub mod noop;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Body of a `/predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub filepath: String,
    pub use_imagebind: bool,
}

/// Classifier answer. Either field may be absent in the wire body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[async_trait::async_trait]
pub trait VideoClassifier: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    classifiers: HashMap<String, Arc<dyn VideoClassifier>>,
    pub preferred_classifier: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(mut self, name: &str, provider: Arc<dyn VideoClassifier>) -> Self {
        self.classifiers.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred_classifier(mut self, name: &str) -> Self {
        self.preferred_classifier = Some(name.to_string());
        self
    }

    pub fn classifier(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<dyn VideoClassifier>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_classifier.clone())
            .ok_or_else(|| {
                ProviderError::UnknownProvider("no classifier provider configured".into())
            })?;
        self.classifiers
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classifiers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop::NoopClassifier;

    #[test]
    fn registry_resolves_preferred_and_explicit_names() {
        let reg = ProviderRegistry::new()
            .with_classifier("noop", Arc::new(NoopClassifier))
            .set_preferred_classifier("noop");

        assert!(reg.classifier(None).is_ok());
        assert!(reg.classifier(Some("noop")).is_ok());
        assert!(matches!(
            reg.classifier(Some("http")),
            Err(ProviderError::UnknownProvider(name)) if name == "http"
        ));
        assert_eq!(reg.names(), vec!["noop".to_string()]);
    }

    #[test]
    fn registry_without_preference_reports_missing_provider() {
        let reg = ProviderRegistry::new();
        assert!(matches!(
            reg.classifier(None),
            Err(ProviderError::UnknownProvider(_))
        ));
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let parsed: PredictResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PredictResponse::default());

        let parsed: PredictResponse =
            serde_json::from_str(r#"{"prediction":"Car Check|Confident","score":0.93}"#).unwrap();
        assert_eq!(parsed.prediction.as_deref(), Some("Car Check|Confident"));
        assert_eq!(parsed.score, Some(0.93));
    }
}
