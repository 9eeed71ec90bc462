#![allow(dead_code)]

use providers::{PredictRequest, PredictResponse, ProviderError, VideoClassifier};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use triage_core::intake::VideoFilter;
use triage_core::registry::{JsonRegistry, SqliteRegistry, VideoRegistry};

/// Answers from a fixed table; unknown paths fail like an unreachable service.
#[derive(Default)]
pub struct ScriptedClassifier {
    answers: HashMap<String, Option<PredictResponse>>,
    pub calls: Mutex<Vec<PredictRequest>>,
}

impl ScriptedClassifier {
    pub fn answer(mut self, path: &str, prediction: Option<&str>) -> Self {
        self.answers.insert(
            path.to_string(),
            Some(PredictResponse {
                prediction: prediction.map(str::to_string),
                score: Some(0.5),
            }),
        );
        self
    }

    pub fn fail(mut self, path: &str) -> Self {
        self.answers.insert(path.to_string(), None);
        self
    }

    pub fn calls(&self) -> Vec<PredictRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VideoClassifier for ScriptedClassifier {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ProviderError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.answers.get(&request.filepath) {
            Some(Some(resp)) => Ok(resp.clone()),
            _ => Err(ProviderError::RequestFailed("connection refused".into())),
        }
    }
}

pub fn json_registry(dir: &Path) -> Arc<dyn VideoRegistry> {
    Arc::new(JsonRegistry::new(
        dir.join("video_paths.json"),
        dir.join("videos.json"),
        VideoFilter::default(),
    ))
}

pub async fn sqlite_registry(dir: &Path) -> Arc<dyn VideoRegistry> {
    let db = dir.join("triage.db");
    Arc::new(
        SqliteRegistry::open(&db.to_string_lossy(), VideoFilter::default())
            .await
            .unwrap(),
    )
}

pub fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
