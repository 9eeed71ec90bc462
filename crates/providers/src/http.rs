use crate::{PredictRequest, PredictResponse, ProviderError, VideoClassifier};
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpClassifierConfig {
    /// Scheme, host and port of the prediction service, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// Client for the prediction service's `POST /predict` endpoint.
#[derive(Clone)]
pub struct HttpClassifier {
    client: Client,
    cfg: Arc<HttpClassifierConfig>,
}

impl HttpClassifier {
    pub fn new(cfg: HttpClassifierConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.cfg.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl VideoClassifier for HttpClassifier {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ProviderError> {
        let url = self.predict_url();
        debug!(%url, filepath = %request.filepath, "requesting prediction");
        let resp = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        let parsed: PredictResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        Ok(parsed)
    }
}
