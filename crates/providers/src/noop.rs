use crate::{PredictRequest, PredictResponse, ProviderError, VideoClassifier};

/// Classifier used when no prediction service is configured; every call fails.
#[derive(Debug, Default)]
pub struct NoopClassifier;

#[async_trait::async_trait]
impl VideoClassifier for NoopClassifier {
    async fn predict(&self, _request: &PredictRequest) -> Result<PredictResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
