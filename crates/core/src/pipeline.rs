//! Wiring from configuration to registries, providers and services.

use crate::classifier::TagPolicy;
use crate::config::{AppConfig, StorageBackend};
use crate::coordinator::{Coordinator, RunOptions};
use crate::disposal::{Disposer, SystemTrash, TrashDir};
use crate::intake::VideoFilter;
use crate::registry::{JsonRegistry, SqliteRegistry, VideoRegistry};
use crate::review::ReviewService;
use anyhow::Context;
use providers::http::{HttpClassifier, HttpClassifierConfig};
use providers::noop::NoopClassifier;
use providers::ProviderRegistry;
use std::sync::Arc;
use tracing::{info, warn};

pub fn build_provider_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_classifier("noop", Arc::new(NoopClassifier));

    match HttpClassifier::new(HttpClassifierConfig {
        base_url: config.classifier.endpoint.clone(),
        timeout: config.classifier.timeout(),
    }) {
        Ok(http) => reg = reg.with_classifier("http", Arc::new(http)),
        Err(e) => warn!("http classifier unavailable: {}", e),
    }

    reg.set_preferred_classifier(&config.classifier.provider)
}

pub async fn open_registry(config: &AppConfig) -> anyhow::Result<Arc<dyn VideoRegistry>> {
    let filter = VideoFilter::new(&config.intake.extensions)?;
    match config.storage.backend {
        StorageBackend::Json => Ok(Arc::new(JsonRegistry::new(
            config.storage.pending_path(),
            config.storage.registry_path(),
            filter,
        ))),
        StorageBackend::Sqlite => {
            let url = config.storage.database_url();
            let registry = SqliteRegistry::open(&url, filter)
                .await
                .with_context(|| format!("opening sqlite registry at {}", url))?;
            Ok(Arc::new(registry))
        }
    }
}

pub fn build_disposer(config: &AppConfig) -> Arc<dyn Disposer> {
    match &config.disposal.trash_dir {
        Some(dir) => Arc::new(TrashDir::new(dir)),
        None => Arc::new(SystemTrash),
    }
}

pub fn build_coordinator(
    config: &AppConfig,
    registry: Arc<dyn VideoRegistry>,
) -> anyhow::Result<Coordinator> {
    let providers = build_provider_registry(config);
    let classifier = providers.classifier(None)?;
    info!(
        provider = %config.classifier.provider,
        endpoint = %config.classifier.endpoint,
        "classifier ready"
    );
    let options = RunOptions {
        use_imagebind: config.classifier.use_imagebind,
        policy: TagPolicy {
            delete_label: config.classifier.delete_label.clone(),
            default_prediction: config.classifier.default_prediction.clone(),
        },
    };
    Ok(Coordinator::new(registry, classifier, options))
}

pub fn build_review(config: &AppConfig, registry: Arc<dyn VideoRegistry>) -> ReviewService {
    ReviewService::new(registry, build_disposer(config), config.review.page_size)
}
