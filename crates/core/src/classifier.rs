//! Turns a classifier answer into a prediction label and an initial tag.

use crate::models::Tag;
use providers::{PredictRequest, VideoClassifier};

/// The only label confident enough to pre-tag footage for deletion.
pub const CONFIDENT_DELETE_LABEL: &str = "Car Check|Confident";
pub const DEFAULT_PREDICTION: &str = "Other/Unsure";

#[derive(Debug, Clone)]
pub struct TagPolicy {
    pub delete_label: String,
    pub default_prediction: String,
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self {
            delete_label: CONFIDENT_DELETE_LABEL.to_string(),
            default_prediction: DEFAULT_PREDICTION.to_string(),
        }
    }
}

impl TagPolicy {
    /// Exact match on the delete label; everything else waits for review.
    pub fn derive_tag(&self, prediction: &str) -> Tag {
        if prediction == self.delete_label {
            Tag::Delete
        } else {
            Tag::Pending
        }
    }

    pub fn prediction_or_default(&self, prediction: Option<String>) -> String {
        prediction
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.default_prediction.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutcome {
    pub prediction: String,
    pub score: Option<f64>,
    pub tag: Tag,
}

pub async fn classify(
    classifier: &dyn VideoClassifier,
    filepath: &str,
    use_imagebind: bool,
    policy: &TagPolicy,
) -> anyhow::Result<ClassificationOutcome> {
    let request = PredictRequest {
        filepath: filepath.to_string(),
        use_imagebind,
    };
    let resp = classifier.predict(&request).await?;
    let prediction = policy.prediction_or_default(resp.prediction);
    let tag = policy.derive_tag(&prediction);
    Ok(ClassificationOutcome {
        prediction,
        score: resp.score,
        tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_confident_car_check_label_tags_delete() {
        let policy = TagPolicy::default();
        assert_eq!(policy.derive_tag("Car Check|Confident"), Tag::Delete);
        assert_eq!(policy.derive_tag("Car Check|Unsure"), Tag::Pending);
        assert_eq!(policy.derive_tag("car check|confident"), Tag::Pending);
        assert_eq!(policy.derive_tag("Other/Unsure"), Tag::Pending);
        assert_eq!(policy.derive_tag(""), Tag::Pending);
    }

    #[test]
    fn missing_or_empty_prediction_falls_back() {
        let policy = TagPolicy::default();
        assert_eq!(policy.prediction_or_default(None), "Other/Unsure");
        assert_eq!(policy.prediction_or_default(Some(String::new())), "Other/Unsure");
        assert_eq!(
            policy.prediction_or_default(Some("Traffic Stop".into())),
            "Traffic Stop"
        );
        assert_eq!(
            policy.derive_tag(&policy.prediction_or_default(None)),
            Tag::Pending
        );
    }
}
