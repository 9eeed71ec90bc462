use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Disposition of a classified video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Important,
    #[default]
    Pending,
    Delete,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Important, Tag::Pending, Tag::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Important => "Important",
            Tag::Pending => "Pending",
            Tag::Delete => "Delete",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the three tags.
    pub fn parse(s: &str) -> Option<Tag> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::parse(s).ok_or_else(|| format!("unknown tag '{}' (expected Important, Pending or Delete)", s))
    }
}

// Stored documents may carry any casing; unknown text falls back to Pending
// so one bad record does not invalidate the whole registry.
impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::parse(&s).unwrap_or_else(|| {
            warn!("unknown tag '{}' in registry, reading as Pending", s);
            Tag::Pending
        })
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub filename: String,
    pub prediction: String,
    pub tag: Tag,
}

impl VideoRecord {
    pub fn new(filename: impl Into<String>, prediction: impl Into<String>, tag: Tag) -> Self {
        Self {
            id: new_record_id(),
            filename: filename.into(),
            prediction: prediction.into(),
            tag,
        }
    }
}

/// `vid_` followed by a time-ordered UUIDv7, unique within a single clock tick.
pub fn new_record_id() -> String {
    format!("vid_{}", uuid::Uuid::now_v7().simple())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    #[serde(rename = "Waiting to Process")]
    Waiting,
    #[serde(rename = "Currently Processing")]
    Processing,
    #[serde(rename = "Completed")]
    Completed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "Waiting to Process",
            QueueStatus::Processing => "Currently Processing",
            QueueStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub filename: String,
    pub status: QueueStatus,
}

pub type QueueSnapshot = Vec<QueueEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_plain_tag_text() {
        let record = VideoRecord {
            id: "vid_1".into(),
            filename: "/footage/a.mp4".into(),
            prediction: "Other/Unsure".into(),
            tag: Tag::Pending,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "vid_1",
                "filename": "/footage/a.mp4",
                "prediction": "Other/Unsure",
                "tag": "Pending"
            })
        );
    }

    #[test]
    fn stored_tags_read_case_insensitively() {
        let record: VideoRecord = serde_json::from_str(
            r#"{"id":"x","filename":"/a.mp4","prediction":"p","tag":"delete"}"#,
        )
        .unwrap();
        assert_eq!(record.tag, Tag::Delete);

        let record: VideoRecord = serde_json::from_str(
            r#"{"id":"x","filename":"/a.mp4","prediction":"p","tag":"Archive"}"#,
        )
        .unwrap();
        assert_eq!(record.tag, Tag::Pending);
    }

    #[test]
    fn queue_status_uses_display_text_on_the_wire() {
        let entry = QueueEntry {
            filename: "/a.mp4".into(),
            status: QueueStatus::Processing,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"filename":"/a.mp4","status":"Currently Processing"}"#
        );
    }

    #[test]
    fn record_ids_are_distinct_within_a_tick() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("vid_")));
    }
}
