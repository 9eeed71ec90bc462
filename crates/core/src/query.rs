//! Filtering and pagination over registry records.

use crate::models::{Tag, VideoRecord};
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    pub tag: Option<Tag>,
    /// Case-insensitive substring matched against id, filename, prediction and tag.
    pub search: Option<String>,
    /// Zero-based.
    pub page: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
}

impl VideoQuery {
    pub fn matches(&self, record: &VideoRecord) -> bool {
        if let Some(tag) = self.tag {
            if record.tag != tag {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    record.id.as_str(),
                    record.filename.as_str(),
                    record.prediction.as_str(),
                    record.tag.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    pub fn apply(&self, records: Vec<VideoRecord>, page_size: usize) -> Page<VideoRecord> {
        let page_size = page_size.max(1);
        let matched: Vec<VideoRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(self.page.saturating_mul(page_size))
            .take(page_size)
            .collect();
        Page {
            items,
            page: self.page,
            page_size,
            total,
            page_count: total.div_ceil(page_size),
        }
    }
}
