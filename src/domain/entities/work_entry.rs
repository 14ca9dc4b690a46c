use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::work::{Category, RawRecord, Status, WorkItem};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TAG_LENGTH: u64 = 50;
const MAX_LIST_LIMIT: usize = 100;

// ───── Collection Models ─────────────────────────────────────────────

/// An unvalidated content entry as handed over by a `WorkRepository`.
#[derive(Debug, Clone)]
pub struct RawWorkEntry {
    pub slug: String,
    /// Where the entry came from (file path or a caller-chosen label).
    pub source: String,
    pub data: RawRecord,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct WorkEntry {
    pub slug: String,
    pub item: WorkItem,
    pub body_html: String,
}

/// The validated `work` collection, newest first.
#[derive(Debug, Clone, Default)]
pub struct WorkCollection {
    entries: Vec<WorkEntry>,
}

// ───── API Response Models ──────────────────────────────────────────
#[derive(Debug, Serialize)]
pub struct WorkSummaryResponse<'a> {
    pub slug: &'a str,
    #[serde(flatten)]
    pub item: &'a WorkItem,
}

#[derive(Debug, Serialize)]
pub struct WorkDetailResponse<'a> {
    pub slug: &'a str,
    #[serde(flatten)]
    pub item: &'a WorkItem,
    pub content_html: &'a str,
}

// ───── Query Parameters ─────────────────────────────────────────────
#[derive(Debug, Default, Deserialize, Validate)]
pub struct WorkQuery {
    pub category: Option<Category>,

    pub status: Option<Status>,

    #[validate(length(min = 1, max = MAX_TAG_LENGTH))]
    pub tag: Option<String>,

    #[validate(range(min = 1, max = MAX_LIST_LIMIT))]
    pub limit: Option<usize>,
}

impl WorkEntry {
    pub fn to_summary_response(&self) -> WorkSummaryResponse<'_> {
        WorkSummaryResponse {
            slug: &self.slug,
            item: &self.item,
        }
    }

    pub fn to_detail_response(&self) -> WorkDetailResponse<'_> {
        WorkDetailResponse {
            slug: &self.slug,
            item: &self.item,
            content_html: &self.body_html,
        }
    }
}

impl WorkCollection {
    pub fn new(mut entries: Vec<WorkEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.item.publish_date
                .cmp(&a.item.publish_date)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        WorkCollection { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&WorkEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn list(&self, query: &WorkQuery) -> Vec<&WorkEntry> {
        self.entries
            .iter()
            .filter(|e| query.category.is_none_or(|c| e.item.category == c))
            .filter(|e| query.status.is_none_or(|s| e.item.status == s))
            .filter(|e| {
                query.tag.as_deref().is_none_or(|tag| e.item.tags.iter().any(|t| t == tag))
            })
            .take(query.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Distinct tags across the collection, in first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|e| e.item.tags.iter())
            .map(String::as_str)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }
}
