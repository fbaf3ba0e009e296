use crate::error::SearchError;
use crate::index::Snapshot;
use crate::query::{rank, DateRange, SearchHit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Relevance,
    Name,
    Date,
    Size,
    Downloads,
    Category,
}

impl FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "name" => Ok(SortKey::Name),
            "date" => Ok(SortKey::Date),
            "size" => Ok(SortKey::Size),
            "downloads" => Ok(SortKey::Downloads),
            "category" => Ok(SortKey::Category),
            _ => Err(SearchError::InvalidSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(SearchError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Inclusive byte-size window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u64,
    pub max: u64,
}

impl SizeRange {
    pub fn contains(&self, size: u64) -> bool {
        size >= self.min && size <= self.max
    }
}

/// Structured search. Every present criterion must hold; empty sets are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub access_levels: Vec<String>,
    pub file_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_range: Option<SizeRange>,
    /// Matches when any document tag contains any of these, case-insensitively.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchResponse {
    pub documents: Vec<SearchHit>,
    pub total_count: usize,
    pub applied_filters: Criteria,
}

pub fn advanced_search(snapshot: &Snapshot, criteria: &Criteria, now: OffsetDateTime) -> AdvancedSearchResponse {
    let mut hits: Vec<SearchHit> = match criteria.query.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(query) => rank(snapshot, query, now).hits,
        None => snapshot.documents().iter().cloned().map(SearchHit::unranked).collect(),
    };

    if !criteria.categories.is_empty() {
        hits.retain(|h| criteria.categories.contains(&h.document.category));
    }
    if !criteria.access_levels.is_empty() {
        hits.retain(|h| criteria.access_levels.contains(&h.document.access_level));
    }
    if !criteria.file_types.is_empty() {
        hits.retain(|h| criteria.file_types.contains(&h.document.file_type));
    }
    if let Some(range) = criteria.date_range {
        hits.retain(|h| range.contains(h.document.upload_date));
    }
    if let Some(range) = criteria.size_range {
        hits.retain(|h| range.contains(h.document.size));
    }
    if !criteria.tags.is_empty() {
        let wanted: Vec<String> = criteria.tags.iter().map(|t| t.to_lowercase()).collect();
        hits.retain(|h| {
            h.document.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                wanted.iter().any(|w| tag.contains(w.as_str()))
            })
        });
    }

    if let Some(key) = criteria.sort_by {
        sort_hits(&mut hits, key, criteria.sort_order);
    }

    tracing::debug!(total_count = hits.len(), "advanced search");
    AdvancedSearchResponse { total_count: hits.len(), documents: hits, applied_filters: criteria.clone() }
}

/// Sort with the key's default comparator, then reverse the whole list for `Asc`.
///
/// Numeric and date keys default to largest first; name and category default
/// to alphabetical, so `Asc` yields reverse-alphabetical for those two.
pub fn sort_hits(hits: &mut [SearchHit], key: SortKey, order: SortOrder) {
    hits.sort_by(|a, b| compare(a, b, key));
    if order == SortOrder::Asc {
        hits.reverse();
    }
}

fn compare(a: &SearchHit, b: &SearchHit, key: SortKey) -> Ordering {
    let (a, b, ra, rb) = (&a.document, &b.document, a.relevance_score, b.relevance_score);
    match key {
        SortKey::Relevance => rb.cmp(&ra),
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Date => b.upload_date.cmp(&a.upload_date),
        SortKey::Size => b.size.cmp(&a.size),
        SortKey::Downloads => b.download_count.cmp(&a.download_count),
        SortKey::Category => compare_text(&a.category, &b.category),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
