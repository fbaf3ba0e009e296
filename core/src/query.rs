use crate::document::{timestamp, Document};
use crate::filter::{sort_hits, SortKey, SortOrder};
use crate::index::Snapshot;
use crate::score::relevance;
use crate::tokenizer::tokenize_unique;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

pub const DEFAULT_LIMIT: usize = 50;

/// Inclusive upload-date window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "timestamp")]
    pub start: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub end: OffsetDateTime,
}

impl DateRange {
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub category: Option<String>,
    pub access_level: Option<String>,
    pub date_range: Option<DateRange>,
    /// Page size; absent or zero means `DEFAULT_LIMIT`.
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Re-sort after relevance ranking, before pagination.
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

/// A document with the scores it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Document,
    /// Number of distinct query tokens found in the document.
    pub search_score: u32,
    pub matched_terms: Vec<String>,
    pub relevance_score: u32,
}

impl SearchHit {
    pub fn unranked(document: Document) -> Self {
        SearchHit { document, search_score: 0, matched_terms: Vec::new(), relevance_score: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub documents: Vec<SearchHit>,
    pub total_count: usize,
    pub search_terms: Vec<String>,
    pub has_more: bool,
}

/// Query tokens plus every matching document, best first, before pagination.
pub struct Ranked {
    pub terms: Vec<String>,
    pub hits: Vec<SearchHit>,
}

/// Resolve `query` against the index and score every candidate.
///
/// Equal relevance scores keep collection order.
pub fn rank(snapshot: &Snapshot, query: &str, now: OffsetDateTime) -> Ranked {
    let terms = tokenize_unique(query);
    let mut matches: HashMap<DocId, Vec<String>> = HashMap::new();
    for term in &terms {
        if let Some(postings) = snapshot.index().postings(term) {
            for &doc_id in postings {
                matches.entry(doc_id).or_default().push(term.clone());
            }
        }
    }

    let mut candidates: Vec<(DocId, Vec<String>)> = matches.into_iter().collect();
    candidates.sort_by_key(|(doc_id, _)| *doc_id);

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|(doc_id, matched_terms)| {
            let doc = snapshot.get(doc_id)?;
            let search_score = matched_terms.len() as u32;
            Some(SearchHit {
                document: doc.clone(),
                search_score,
                matched_terms,
                relevance_score: relevance(doc, query, search_score, now),
            })
        })
        .collect();
    hits.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    Ranked { terms, hits }
}

pub fn basic_search(snapshot: &Snapshot, query: &str, options: &SearchOptions, now: OffsetDateTime) -> SearchResponse {
    let (mut hits, terms) = if query.trim().is_empty() {
        let all: Vec<SearchHit> = snapshot.documents().iter().cloned().map(SearchHit::unranked).collect();
        (all, Vec::new())
    } else {
        let Ranked { terms, hits } = rank(snapshot, query, now);
        (apply_options(hits, options), terms)
    };

    if let Some(key) = options.sort_by {
        sort_hits(&mut hits, key, options.sort_order);
    }

    let limit = options.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT);
    let offset = options.offset.unwrap_or(0);
    let total_count = hits.len();
    let has_more = total_count > offset.saturating_add(limit);
    let documents: Vec<SearchHit> = hits.into_iter().skip(offset).take(limit).collect();

    tracing::debug!(query, total_count, returned = documents.len(), "basic search");
    SearchResponse { documents, total_count, search_terms: terms, has_more }
}

fn apply_options(hits: Vec<SearchHit>, options: &SearchOptions) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|h| options.category.as_ref().map_or(true, |c| &h.document.category == c))
        .filter(|h| options.access_level.as_ref().map_or(true, |a| &h.document.access_level == a))
        .filter(|h| options.date_range.map_or(true, |r| r.contains(h.document.upload_date)))
        .collect()
}
