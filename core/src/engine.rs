use crate::content::{search_within_document, ContentSearchResult};
use crate::document::{Document, ExternalId};
use crate::filter::{advanced_search, AdvancedSearchResponse, Criteria};
use crate::index::Snapshot;
use crate::query::{basic_search, SearchOptions, SearchResponse};
use crate::suggest::{get_suggestions, popular_terms, TermCount, POPULAR_TERMS};
use parking_lot::RwLock;
use std::sync::Arc;
use time::OffsetDateTime;

/// In-memory search over one document collection.
///
/// Each query runs against the snapshot current when it started; `update_documents`
/// builds the replacement off-lock and swaps it in whole, so readers never see a
/// partially built index.
#[derive(Debug, Default)]
pub struct SearchEngine {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl SearchEngine {
    pub fn new(documents: Vec<Document>) -> Self {
        let engine = Self::default();
        engine.update_documents(documents);
        engine
    }

    pub fn update_documents(&self, documents: Vec<Document>) {
        let next = Arc::new(Snapshot::build(documents));
        tracing::info!(num_docs = next.len(), num_terms = next.index().num_terms(), "document collection replaced");
        *self.snapshot.write() = next;
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn len(&self) -> usize { self.snapshot().len() }

    pub fn is_empty(&self) -> bool { self.snapshot().is_empty() }

    pub fn document(&self, id: &ExternalId) -> Option<Document> {
        self.snapshot().find(id).cloned()
    }

    pub fn basic_search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        basic_search(&self.snapshot(), query, options, OffsetDateTime::now_utc())
    }

    pub fn advanced_search(&self, criteria: &Criteria) -> AdvancedSearchResponse {
        advanced_search(&self.snapshot(), criteria, OffsetDateTime::now_utc())
    }

    pub fn search_within_document(&self, id: &ExternalId, query: &str) -> ContentSearchResult {
        search_within_document(&self.snapshot(), id, query)
    }

    pub fn get_suggestions(&self, partial: &str, max_suggestions: usize) -> Vec<String> {
        get_suggestions(&self.snapshot(), partial, max_suggestions)
    }

    pub fn popular_terms(&self) -> Vec<TermCount> {
        popular_terms(&self.snapshot(), POPULAR_TERMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use time::macros::datetime;

    fn doc(id: i64, name: &str) -> Document {
        Document::new(id, name, datetime!(2024-01-01 0:00 UTC))
    }

    #[test]
    fn update_replaces_collection_and_index() {
        let engine = SearchEngine::new(vec![doc(1, "Quarterly Report")]);
        assert_eq!(engine.basic_search("report", &SearchOptions::default()).total_count, 1);

        engine.update_documents(vec![doc(2, "Employee Handbook"), doc(3, "Handbook Appendix")]);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.basic_search("report", &SearchOptions::default()).total_count, 0);
        assert_eq!(engine.basic_search("handbook", &SearchOptions::default()).total_count, 2);
        assert!(engine.document(&ExternalId::Int(1)).is_none());
    }

    #[test]
    fn held_snapshot_survives_update() {
        let engine = SearchEngine::new(vec![doc(1, "Quarterly Report")]);
        let before = engine.snapshot();
        engine.update_documents(Vec::new());
        assert_eq!(before.len(), 1);
        assert!(engine.is_empty());
    }

    #[test]
    fn readers_see_whole_snapshots() {
        let small: Vec<Document> = (0..10).map(|i| doc(i, "alpha memo")).collect();
        let large: Vec<Document> = (0..200).map(|i| doc(i, "alpha memo")).collect();
        let engine = Arc::new(SearchEngine::new(small.clone()));

        let writer = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for round in 0..50 {
                    engine.update_documents(if round % 2 == 0 { large.clone() } else { small.clone() });
                }
            })
        };
        for _ in 0..200 {
            let snap = engine.snapshot();
            let hits = snap.index().postings("alpha").map_or(0, |p| p.len());
            assert_eq!(hits, snap.len());
        }
        writer.join().unwrap();
    }
}
