use crate::document::{Document, ExternalId};
use crate::tokenizer::tokenize;
use crate::DocId;
use std::collections::{HashMap, HashSet};

/// Token → documents containing it. Postings are in collection order and
/// hold each document at most once.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build(documents: &[Document]) -> Self {
        let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
        for (doc_id, doc) in documents.iter().enumerate() {
            let doc_id = doc_id as DocId;
            let mut seen_in_doc: HashSet<String> = HashSet::new();
            for term in tokenize(&searchable_text(doc)) {
                if seen_in_doc.insert(term.clone()) {
                    postings.entry(term).or_default().push(doc_id);
                }
            }
        }
        Self { postings }
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains(&self, term: &str) -> bool { self.postings.contains_key(term) }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}

/// Name, description, category, tags, type and extracted content joined by spaces.
pub fn searchable_text(doc: &Document) -> String {
    let mut parts: Vec<&str> = vec![&doc.name, &doc.description, &doc.category];
    parts.extend(doc.tags.iter().map(String::as_str));
    parts.push(&doc.file_type);
    parts.push(doc.extracted_content.as_deref().unwrap_or(""));
    parts.join(" ")
}

/// An immutable document collection together with the index built from it.
/// Replacing the collection means building a new snapshot.
#[derive(Debug, Default)]
pub struct Snapshot {
    documents: Vec<Document>,
    index: InvertedIndex,
    by_external: HashMap<ExternalId, DocId>,
}

impl Snapshot {
    pub fn build(documents: Vec<Document>) -> Self {
        let index = InvertedIndex::build(&documents);
        let mut by_external = HashMap::with_capacity(documents.len());
        for (doc_id, doc) in documents.iter().enumerate() {
            // first occurrence wins on duplicate ids
            by_external.entry(doc.id.clone()).or_insert(doc_id as DocId);
        }
        Self { documents, index, by_external }
    }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn get(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id as usize)
    }

    pub fn find(&self, id: &ExternalId) -> Option<&Document> {
        self.by_external.get(id).and_then(|&doc_id| self.get(doc_id))
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn docs() -> Vec<Document> {
        vec![
            Document::new(1, "Quarterly Report", datetime!(2024-01-01 0:00 UTC))
                .with_tags(["finance"])
                .with_category("reports"),
            Document::new(2, "Employee Handbook", datetime!(2024-06-01 0:00 UTC))
                .with_description("Handbook for every employee, reported yearly")
                .with_tags(["hr"])
                .with_category("policies"),
        ]
    }

    #[test]
    fn searchable_text_joins_fields() {
        let doc = Document::new(1, "Deck", datetime!(2024-01-01 0:00 UTC))
            .with_description("pitch")
            .with_category("sales")
            .with_tags(["q1", "investors"])
            .with_file_type("pptx")
            .with_content("slides");
        assert_eq!(searchable_text(&doc), "Deck pitch sales q1 investors pptx slides");
    }

    #[test]
    fn postings_are_deduplicated_per_document() {
        let index = InvertedIndex::build(&docs());
        // "handbook" appears twice in document 2
        assert_eq!(index.postings("handbook"), Some(&[1][..]));
        // "report" (name of 1) and "reported" → "report" (description of 2)
        assert_eq!(index.postings("report"), Some(&[0, 1][..]));
        assert!(index.postings("the").is_none());
    }

    #[test]
    fn index_keys_are_normalized() {
        let index = InvertedIndex::build(&docs());
        for term in index.terms() {
            assert!(term.chars().count() > 2);
            assert_eq!(term, term.to_lowercase());
            assert!(term.chars().all(|c| c.is_alphanumeric()));
        }
    }

    #[test]
    fn snapshot_finds_by_external_id() {
        let snap = Snapshot::build(docs());
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.find(&ExternalId::Int(2)).map(|d| d.name.as_str()), Some("Employee Handbook"));
        assert!(snap.find(&ExternalId::Int(3)).is_none());
    }

    #[test]
    fn empty_collection() {
        let snap = Snapshot::build(Vec::new());
        assert!(snap.is_empty());
        assert_eq!(snap.index().num_terms(), 0);
    }
}
