pub mod content;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod loader;
pub mod query;
pub mod score;
pub mod suggest;
pub mod tokenizer;

/// Position of a document inside the snapshot it was indexed from.
pub type DocId = u32;

pub use content::{ContentMatch, ContentSearchResult};
pub use document::{Document, ExternalId};
pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use export::ExportFormat;
pub use filter::{AdvancedSearchResponse, Criteria, SizeRange, SortKey, SortOrder};
pub use index::{InvertedIndex, Snapshot};
pub use query::{DateRange, SearchHit, SearchOptions, SearchResponse};
pub use suggest::TermCount;
