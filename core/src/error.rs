use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Export requested in a format other than json, csv or text.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid timestamp {0:?}, expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp(String),

    #[error("invalid sort key {0:?}")]
    InvalidSortKey(String),

    #[error("invalid sort order {0:?}, expected asc or desc")]
    InvalidSortOrder(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
