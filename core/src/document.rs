use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier assigned to a document by the collection owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(i64),
    Text(String),
}

impl ExternalId {
    /// Interpret a path segment or CLI argument: integers first, then text.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => ExternalId::Int(n),
            Err(_) => ExternalId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Int(n) => f.pad(&n.to_string()),
            ExternalId::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for ExternalId {
    fn from(n: i64) -> Self { ExternalId::Int(n) }
}

impl From<i32> for ExternalId {
    fn from(n: i32) -> Self { ExternalId::Int(n.into()) }
}

impl From<u32> for ExternalId {
    fn from(n: u32) -> Self { ExternalId::Int(n.into()) }
}

impl From<&str> for ExternalId {
    fn from(s: &str) -> Self { ExternalId::Text(s.to_string()) }
}

impl From<String> for ExternalId {
    fn from(s: String) -> Self { ExternalId::Text(s) }
}

/// One searchable item. Optional fields are filled with empty values when the
/// record is deserialized, so readers never have to default them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: ExternalId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Pre-extracted file text; content search falls back to `description` without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_content: Option<String>,
    #[serde(with = "timestamp")]
    pub upload_date: OffsetDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_count: u64,
}

impl Document {
    pub fn new(id: impl Into<ExternalId>, name: impl Into<String>, upload_date: OffsetDateTime) -> Self {
        Document {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            file_type: String::new(),
            tags: Vec::new(),
            extracted_content: None,
            upload_date,
            size: 0,
            access_level: String::new(),
            download_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.extracted_content = Some(content.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_access_level(mut self, access_level: impl Into<String>) -> Self {
        self.access_level = access_level.into();
        self
    }

    pub fn with_download_count(mut self, download_count: u64) -> Self {
        self.download_count = download_count;
        self
    }

    /// Text searched by `search_within_document`.
    pub fn content_text(&self) -> &str {
        self.extracted_content.as_deref().unwrap_or(&self.description)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde adapter for timestamps: RFC 3339 or a bare `YYYY-MM-DD` on input,
/// RFC 3339 on output.
pub mod timestamp {
    use crate::error::SearchError;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{Date, OffsetDateTime};

    pub fn parse(raw: &str) -> crate::Result<OffsetDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(dt);
        }
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map(|d| d.midnight().assume_utc())
            .map_err(|_| SearchError::InvalidTimestamp(raw.to_string()))
    }

    pub fn format(dt: &OffsetDateTime) -> String {
        dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
    }

    pub fn format_date(dt: &OffsetDateTime) -> String {
        dt.format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| dt.date().to_string())
    }

    pub fn serialize<S: Serializer>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }
}
