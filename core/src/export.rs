use crate::document::timestamp;
use crate::error::{Result, SearchError};
use crate::filter::AdvancedSearchResponse;
use crate::query::{SearchHit, SearchResponse};
use serde::Serialize;
use std::str::FromStr;

const CSV_HEADERS: [&str; 6] = ["Name", "Category", "Size", "Upload Date", "Access Level", "Downloads"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" => Ok(ExportFormat::Text),
            _ => Err(SearchError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A result set that can be exported.
pub trait Exportable: Serialize {
    fn hits(&self) -> &[SearchHit];
}

impl Exportable for SearchResponse {
    fn hits(&self) -> &[SearchHit] { &self.documents }
}

impl Exportable for AdvancedSearchResponse {
    fn hits(&self) -> &[SearchHit] { &self.documents }
}

/// Export with the format named by `format` (json, csv or text, any case).
pub fn export_search_results<R: Exportable>(results: &R, format: &str) -> Result<String> {
    export_as(results, format.parse()?)
}

pub fn export_as<R: Exportable>(results: &R, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        ExportFormat::Csv => Ok(to_csv(results.hits())),
        ExportFormat::Text => Ok(to_text(results.hits())),
    }
}

fn to_csv(hits: &[SearchHit]) -> String {
    let header = CSV_HEADERS.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    let rows = hits.iter().map(|hit| {
        let doc = &hit.document;
        [
            doc.name.clone(),
            doc.category.clone(),
            doc.size.to_string(),
            timestamp::format(&doc.upload_date),
            doc.access_level.clone(),
            doc.download_count.to_string(),
        ]
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",")
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn to_text(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| {
            let doc = &hit.document;
            let description = if doc.description.is_empty() { "No description" } else { doc.description.as_str() };
            [
                format!("Name: {}", doc.name),
                format!("Category: {}", doc.category),
                format!("Size: {}", format_file_size(doc.size)),
                format!("Upload Date: {}", timestamp::format_date(&doc.upload_date)),
                format!("Access Level: {}", doc.access_level),
                format!("Downloads: {}", doc.download_count),
                format!("Description: {description}"),
                "---".to_string(),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Human-readable size in base-1024 units with at most one decimal.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}
