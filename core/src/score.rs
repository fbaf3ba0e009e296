use crate::document::Document;
use time::{Duration, OffsetDateTime};

pub const TERM_MATCH_WEIGHT: u32 = 10;
pub const NAME_MATCH_BOOST: u32 = 50;
pub const DESCRIPTION_MATCH_BOOST: u32 = 20;
pub const TAG_MATCH_BOOST: u32 = 30;
pub const RECENT_BOOST: u32 = 10;
pub const POPULAR_BOOST: u32 = 5;
pub const RECENT_WINDOW_DAYS: i64 = 30;
pub const POPULAR_DOWNLOADS: u64 = 10;

/// Final ranking score for a document matched by `term_matches` distinct query tokens.
///
/// Substring boosts compare against the raw query, lowercased but otherwise untouched.
pub fn relevance(doc: &Document, raw_query: &str, term_matches: u32, now: OffsetDateTime) -> u32 {
    let needle = raw_query.to_lowercase();
    let mut score = term_matches * TERM_MATCH_WEIGHT;

    if doc.name.to_lowercase().contains(&needle) {
        score += NAME_MATCH_BOOST;
    }
    if !doc.description.is_empty() && doc.description.to_lowercase().contains(&needle) {
        score += DESCRIPTION_MATCH_BOOST;
    }
    let tag_hits = doc
        .tags
        .iter()
        .filter(|tag| tag.to_lowercase().contains(&needle))
        .count() as u32;
    score += tag_hits * TAG_MATCH_BOOST;

    if now - doc.upload_date < Duration::days(RECENT_WINDOW_DAYS) {
        score += RECENT_BOOST;
    }
    if doc.download_count > POPULAR_DOWNLOADS {
        score += POPULAR_BOOST;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-07-01 0:00 UTC);

    #[test]
    fn term_matches_only() {
        let doc = Document::new(1, "Annual Budget", datetime!(2023-01-01 0:00 UTC));
        assert_eq!(relevance(&doc, "forecast", 2, NOW), 20);
    }

    #[test]
    fn field_boosts_add_up() {
        let doc = Document::new(1, "Quarterly Report", datetime!(2023-01-01 0:00 UTC))
            .with_description("The REPORT for Q2")
            .with_tags(["report-2024", "finance", "reports"]);
        // 1 term, name, description, two tags
        assert_eq!(relevance(&doc, "Report", 1, NOW), 10 + 50 + 20 + 60);
    }

    #[test]
    fn recency_and_popularity() {
        let doc = Document::new(1, "Memo", datetime!(2024-06-20 0:00 UTC)).with_download_count(11);
        assert_eq!(relevance(&doc, "xyz", 0, NOW), 15);

        let stale = Document::new(2, "Memo", datetime!(2024-06-01 0:00 UTC)).with_download_count(10);
        assert_eq!(relevance(&stale, "xyz", 0, NOW), 0);
    }
}
