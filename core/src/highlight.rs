use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// A byte range of the highlighted text matched by `term`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub term: String,
}

/// Markup used by `render_highlights`.
#[derive(Debug, Clone)]
pub struct HighlightMarkup {
    pub tag: String,
    pub class: Option<String>,
}

impl Default for HighlightMarkup {
    fn default() -> Self {
        HighlightMarkup { tag: "span".to_string(), class: Some("search-highlight".to_string()) }
    }
}

impl HighlightMarkup {
    pub fn with_class(class: impl Into<String>) -> Self {
        HighlightMarkup { class: Some(class.into()), ..Default::default() }
    }

    fn opening_tag(&self) -> String {
        match &self.class {
            Some(class) => format!("<{} class=\"{}\">", self.tag, class),
            None => format!("<{}>", self.tag),
        }
    }

    fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Case-insensitive occurrences of each term, one pass per term in the given
/// order. Spans of different terms may overlap.
pub fn highlight_spans<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    for term in terms {
        let term = term.as_ref();
        if term.trim().is_empty() { continue; }
        let Ok(pat) = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() else {
            tracing::debug!(term, "skipping unhighlightable term");
            continue;
        };
        spans.extend(pat.find_iter(text).map(|m| HighlightSpan { start: m.start(), end: m.end(), term: term.to_string() }));
    }
    spans
}

/// Wrap spans in markup. A span overlapping an earlier-starting one is dropped.
pub fn render_highlights(text: &str, spans: &[HighlightSpan], markup: &HighlightMarkup) -> String {
    let mut ordered: Vec<&HighlightSpan> = spans.iter().collect();
    ordered.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

    let (open, close) = (markup.opening_tag(), markup.closing_tag());
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in ordered {
        let in_bounds = span.start <= span.end
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if span.start < cursor || !in_bounds { continue; }
        out.push_str(&text[cursor..span.start]);
        out.push_str(&open);
        out.push_str(&text[span.start..span.end]);
        out.push_str(&close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// `highlight_spans` followed by `render_highlights`.
pub fn highlight_search_terms<S: AsRef<str>>(text: &str, terms: &[S], markup: &HighlightMarkup) -> String {
    render_highlights(text, &highlight_spans(text, terms), markup)
}
