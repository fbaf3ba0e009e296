use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Checked in order; only the first match is stripped.
const SUFFIXES: &[&str] = &["ing", "ed", "er", "est", "ly", "tion", "ness", "ment"];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}\s]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the","a","an","and","or","but","in","on","at","to","for",
            "of","with","by","from","up","about","into","through","during",
            "before","after","above","below","between","among","throughout",
            "this","that","these","those","i","me","my","myself","we","us",
            "our","ours","ourselves","you","your","yours","yourself","yourselves",
            "he","him","his","himself","she","her","hers","herself","it","its",
            "itself","they","them","their","theirs","themselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Strip the first listed suffix that leaves more than two characters behind.
///
/// This is a fixed heuristic, not a linguistic stemmer: `running` becomes
/// `runn`, and nothing is stripped twice.
pub fn stem(word: &str) -> String {
    let len = word.chars().count();
    for suffix in SUFFIXES {
        if word.ends_with(suffix) && len > suffix.len() + 2 {
            return word[..word.len() - suffix.len()].to_string();
        }
    }
    word.to_string()
}

/// Tokenize text: lowercase, punctuation to spaces, drop tokens of two
/// characters or fewer and stopwords, then stem. Order and duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !is_stopword(word))
        .map(stem)
        .collect()
}

/// Tokenize and keep only the first occurrence of each token.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert_eq!(t, vec!["runn", "runn", "run"]);
    }

    #[test]
    fn stem_strips_first_matching_suffix_once() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("reported"), "report");
        assert_eq!(stem("management"), "managem");
        assert_eq!(stem("kindness"), "kind");
        // "ed" would leave only two characters
        assert_eq!(stem("bred"), "bred");
        // no iterative stripping: "interest" keeps its "est"
        assert_eq!(stem("interested"), "interest");
        assert_eq!(stem("quickly"), "quick");
    }

    #[test]
    fn stem_is_deterministic() {
        assert_eq!(stem("running"), stem("running"));
    }

    #[test]
    fn punctuation_becomes_separator() {
        assert_eq!(tokenize("Q3-report/final_draft"), vec!["report", "final", "draft"]);
    }

    #[test]
    fn digits_are_kept() {
        assert_eq!(tokenize("Budget 2024"), vec!["budget", "2024"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        assert_eq!(tokenize_unique("report Reports report"), vec!["report", "reports"]);
    }
}
