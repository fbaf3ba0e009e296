use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch_core::document::timestamp;
use docsearch_core::export::export_search_results;
use docsearch_core::highlight::{highlight_search_terms, HighlightMarkup};
use docsearch_core::loader::load_documents;
use docsearch_core::suggest::DEFAULT_MAX_SUGGESTIONS;
use docsearch_core::{
    Criteria, DateRange, ExternalId, SearchEngine, SearchOptions, SearchResponse, SortKey,
    SortOrder,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search a document collection loaded from JSON/JSONL files", long_about = None)]
struct Cli {
    /// Input path (file or directory of .json/.jsonl files)
    #[arg(long, global = true, default_value = "./documents")]
    input: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Free-text search ranked by relevance
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        access_level: Option<String>,
        /// Earliest upload date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Latest upload date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
        #[arg(long)]
        sort_by: Option<SortKey>,
        #[arg(long, default_value = "desc")]
        sort_order: SortOrder,
        /// Export format: json, csv or text. Prints a ranked listing when omitted.
        #[arg(long)]
        format: Option<String>,
        /// Mark matched terms in the listing
        #[arg(long, default_value_t = false)]
        highlight: bool,
    },
    /// Structured search from a JSON criteria object (inline, or @path to a file)
    Advanced {
        criteria: String,
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Find every occurrence of a phrase inside one document
    Within {
        id: String,
        query: String,
    },
    /// Autocomplete a partial query
    Suggest {
        partial: String,
        #[arg(long, default_value_t = DEFAULT_MAX_SUGGESTIONS)]
        max: usize,
    },
    /// Most frequent terms across the collection
    Popular,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let engine = SearchEngine::new(load_documents(&cli.input)?);
    tracing::debug!(input = %cli.input, num_docs = engine.len(), "collection loaded");
    println!("{}", run(&engine, cli.command)?);
    Ok(())
}

fn run(engine: &SearchEngine, command: Commands) -> Result<String> {
    match command {
        Commands::Search {
            query,
            limit,
            offset,
            category,
            access_level,
            from,
            to,
            sort_by,
            sort_order,
            format,
            highlight,
        } => {
            let date_range = match (from, to) {
                (Some(start), Some(end)) => Some(DateRange {
                    start: timestamp::parse(&start)?,
                    end: timestamp::parse(&end)?,
                }),
                _ => None,
            };
            let options = SearchOptions {
                category,
                access_level,
                date_range,
                limit,
                offset,
                sort_by,
                sort_order,
            };
            let results = engine.basic_search(&query, &options);
            match format {
                Some(format) => Ok(export_search_results(&results, &format)?),
                None => Ok(listing(&results, highlight)),
            }
        }
        Commands::Advanced { criteria, format } => {
            let raw = match criteria.strip_prefix('@') {
                Some(path) => {
                    std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?
                }
                None => criteria,
            };
            let criteria: Criteria = serde_json::from_str(&raw).context("parsing criteria")?;
            Ok(export_search_results(&engine.advanced_search(&criteria), &format)?)
        }
        Commands::Within { id, query } => {
            let result = engine.search_within_document(&ExternalId::parse_lenient(&id), &query);
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Commands::Suggest { partial, max } => Ok(engine.get_suggestions(&partial, max).join("\n")),
        Commands::Popular => Ok(engine
            .popular_terms()
            .into_iter()
            .map(|t| format!("{}\t{}", t.count, t.term))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn listing(results: &SearchResponse, highlight: bool) -> String {
    let markup = HighlightMarkup { tag: "mark".to_string(), class: None };
    let mut out = format!("{} of {} matches\n", results.documents.len(), results.total_count);
    for hit in &results.documents {
        let name = if highlight {
            highlight_search_terms(&hit.document.name, &results.search_terms, &markup)
        } else {
            hit.document.name.clone()
        };
        out.push_str(&format!("{:>5}  {:<12} {}\n", hit.relevance_score, hit.document.id, name));
    }
    if results.has_more {
        out.push_str("...\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use docsearch_core::Document;

    fn engine() -> SearchEngine {
        let at = timestamp::parse("2024-01-01").unwrap();
        SearchEngine::new(vec![
            Document::new(1, "Quarterly Report", at)
                .with_category("reports")
                .with_access_level("public"),
            Document::new(2, "Employee Handbook", at)
                .with_category("policies")
                .with_description("handbook text"),
        ])
    }

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(std::iter::once("docsearch").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_listing_with_highlight() {
        let out = run(&engine(), parse(&["search", "report", "--highlight"])).unwrap();
        assert!(out.starts_with("1 of 1 matches\n"));
        assert!(out.contains("Quarterly <mark>Report</mark>"));
    }

    #[test]
    fn search_export_csv() {
        let out = run(&engine(), parse(&["search", "handbook", "--format", "csv"])).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn unsupported_format_fails() {
        let err = run(&engine(), parse(&["search", "handbook", "--format", "xml"])).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported export format: xml");
    }

    #[test]
    fn advanced_inline_criteria() {
        let out = run(&engine(), parse(&["advanced", r#"{"categories":["policies"]}"#])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["totalCount"], 1);
    }

    #[test]
    fn within_and_suggest() {
        let out = run(&engine(), parse(&["within", "2", "TEXT"])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["totalMatches"], 1);

        assert_eq!(run(&engine(), parse(&["suggest", "han"])).unwrap(), "handbook");
    }

    #[test]
    fn date_range_needs_both_ends() {
        assert!(Cli::try_parse_from(["docsearch", "search", "x", "--from", "2024-01-01"]).is_err());
    }
}
