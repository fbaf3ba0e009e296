use criterion::{criterion_group, criterion_main, Criterion};
use docsearch_core::tokenizer::tokenize;
use docsearch_core::{Document, SearchEngine, SearchOptions};

const TEXT: &str = "The quarterly reporting package covers revenue, operating expenses, \
    headcount planning and the management commentary prepared for investors. \
    Each section is reviewed by finance before publication.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(TEXT)));
}

fn bench_search(c: &mut Criterion) {
    let at = time::macros::datetime!(2024-01-01 0:00 UTC);
    let docs: Vec<Document> = (0..5_000)
        .map(|i| {
            Document::new(i, format!("Report {i}"), at)
                .with_tags(["finance", "quarterly"])
                .with_content(TEXT)
        })
        .collect();
    c.bench_function("build_5k", |b| b.iter(|| SearchEngine::new(docs.clone())));
    let engine = SearchEngine::new(docs);
    c.bench_function("basic_search_5k", |b| {
        b.iter(|| engine.basic_search("quarterly finance report", &SearchOptions::default()))
    });
}

criterion_group!(benches, bench_tokenize, bench_search);
criterion_main!(benches);
