//! Criterion benchmarks for the Parley support engine.
//!
//! Covers the hot paths of answering a query:
//! - Text analysis
//! - TF-IDF fitting and query vectorization
//! - Similarity matching
//! - End-to-end `answer` and retraining

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use parley::analysis::{Analyzer, SupportAnalyzer};
use parley::corpus::{Dataset, Record, StaticSource};
use parley::engine::SupportEngine;
use parley::ml::similarity::best_match;
use parley::ml::vectorizer::TfIdfVectorizer;

/// Generate a synthetic support corpus for benchmarking.
fn generate_corpus(count: usize) -> Dataset {
    let products = [
        "Nova", "Pixel", "Aurora", "Zenith", "Comet", "Orbit", "Vertex", "Summit",
    ];
    let tasks = [
        ("Get product details for this mobile phone", "Product Name"),
        ("What is the price of this phone", "Product Name"),
        ("Show order details", "Order ID"),
        ("Check user coin balance", "User ID"),
        ("Show user profile", "User ID"),
        ("Update the user address", "User ID"),
    ];

    (0..count)
        .map(|i| {
            let (instruction, prefix) = tasks[i % tasks.len()];
            let product = products[(i * 7) % products.len()];
            Record::new(
                instruction,
                format!("{prefix}: {product} {i}"),
                format!("Response {i} about {product}"),
            )
        })
        .collect()
}

const QUERIES: &[&str] = &[
    "tell me about the nova phone",
    "where is my order",
    "how many coins do I have",
    "update my shipping address",
    "completely unrelated question",
];

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = SupportAnalyzer::new();
    let documents = generate_corpus(100).documents();

    group.bench_function("analyze_single_document", |b| {
        b.iter(|| black_box(analyzer.terms(black_box(&documents[0]))))
    });

    group.throughput(Throughput::Elements(documents.len() as u64));
    group.bench_function("analyze_batch_documents", |b| {
        b.iter(|| {
            for document in &documents {
                black_box(analyzer.terms(black_box(document)));
            }
        })
    });

    group.finish();
}

/// Benchmark fitting and matching.
fn bench_vector_space(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_space");

    for size in [100, 1000] {
        let documents = generate_corpus(size).documents();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("fit_{size}"), |b| {
            b.iter(|| {
                let mut vectorizer = TfIdfVectorizer::default();
                vectorizer.fit(black_box(&documents)).map(|s| s.len()).ok()
            })
        });

        let mut vectorizer = TfIdfVectorizer::default();
        if vectorizer.fit(&documents).is_err() {
            continue;
        }
        let Ok(space) = vectorizer.space() else {
            continue;
        };

        group.throughput(Throughput::Elements(QUERIES.len() as u64));
        group.bench_function(format!("vectorize_and_match_{size}"), |b| {
            b.iter(|| {
                for query in QUERIES {
                    if let Ok(vector) = vectorizer.transform(black_box(query)) {
                        black_box(best_match(&vector, space.rows()));
                    }
                }
            })
        });
    }

    group.finish();
}

/// Benchmark the engine end to end.
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(20);

    let engine = SupportEngine::new(Arc::new(StaticSource::new(generate_corpus(1000))));

    group.throughput(Throughput::Elements(QUERIES.len() as u64));
    group.bench_function("answer", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(engine.answer(black_box(query), Some("U1")));
            }
        })
    });

    group.throughput(Throughput::Elements(1));
    group.bench_function("train_model_1000", |b| {
        b.iter(|| black_box(engine.train_model().is_ok()))
    });

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_vector_space, bench_engine);
criterion_main!(benches);
