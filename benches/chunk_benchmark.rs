//! Benchmarks for reconstruction and chunking.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic document models.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docstitch::model::{DocumentItem, DocumentModel, Grid};
use docstitch::render::ReconstructOptions;
use docstitch::{merge_tables, CharTokenizer, ChunkOptions, ChunkWindower, TokenizerKind};

/// Creates a synthetic model with the given number of pages.
///
/// Each page carries a heading, a few paragraphs and one table part with the
/// same header, so every table merges into a single group.
fn create_test_model(page_count: u32) -> DocumentModel {
    let mut model = DocumentModel::new();
    for page in 1..=page_count {
        model.add_item(DocumentItem::heading(format!("Section {}", page), 2).at(page, 10.0));
        for p in 0..4 {
            model.add_item(
                DocumentItem::text(format!(
                    "Page {} paragraph {}: benchmark content for docstitch reconstruction and chunking.",
                    page, p
                ))
                .at(page, 100.0 + p as f32 * 50.0),
            );
        }
        let grid = (0..10).fold(Grid::with_columns(["Item", "Qty", "Note"]), |g, r| {
            g.row([format!("p{}r{}", page, r), r.to_string(), "ok".to_string()])
        });
        model.add_table(grid, page, 400.0);
    }
    model
}

/// Benchmark table merging.
fn bench_table_merge(c: &mut Criterion) {
    let model = create_test_model(50);
    c.bench_function("merge_50_tables", |b| {
        b.iter(|| merge_tables(black_box(&model.tables)));
    });
}

/// Benchmark reconstruction at various sizes.
fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    let options = ReconstructOptions::default();

    for page_count in [1, 10, 50].iter() {
        let model = create_test_model(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| docstitch::render::to_markdown(black_box(&model), &options));
        });
    }

    group.finish();
}

/// Benchmark chunking with both tokenizer families.
fn bench_chunking(c: &mut Criterion) {
    let body = docstitch::render::to_markdown(&create_test_model(50), &ReconstructOptions::default());
    let mut group = c.benchmark_group("chunking");

    let chars = ChunkWindower::new(Arc::new(CharTokenizer), ChunkOptions::default()).unwrap();
    group.bench_function("chars", |b| {
        b.iter(|| chars.chunk(black_box(&body)));
    });

    if let Ok(tokenizer) = TokenizerKind::Cl100k.load() {
        let bpe = ChunkWindower::new(tokenizer, ChunkOptions::default()).unwrap();
        group.bench_function("cl100k", |b| {
            b.iter(|| bpe.chunk(black_box(&body)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_merge, bench_reconstruct, bench_chunking);
criterion_main!(benches);
