//! Benchmarks for table of contents construction and page rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dewy_site::{HeadingRecord, Site, SiteConfig, TocOptions, build_forest, filter_headings};
use dewy_storage::MockStorage;

/// Headings cycling through levels 2, 3, 4, 3.
fn generate_headings(count: usize) -> Vec<HeadingRecord> {
    const LEVELS: [u8; 4] = [2, 3, 4, 3];
    (0..count)
        .map(|i| HeadingRecord::new(format!("section-{i}"), LEVELS[i % LEVELS.len()], format!("Section {i}")))
        .collect()
}

/// Generate markdown content with specified structure.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 200);
    md.push_str("---\ntitle: Benchmark\n---\n\n# Document Title\n\n");
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\nIntro with **bold** text.\n\n"));
        md.push_str(&format!("### Detail {i}\n\n{{% callout type=\"note\" %}}\nNote {i}\n{{% /callout %}}\n\n"));
    }
    md
}

fn bench_build_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_forest");

    for count in [10, 100, 1000] {
        let headings = generate_headings(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &headings, |b, headings| {
            b.iter(|| build_forest(black_box(headings.clone())));
        });
    }

    group.finish();
}

fn bench_filter_and_build(c: &mut Criterion) {
    let headings = generate_headings(500);
    let options = TocOptions::default();

    c.bench_function("filter_and_build_500", |b| {
        b.iter(|| build_forest(filter_headings(black_box(&headings), &options)));
    });
}

fn bench_render_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_page");

    for sections in [5, 50] {
        let storage = MockStorage::new().with_page("bench", generate_markdown(sections));
        let site = Site::new(Arc::new(storage), SiteConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(sections), &site, |b, site| {
            b.iter(|| site.render("bench", Some("#section-1")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_forest, bench_filter_and_build, bench_render_page);
criterion_main!(benches);
