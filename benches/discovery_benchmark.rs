//! Benchmarks for link discovery and page layout.
//!
//! Run with: cargo bench
//!
//! Discovery is measured on synthetic pages where the match sits behind a
//! growing amount of unrelated markup.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfknife::discover::{find_pdf_in_json, PdfDiscovery};
use pdfknife::layout::{PageLayout, PageSize};
use pdfknife::model::WebPage;

/// Creates a page with `filler` unrelated links and a structured-data block
/// holding the only PDF address.
fn create_test_page(filler: usize) -> String {
    let mut html = String::from("<html><head><title>Benchmark</title></head><body>");
    for i in 0..filler {
        html.push_str(&format!(
            r#"<p>Section {i}</p><a href="/articles/{i}">Article {i}</a><img src="/thumb/{i}.png">"#
        ));
    }
    html.push_str(
        r#"<script type="application/ld+json">
           {"@type": "Book", "workExample": [{"encoding": {"contentUrl": "/files/book.pdf"}}]}
           </script></body></html>"#,
    );
    html
}

fn bench_discovery(c: &mut Criterion) {
    let discovery = PdfDiscovery::with_defaults();
    let mut group = c.benchmark_group("discovery");

    for filler in [10, 100, 1000] {
        let page = WebPage::parse(&create_test_page(filler), "https://example.com/book").unwrap();
        group.bench_function(format!("{}_elements", filler), |b| {
            b.iter(|| discovery.find(black_box(&page)))
        });
    }

    group.finish();
}

fn bench_json_scan(c: &mut Criterion) {
    let mut nested = serde_json::json!({"contentUrl": "/files/deep.pdf"});
    for _ in 0..50 {
        nested = serde_json::json!({"@type": "Thing", "about": nested});
    }

    c.bench_function("json_scan_depth_50", |b| {
        b.iter(|| find_pdf_in_json(black_box(&nested)))
    });
}

fn bench_layout(c: &mut Criterion) {
    c.bench_function("layout_fit", |b| {
        b.iter(|| PageLayout::fit(black_box(2480.0), black_box(3508.0), PageSize::A4))
    });
}

criterion_group!(benches, bench_discovery, bench_json_scan, bench_layout);
criterion_main!(benches);
