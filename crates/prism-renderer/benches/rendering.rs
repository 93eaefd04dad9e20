//! Benchmarks for parsing and rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use prism_highlight::{CachingHighlighter, LexicalHighlighter};
use prism_renderer::{
    Document, HtmlRenderer, ParseOptions, PlainTextRenderer, Renderer, StyledTextRenderer,
};

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 120 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "This is paragraph {j} in section {i}. It contains **bold** and *italic* text.\n\n"
            ));
        }
        md.push_str("- item one\n- item `two`\n\n");
        md.push_str(&format!(
            "```rust\nfn section_{i}() -> u32 {{\n    // answer\n    {i}\n}}\n```\n\n"
        ));
    }
    md
}

fn bench_parse(c: &mut Criterion) {
    let markdown = generate_markdown(20, 3);
    let options = ParseOptions::all();

    c.bench_function("parse_20_sections", |b| {
        b.iter(|| Document::parse(&markdown, &options));
    });
}

fn bench_render_formats(c: &mut Criterion) {
    let document = Document::parse(&generate_markdown(20, 3), &ParseOptions::default());
    let html = HtmlRenderer::new().with_highlighter(LexicalHighlighter::new());
    let styled = StyledTextRenderer::default().with_highlighter(LexicalHighlighter::new());

    let mut group = c.benchmark_group("render_format");
    group.bench_function("html", |b| b.iter(|| html.render(&document)));
    group.bench_function("plain", |b| b.iter(|| PlainTextRenderer.render(&document)));
    group.bench_function("styled", |b| b.iter(|| styled.render(&document)));
    group.finish();
}

fn bench_cached_highlighting(c: &mut Criterion) {
    let document = Document::parse(&generate_markdown(20, 1), &ParseOptions::default());
    let uncached = HtmlRenderer::new().with_highlighter(LexicalHighlighter::new());
    let cached =
        HtmlRenderer::new().with_highlighter(CachingHighlighter::new(LexicalHighlighter::new()));

    let mut group = c.benchmark_group("highlight_cache");
    group.bench_function("uncached", |b| b.iter(|| uncached.render(&document)));
    group.bench_function("cached", |b| b.iter(|| cached.render(&document)));
    group.finish();
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let renderer = HtmlRenderer::new();
    let options = ParseOptions::default();

    let mut group = c.benchmark_group("render_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(headings, paragraphs);

        let size = markdown.len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{headings}h_{paragraphs}p")),
            &markdown,
            |b, markdown| b.iter(|| renderer.render(&Document::parse(markdown, &options))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_render_formats,
    bench_cached_highlighting,
    bench_render_varying_sizes
);
criterion_main!(benches);
