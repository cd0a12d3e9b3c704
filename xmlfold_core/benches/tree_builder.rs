use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use xmlfold_core::*;

#[inline(always)]
fn wide_document(siblings: usize) -> String {
    let mut xml = String::from("<root>");
    for i in 0..siblings {
        xml.push_str(&format!(r#"<item id="{i}"><name>item {i}</name><flag/></item>"#));
    }
    xml.push_str("</root>");
    xml
}

#[inline(always)]
fn deep_document(depth: usize) -> String {
    let mut xml = String::new();
    for _ in 0..depth {
        xml.push_str("<node>");
    }
    xml.push_str("leaf");
    for _ in 0..depth {
        xml.push_str("</node>");
    }
    xml
}

fn tree_builder_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for siblings in [10, 100, 1000] {
        let source = Source::memory("bench://wide", wide_document(siblings));
        group.bench_with_input(BenchmarkId::new("wide", siblings), &source, |b, source| {
            b.iter(|| TreeBuilder::build(source.clone(), &BuildOptions::default()))
        });
    }
    for depth in [10, 100, 200] {
        let source = Source::memory("bench://deep", deep_document(depth));
        group.bench_with_input(BenchmarkId::new("deep", depth), &source, |b, source| {
            b.iter(|| TreeBuilder::build(source.clone(), &BuildOptions::default()))
        });
    }
    group.finish();

    let builder = TreeBuilder::open(Source::memory("bench://wide", wide_document(1000)))
        .expect("well-formed document");
    c.bench_function("to_object", |b| b.iter(|| builder.to_object()));
}

criterion_group!(benches, tree_builder_benchmark);
criterion_main!(benches);
