use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use yamldiff_benches::available_corpora;
use yamldiff_core::{parse_documents, Engine, RenderConfig};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for corpus in available_corpora() {
        let text = corpus.old_text();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(corpus.name()), &text, |b, text| {
            b.iter(|| {
                let documents = parse_documents(text).expect("corpus parses");
                black_box(documents);
            });
        });
    }
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let engine = Engine::default();
    for corpus in available_corpora() {
        let dataset = corpus.load().expect("failed to load dataset");
        group.throughput(Throughput::Elements(dataset.before().len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name()),
            &dataset,
            |b, dataset| {
                b.iter(|| {
                    let result =
                        engine.compare(dataset.before().to_vec(), dataset.after().to_vec());
                    black_box(result);
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for verbose in [false, true] {
        let config = RenderConfig::default().with_verbose(verbose);
        for corpus in available_corpora() {
            let result = corpus.load().expect("failed to load dataset").compare();
            let id = format!("{}/{}", corpus.name(), if verbose { "verbose" } else { "default" });
            group.bench_function(id, move |b| {
                b.iter(|| {
                    let rendered = result.render(&config);
                    black_box(rendered);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_compare, bench_render);
criterion_main!(benches);
