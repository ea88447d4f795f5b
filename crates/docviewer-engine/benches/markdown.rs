use criterion::{Criterion, criterion_group, criterion_main};
use docviewer_engine::markdown::{
    MARKDOWN_TRANSFORMERS, convert_from_markdown_string, convert_to_markdown_string,
};
mod common;

fn bench_markdown_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("import", |b| {
        b.iter(|| {
            let state = convert_from_markdown_string(
                std::hint::black_box(&content),
                &MARKDOWN_TRANSFORMERS,
            );
            std::hint::black_box(state)
        });
    });

    let state = convert_from_markdown_string(&content, &MARKDOWN_TRANSFORMERS)
        .expect("benchmark content imports");
    group.bench_function("export", |b| {
        b.iter(|| {
            std::hint::black_box(convert_to_markdown_string(
                std::hint::black_box(&state),
                &MARKDOWN_TRANSFORMERS,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_markdown_conversion);
criterion_main!(benches);
