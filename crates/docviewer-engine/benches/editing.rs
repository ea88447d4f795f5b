use criterion::{Criterion, criterion_group, criterion_main};
use docviewer_engine::editing::TextFormatType;
use docviewer_engine::toolbar::dispatch::{clear_format, format_inline};
use docviewer_engine::{Command, MarkdownEditor, MarkdownEditorInstance};
mod common;

fn bench_editor_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let content = common::generate_markdown_content(20);
    let instance = MarkdownEditorInstance::new();

    group.bench_function("insert_text", |b| {
        let mut editor = MarkdownEditor::new(&content, &instance).expect("editor mounts");
        b.iter(|| editor.dispatch(Command::InsertText(std::hint::black_box("x".to_string()))));
    });

    group.bench_function("toggle_bold_and_clear", |b| {
        let mut editor = MarkdownEditor::new(&content, &instance).expect("editor mounts");
        b.iter(|| {
            format_inline(editor.editor_mut(), TextFormatType::Bold);
            clear_format(editor.editor_mut())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_editor_updates);
criterion_main!(benches);
