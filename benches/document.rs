use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quill::buffer::line_count;
use quill::editor::TextEditor;
use quill::search::{find_all, find_first};

fn sample_document() -> String {
    (0..5_000)
        .map(|i| format!("line {} of the sample document with some words\n", i))
        .collect()
}

fn benchmark_find(c: &mut Criterion) {
    let text = sample_document();
    c.bench_function("find_first_near_end", |b| {
        b.iter(|| find_first(black_box(&text), black_box("line 4999")));
    });
    c.bench_function("find_all_words", |b| {
        b.iter(|| find_all(black_box(&text), black_box("words")));
    });
}

fn benchmark_line_count(c: &mut Criterion) {
    let text = sample_document();
    c.bench_function("line_count", |b| {
        b.iter(|| line_count(black_box(&text)));
    });
}

fn benchmark_typing(c: &mut Criterion) {
    c.bench_function("type_1000_chars", |b| {
        b.iter(|| {
            let mut editor = TextEditor::new();
            for i in 0..1000 {
                let ch = if i % 50 == 49 { '\n' } else { 'a' };
                editor.insert_char(black_box(ch)).unwrap();
            }
            editor
        });
    });
}

criterion_group!(benches, benchmark_find, benchmark_line_count, benchmark_typing);
criterion_main!(benches);
