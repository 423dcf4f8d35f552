use criterion::{Criterion, black_box, criterion_group, criterion_main};
use templar_core::Document;
use templar_core_highlight::SigilHighlighter;

fn bench_full_rescan(c: &mut Criterion) {
    let mut lines = Vec::new();
    for i in 0..2000 {
        lines.push(format!(
            "const row{} = await @REPOS.main.find({{ table: #users, id: %id_{} }});",
            i, i
        ));
    }
    let doc = Document::from_text(&lines.join("\n"));
    let highlighter = SigilHighlighter::new().unwrap();

    c.bench_function("decorate_2000_lines", |b| {
        b.iter(|| highlighter.decorate(black_box(&doc)).unwrap())
    });
}

criterion_group!(benches, bench_full_rescan);
criterion_main!(benches);
