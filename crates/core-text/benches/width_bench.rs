use core_text::width::{column_from_screen_width, column_to_screen_width};
use core_text::line_from_str;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_width_mapping(c: &mut Criterion) {
    let ascii = line_from_str("    let result = compute(alpha, beta) + gamma * delta; // note");
    let mixed = line_from_str("\tlet 名前 = \"値\"; // 漢字と tabs の混在する行です");

    c.bench_function("screen_width_ascii", |b| {
        b.iter(|| column_to_screen_width(black_box(&ascii), black_box(ascii.len())))
    });
    c.bench_function("screen_width_mixed", |b| {
        b.iter(|| column_to_screen_width(black_box(&mixed), black_box(mixed.len())))
    });
    c.bench_function("from_screen_width_mixed", |b| {
        let total = column_to_screen_width(&mixed, mixed.len());
        b.iter(|| column_from_screen_width(black_box(&mixed), black_box(total / 2)))
    });
}

criterion_group!(benches, bench_width_mapping);
criterion_main!(benches);
