use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tsumugi_core::parser::{scan_delimiters, CreditTokenizer};

fn bench_tokenizer(c: &mut Criterion) {
    let tokenizer = CreditTokenizer::new();

    let inputs = vec![
        "A(CV.B), C(CV.D)",
        "A vs. B feat. C",
        "初音ミク、鏡音リン・鏡音レン feat. 巡音ルカ",
        "Char A (CV: Actor A), Char B (CV: Actor B), Char C (CV: Actor C) & Guest",
        "A single artist name without any delimiter at all",
    ];

    c.bench_function("credit_parse_single", |b| {
        b.iter(|| tokenizer.parse(black_box(inputs[0])));
    });

    c.bench_function("credit_parse_batch_5", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = tokenizer.parse(black_box(input));
            }
        });
    });

    c.bench_function("delimiter_scan_long", |b| {
        b.iter(|| scan_delimiters(black_box(inputs[3])));
    });
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
