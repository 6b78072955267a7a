use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tron_payment_verifier::domain::{detect_card_type, format_card_number, validate_luhn};

fn bench_card_input(c: &mut Criterion) {
    let raw = "4532-0151-1283-0366";

    c.bench_function("format_card_number", |b| {
        b.iter(|| format_card_number(black_box(raw)))
    });

    c.bench_function("detect_card_type", |b| {
        b.iter(|| detect_card_type(black_box("6221260000000000")))
    });

    c.bench_function("validate_luhn", |b| {
        b.iter(|| validate_luhn(black_box(raw)))
    });
}

criterion_group!(benches, bench_card_input);
criterion_main!(benches);
