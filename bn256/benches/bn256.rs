//! bn256 arithmetic benchmarks.

use bn256::{pairing, CurvePoint, FieldElement, TwistPoint};
use criterion::{criterion_group, criterion_main, Criterion};
use hex_literal::hex;
use std::hint::black_box;

fn fe(bytes: &[u8; 32]) -> FieldElement {
    FieldElement::from_bytes(bytes).unwrap()
}

fn bench_field(c: &mut Criterion) {
    let a = fe(&hex!(
        "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF"
    ));
    let b = fe(&hex!(
        "1111111122222222333333334444444455555555666666667777777788888888"
    ));

    c.bench_function("field mul", |bench| {
        bench.iter(|| black_box(a).mul(&black_box(b)))
    });
    c.bench_function("field square", |bench| bench.iter(|| black_box(a).square()));
    c.bench_function("field invert", |bench| bench.iter(|| black_box(a).invert()));
}

fn bench_g1(c: &mut Criterion) {
    let scalar = hex!("0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF");
    let g = CurvePoint::GENERATOR;
    let h = g.double();

    c.bench_function("g1 add", |bench| bench.iter(|| black_box(g).add(&h)));
    c.bench_function("g1 double", |bench| bench.iter(|| black_box(g).double()));
    c.bench_function("g1 mul", |bench| bench.iter(|| black_box(g).mul(&scalar)));
}

fn bench_pairing(c: &mut Criterion) {
    let g1 = CurvePoint::GENERATOR;
    let g2 = TwistPoint::GENERATOR;

    c.bench_function("pairing", |bench| {
        bench.iter(|| pairing(&black_box(g1), &black_box(g2)))
    });
}

criterion_group!(benches, bench_field, bench_g1, bench_pairing);
criterion_main!(benches);
