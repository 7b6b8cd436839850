use criterion::{black_box, criterion_group, criterion_main, Criterion};

use isogen::canonical::canonical_form;
use isogen::{generate, parse_sdf, Molecule};

const CO2_FRAGMENT: &str = include_str!("../tests/approval_data/co2.sdf");

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);

    group.bench_function("C3H6", |b| {
        b.iter(|| black_box(generate(black_box("C3H6"), &[]).unwrap()))
    });
    group.bench_function("C2H5N1O2", |b| {
        b.iter(|| black_box(generate(black_box("C2H5N1O2"), &[]).unwrap()))
    });
    group.bench_function("C6H8", |b| {
        b.iter(|| black_box(generate(black_box("C6H8"), &[]).unwrap()))
    });

    let co2 = parse_sdf(CO2_FRAGMENT).unwrap();
    group.bench_function("N1H5C2O2+CO2", |b| {
        b.iter(|| black_box(generate(black_box("N1H5C2O2"), &co2).unwrap()))
    });

    group.finish();
}

fn bench_canonical(c: &mut Criterion) {
    let hexadienes: Vec<Molecule> = generate("C6H8", &[]).unwrap();

    let mut group = c.benchmark_group("canonical");
    group.bench_function("C6H8 results", |b| {
        b.iter(|| {
            for mol in &hexadienes {
                black_box(canonical_form(black_box(mol)));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_generate, bench_canonical);
criterion_main!(benches);
