//! Benchmarks pour la préparation et la résolution de style

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use critere::types::{CriterionKind, RuleValue, StyleOverrides, ValueRule};
use critere::{prepare, resolve_feature_style};

fn build_criterion(kind: CriterionKind, rules: usize) -> critere::Criterion {
    let values = (0..rules)
        .map(|i| ValueRule {
            value: RuleValue::Single(i.to_string()),
            label: format!("Classe {}", i),
            color: format!("#{:06x}", i * 97 % 0xFFFFFF),
            description: None,
            styles: StyleOverrides::default(),
        })
        .collect();

    critere::Criterion {
        code: "bench".to_string(),
        label: Some("Bench".to_string()),
        kind: Some(kind),
        field: Some("champ".to_string()),
        values,
        styles: StyleOverrides::default(),
        description: None,
    }
}

fn bench_prepare(c: &mut Criterion) {
    let criterion = build_criterion(CriterionKind::Nomenclatures, 32);
    let origin = StyleOverrides::origin_default();

    c.bench_function("prepare_32_rules", |b| {
        b.iter(|| {
            let prepared = prepare(black_box(&criterion), &origin, "Plusieurs valeurs");
            black_box(prepared)
        })
    });
}

fn bench_resolve_nomenclatures(c: &mut Criterion) {
    let criterion = build_criterion(CriterionKind::Nomenclatures, 32);
    let prepared = prepare(
        &criterion,
        &StyleOverrides::origin_default(),
        "Plusieurs valeurs",
    );

    let features: Vec<Vec<String>> = (0..10_000).map(|i| vec![(i % 32).to_string()]).collect();

    let mut group = c.benchmark_group("resolve_nomenclatures");
    group.throughput(Throughput::Elements(features.len() as u64));
    group.bench_function("10k_features", |b| {
        b.iter(|| {
            let mut matched = 0usize;
            for values in &features {
                if resolve_feature_style(black_box(&prepared), values).is_some() {
                    matched += 1;
                }
            }
            black_box(matched)
        })
    });
    group.finish();
}

fn bench_resolve_classes(c: &mut Criterion) {
    let criterion = build_criterion(CriterionKind::Classes, 8);
    let prepared = prepare(
        &criterion,
        &StyleOverrides::origin_default(),
        "Plusieurs valeurs",
    );

    let features: Vec<Vec<String>> = (0..10_000).map(|i| vec![(i % 100).to_string()]).collect();

    let mut group = c.benchmark_group("resolve_classes");
    group.throughput(Throughput::Elements(features.len() as u64));
    group.bench_function("10k_features", |b| {
        b.iter(|| {
            let mut matched = 0usize;
            for values in &features {
                if resolve_feature_style(black_box(&prepared), values).is_some() {
                    matched += 1;
                }
            }
            black_box(matched)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_prepare,
    bench_resolve_nomenclatures,
    bench_resolve_classes
);
criterion_main!(benches);
