use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use foodoiliq::core::{ComplianceStatus, RegulatoryLimits};
use foodoiliq::report::{compose, ReportData, ReportResults};
use foodoiliq::scoring::aggregate_at;
use std::hint::black_box;

fn sample_report(classification: ComplianceStatus) -> ReportData {
    ReportData {
        batch_id: Some("BATCH-2024-0115-A".into()),
        test_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 14, 32, 0).unwrap()),
        station_name: Some("Fryer A1".into()),
        location: Some("Kitchen Zone A".into()),
        equipment: Some("Industrial Fryer 50L".into()),
        oil_type: Some("Refined Sunflower Oil".into()),
        operator_name: Some("Shift Lead".into()),
        company_name: Some("Golden Fry Foods".into()),
        company_address: Some("12 Harbour Road".into()),
        results: ReportResults {
            ffa: 0.18,
            tpc: 18.5,
            pv: 8.2,
            score: 84,
            classification,
            confidence: 92.4,
        },
        limits: RegulatoryLimits::default(),
    }
}

fn benchmark_compose(c: &mut Criterion) {
    let generated_at = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();

    let mut group = c.benchmark_group("compose");
    for classification in [ComplianceStatus::Pass, ComplianceStatus::Reject] {
        let data = sample_report(classification);
        group.bench_function(classification.as_str(), |b| {
            b.iter(|| compose(black_box(&data), generated_at).unwrap())
        });
    }
    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let limits = RegulatoryLimits::default();
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();

    c.bench_function("aggregate", |b| {
        b.iter(|| {
            aggregate_at(
                black_box(0.18),
                black_box(18.5),
                black_box(8.2),
                &limits,
                92.0,
                at,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_compose, benchmark_aggregate);
criterion_main!(benches);
