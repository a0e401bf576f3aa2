//! Benchmarks for the delta engine.
//!
//! Run with: cargo bench --bench diff_benchmark

use cloud_delta::diff::{DeltaConfig, DeltaEngine};
use cloud_delta::model::ResourceRecord;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;

const SERVICES: &[&str] = &["EC2", "RDS", "S3", "Lambda", "IAM", "SQS", "VPC"];

/// Generate a resource collection spread across a handful of VPCs.
fn generate_state(count: usize) -> Vec<ResourceRecord> {
    (0..count)
        .map(|i| {
            let service = SERVICES[i % SERVICES.len()];
            let value = json!({
                "arn": format!("arn:aws:{}:us-east-1:123456789012:res/{i}", service.to_lowercase()),
                "service": service,
                "resourceType": "resource",
                "region": "us-east-1",
                "vpcId": format!("vpc-{}", i % 8),
                "securityGroups": [format!("sg-{}", i % 16), "sg-shared"],
                "tags": {"Env": "prod", "Owner": format!("team-{}", i % 5)},
                "configuration": {"size": i % 4, "encrypted": true},
                "complianceStatus": "compliant",
                "lastSeen": "2024-05-06T08:00:00Z",
            });
            ResourceRecord::try_from(value).expect("generated record is a mapping")
        })
        .collect()
}

/// Generate two related states where `change_percent` of resources are
/// modified and as many are replaced.
fn generate_state_pair(size: usize, change_percent: f64) -> (Vec<ResourceRecord>, Vec<ResourceRecord>) {
    let old = generate_state(size);
    let changes = (size as f64 * change_percent / 100.0) as usize;

    let mut new: Vec<ResourceRecord> = old[..size - changes].to_vec();
    for record in new.iter_mut().take(changes) {
        let mut value = record.to_value();
        value["tags"]["Env"] = json!("staging");
        value["securityGroups"] = json!(["sg-open"]);
        value["complianceStatus"] = json!("non-compliant");
        *record = ResourceRecord::try_from(value).expect("mapping");
    }
    new.extend(generate_state(changes).into_iter().map(|record| {
        let mut value = record.to_value();
        value["arn"] = json!(format!("{}-replacement", value["arn"].as_str().unwrap_or_default()));
        ResourceRecord::try_from(value).expect("mapping")
    }));

    (old, new)
}

fn bench_diff_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_scaling");
    let engine = DeltaEngine::new();

    for size in [100, 500, 1000, 5000].iter() {
        let (old, new) = generate_state_pair(*size, 10.0);

        group.bench_with_input(BenchmarkId::new("resources", size), size, |b, _| {
            b.iter(|| {
                let _ = black_box(engine.diff(black_box(&old), black_box(&new), "old", "new"));
            })
        });
    }

    group.finish();
}

fn bench_change_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_ratio");
    let engine = DeltaEngine::new();

    for percent in [0.0, 10.0, 50.0] {
        let (old, new) = generate_state_pair(1000, percent);

        group.bench_with_input(BenchmarkId::new("percent", percent), &percent, |b, _| {
            b.iter(|| {
                let _ = black_box(engine.diff(black_box(&old), black_box(&new), "old", "new"));
            })
        });
    }

    group.finish();
}

fn bench_custom_rules(c: &mut Criterion) {
    let (old, new) = generate_state_pair(1000, 10.0);
    let engine = DeltaEngine::with_config(
        DeltaConfig::default()
            .with_severity_rule("re:^tags\\.(Env|Owner)$", cloud_delta::ChangeSeverity::High)
            .with_severity_rule("configuration.size", cloud_delta::ChangeSeverity::Medium),
    );

    c.bench_function("diff_1000_custom_rules", |b| {
        b.iter(|| {
            let _ = black_box(engine.diff(black_box(&old), black_box(&new), "old", "new"));
        })
    });
}

criterion_group!(benches, bench_diff_scaling, bench_change_ratio, bench_custom_rules);
criterion_main!(benches);
