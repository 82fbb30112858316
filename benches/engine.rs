use criterion::{criterion_group, criterion_main, Criterion};
use incident_map::geojson::{Feature, FeatureCollection, Geometry};
use incident_map::ingest::merge_incidents;
use incident_map::resolve::{resolve_click, Kind};
use serde_json::{json, Map};

fn synthetic_feature(index: usize, kind: &str) -> Feature {
    let lon = -102.0 + (index % 100) as f64 * 0.1;
    let lat = 49.0 + (index / 100) as f64 * 0.1;
    let ring = vec![
        (lon, lat),
        (lon + 0.05, lat),
        (lon + 0.05, lat + 0.05),
        (lon, lat + 0.05),
        (lon, lat),
    ];
    let mut properties = Map::new();
    properties.insert("name".to_string(), json!(format!("{}-{}", kind, index)));
    properties.insert("type".to_string(), json!(kind));
    properties.insert("status".to_string(), json!("confirmed"));
    Feature::new(
        Some(Geometry::Polygon {
            coordinates: vec![ring],
        }),
        properties,
    )
}

fn synthetic_collection(count: usize, kind: &str) -> FeatureCollection {
    (0..count).map(|i| synthetic_feature(i, kind)).collect()
}

pub fn resolve_click_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthetic");
    let wildfires = synthetic_collection(500, "wildfire");
    let floods = synthetic_collection(500, "flood");
    group.bench_function("resolve_click", |b| {
        b.iter(|| {
            let layers: Vec<(Kind, &[Feature])> = vec![
                (Kind::Wildfire, &wildfires.features),
                (Kind::Flood, &floods.features),
            ];
            resolve_click((51.5, -99.5), &layers)
        })
    });
    group.finish();
}

pub fn merge_incidents_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthetic");
    let existing = synthetic_collection(1000, "wildfire");
    let incoming = synthetic_collection(1000, "flood");
    group.bench_function("merge_incidents", |b| {
        b.iter(|| merge_incidents(&existing, &incoming))
    });
    group.finish();
}

criterion_group!(benches, resolve_click_bench, merge_incidents_bench);
criterion_main!(benches);
