//! Performance benchmarks for semantic-map-lib
//!
//! Run with: cargo bench --package semantic-map-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glam::DMat4;
use prost::Message;
use semantic_map_lib::proto::traffic_control_element::Type;
use semantic_map_lib::proto::{
    GeoFrame, GeoLocation, GlobalId, Lane, LaneBoundary, MapElement, MapFragment,
    PedestrianCrosswalk, SignalFace, TrafficControlElement, map_element,
};
use semantic_map_lib::{Config, FaceColor, InterpolationMethod, MapApi};
use std::num::NonZeroUsize;

/// Frame origin near a city center, spread on a grid per element
fn grid_frame(i: usize) -> Option<GeoFrame> {
    Some(GeoFrame {
        origin: Some(GeoLocation {
            lat_e7: 374_000_000 + (i % 100) as i32 * 1_000,
            lng_e7: -1_221_000_000 + (i / 100) as i32 * 1_000,
        }),
    })
}

/// Wavy boundary of `num_points` vertices, about 1 m apart
fn wavy_boundary(num_points: usize, lateral_cm: i32) -> LaneBoundary {
    let mut boundary = LaneBoundary::default();
    for i in 0..num_points {
        let t = i as f64 / num_points as f64;
        let (dx, dy) = if i == 0 {
            (0, lateral_cm)
        } else {
            (100, ((t * 20.0).sin() * 10.0) as i32)
        };
        boundary.vertex_deltas_x_cm.push(dx);
        boundary.vertex_deltas_y_cm.push(dy);
        boundary.vertex_deltas_z_cm.push(((t * 5.0).cos() * 2.0) as i32);
    }
    boundary
}

/// Generate a map with `num_lanes` lanes, one crosswalk and one signal face per 10 lanes
fn generate_map(num_lanes: usize, points_per_boundary: usize) -> MapFragment {
    let mut elements = Vec::with_capacity(num_lanes + num_lanes / 5);
    for i in 0..num_lanes {
        let signal_id = format!("signal_{}", i / 10);
        elements.push(MapElement {
            id: Some(GlobalId::new(format!("lane_{i}"))),
            element: Some(map_element::Element::Lane(Lane {
                geo_frame: grid_frame(i),
                left_boundary: Some(wavy_boundary(points_per_boundary, 0)),
                right_boundary: Some(wavy_boundary(points_per_boundary + 3, 350)),
                traffic_controls: vec![GlobalId::new(signal_id)],
            })),
        });

        if i % 10 == 0 {
            elements.push(MapElement {
                id: Some(GlobalId::new(format!("crosswalk_{}", i / 10))),
                element: Some(map_element::Element::TrafficControlElement(
                    TrafficControlElement {
                        geo_frame: grid_frame(i),
                        points_x_deltas_cm: vec![0, 400, 0, -400],
                        points_y_deltas_cm: vec![0, 0, 300, 0],
                        points_z_deltas_cm: vec![0, 0, 0, 0],
                        r#type: Some(Type::PedestrianCrosswalk(PedestrianCrosswalk {})),
                    },
                )),
            });
            elements.push(MapElement {
                id: Some(GlobalId::new(format!("signal_{}", i / 10))),
                element: Some(map_element::Element::TrafficControlElement(
                    TrafficControlElement {
                        geo_frame: grid_frame(i),
                        r#type: Some(Type::SignalRedFace(SignalFace {})),
                        ..Default::default()
                    },
                )),
            });
        }
    }
    MapFragment { elements }
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.sample_size(20);

    let bytes = generate_map(1_000, 100).encode_to_vec();
    group.throughput(Throughput::Elements(1_000));

    for parallel_bounds in [true, false] {
        let config = Config {
            parallel_bounds,
            ..Config::default()
        };
        let name = if parallel_bounds { "parallel" } else { "sequential" };
        group.bench_function(BenchmarkId::new(name, "1000_lanes_100pts"), |b| {
            b.iter(|| MapApi::from_bytes(&bytes, DMat4::IDENTITY, config.clone()).unwrap());
        });
    }

    group.finish();
}

fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");

    // One cached interpolation: alternating two counts always misses, while the
    // single lane used keeps its decoded coordinates cached
    let cold_config = Config {
        cache_capacity: NonZeroUsize::MIN,
        ..Config::default()
    };
    let cold_map = MapApi::new(generate_map(200, 500), DMat4::IDENTITY, cold_config).unwrap();
    let mut i = 0usize;
    group.bench_function("cold_fixed_count_500pts", |b| {
        b.iter(|| {
            i += 1;
            let step = 500.0 + (i % 2) as f64;
            cold_map
                .get_lane_as_interpolation("lane_7", step, InterpolationMethod::FixedCount)
                .unwrap()
        });
    });

    let map = MapApi::new(generate_map(200, 500), DMat4::IDENTITY, Config::default()).unwrap();
    group.bench_function("warm_fixed_step_500pts", |b| {
        b.iter(|| {
            map.get_lane_as_interpolation("lane_7", 0.5, InterpolationMethod::FixedStepMeters)
                .unwrap()
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let map = MapApi::new(generate_map(1_000, 20), DMat4::IDENTITY, Config::default()).unwrap();

    group.bench_function("get_by_id", |b| {
        b.iter(|| map.get("lane_512").unwrap());
    });

    group.bench_function("is_traffic_face_color", |b| {
        b.iter(|| map.is_traffic_face_color("signal_42", FaceColor::Red).unwrap());
    });

    group.bench_function("lane_traffic_control_ids", |b| {
        b.iter(|| map.get_lane_traffic_control_ids("lane_512").unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_construction, bench_interpolation, bench_lookup);

criterion_main!(benches);
