//! Benchmarks for mesh-intersect.
//!
//! Run with: cargo bench -p mesh-intersect
//!
//! Compare against a baseline:
//! 1. cargo bench -p mesh-intersect -- --save-baseline main
//! 2. cargo bench -p mesh-intersect -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_intersect::{IntersectParams, MeshIntersector};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Vector3};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Closed UV sphere of radius 1 with `2 * slices * (stacks - 1)` triangles.
fn create_sphere(stacks: u32, slices: u32) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0));
    for i in 1..stacks {
        let theta = std::f64::consts::PI * f64::from(i) / f64::from(stacks);
        for j in 0..slices {
            let phi = std::f64::consts::TAU * f64::from(j) / f64::from(slices);
            mesh.vertices.push(Vertex::from_coords(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    let south = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, -1.0));

    let ring = |i: u32, j: u32| 1 + (i - 1) * slices + (j % slices);
    for j in 0..slices {
        mesh.faces.push([0, ring(1, j), ring(1, j + 1)]);
        mesh.faces
            .push([south, ring(stacks - 1, j + 1), ring(stacks - 1, j)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            let (a, b) = (ring(i, j), ring(i, j + 1));
            let (c, d) = (ring(i + 1, j), ring(i + 1, j + 1));
            mesh.faces.push([a, c, d]);
            mesh.faces.push([a, d, b]);
        }
    }
    mesh
}

/// A square lattice of query points in front of the mesh.
fn query_lattice(n: u32) -> Vec<Point3<f64>> {
    let step = 2.0 / f64::from(n);
    (0..n)
        .flat_map(|i| {
            (0..n).map(move |j| {
                Point3::new(
                    f64::from(i).mul_add(step, -1.0),
                    f64::from(j).mul_add(step, -1.0),
                    -3.0,
                )
            })
        })
        .collect()
}

// =============================================================================
// Construction Benchmarks
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build");
    group.sample_size(30);

    let test_cases = [
        ("sphere_912tri", create_sphere(20, 24)),
        ("sphere_7552tri", create_sphere(60, 64)),
        ("sphere_31744tri", create_sphere(125, 128)),
    ];
    let dir = Vector3::new(0.1, 0.2, 1.0);

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.faces.len() as u64));

        group.bench_with_input(BenchmarkId::new("default", name), mesh, |b, mesh| {
            b.iter(|| MeshIntersector::new(black_box(mesh), black_box(dir)));
        });

        group.bench_with_input(BenchmarkId::new("sequential", name), mesh, |b, mesh| {
            let params = IntersectParams::default().parallel_threshold(usize::MAX);
            b.iter(|| MeshIntersector::with_params(black_box(mesh), black_box(dir), &params));
        });
    }

    group.finish();
}

// =============================================================================
// Query Benchmarks
// =============================================================================

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query");

    let mesh = create_sphere(60, 64);
    let queries = query_lattice(64);
    let dir = Vector3::z();

    for (name, params) in [
        ("coarse", IntersectParams::coarse()),
        ("default", IntersectParams::default()),
        ("fine", IntersectParams::fine()),
    ] {
        let Ok(intersector) = MeshIntersector::with_params(&mesh, dir, &params) else {
            continue;
        };
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("intersect_lattice", name), |b| {
            b.iter(|| {
                queries
                    .iter()
                    .map(|p| intersector.intersect(black_box(p)).len())
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
