//! Benchmark for rotation throughput.
//!
//! Compares the bare geometry engine against the full admission path, and
//! same-axis parallel rotations against cross-axis contention.
//!
//! Run with: cargo bench --package cubelock --bench rotation_benchmark

use std::sync::{Arc, Barrier};
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cubelock::{Cube, Face, Facelets, NoHooks, Workload};

const THREADS: usize = 4;
const OPS_PER_THREAD: usize = 1_000;

fn benchmark_single_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_rotation");
    for size in [3usize, 10, 50] {
        let facelets = Facelets::new(size).unwrap();
        group.bench_with_input(BenchmarkId::new("geometry", size), &size, |b, &size| {
            b.iter(|| facelets.rotate(black_box(Face::Front), black_box(size / 2)));
        });

        let cube = Cube::new(size, NoHooks).unwrap();
        group.bench_with_input(BenchmarkId::new("cube", size), &size, |b, &size| {
            b.iter(|| cube.rotate(black_box(Face::Front), black_box(size / 2)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_show(c: &mut Criterion) {
    let cube = Cube::new(10, NoHooks).unwrap();
    c.bench_function("show_10x10", |b| {
        b.iter(|| black_box(cube.show().unwrap()));
    });
}

/// Runs `THREADS` workers, each doing `OPS_PER_THREAD` rotations chosen by `pick`.
fn run_threads(cube: &Arc<Cube<NoHooks>>, pick: fn(usize, usize, usize) -> (Face, usize)) {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let cube = Arc::clone(cube);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let (face, layer) = pick(worker, i, cube.size());
                    cube.rotate(face, layer).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

fn benchmark_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    group.throughput(Throughput::Elements((THREADS * OPS_PER_THREAD) as u64));
    group.sample_size(10);

    let cube = Arc::new(Cube::new(8, NoHooks).unwrap());

    // Every worker on its own ring of the same axis: no waiting at all.
    group.bench_function("same_axis_disjoint_rings", |b| {
        b.iter(|| run_threads(&cube, |worker, _, _| (Face::Top, worker)));
    });

    // Workers alternate axes: every rotation forces a drain.
    group.bench_function("cross_axis", |b| {
        b.iter(|| run_threads(&cube, |worker, i, _| (Face::ALL[(worker + i) % 6], 0)));
    });

    let workload = Workload::random(8, OPS_PER_THREAD, 0, 7);
    let rotations: Vec<(Face, usize)> = workload.rotations().collect();
    group.bench_function("random_workload_single_thread", |b| {
        b.iter(|| {
            for &(face, layer) in &rotations {
                cube.rotate(face, layer).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_rotation,
    benchmark_show,
    benchmark_contention
);
criterion_main!(benches);
