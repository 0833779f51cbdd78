//! Integration test for linearizability under random concurrent workloads.
//!
//! Every run records a timeline, replays it on a sequential cube and checks
//! the final state and every show against the replay.
//!
//! Run with: cargo test --package cubelock --test linearizability_test -- --nocapture

mod common;

use std::sync::Arc;
use std::thread;

use common::within_deadline;
use crossbeam_channel::{bounded, unbounded};
use cubelock::{replay_history, Cube, CubeConfig, Operation, Snapshot, Timeline, Workload};

struct RunReport {
    shows_checked: usize,
    group_switches: u64,
}

fn run_workload(config: CubeConfig, threads: usize, workload: Workload) -> RunReport {
    let timeline = Arc::new(Timeline::new());
    let cube = Arc::new(Cube::with_config(config, Arc::clone(&timeline)).unwrap());

    let (work_tx, work_rx) = bounded::<Operation>(threads * 2);
    let (show_tx, show_rx) = unbounded::<(u64, Snapshot)>();

    let workers: Vec<_> = (0..threads)
        .map(|_| {
            let cube = Arc::clone(&cube);
            let timeline = Arc::clone(&timeline);
            let work_rx = work_rx.clone();
            let show_tx = show_tx.clone();
            thread::spawn(move || {
                for op in work_rx {
                    match op {
                        Operation::Rotate { face, layer } => cube.rotate(face, layer).unwrap(),
                        Operation::Show => {
                            let snapshot = cube.show().unwrap();
                            let span = timeline.last_on_current_thread().unwrap();
                            show_tx.send((span.sequence, snapshot)).unwrap();
                        }
                    }
                }
            })
        })
        .collect();
    drop(show_tx);

    within_deadline(move || {
        for &op in workload.operations() {
            work_tx.send(op).unwrap();
        }
        drop(work_tx);
        for worker in workers {
            worker.join().unwrap();
        }
    });

    let history = replay_history(cube.size(), &timeline.spans()).unwrap();
    assert_eq!(cube.show().unwrap(), history.final_state, "final state diverged");

    let observed: Vec<(u64, Snapshot)> = show_rx.try_iter().collect();
    for (sequence, snapshot) in &observed {
        assert_eq!(
            history.expected_show(*sequence),
            Some(snapshot),
            "show #{sequence} saw a state no sequential order produces"
        );
    }
    assert_eq!(cube.in_flight(), 0);

    RunReport {
        shows_checked: observed.len(),
        group_switches: cube.stats().group_switches,
    }
}

#[test]
fn test_random_workloads_are_linearizable() {
    for seed in 0..8 {
        let workload = Workload::random(4, 2_000, 10, seed);
        let report = run_workload(CubeConfig::with_size(4), 8, workload);
        assert_eq!(report.shows_checked, 200);
        assert!(report.group_switches > 0);
    }
}

#[test]
fn test_rotation_only_workload_on_big_cube() {
    let workload = Workload::random(10, 5_000, 0, 99);
    let report = run_workload(CubeConfig::stress(), 16, workload);
    assert_eq!(report.shows_checked, 0);
}

#[test]
fn test_show_heavy_workload() {
    let workload = Workload::random(2, 1_000, 2, 7);
    let report = run_workload(CubeConfig::with_size(2), 6, workload);
    assert_eq!(report.shows_checked, 500);
    println!("group switches: {}", report.group_switches);
}

#[test]
fn test_single_layer_cube() {
    let workload = Workload::random(1, 500, 5, 3);
    let report = run_workload(CubeConfig::with_size(1), 4, workload);
    assert_eq!(report.shows_checked, 100);
}
