//! # Cube Driver
//!
//! Hammers one cube from many threads with a seeded random workload, then
//! replays the recorded linearization on a sequential cube and checks that
//! the final state and every snapshot agree.
//!
//! ## Usage
//!
//! ```bash
//! cube_driver --size 5 --threads 8 --ops 20000 --seed 7 --show-every 50
//! cube_driver --config data/config/cube.toml --threads 16
//! RUST_LOG=cubelock_core=debug cube_driver --ops 100
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded};
use cubelock::{replay_history, Cube, CubeConfig, CubeResult, Operation, Snapshot, Timeline, Workload};
use tracing_subscriber::EnvFilter;

/// Command line options.
struct DriverArgs {
    config_path: Option<String>,
    size: Option<usize>,
    threads: usize,
    ops: usize,
    seed: u64,
    show_every: usize,
}

impl Default for DriverArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            size: None,
            threads: 4,
            ops: 10_000,
            seed: 0x00C0_FFEE,
            show_every: 25, // 4% snapshots
        }
    }
}

/// Parses `std::env::args`. Returns `None` after printing help.
fn parse_args() -> Option<DriverArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = DriverArgs::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config" | "-c", Some(v)) => {
                parsed.config_path = Some(v.clone());
                i += 1;
            }
            ("--size" | "-n", Some(v)) => {
                parsed.size = v.parse().ok();
                i += 1;
            }
            ("--threads" | "-t", Some(v)) => {
                parsed.threads = v.parse().unwrap_or(parsed.threads).max(1);
                i += 1;
            }
            ("--ops" | "-o", Some(v)) => {
                parsed.ops = v.parse().unwrap_or(parsed.ops);
                i += 1;
            }
            ("--seed" | "-s", Some(v)) => {
                parsed.seed = v.parse().unwrap_or(parsed.seed);
                i += 1;
            }
            ("--show-every" | "-m", Some(v)) => {
                parsed.show_every = v.parse().unwrap_or(parsed.show_every);
                i += 1;
            }
            ("--help" | "-h", _) => {
                println!("Usage: cube_driver [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>       TOML cube config (default: built-in)");
                println!("  -n, --size <N>            Layers, overrides the config");
                println!("  -t, --threads <T>         Worker threads (default: 4)");
                println!("  -o, --ops <K>             Operations to run (default: 10000)");
                println!("  -s, --seed <S>            Workload seed");
                println!("  -m, --show-every <M>      Every M-th operation is a show, 0 = never (default: 25)");
                println!("  -h, --help                Show this help");
                return None;
            }
            (other, _) => {
                eprintln!("ignoring argument: {other}");
            }
        }
        i += 1;
    }

    Some(parsed)
}

/// A show observed by a worker, tagged with its timeline sequence number.
struct ObservedShow {
    sequence: u64,
    snapshot: Snapshot,
}

fn run(args: &DriverArgs) -> CubeResult<bool> {
    let mut config = match &args.config_path {
        Some(path) => CubeConfig::from_toml_file(path)?,
        None => CubeConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }

    let timeline = Arc::new(Timeline::new());
    let cube = Arc::new(Cube::with_config(config, Arc::clone(&timeline))?);
    let workload = Workload::random(cube.size(), args.ops, args.show_every, args.seed);

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Size:            {} layers", cube.config().size);
    println!("│ Poll Interval:   {} us", cube.config().wait_poll_interval_us);
    println!("│ Threads:         {}", args.threads);
    println!("│ Operations:      {}", workload.operations().len());
    println!("│ Seed:            {}", workload.seed());
    println!("│ Show Every:      {}", args.show_every);
    println!("└─────────────────────────────────────────────────────────────────┘");
    println!();

    let (work_tx, work_rx) = bounded::<Operation>(args.threads * 4);
    let (show_tx, show_rx) = unbounded::<ObservedShow>();

    let started = Instant::now();
    let workers: Vec<_> = (0..args.threads)
        .map(|_| {
            let cube = Arc::clone(&cube);
            let timeline = Arc::clone(&timeline);
            let work_rx = work_rx.clone();
            let show_tx = show_tx.clone();
            thread::spawn(move || -> CubeResult<()> {
                for op in work_rx {
                    match op {
                        Operation::Rotate { face, layer } => cube.rotate(face, layer)?,
                        Operation::Show => {
                            let snapshot = cube.show()?;
                            let Some(span) = timeline.last_on_current_thread() else {
                                tracing::warn!("show left no span on the timeline");
                                continue;
                            };
                            let observed = ObservedShow {
                                sequence: span.sequence,
                                snapshot,
                            };
                            if show_tx.send(observed).is_err() {
                                tracing::warn!("show collector dropped");
                            }
                        }
                    }
                }
                Ok(())
            })
        })
        .collect();
    drop(work_rx);
    drop(show_tx);

    for &op in workload.operations() {
        if work_tx.send(op).is_err() {
            tracing::warn!("every worker exited early");
            break;
        }
    }
    drop(work_tx);

    let mut worker_error = None;
    for worker in workers {
        match worker.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => worker_error = Some(e),
            Err(_) => tracing::warn!("worker panicked"),
        }
    }
    if let Some(e) = worker_error {
        return Err(e);
    }
    let elapsed = started.elapsed();

    let final_state = cube.show()?;
    let history = replay_history(cube.size(), &timeline.spans())?;
    let observed: Vec<ObservedShow> = show_rx.try_iter().collect();
    let bad_shows = observed
        .iter()
        .filter(|show| history.expected_show(show.sequence) != Some(&show.snapshot))
        .count();
    let final_matches = history.final_state == final_state;

    let stats = cube.stats();
    println!("┌─ RESULTS ───────────────────────────────────────────────────────┐");
    println!("│ Elapsed:         {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    println!("│ Admitted:        {}", stats.admitted);
    println!("│ Group Switches:  {}", stats.group_switches);
    println!("│ Cancelled:       {}", stats.cancelled);
    println!("│ Shows Checked:   {}", observed.len());
    println!("│ Bad Shows:       {bad_shows}");
    println!("│ Final State:     {}", if final_matches { "MATCHES REFERENCE" } else { "DIVERGED" });
    println!("└─────────────────────────────────────────────────────────────────┘");

    Ok(final_matches && bad_shows == 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         CUBELOCK DRIVER                                          ║");
    println!("║         CONCURRENT ROTATIONS, SEQUENTIAL TRUTH                   ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(&args) {
        Ok(true) => {
            println!();
            println!("✅ LINEARIZABLE");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!();
            println!("❌ NOT LINEARIZABLE");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("cube_driver: {e}");
            ExitCode::FAILURE
        }
    }
}
