//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use cubelock::{CubeHooks, Face};

/// Upper bound for anything that should finish promptly. Hitting it means
/// the cube deadlocked.
pub const DEADLINE: Duration = Duration::from_secs(10);

/// Runs `f` on its own thread and fails the test if it does not return
/// within [`DEADLINE`].
pub fn within_deadline<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(DEADLINE)
        .expect("operation did not finish: deadlock")
}

/// Spins until `condition` holds, failing the test after [`DEADLINE`].
pub fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let started = Instant::now();
    while !condition() {
        assert!(started.elapsed() < DEADLINE, "timed out waiting for {what}");
        thread::yield_now();
    }
}

/// Rotation hooks that park every rotation inside its mutation window until
/// the test releases it. Shows pass straight through.
pub struct ParkingHooks {
    entered: Sender<(Face, usize)>,
    release: Receiver<()>,
}

/// Test-side handle of [`ParkingHooks`].
pub struct HookControl {
    entered: Receiver<(Face, usize)>,
    release: Sender<()>,
}

pub fn parking_hooks() -> (ParkingHooks, HookControl) {
    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded();
    (
        ParkingHooks {
            entered: entered_tx,
            release: release_rx,
        },
        HookControl {
            entered: entered_rx,
            release: release_tx,
        },
    )
}

impl CubeHooks for ParkingHooks {
    fn before_rotation(&self, face: Face, layer: usize) {
        let _ = self.entered.send((face, layer));
        let _ = self.release.recv();
    }
}

impl HookControl {
    /// Blocks until some rotation is parked in its hook.
    pub fn wait_entered(&self) -> (Face, usize) {
        self.entered
            .recv_timeout(DEADLINE)
            .expect("no rotation reached its hook")
    }

    /// True if a rotation entered its hook within `timeout`.
    pub fn entered_within(&self, timeout: Duration) -> bool {
        self.entered.recv_timeout(timeout).is_ok()
    }

    /// Lets one parked rotation continue.
    pub fn release_one(&self) {
        self.release.send(()).expect("hooks dropped");
    }
}
