//! # Instrumentation Hooks
//!
//! Callbacks run around every mutation and every snapshot. Hooks run on the
//! caller's thread while the operation owns its admission ticket (and, for
//! rotations, its ring slot). They are never called from inside the gate's
//! critical section, so a hook may block, sleep, or take other locks.
//!
//! A hook that calls back into the same cube will deadlock as soon as its
//! request needs a group switch.

use std::sync::Arc;

use cubelock_shared::Face;

/// Observer of cube operations.
///
/// Every method defaults to a no-op; implement only what you need.
pub trait CubeHooks: Send + Sync {
    /// Runs after the ring slot is acquired, before any facelet moves.
    fn before_rotation(&self, _face: Face, _layer: usize) {}

    /// Runs after the rotation is fully applied, before the slot is released.
    fn after_rotation(&self, _face: Face, _layer: usize) {}

    /// Runs after admission, before the snapshot is taken.
    fn before_showing(&self) {}

    /// Runs after the snapshot is taken, before completion is signalled.
    fn after_showing(&self) {}
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl CubeHooks for NoHooks {}

impl<H: CubeHooks + ?Sized> CubeHooks for Arc<H> {
    fn before_rotation(&self, face: Face, layer: usize) {
        (**self).before_rotation(face, layer);
    }

    fn after_rotation(&self, face: Face, layer: usize) {
        (**self).after_rotation(face, layer);
    }

    fn before_showing(&self) {
        (**self).before_showing();
    }

    fn after_showing(&self) {
        (**self).after_showing();
    }
}

type RotationCallback = Box<dyn Fn(Face, usize) + Send + Sync>;
type ShowCallback = Box<dyn Fn() + Send + Sync>;

/// Hooks assembled from closures.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use cubelock::{Cube, Face, FnHooks};
///
/// let turns = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&turns);
/// let hooks = FnHooks::new().on_after_rotation(move |_, _| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
///
/// let cube = Cube::new(3, hooks).unwrap();
/// cube.rotate(Face::Left, 1).unwrap();
/// assert_eq!(turns.load(Ordering::Relaxed), 1);
/// ```
#[derive(Default)]
pub struct FnHooks {
    before_rotation: Option<RotationCallback>,
    after_rotation: Option<RotationCallback>,
    before_showing: Option<ShowCallback>,
    after_showing: Option<ShowCallback>,
}

impl FnHooks {
    /// Creates hooks with every callback empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `before_rotation` callback.
    #[must_use]
    pub fn on_before_rotation(mut self, f: impl Fn(Face, usize) + Send + Sync + 'static) -> Self {
        self.before_rotation = Some(Box::new(f));
        self
    }

    /// Sets the `after_rotation` callback.
    #[must_use]
    pub fn on_after_rotation(mut self, f: impl Fn(Face, usize) + Send + Sync + 'static) -> Self {
        self.after_rotation = Some(Box::new(f));
        self
    }

    /// Sets the `before_showing` callback.
    #[must_use]
    pub fn on_before_showing(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_showing = Some(Box::new(f));
        self
    }

    /// Sets the `after_showing` callback.
    #[must_use]
    pub fn on_after_showing(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.after_showing = Some(Box::new(f));
        self
    }
}

impl CubeHooks for FnHooks {
    fn before_rotation(&self, face: Face, layer: usize) {
        if let Some(f) = &self.before_rotation {
            f(face, layer);
        }
    }

    fn after_rotation(&self, face: Face, layer: usize) {
        if let Some(f) = &self.after_rotation {
            f(face, layer);
        }
    }

    fn before_showing(&self) {
        if let Some(f) = &self.before_showing {
            f();
        }
    }

    fn after_showing(&self) {
        if let Some(f) = &self.after_showing {
            f();
        }
    }
}

impl std::fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHooks")
            .field("before_rotation", &self.before_rotation.is_some())
            .field("after_rotation", &self.after_rotation.is_some())
            .field("before_showing", &self.before_showing.is_some())
            .field("after_showing", &self.after_showing.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_unset_callbacks_are_noops() {
        let hooks = FnHooks::new();
        hooks.before_rotation(Face::Top, 0);
        hooks.after_showing();
        assert!(format!("{hooks:?}").contains("before_rotation: false"));
    }

    #[test]
    fn test_callbacks_receive_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let hooks = Arc::new(FnHooks::new().on_before_rotation(move |face, layer| {
            log.lock().push((face, layer));
        }));

        hooks.before_rotation(Face::Back, 2);
        hooks.after_rotation(Face::Back, 2);
        assert_eq!(*seen.lock(), vec![(Face::Back, 2)]);
    }
}
