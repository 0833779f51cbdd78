//! # The Concurrent Cube
//!
//! Wires the admission gate, the ring lock table, the hooks and the geometry
//! engine together.
//!
//! ## Rotation lifecycle
//!
//! ```text
//!   validate layer ─► admit(axis) ─► acquire ring slot ─► before_rotation
//!        ─► permute facelets ─► after_rotation ─► release slot ─► complete
//! ```
//!
//! A snapshot skips the ring slot. Release and completion are guard drops,
//! so they also run when a waiter is cancelled or a hook panics.

use cubelock_core::{AdmissionGate, CancelToken, GateStats, Request, RingLockTable};
use cubelock_geometry::{Facelets, Snapshot};
use cubelock_shared::{CubeError, CubeResult, Face};

use crate::config::CubeConfig;
use crate::hooks::CubeHooks;

/// An N-layer cube that any number of threads may rotate and show.
///
/// Same-axis rotations on different rings run in parallel. Rotations on
/// different axes, and rotations against snapshots, are separated by a full
/// drain. Snapshots run in parallel with each other.
pub struct Cube<H> {
    facelets: Facelets,
    gate: AdmissionGate,
    rings: RingLockTable,
    hooks: H,
    config: CubeConfig,
    /// Shared by every non-cancellable call; never raised.
    uncancelled: CancelToken,
}

impl<H: CubeHooks> Cube<H> {
    /// Creates a solved cube with `size` layers and default tuning.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] if `size` is zero.
    pub fn new(size: usize, hooks: H) -> CubeResult<Self> {
        Self::with_config(CubeConfig::with_size(size), hooks)
    }

    /// Creates a solved cube from a validated config.
    ///
    /// # Errors
    ///
    /// Returns the error of [`CubeConfig::validate`].
    pub fn with_config(config: CubeConfig, hooks: H) -> CubeResult<Self> {
        config.validate()?;
        let poll = config.wait_poll_interval();
        let facelets = Facelets::new(config.size)?;

        tracing::debug!(
            size = config.size,
            poll_us = config.wait_poll_interval_us,
            "cube created"
        );

        Ok(Self {
            facelets,
            gate: AdmissionGate::new(config.size, poll, config.ring_queue_capacity),
            rings: RingLockTable::new(config.size, poll, config.ring_queue_capacity),
            hooks,
            config,
            uncancelled: CancelToken::new(),
        })
    }

    /// Rotates `layer` seen from `face` a quarter turn clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::LayerOutOfRange`] before waiting for anything.
    pub fn rotate(&self, face: Face, layer: usize) -> CubeResult<()> {
        self.rotate_cancellable(face, layer, &self.uncancelled)
    }

    /// [`rotate`](Self::rotate), giving up if `token` is raised while waiting.
    ///
    /// A token raised once the rotation owns its ring slot is not observed:
    /// the rotation runs to completion.
    ///
    /// # Errors
    ///
    /// - [`CubeError::LayerOutOfRange`] before waiting for anything
    /// - [`CubeError::Cancelled`] if `token` is raised during either wait;
    ///   the cube is left untouched
    pub fn rotate_cancellable(&self, face: Face, layer: usize, token: &CancelToken) -> CubeResult<()> {
        let size = self.size();
        if layer >= size {
            return Err(CubeError::LayerOutOfRange { layer, size });
        }

        let ticket = self.gate.admit(Request::Rotate { face, layer }, token)?;
        let ring = match ticket.ring_slot() {
            Some(slot) => Some(self.rings.acquire(slot, token)?),
            None => None,
        };

        self.hooks.before_rotation(face, layer);
        self.facelets.rotate(face, layer);
        self.hooks.after_rotation(face, layer);

        drop(ring);
        drop(ticket);
        Ok(())
    }

    /// Copies the whole cube once every rotation admitted before it has
    /// finished.
    ///
    /// # Errors
    ///
    /// Never fails without a cancellation token; the `Result` mirrors
    /// [`show_cancellable`](Self::show_cancellable).
    pub fn show(&self) -> CubeResult<Snapshot> {
        self.show_cancellable(&self.uncancelled)
    }

    /// [`show`](Self::show), giving up if `token` is raised while waiting for
    /// admission.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `token` is raised before the
    /// snapshot is admitted.
    pub fn show_cancellable(&self, token: &CancelToken) -> CubeResult<Snapshot> {
        let ticket = self.gate.admit(Request::Show, token)?;

        self.hooks.before_showing();
        let snapshot = self.facelets.snapshot();
        self.hooks.after_showing();

        drop(ticket);
        Ok(snapshot)
    }

    /// Number of layers.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.facelets.size()
    }

    /// The configuration the cube was built with.
    #[must_use]
    pub const fn config(&self) -> &CubeConfig {
        &self.config
    }

    /// The installed hooks.
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Gate counters.
    #[must_use]
    pub fn stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Operations admitted and not yet completed.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Callers parked at the admission gate.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.gate.waiting()
    }

    /// True while a rotation owns ring `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= size()`.
    #[must_use]
    pub fn is_ring_held(&self, slot: usize) -> bool {
        self.rings.is_held(slot)
    }

    /// Rotations parked on ring `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= size()`.
    #[must_use]
    pub fn ring_waiting(&self, slot: usize) -> usize {
        self.rings.waiting(slot)
    }
}

impl<H> std::fmt::Debug for Cube<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cube")
            .field("size", &self.facelets.size())
            .field("gate", &self.gate)
            .field("rings", &self.rings)
            .finish_non_exhaustive()
    }
}
