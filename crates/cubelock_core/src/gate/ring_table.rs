//! # Ring Lock Table
//!
//! One [`FairLock`] per physical ring, created once per cube.
//!
//! Within one axis group, rotations on different slots touch disjoint
//! facelets and run in parallel; rotations on the same slot queue in arrival
//! order. Snapshots never take a slot: the admission gate already keeps them
//! apart from every rotation.

use std::time::Duration;

use cubelock_shared::{CubeError, CubeResult, WaitStage};

use crate::sync::{CancelToken, FairLock, FairLockGuard};

/// `size` independent ring slots.
#[derive(Debug)]
pub struct RingLockTable {
    slots: Box<[FairLock]>,
}

impl RingLockTable {
    /// Creates one slot per layer.
    #[must_use]
    pub fn new(size: usize, poll: Duration, queue_capacity: usize) -> Self {
        let slots: Vec<FairLock> = (0..size)
            .map(|_| FairLock::new(poll, queue_capacity))
            .collect();
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for a table without slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Waits for exclusive use of ring `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] with [`WaitStage::RingSlot`] if
    /// `token` is raised first. The caller then owns no slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len()`; slots come from admitted tickets.
    pub fn acquire(&self, slot: usize, token: &CancelToken) -> CubeResult<RingGuard<'_>> {
        match self.slots[slot].lock(token) {
            Ok(guard) => {
                tracing::trace!(slot, "ring slot acquired");
                Ok(RingGuard { slot, _guard: guard })
            }
            Err(_) => {
                tracing::warn!(slot, "ring slot wait cancelled");
                Err(CubeError::Cancelled {
                    stage: WaitStage::RingSlot,
                })
            }
        }
    }

    /// True while some rotation owns ring `slot`.
    #[must_use]
    pub fn is_held(&self, slot: usize) -> bool {
        self.slots[slot].is_locked()
    }

    /// Rotations queued for ring `slot`.
    #[must_use]
    pub fn waiting(&self, slot: usize) -> usize {
        self.slots[slot].queue_len()
    }
}

/// Exclusive use of one ring. Released on drop.
#[must_use = "the ring is released as soon as the guard is dropped"]
pub struct RingGuard<'a> {
    slot: usize,
    _guard: FairLockGuard<'a>,
}

impl RingGuard<'_> {
    /// The owned slot.
    #[inline]
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }
}
