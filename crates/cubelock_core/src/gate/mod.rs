//! # Admission and Ring Exclusion
//!
//! Two layers of waiting, outermost first:
//!
//! 1. [`AdmissionGate`] lets in one group at a time (one axis of rotations,
//!    or any number of snapshots) and drains the old group before a switch.
//! 2. [`RingLockTable`] serializes rotations of the same group that land on
//!    the same physical ring.

mod admission;
mod ring_table;

pub use admission::{AdmissionGate, AdmissionTicket, GateStats, Request};
pub use ring_table::{RingGuard, RingLockTable};
