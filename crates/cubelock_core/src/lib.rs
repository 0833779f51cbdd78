//! # CUBELOCK Core
//!
//! The concurrency-control protocol that admits, orders and releases cube
//! operations.
//!
//! ## Architecture
//!
//! ```text
//!   rotate / show
//!         │
//!         ▼
//!   ┌───────────────┐   incompatible group?  wait for drain
//!   │ AdmissionGate │ ─────────────────────────────────────┐
//!   └───────┬───────┘ <────────────────────────────────────┘
//!           │ AdmissionTicket (ring slot for rotations)
//!           ▼
//!   ┌───────────────┐
//!   │ RingLockTable │   one FIFO-fair slot per physical ring
//!   └───────┬───────┘
//!           ▼
//!     hooks + geometry
//! ```
//!
//! Dropping a ticket is the completion signal. Every exit path (return,
//! error, cancellation, unwinding hook) drops it.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod gate;
pub mod sync;

pub use gate::{AdmissionGate, AdmissionTicket, GateStats, Request, RingGuard, RingLockTable};
pub use sync::{CancelToken, Cancelled, FairLock, FairLockGuard};
