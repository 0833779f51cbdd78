//! # CUBELOCK Geometry Engine
//!
//! Facelet storage and piece permutation for an N-layer cube.
//!
//! ## Architecture Rules
//!
//! 1. **No locks** - the engine never decides when it may run
//! 2. **Disjoint rings touch disjoint cells** - two rotations with different
//!    ring slots on the same axis never read or write the same facelet
//! 3. **Deterministic** - four identical rotations restore the state
//!
//! ## Example
//!
//! ```rust
//! use cubelock_geometry::Facelets;
//! use cubelock_shared::Face;
//!
//! let cube = Facelets::new(1).unwrap();
//! cube.rotate(Face::Top, 0);
//! assert_eq!(cube.snapshot().to_string(), "023415");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod facelets;
pub mod rings;
pub mod snapshot;

pub use facelets::Facelets;
pub use rings::{Line, RingEdge, TurnDirection};
pub use snapshot::Snapshot;
