//! # CUBELOCK Shared
//!
//! Common types used by the geometry engine, the synchronization layer and the
//! cube facade.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `parking_lot`
//! - Any crate that owns facelet storage
//!
//! If you need a lock, put it in `cubelock_core`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod error;
pub mod topology;

pub use constants::{FACE_COUNT, SOLVED_COLORS};
pub use error::{CubeError, CubeResult, WaitStage};
pub use topology::{Axis, Face, Group};
