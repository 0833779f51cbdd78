//! # CUBELOCK
//!
//! A thread-safe N-layer cube. Any number of threads may `rotate` and `show`
//! at once; every observable result equals some sequential order of the same
//! operations.
//!
//! ## Concurrency Rules
//!
//! 1. **Same axis, different rings** - run in parallel
//! 2. **Same ring** - one at a time, in arrival order
//! 3. **Different axes, or rotation vs show** - the active group drains first
//! 4. **Show vs show** - run in parallel
//!
//! ## Example
//!
//! ```rust
//! use cubelock::{Cube, Face, NoHooks};
//!
//! let cube = Cube::new(1, NoHooks)?;
//! cube.rotate(Face::Top, 0)?;
//! cube.rotate(Face::Front, 0)?;
//! assert_eq!(cube.show()?.to_string(), "253014");
//! # Ok::<(), cubelock::CubeError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod cube;
pub mod hooks;
pub mod timeline;
pub mod workload;

pub use config::CubeConfig;
pub use cube::Cube;
pub use hooks::{CubeHooks, FnHooks, NoHooks};
pub use timeline::{Span, SpanKind, Timeline};
pub use workload::{replay, replay_history, Operation, ReplayedHistory, Workload};

pub use cubelock_core::{CancelToken, GateStats};
pub use cubelock_geometry::{Facelets, Snapshot};
pub use cubelock_shared::{Axis, CubeError, CubeResult, Face, Group, WaitStage};
