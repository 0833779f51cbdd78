//! # Cube Error Types
//!
//! All errors that can occur while driving a cube.
//!
//! Two families exist:
//! - **Programmer errors** (`FaceOutOfRange`, `LayerOutOfRange`, `InvalidSize`)
//!   are reported synchronously, before the caller touches any lock.
//! - **Cancellation** (`Cancelled`) is fully recoverable: the cancelled caller
//!   holds no ring slot and is not counted by the admission gate.

use std::fmt;

use thiserror::Error;

/// Where a cancelled caller was parked when it noticed its token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaitStage {
    /// Waiting in the admission gate for the active group to drain.
    Admission,
    /// Admitted, waiting for the ring slot of its layer.
    RingSlot,
}

impl fmt::Display for WaitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admission => f.write_str("admission"),
            Self::RingSlot => f.write_str("ring slot"),
        }
    }
}

/// Errors that can occur in the cube system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// Face id outside `0..6`.
    #[error("face out of range: {0} (expected 0..6)")]
    FaceOutOfRange(usize),

    /// Layer index outside `0..size`.
    #[error("layer out of range: {layer} (cube has {size} layers)")]
    LayerOutOfRange {
        /// The requested layer.
        layer: usize,
        /// Number of layers of the cube.
        size: usize,
    },

    /// A cube must have at least one layer.
    #[error("invalid cube size: {0}")]
    InvalidSize(usize),

    /// The caller's token was cancelled while it was waiting.
    #[error("operation cancelled while waiting for {stage}")]
    Cancelled {
        /// Where the caller was waiting.
        stage: WaitStage,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CubeError {
    /// Returns true if this error is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;
