//! # Cube Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! size = 4
//! wait_poll_interval_us = 500
//! ring_queue_capacity = 32
//! ```

use std::path::Path;
use std::time::Duration;

use cubelock_shared::{CubeError, CubeResult};
use serde::Deserialize;

/// Construction parameters of a [`Cube`](crate::Cube).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CubeConfig {
    /// Number of layers.
    pub size: usize,
    /// Longest a blocked caller sleeps before it re-checks its cancellation
    /// token (microseconds).
    pub wait_poll_interval_us: u64,
    /// Waiters each queue holds before it reallocates.
    pub ring_queue_capacity: usize,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 3,
            wait_poll_interval_us: 1_000, // cancellation observed within 1ms
            ring_queue_capacity: 16,
        }
    }
}

impl CubeConfig {
    /// Config for many-thread runs: a big cube and short polls.
    ///
    /// More layers mean more independent rings per axis, so more rotations run
    /// side by side; the short poll keeps cancellation latency low while many
    /// waiters are parked.
    #[must_use]
    pub const fn stress() -> Self {
        Self {
            size: 10,
            wait_poll_interval_us: 200,
            ring_queue_capacity: 64,
        }
    }

    /// Default config for a cube with `size` layers.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] on malformed TOML, unknown keys or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> CubeResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CubeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if the file cannot be read or
    /// fails [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file(path: impl AsRef<Path>) -> CubeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CubeError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] for a zero size and
    /// [`CubeError::InvalidConfig`] for a zero poll interval.
    pub fn validate(&self) -> CubeResult<()> {
        if self.size == 0 {
            return Err(CubeError::InvalidSize(self.size));
        }
        if self.wait_poll_interval_us == 0 {
            return Err(CubeError::InvalidConfig(
                "wait_poll_interval_us must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The poll interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn wait_poll_interval(&self) -> Duration {
        Duration::from_micros(self.wait_poll_interval_us)
    }
}
