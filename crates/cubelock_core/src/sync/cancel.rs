//! # Cancellation Tokens
//!
//! A token is an `Arc<AtomicBool>`. Clones share the flag, so one thread can
//! park inside the cube while another cancels it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// A waiter observed its token and gave up.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("wait cancelled")]
pub struct Cancelled;

/// Shared cancellation flag.
///
/// ## Usage
///
/// ```rust
/// use cubelock_core::CancelToken;
///
/// let token = CancelToken::new();
/// let remote = token.clone();
/// remote.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fails with [`Cancelled`] if the flag is raised.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the token has been cancelled.
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
