//! # FIFO-Fair Cancellable Lock
//!
//! A mutual-exclusion slot that hands ownership to waiters strictly in
//! arrival order. `parking_lot::Mutex` is only eventually fair, so the lock
//! itself is a flag plus a ticket queue guarded by a short internal mutex.
//!
//! The lock protects no data: it scopes a phase of work on data owned
//! elsewhere.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::{CancelToken, Cancelled, WaitQueue};

struct LockState {
    held: bool,
    queue: WaitQueue,
}

/// FIFO-fair lock whose waits can be cancelled.
pub struct FairLock {
    state: Mutex<LockState>,
    released: Condvar,
    poll: Duration,
}

impl FairLock {
    /// Creates an unlocked lock.
    ///
    /// # Arguments
    ///
    /// * `poll` - Upper bound on how long a waiter sleeps before re-checking
    ///   its cancellation token
    /// * `queue_capacity` - Waiters the queue holds before it reallocates
    #[must_use]
    pub fn new(poll: Duration, queue_capacity: usize) -> Self {
        Self {
            state: Mutex::new(LockState {
                held: false,
                queue: WaitQueue::with_capacity(queue_capacity),
            }),
            released: Condvar::new(),
            poll,
        }
    }

    /// Blocks until this caller is first in line and the lock is free.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `token` is raised on entry or before ownership
    /// is handed over. The caller is removed from the queue and owns nothing.
    pub fn lock(&self, token: &CancelToken) -> Result<FairLockGuard<'_>, Cancelled> {
        token.check()?;
        let mut state = self.state.lock();

        if !state.held && state.queue.is_empty() {
            state.held = true;
            return Ok(FairLockGuard { lock: self });
        }

        let ticket = state.queue.enqueue();
        loop {
            if token.is_cancelled() {
                if state.queue.remove(ticket) {
                    // The next waiter may now be head of a free lock.
                    self.released.notify_all();
                }
                return Err(Cancelled);
            }

            if !state.held && state.queue.is_head(ticket) {
                state.queue.pop_head(ticket);
                state.held = true;
                return Ok(FairLockGuard { lock: self });
            }

            self.released.wait_for(&mut state, self.poll);
        }
    }

    /// Takes the lock only if it is free and nobody is queued.
    pub fn try_lock(&self) -> Option<FairLockGuard<'_>> {
        let mut state = self.state.lock();
        if state.held || !state.queue.is_empty() {
            return None;
        }
        state.held = true;
        Some(FairLockGuard { lock: self })
    }

    /// Returns true while some caller owns the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.lock().held
    }

    /// Number of callers waiting for the lock.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    fn unlock(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.held, "unlocking a free FairLock");
        state.held = false;
        drop(state);
        self.released.notify_all();
    }
}

impl std::fmt::Debug for FairLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FairLock")
            .field("held", &state.held)
            .field("waiting", &state.queue.len())
            .finish()
    }
}

/// Ownership of a [`FairLock`]. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct FairLockGuard<'a> {
    lock: &'a FairLock,
}

impl Drop for FairLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
