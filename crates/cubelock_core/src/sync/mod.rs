//! # Synchronization Primitives
//!
//! Blocking waits in this crate are built from three pieces:
//!
//! - [`CancelToken`]: a shared flag the caller may raise at any time
//! - `WaitQueue`: tickets handed out in arrival order; only the head may
//!   proceed
//! - `parking_lot::Condvar::wait_for`: every wait is bounded by a poll
//!   interval so a cancelled waiter notices its token without being notified
//!
//! ```text
//!   arrive ─► enqueue ticket ─► [head? && condition?] ──yes──► proceed
//!                  ▲                     │ no
//!                  │                     ▼
//!                  └──── wait_for(poll) ◄─┘   cancelled? ─► remove ticket
//! ```

mod cancel;
mod fair_lock;
mod wait_queue;

pub use cancel::{CancelToken, Cancelled};
pub use fair_lock::{FairLock, FairLockGuard};
pub(crate) use wait_queue::{Ticket, WaitQueue};
