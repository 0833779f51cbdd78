//! # Admission Gate
//!
//! Decides whether an incoming request runs next to the operations already in
//! flight or waits for them to drain.
//!
//! ## Protocol
//!
//! ```text
//!   admit(request)
//!     │  lock state (short critical section)
//!     ├─ nobody queued && (no group yet || same group || nothing in flight)
//!     │      └─► join, in_flight += 1
//!     └─ otherwise enqueue ticket, then until admitted:
//!            head && same group          ─► join
//!            head && in_flight == 0      ─► switch group, join
//!            cancelled                   ─► leave queue, Err(Cancelled)
//!            else                        ─► wait (critical section released)
//!
//!   drop(ticket)  ─► in_flight -= 1, wake waiters when it reaches 0
//! ```
//!
//! Once anyone is queued, newcomers queue behind them even if their group is
//! active. A pending switch therefore closes the old group: exactly the
//! members in flight at that moment have to finish, and the drain can never
//! be extended. Waiters are served strictly in arrival order, which bounds how
//! many group switches any request sits through.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cubelock_shared::{CubeError, CubeResult, Face, Group, WaitStage};
use parking_lot::{Condvar, Mutex};

use crate::sync::{CancelToken, Ticket, WaitQueue};

/// What a caller wants to do once admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Rotate `layer` seen from `face`.
    Rotate {
        /// Face the layer is counted from.
        face: Face,
        /// Layer index, `0..size`.
        layer: usize,
    },
    /// Take a snapshot.
    Show,
}

impl Request {
    /// Group the request must be admitted into.
    #[must_use]
    pub const fn group(&self) -> Group {
        match *self {
            Self::Rotate { face, .. } => Group::turning(face),
            Self::Show => Group::Showing,
        }
    }
}

/// Counters exposed for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Requests admitted since construction.
    pub admitted: u64,
    /// Times the active group changed (the first admission ever counts).
    pub group_switches: u64,
    /// Waiters that gave up on a cancelled token.
    pub cancelled: u64,
}

struct GateState {
    /// Group currently admitted. `None` until the very first admission.
    current: Option<Group>,
    /// Admitted to `current` and not yet completed.
    in_flight: usize,
    /// Callers that could not join on arrival.
    queue: WaitQueue,
}

impl GateState {
    /// True if `group` may be admitted right now, either by joining the active
    /// group or by switching to it.
    fn can_admit(&self, group: Group) -> bool {
        self.in_flight == 0 || self.current.map_or(true, |current| current.is_compatible(group))
    }
}

/// Group admission with drain-before-switch.
pub struct AdmissionGate {
    size: usize,
    state: Mutex<GateState>,
    changed: Condvar,
    poll: Duration,
    admitted: AtomicU64,
    group_switches: AtomicU64,
    cancelled: AtomicU64,
}

impl AdmissionGate {
    /// Creates a gate for a cube with `size` layers.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of layers, used to compute ring slots
    /// * `poll` - Upper bound on how long a waiter sleeps before re-checking
    ///   its cancellation token
    /// * `queue_capacity` - Waiters the queue holds before it reallocates
    #[must_use]
    pub fn new(size: usize, poll: Duration, queue_capacity: usize) -> Self {
        Self {
            size,
            state: Mutex::new(GateState {
                current: None,
                in_flight: 0,
                queue: WaitQueue::with_capacity(queue_capacity),
            }),
            changed: Condvar::new(),
            poll,
            admitted: AtomicU64::new(0),
            group_switches: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        }
    }

    /// Admits `request`, waiting for the active group to drain if needed.
    ///
    /// The returned ticket must be held for the whole operation; dropping it
    /// is the completion signal.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] with [`WaitStage::Admission`] if
    /// `token` is raised on entry or while waiting. A cancelled caller is not
    /// counted as admitted.
    pub fn admit(&self, request: Request, token: &CancelToken) -> CubeResult<AdmissionTicket<'_>> {
        let group = request.group();
        if token.is_cancelled() {
            return Err(Self::cancelled_error());
        }

        let mut state = self.state.lock();
        if state.queue.is_empty() && state.can_admit(group) {
            return Ok(self.enter(&mut state, request, group));
        }

        let ticket = state.queue.enqueue();
        tracing::trace!(?request, waiting = state.queue.len(), "queued at admission gate");
        loop {
            if token.is_cancelled() {
                self.leave(&mut state, ticket);
                return Err(Self::cancelled_error());
            }

            if state.queue.is_head(ticket) && state.can_admit(group) {
                state.queue.pop_head(ticket);
                let admitted = self.enter(&mut state, request, group);
                // The new head may be able to join the same group.
                self.changed.notify_all();
                return Ok(admitted);
            }

            self.changed.wait_for(&mut state, self.poll);
        }
    }

    /// Counts the caller in. Must run inside the critical section.
    fn enter(&self, state: &mut GateState, request: Request, group: Group) -> AdmissionTicket<'_> {
        let switched = state.current != Some(group);
        if switched {
            debug_assert_eq!(state.in_flight, 0, "group switch with members in flight");
            tracing::debug!(from = ?state.current, to = %group, "admission group switch");
            state.current = Some(group);
            self.group_switches.fetch_add(1, Ordering::Relaxed);
        }
        state.in_flight += 1;
        self.admitted.fetch_add(1, Ordering::Relaxed);

        let ring_slot = match request {
            Request::Rotate { face, layer } => Some(face.axis().ring_slot(face, layer, self.size)),
            Request::Show => None,
        };
        tracing::trace!(?request, ?ring_slot, in_flight = state.in_flight, "admitted");

        AdmissionTicket {
            gate: self,
            ring_slot,
            switched,
        }
    }

    /// Removes a cancelled waiter. Must run inside the critical section.
    fn leave(&self, state: &mut GateState, ticket: Ticket) {
        if state.queue.remove(ticket) {
            self.changed.notify_all();
        }
        self.cancelled.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(waiting = state.queue.len(), "admission wait cancelled");
    }

    const fn cancelled_error() -> CubeError {
        CubeError::Cancelled {
            stage: WaitStage::Admission,
        }
    }

    /// Completion signal, run by [`AdmissionTicket`]'s destructor.
    fn complete(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.in_flight > 0, "completion without admission");
        state.in_flight = state.in_flight.saturating_sub(1);
        let drained = state.in_flight == 0;
        drop(state);

        if drained {
            self.changed.notify_all();
        }
    }

    /// Number of layers the gate computes ring slots for.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Operations admitted and not yet completed.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    /// Callers queued at the gate.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// The active group, `None` before the first admission.
    #[must_use]
    pub fn current_group(&self) -> Option<Group> {
        self.state.lock().current
    }

    /// Snapshot of the gate counters.
    #[must_use]
    pub fn stats(&self) -> GateStats {
        GateStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            group_switches: self.group_switches.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AdmissionGate")
            .field("current", &state.current)
            .field("in_flight", &state.in_flight)
            .field("waiting", &state.queue.len())
            .finish_non_exhaustive()
    }
}

/// Proof of admission. Dropping it signals completion to the gate.
#[must_use = "dropping the ticket immediately completes the operation"]
pub struct AdmissionTicket<'a> {
    gate: &'a AdmissionGate,
    ring_slot: Option<usize>,
    switched: bool,
}

impl AdmissionTicket<'_> {
    /// Ring slot of an admitted rotation; `None` for snapshots.
    #[inline]
    #[must_use]
    pub const fn ring_slot(&self) -> Option<usize> {
        self.ring_slot
    }

    /// True if this admission opened a new group.
    #[inline]
    #[must_use]
    pub const fn switched_group(&self) -> bool {
        self.switched
    }
}

impl Drop for AdmissionTicket<'_> {
    fn drop(&mut self) {
        self.gate.complete();
    }
}

impl std::fmt::Debug for AdmissionTicket<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionTicket")
            .field("ring_slot", &self.ring_slot)
            .field("switched", &self.switched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const POLL: Duration = Duration::from_millis(1);

    fn rotate(face: Face, layer: usize) -> Request {
        Request::Rotate { face, layer }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        while !condition() {
            thread::yield_now();
        }
    }

    #[test]
    fn test_first_admission_opens_group() {
        let gate = AdmissionGate::new(4, POLL, 4);
        let token = CancelToken::new();
        assert_eq!(gate.current_group(), None);

        let ticket = gate.admit(rotate(Face::Back, 0), &token).unwrap();
        assert!(ticket.switched_group());
        assert_eq!(ticket.ring_slot(), Some(3));
        assert_eq!(gate.current_group(), Some(Group::turning(Face::Front)));
        assert_eq!(gate.in_flight(), 1);

        drop(ticket);
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_same_axis_joins_without_waiting() {
        let gate = AdmissionGate::new(3, POLL, 4);
        let token = CancelToken::new();

        let a = gate.admit(rotate(Face::Left, 0), &token).unwrap();
        let b = gate.admit(rotate(Face::Right, 0), &token).unwrap();
        assert!(!b.switched_group());
        assert_eq!(a.ring_slot(), Some(0));
        assert_eq!(b.ring_slot(), Some(2));
        assert_eq!(gate.in_flight(), 2);
    }

    #[test]
    fn test_shows_share_group() {
        let gate = AdmissionGate::new(2, POLL, 4);
        let token = CancelToken::new();

        let a = gate.admit(Request::Show, &token).unwrap();
        let b = gate.admit(Request::Show, &token).unwrap();
        assert_eq!(a.ring_slot(), None);
        assert_eq!(gate.in_flight(), 2);
        assert_eq!(gate.stats().group_switches, 1);
        drop((a, b));
    }

    #[test]
    fn test_switch_waits_for_drain() {
        let gate = Arc::new(AdmissionGate::new(3, POLL, 4));
        let token = CancelToken::new();
        let rotation = gate.admit(rotate(Face::Top, 1), &token).unwrap();

        let shower = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let token = CancelToken::new();
                let ticket = gate.admit(Request::Show, &token).unwrap();
                ticket.switched_group()
            })
        };

        wait_until(|| gate.waiting() == 1);
        assert_eq!(gate.current_group(), Some(Group::turning(Face::Top)));

        drop(rotation);
        assert!(shower.join().unwrap());
        assert_eq!(gate.current_group(), Some(Group::Showing));
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_pending_switch_blocks_old_group() {
        let gate = Arc::new(AdmissionGate::new(3, POLL, 4));
        let token = CancelToken::new();
        let first = gate.admit(rotate(Face::Front, 0), &token).unwrap();

        // A show queues behind the front rotation...
        let show = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let _ticket = gate.admit(Request::Show, &CancelToken::new()).unwrap();
            })
        };
        wait_until(|| gate.waiting() == 1);

        // ...so a later front rotation may not slip into the old group.
        let late = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let ticket = gate.admit(rotate(Face::Front, 1), &CancelToken::new()).unwrap();
                ticket.switched_group()
            })
        };
        wait_until(|| gate.waiting() == 2);
        assert_eq!(gate.in_flight(), 1);

        drop(first);
        show.join().unwrap();
        assert!(late.join().unwrap(), "late rotation must reopen its group");
        assert_eq!(gate.stats().group_switches, 3);
    }

    #[test]
    fn test_cancelled_waiter_is_not_admitted() {
        let gate = Arc::new(AdmissionGate::new(2, POLL, 4));
        let show = gate.admit(Request::Show, &CancelToken::new()).unwrap();

        let token = CancelToken::new();
        let waiter = {
            let gate = Arc::clone(&gate);
            let token = token.clone();
            thread::spawn(move || gate.admit(rotate(Face::Top, 0), &token).map(|_| ()))
        };
        wait_until(|| gate.waiting() == 1);

        token.cancel();
        let result = waiter.join().unwrap();
        assert_eq!(
            result,
            Err(CubeError::Cancelled {
                stage: WaitStage::Admission
            })
        );
        assert_eq!(gate.waiting(), 0);
        assert_eq!(gate.in_flight(), 1);
        assert_eq!(gate.current_group(), Some(Group::Showing));
        assert_eq!(gate.stats().cancelled, 1);

        drop(show);
        assert_eq!(gate.in_flight(), 0);
        let ticket = gate.admit(rotate(Face::Top, 0), &CancelToken::new()).unwrap();
        assert!(ticket.switched_group());
    }

    #[test]
    fn test_cancelled_head_wakes_next_waiter() {
        let gate = Arc::new(AdmissionGate::new(2, POLL, 4));
        let rotation = gate.admit(rotate(Face::Left, 0), &CancelToken::new()).unwrap();

        // Head wants a different axis and must wait for the drain.
        let head_token = CancelToken::new();
        let head = {
            let gate = Arc::clone(&gate);
            let token = head_token.clone();
            thread::spawn(move || gate.admit(rotate(Face::Top, 0), &token).map(|_| ()))
        };
        wait_until(|| gate.waiting() == 1);

        // Second waiter wants the active axis; it is only blocked by the head.
        let second = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let ticket = gate.admit(rotate(Face::Right, 1), &CancelToken::new()).unwrap();
                ticket.switched_group()
            })
        };
        wait_until(|| gate.waiting() == 2);

        head_token.cancel();
        assert!(head.join().unwrap().is_err());
        assert!(!second.join().unwrap(), "second waiter joins the active group");
        drop(rotation);
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_cancelled_before_entry() {
        let gate = AdmissionGate::new(2, POLL, 4);
        let token = CancelToken::new();
        token.cancel();

        assert!(gate.admit(Request::Show, &token).unwrap_err().is_cancelled());
        assert_eq!(gate.current_group(), None);
        assert_eq!(gate.stats().admitted, 0);
    }
}
