//! FIFO ticket queue shared by the admission gate and the ring slots.
//!
//! Not synchronized: always used from inside the owner's mutex.

use std::collections::VecDeque;

/// Position of one waiter in a [`WaitQueue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// Waiters in arrival order.
#[derive(Debug, Default)]
pub(crate) struct WaitQueue {
    next: u64,
    waiting: VecDeque<Ticket>,
}

impl WaitQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            next: 0,
            waiting: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a new waiter at the tail.
    pub(crate) fn enqueue(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next = self.next.wrapping_add(1);
        self.waiting.push_back(ticket);
        ticket
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.waiting.len()
    }

    #[inline]
    pub(crate) fn is_head(&self, ticket: Ticket) -> bool {
        self.waiting.front() == Some(&ticket)
    }

    /// Removes the head, which must be `ticket`.
    pub(crate) fn pop_head(&mut self, ticket: Ticket) {
        let head = self.waiting.pop_front();
        debug_assert_eq!(head, Some(ticket), "only the head may leave through the front");
    }

    /// Removes a cancelled waiter wherever it sits. Returns true if it was the
    /// head, in which case the next waiter must be woken.
    pub(crate) fn remove(&mut self, ticket: Ticket) -> bool {
        match self.waiting.iter().position(|&t| t == ticket) {
            Some(pos) => {
                self.waiting.remove(pos);
                pos == 0
            }
            None => false,
        }
    }
}
