//! # Timeline Recorder
//!
//! [`CubeHooks`] implementation that records one [`Span`] per operation: the
//! window between its before-hook and its after-hook.
//!
//! Spans are numbered at the after-hook, in one global order. The order of
//! after-hooks is a valid linearization: operations of different groups never
//! overlap, and same-group rotations on different rings commute. Replaying
//! the rotations by sequence number on a sequential cube therefore reproduces
//! the concurrent result, and every show must equal the replay of the
//! rotations numbered before it.

use std::collections::HashMap;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use cubelock_shared::Face;
use parking_lot::Mutex;

use crate::hooks::CubeHooks;

/// What a recorded operation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// A rotation of `layer` seen from `face`.
    Rotation {
        /// Face the layer is counted from.
        face: Face,
        /// Layer index.
        layer: usize,
    },
    /// A snapshot.
    Show,
}

/// One completed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// What ran.
    pub kind: SpanKind,
    /// Thread that ran it.
    pub thread: ThreadId,
    /// Entry of the before-hook.
    pub start: Instant,
    /// Entry of the after-hook.
    pub end: Instant,
    /// Position in the global after-hook order, starting at 0.
    pub sequence: u64,
}

impl Span {
    /// True if the two mutation windows intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The rotation this span recorded, if any.
    #[must_use]
    pub const fn rotation(&self) -> Option<(Face, usize)> {
        match self.kind {
            SpanKind::Rotation { face, layer } => Some((face, layer)),
            SpanKind::Show => None,
        }
    }
}

#[derive(Default)]
struct Recording {
    open: HashMap<ThreadId, (SpanKind, Instant)>,
    closed: Vec<Span>,
}

/// Records every operation of a cube.
///
/// Share it with the cube through an `Arc`:
///
/// ```rust
/// use std::sync::Arc;
///
/// use cubelock::{Cube, Face, Timeline};
///
/// let timeline = Arc::new(Timeline::new());
/// let cube = Cube::new(2, Arc::clone(&timeline)).unwrap();
/// cube.rotate(Face::Front, 1).unwrap();
/// cube.show().unwrap();
///
/// let spans = timeline.spans();
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].rotation(), Some((Face::Front, 1)));
/// ```
#[derive(Default)]
pub struct Timeline {
    delay: Duration,
    recording: Mutex<Recording>,
}

impl Timeline {
    /// Creates a recorder with no artificial delay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose before-hooks sleep for `delay`, widening every
    /// mutation window.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            recording: Mutex::default(),
        }
    }

    fn open(&self, kind: SpanKind) {
        let start = Instant::now();
        self.recording.lock().open.insert(thread::current().id(), (kind, start));
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn close(&self) {
        let end = Instant::now();
        let thread = thread::current().id();
        let mut recording = self.recording.lock();
        let Some((kind, start)) = recording.open.remove(&thread) else {
            tracing::warn!(?thread, "after-hook without a matching before-hook");
            return;
        };
        let sequence = recording.closed.len() as u64;
        recording.closed.push(Span {
            kind,
            thread,
            start,
            end,
            sequence,
        });
    }

    /// Completed spans in sequence order.
    #[must_use]
    pub fn spans(&self) -> Vec<Span> {
        self.recording.lock().closed.clone()
    }

    /// Completed rotations in sequence order.
    #[must_use]
    pub fn rotations(&self) -> Vec<(Face, usize)> {
        self.recording
            .lock()
            .closed
            .iter()
            .filter_map(Span::rotation)
            .collect()
    }

    /// The most recent span completed on the calling thread.
    #[must_use]
    pub fn last_on_current_thread(&self) -> Option<Span> {
        let thread = thread::current().id();
        self.recording
            .lock()
            .closed
            .iter()
            .rev()
            .find(|span| span.thread == thread)
            .copied()
    }

    /// Operations whose before-hook ran but whose after-hook did not.
    #[must_use]
    pub fn open_spans(&self) -> usize {
        self.recording.lock().open.len()
    }

    /// Number of completed spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recording.lock().closed.len()
    }

    /// True before the first operation completes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recording.lock().closed.is_empty()
    }
}

impl CubeHooks for Timeline {
    fn before_rotation(&self, face: Face, layer: usize) {
        self.open(SpanKind::Rotation { face, layer });
    }

    fn after_rotation(&self, _face: Face, _layer: usize) {
        self.close();
    }

    fn before_showing(&self) {
        self.open(SpanKind::Show);
    }

    fn after_showing(&self) {
        self.close();
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let recording = self.recording.lock();
        f.debug_struct("Timeline")
            .field("delay", &self.delay)
            .field("open", &recording.open.len())
            .field("closed", &recording.closed.len())
            .finish()
    }
}
