//! # Ring Tables
//!
//! Which facelets a `(face, layer)` rotation cycles, and in which order.
//!
//! Looking at the rotated face, the ring passes over four neighbours:
//!
//! ```text
//!               TOP edge
//!            ┌───────────┐
//!  LEFT edge │  rotated  │ RIGHT edge
//!            │   face    │
//!            └───────────┘
//!             BOTTOM edge
//! ```
//!
//! A clockwise quarter turn moves `top → right → bottom → left → top`.
//! Each edge is described by the neighbour face, whether the ring runs along a
//! row or a column of that face, whether it is walked backwards, and whether
//! layer `k` lands on lane `k` or on the mirrored lane `n-1-k`.

use cubelock_shared::constants::RING_SIDES;
use cubelock_shared::{Face, FACE_COUNT};

/// How a ring crosses a neighbouring face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// The ring runs along a row: lane selects the row.
    Row,
    /// The ring runs along a column: lane selects the column.
    Column,
}

/// Quarter-turn direction of a face's own stickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    /// Clockwise, seen from outside the face.
    Clockwise,
    /// Counter-clockwise, seen from outside the face.
    CounterClockwise,
}

/// One of the four stretches of a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingEdge {
    /// Neighbouring face the stretch lies on.
    pub face: Face,
    /// Row or column.
    pub line: Line,
    /// Walk the lane from the high index down.
    pub reversed: bool,
    /// Layer `k` maps to lane `n-1-k`.
    pub mirrored: bool,
}

impl RingEdge {
    const fn new(face: Face, line: Line, reversed: bool, mirrored: bool) -> Self {
        Self {
            face,
            line,
            reversed,
            mirrored,
        }
    }

    /// Returns `(row, col)` of the `step`-th facelet of this stretch for `layer`.
    #[inline]
    #[must_use]
    pub const fn cell(&self, layer: usize, step: usize, size: usize) -> (usize, usize) {
        let lane = if self.mirrored { size - 1 - layer } else { layer };
        let along = if self.reversed { size - 1 - step } else { step };
        match self.line {
            Line::Row => (lane, along),
            Line::Column => (along, lane),
        }
    }
}

use Face::{Back, Bottom, Front, Left, Right, Top};
use Line::{Column, Row};

/// Ring edges of every face, in `[left, top, right, bottom]` order.
const RINGS: [[RingEdge; RING_SIDES]; FACE_COUNT] = [
    // top
    [
        RingEdge::new(Left, Row, true, false),
        RingEdge::new(Back, Row, true, false),
        RingEdge::new(Right, Row, true, false),
        RingEdge::new(Front, Row, true, false),
    ],
    // left
    [
        RingEdge::new(Back, Column, true, true),
        RingEdge::new(Top, Column, false, false),
        RingEdge::new(Front, Column, false, false),
        RingEdge::new(Bottom, Column, false, false),
    ],
    // front
    [
        RingEdge::new(Left, Column, true, true),
        RingEdge::new(Top, Row, false, true),
        RingEdge::new(Right, Column, false, false),
        RingEdge::new(Bottom, Row, true, false),
    ],
    // right
    [
        RingEdge::new(Front, Column, true, true),
        RingEdge::new(Top, Column, true, true),
        RingEdge::new(Back, Column, false, false),
        RingEdge::new(Bottom, Column, true, true),
    ],
    // back
    [
        RingEdge::new(Right, Column, true, true),
        RingEdge::new(Top, Row, true, false),
        RingEdge::new(Left, Column, false, false),
        RingEdge::new(Bottom, Row, false, true),
    ],
    // bottom
    [
        RingEdge::new(Left, Row, false, true),
        RingEdge::new(Front, Row, false, true),
        RingEdge::new(Right, Row, false, true),
        RingEdge::new(Back, Row, false, true),
    ],
];

/// Returns the `[left, top, right, bottom]` edges of the ring around `face`.
#[inline]
#[must_use]
pub const fn ring_of(face: Face) -> &'static [RingEdge; RING_SIDES] {
    &RINGS[face as usize]
}
