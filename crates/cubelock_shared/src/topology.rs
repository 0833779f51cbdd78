//! # Static Cube Topology
//!
//! Faces, axes and admission groups. None of this is runtime state: the
//! opposite-face relation is a fixed six-entry table.
//!
//! ```text
//!              ┌──────┐
//!              │ TOP 0│
//!       ┌──────┼──────┼──────┬──────┐
//!       │LEFT 1│FRONT2│RIGHT3│BACK 4│
//!       └──────┼──────┼──────┴──────┘
//!              │BOTTM5│
//!              └──────┘
//! ```
//!
//! Rotating layer `L` seen from one face moves the same physical ring as
//! rotating layer `N-1-L` seen from the opposite face. Both faces therefore
//! share one [`Axis`], and a rotation's ring slot is expressed relative to the
//! axis' reference face.

use std::fmt;

use crate::constants::FACE_COUNT;
use crate::error::CubeError;

/// One of the six cube faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Face {
    /// Face 0.
    Top = 0,
    /// Face 1.
    Left = 1,
    /// Face 2.
    Front = 2,
    /// Face 3.
    Right = 3,
    /// Face 4.
    Back = 4,
    /// Face 5.
    Bottom = 5,
}

/// Opposite face of every face, indexed by face id.
const OPPOSITE: [Face; FACE_COUNT] = [
    Face::Bottom,
    Face::Right,
    Face::Back,
    Face::Left,
    Face::Front,
    Face::Top,
];

impl Face {
    /// All faces in id order.
    pub const ALL: [Self; FACE_COUNT] = [
        Self::Top,
        Self::Left,
        Self::Front,
        Self::Right,
        Self::Back,
        Self::Bottom,
    ];

    /// Returns the numeric face id (0..6).
    #[inline]
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Returns the face on the other side of the cube.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        OPPOSITE[self as usize]
    }

    /// Returns the axis this face rotates around.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        Axis::of(self)
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Front => "front",
            Self::Right => "right",
            Self::Back => "back",
            Self::Bottom => "bottom",
        }
    }
}

impl TryFrom<usize> for Face {
    type Error = CubeError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(id)
            .copied()
            .ok_or(CubeError::FaceOutOfRange(id))
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered pair `{face, opposite(face)}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Top / bottom.
    UpDown,
    /// Left / right.
    LeftRight,
    /// Front / back.
    FrontBack,
}

impl Axis {
    /// Returns the axis of a face.
    #[must_use]
    pub const fn of(face: Face) -> Self {
        match face {
            Face::Top | Face::Bottom => Self::UpDown,
            Face::Left | Face::Right => Self::LeftRight,
            Face::Front | Face::Back => Self::FrontBack,
        }
    }

    /// The face ring slots are numbered from.
    ///
    /// Always the lower-numbered face of the pair.
    #[must_use]
    pub const fn reference_face(self) -> Face {
        match self {
            Self::UpDown => Face::Top,
            Self::LeftRight => Face::Left,
            Self::FrontBack => Face::Front,
        }
    }

    /// Returns true if `face` lies on this axis.
    #[must_use]
    pub fn contains(self, face: Face) -> bool {
        Self::of(face) == self
    }

    /// Maps a `(face, layer)` rotation onto its physical ring slot.
    ///
    /// Layer `L` from the reference face is slot `L`; layer `L` from the
    /// opposite face is slot `size - 1 - L`.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `face` lies on this axis and `layer < size`.
    #[must_use]
    pub fn ring_slot(self, face: Face, layer: usize, size: usize) -> usize {
        debug_assert!(self.contains(face), "{face} is not on axis {self:?}");
        debug_assert!(layer < size, "layer {layer} out of range for size {size}");

        if face == self.reference_face() {
            layer
        } else {
            size - 1 - layer
        }
    }
}

/// The set of operations admitted together by the admission gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    /// Snapshot epoch: any number of `show()` calls, no rotations.
    Showing,
    /// Rotations around one axis.
    Turning(Axis),
}

impl Group {
    /// Group requested by a rotation of `face`.
    #[must_use]
    pub const fn turning(face: Face) -> Self {
        Self::Turning(Axis::of(face))
    }

    /// Returns true if a member of `other` may run alongside members of `self`.
    #[inline]
    #[must_use]
    pub fn is_compatible(self, other: Self) -> bool {
        self == other
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Showing => f.write_str("showing"),
            Self::Turning(axis) => write!(f, "turning {axis:?}"),
        }
    }
}
