//! # Cube Snapshot
//!
//! Owned, comparable copy of the whole cube: `6 * N * N` color ids in
//! face, row, column order.

use std::fmt;

use cubelock_shared::{Face, FACE_COUNT};

/// Full-state copy returned by `show()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    size: usize,
    colors: Vec<u8>,
}

impl Snapshot {
    /// Wraps raw colors.
    ///
    /// # Panics
    ///
    /// Panics if `colors.len() != 6 * size * size`.
    #[must_use]
    pub fn from_colors(size: usize, colors: Vec<u8>) -> Self {
        assert_eq!(
            colors.len(),
            FACE_COUNT * size * size,
            "snapshot of a {size}-layer cube needs {} colors",
            FACE_COUNT * size * size
        );
        Self { size, colors }
    }

    /// Number of layers of the cube this snapshot was taken from.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All colors in face, row, column order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.colors
    }

    /// Colors of one face, row-major.
    #[must_use]
    pub fn face(&self, face: Face) -> &[u8] {
        let area = self.size * self.size;
        &self.colors[face.id() * area..(face.id() + 1) * area]
    }

    /// Returns true if every face is a single color.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL.iter().all(|&face| {
            let stickers = self.face(face);
            stickers.iter().all(|&c| c == stickers[0])
        })
    }
}

impl fmt::Display for Snapshot {
    /// Writes every color id as one digit, `012345` for a solved 1×1 cube.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &color in &self.colors {
            write!(f, "{color}")?;
        }
        Ok(())
    }
}
