//! # Facelet Storage
//!
//! Six `N×N` faces of color ids, one atomic cell per sticker.
//!
//! ## Thread Safety
//!
//! Every cell is an `AtomicU8` accessed with `Relaxed` ordering, so the
//! storage is `Sync` without any lock of its own. The engine does not order
//! anything: callers must guarantee that no two concurrent rotations share a
//! ring slot and that no snapshot runs next to a rotation. Happens-before
//! between successive owners of a ring comes from the caller's locks.
//!
//! Rotations of the same axis with different ring slots write disjoint cells:
//! slot `k` touches lane `k` of the four side faces, and only slot `0` and slot
//! `N-1` touch the two axis faces themselves.

use std::sync::atomic::{AtomicU8, Ordering};

use cubelock_shared::{CubeError, CubeResult, Face, FACE_COUNT, SOLVED_COLORS};

use crate::rings::{ring_of, TurnDirection};
use crate::snapshot::Snapshot;

/// Color storage for an N-layer cube.
pub struct Facelets {
    /// Number of layers.
    size: usize,
    /// `FACE_COUNT * size * size` cells, face-major then row-major.
    cells: Box<[AtomicU8]>,
}

impl Facelets {
    /// Creates a solved cube: face `f` uniformly colored `f`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] if `size` is zero.
    pub fn new(size: usize) -> CubeResult<Self> {
        if size == 0 {
            return Err(CubeError::InvalidSize(size));
        }

        let area = size * size;
        let cells: Vec<AtomicU8> = (0..FACE_COUNT * area)
            .map(|i| AtomicU8::new(SOLVED_COLORS[i / area]))
            .collect();

        Ok(Self {
            size,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Number of layers.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    const fn index(&self, face: Face, row: usize, col: usize) -> usize {
        (face as usize * self.size + row) * self.size + col
    }

    #[inline]
    fn load(&self, index: usize) -> u8 {
        self.cells[index].load(Ordering::Relaxed)
    }

    #[inline]
    fn store(&self, index: usize, color: u8) {
        self.cells[index].store(color, Ordering::Relaxed);
    }

    /// Cycles four cells: `a ← d ← c ← b ← a`.
    #[inline]
    fn cycle(&self, a: usize, b: usize, c: usize, d: usize) {
        let first = self.load(a);
        self.store(a, self.load(d));
        self.store(d, self.load(c));
        self.store(c, self.load(b));
        self.store(b, first);
    }

    /// Rotates layer `layer` seen from `face` a quarter turn clockwise.
    ///
    /// Layer `0` also turns `face` itself, layer `N-1` turns the opposite face
    /// the other way.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= size`. Callers validate first.
    pub fn rotate(&self, face: Face, layer: usize) {
        assert!(layer < self.size, "layer {layer} out of range for size {}", self.size);

        if layer == 0 {
            self.turn_face(face, TurnDirection::Clockwise);
        }
        if layer == self.size - 1 {
            self.turn_face(face.opposite(), TurnDirection::CounterClockwise);
        }

        let [left, top, right, bottom] = ring_of(face);
        let n = self.size;
        for step in 0..n {
            let at = |edge: &crate::rings::RingEdge| {
                let (row, col) = edge.cell(layer, step, n);
                self.index(edge.face, row, col)
            };
            // top → right → bottom → left → top
            self.cycle(at(left), at(top), at(right), at(bottom));
        }
    }

    /// Quarter-turns the stickers of one face, outer square first.
    fn turn_face(&self, face: Face, direction: TurnDirection) {
        let n = self.size;
        for row in 0..n / 2 {
            for col in row..n - row - 1 {
                let p1 = self.index(face, row, col);
                let p2 = self.index(face, col, n - row - 1);
                let p3 = self.index(face, n - row - 1, n - col - 1);
                let p4 = self.index(face, n - col - 1, row);

                match direction {
                    TurnDirection::Clockwise => self.cycle(p1, p2, p3, p4),
                    TurnDirection::CounterClockwise => self.cycle(p4, p3, p2, p1),
                }
            }
        }
    }

    /// Copies the whole cube.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let colors = self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect();
        Snapshot::from_colors(self.size, colors)
    }

    /// Applies rotations one after another.
    ///
    /// This is the sequential reference the concurrent cube is checked against.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::LayerOutOfRange`] at the first invalid layer; the
    /// rotations before it stay applied.
    pub fn apply<I>(&self, rotations: I) -> CubeResult<()>
    where
        I: IntoIterator<Item = (Face, usize)>,
    {
        for (face, layer) in rotations {
            if layer >= self.size {
                return Err(CubeError::LayerOutOfRange {
                    layer,
                    size: self.size,
                });
            }
            self.rotate(face, layer);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Facelets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facelets")
            .field("size", &self.size)
            .field("state", &self.snapshot().to_string())
            .finish()
    }
}
