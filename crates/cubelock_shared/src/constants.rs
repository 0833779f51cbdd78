//! # Cube Constants
//!
//! Values baked into the topology. Changing them changes every snapshot.

// =============================================================================
// TOPOLOGY
// =============================================================================

/// Number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// Color id of each face on a solved cube, indexed by face id.
///
/// A solved face is uniformly colored with its own id.
pub const SOLVED_COLORS: [u8; FACE_COUNT] = [0, 1, 2, 3, 4, 5];

/// Number of side faces a single layer rotation cycles through.
pub const RING_SIDES: usize = 4;
