//! # Seeded Workloads and Replay
//!
//! Random operation lists for stress runs, and the sequential replay a
//! concurrent run is checked against.
//!
//! Workloads are generated with `ChaCha8Rng`: the same seed gives the same
//! operations on every platform.

use std::collections::BTreeMap;

use cubelock_geometry::{Facelets, Snapshot};
use cubelock_shared::{CubeResult, Face};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::timeline::{Span, SpanKind};

/// One cube operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `rotate(face, layer)`.
    Rotate {
        /// Face the layer is counted from.
        face: Face,
        /// Layer index.
        layer: usize,
    },
    /// `show()`.
    Show,
}

/// A reproducible list of operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    size: usize,
    seed: u64,
    operations: Vec<Operation>,
}

impl Workload {
    /// Generates `count` operations for a cube of `size` layers.
    ///
    /// Every `show_every`-th operation is a show; `0` disables shows.
    #[must_use]
    pub fn random(size: usize, count: usize, show_every: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let operations = (1..=count)
            .map(|i| {
                if show_every != 0 && i % show_every == 0 {
                    Operation::Show
                } else {
                    Operation::Rotate {
                        face: Face::ALL[rng.gen_range(0..Face::ALL.len())],
                        layer: rng.gen_range(0..size.max(1)),
                    }
                }
            })
            .collect();

        Self {
            size,
            seed,
            operations,
        }
    }

    /// Number of layers the workload was generated for.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Seed the workload was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The operations in generation order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Rotations in generation order.
    pub fn rotations(&self) -> impl Iterator<Item = (Face, usize)> + '_ {
        self.operations.iter().filter_map(|op| match *op {
            Operation::Rotate { face, layer } => Some((face, layer)),
            Operation::Show => None,
        })
    }
}

/// Applies `rotations` in order to a fresh solved cube.
///
/// # Errors
///
/// Returns [`CubeError::InvalidSize`](cubelock_shared::CubeError::InvalidSize)
/// or [`CubeError::LayerOutOfRange`](cubelock_shared::CubeError::LayerOutOfRange).
pub fn replay<I>(size: usize, rotations: I) -> CubeResult<Snapshot>
where
    I: IntoIterator<Item = (Face, usize)>,
{
    let reference = Facelets::new(size)?;
    reference.apply(rotations)?;
    Ok(reference.snapshot())
}

/// Sequential re-execution of a recorded run.
#[derive(Clone, Debug)]
pub struct ReplayedHistory {
    /// State after every recorded rotation.
    pub final_state: Snapshot,
    /// For each recorded show, keyed by its sequence number: the state built
    /// from the rotations numbered before it.
    pub expected_shows: BTreeMap<u64, Snapshot>,
}

impl ReplayedHistory {
    /// Expected result of the show with sequence number `sequence`.
    #[must_use]
    pub fn expected_show(&self, sequence: u64) -> Option<&Snapshot> {
        self.expected_shows.get(&sequence)
    }
}

/// Replays recorded spans in sequence order.
///
/// # Errors
///
/// Fails like [`replay`] if a span names an invalid layer.
pub fn replay_history(size: usize, spans: &[Span]) -> CubeResult<ReplayedHistory> {
    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by_key(|span| span.sequence);

    let reference = Facelets::new(size)?;
    let mut expected_shows = BTreeMap::new();
    for span in ordered {
        match span.kind {
            SpanKind::Rotation { face, layer } => reference.apply([(face, layer)])?,
            SpanKind::Show => {
                expected_shows.insert(span.sequence, reference.snapshot());
            }
        }
    }

    Ok(ReplayedHistory {
        final_state: reference.snapshot(),
        expected_shows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::CubeHooks;
    use crate::timeline::Timeline;

    #[test]
    fn test_same_seed_same_workload() {
        let a = Workload::random(4, 200, 7, 42);
        let b = Workload::random(4, 200, 7, 42);
        let c = Workload::random(4, 200, 7, 43);
        assert_eq!(a, b);
        assert_eq!(a.seed(), 42);
        assert_ne!(a.operations(), c.operations());
    }

    #[test]
    fn test_show_cadence_and_layer_range() {
        let workload = Workload::random(3, 30, 5, 1);
        for (i, op) in workload.operations().iter().enumerate() {
            match op {
                Operation::Show => assert_eq!((i + 1) % 5, 0),
                Operation::Rotate { layer, .. } => assert!(*layer < 3),
            }
        }
        assert_eq!(workload.rotations().count(), 24);
    }

    #[test]
    fn test_replay_rejects_bad_layer() {
        assert!(replay(2, [(Face::Top, 2)]).is_err());
        assert!(replay(0, Vec::new()).is_err());
    }

    #[test]
    fn test_replay_history_orders_by_sequence() {
        let timeline = Timeline::new();
        timeline.before_rotation(Face::Top, 0);
        timeline.after_rotation(Face::Top, 0);
        timeline.before_showing();
        timeline.after_showing();
        timeline.before_rotation(Face::Front, 0);
        timeline.after_rotation(Face::Front, 0);

        let mut spans = timeline.spans();
        spans.reverse();
        let history = replay_history(1, &spans).unwrap();

        assert_eq!(history.expected_show(1).unwrap().to_string(), "023415");
        assert_eq!(history.final_state.to_string(), "253014");
        assert!(history.expected_show(0).is_none());
    }
}
