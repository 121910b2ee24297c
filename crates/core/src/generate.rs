//! Frame-history generation.
//!
//! Builds a bounded sequence of occupancy frames from a layout, drawing
//! each slot's visibility independently per frame from a step-function
//! schedule over the frame's temporal position (a crude daily occupancy
//! curve: quiet early, packed mid-run, emptying at the end).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{Frame, History, Layout, Occupant};
use lotlapse_protocol::constants::{DEFAULT_FRAME_COUNT, DEFAULT_VARIANT_COUNT};
use lotlapse_protocol::Rotation;

/// Occupancy probability buckets over the run fraction `i / frame_count`.
/// Each entry is `(upper_bound, probability)`; the last bound is
/// inclusive so the final frame always classifies.
const OCCUPANCY_SCHEDULE: [(f64, f64); 5] = [
    (0.18, 0.25),
    (0.25, 0.45),
    (0.60, 0.90),
    (0.75, 0.80),
    (1.0, 0.15),
];

/// Probability that a slot is occupied at run fraction `position`.
pub fn occupancy_probability(position: f64) -> f64 {
    for (bound, prob) in OCCUPANCY_SCHEDULE {
        if position < bound {
            return prob;
        }
    }
    // position == 1.0 (or a degenerate input beyond it) falls into the
    // closing bucket.
    OCCUPANCY_SCHEDULE[OCCUPANCY_SCHEDULE.len() - 1].1
}

/// Parameters for one generation run.
///
/// Identical seeds produce identical histories on every platform, which
/// is what makes generated runs reproducible in tests and demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Number of frames to produce. Must be at least 1.
    pub frame_count: usize,
    /// Size of the appearance palette variants are drawn from.
    pub variant_count: usize,
    /// Seed for the deterministic RNG.
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            variant_count: DEFAULT_VARIANT_COUNT,
            seed: 42,
        }
    }
}

/// Generate a history with a seeded RNG.
pub fn generate(layout: &Layout, config: &GenerateConfig) -> History {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_history(layout, config.frame_count, config.variant_count, &mut rng)
}

/// Generate exactly `frame_count` frames over `layout`.
///
/// Every frame is a fresh structural copy of the layout skeleton with
/// occupancy redrawn from scratch — frames never share slot storage, so
/// later draws cannot disturb earlier snapshots. The seed frame is frame
/// 0 of the schedule: bucket position is evaluated from the number of
/// frames already produced, which for the seed frame is zero and lands
/// in the opening bucket.
///
/// `frame_count >= 1` and a validated (non-empty) layout are the
/// caller's contract.
pub fn generate_history(
    layout: &Layout,
    frame_count: usize,
    variant_count: usize,
    rng: &mut impl Rng,
) -> History {
    debug_assert!(frame_count >= 1, "frame_count must be at least 1");
    debug_assert!(variant_count >= 1, "variant_count must be at least 1");

    let mut frames = Vec::with_capacity(frame_count);
    while frames.len() < frame_count {
        let position = frames.len() as f64 / frame_count as f64;
        frames.push(draw_frame(layout, position, variant_count, rng));
    }
    History::from_generated(frames)
}

/// Draw one frame's occupancy at the given run fraction.
fn draw_frame(
    layout: &Layout,
    position: f64,
    variant_count: usize,
    rng: &mut impl Rng,
) -> Frame {
    let prob = occupancy_probability(position);
    let mut frame = Frame::vacant(layout);
    for column in frame.columns_mut() {
        for slot in column.slots_mut() {
            if rng.gen_range(0.0..1.0) < prob {
                slot.occupant = Some(Occupant {
                    rotation: if rng.gen_bool(0.5) {
                        Rotation::Deg0
                    } else {
                        Rotation::Deg180
                    },
                    variant: rng.gen_range(0..variant_count),
                });
            }
        }
    }
    frame
}
