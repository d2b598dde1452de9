//! Stochastic obstacle arrival process.
//!
//! The spawner is consulted once per coarse interval (not every tick) and
//! decides whether a new obstacle of a given kind enters at the right
//! boundary. Arrival policy:
//!
//! - An empty obstacle list spawns almost immediately (fixed high
//!   probability), so the course never sits idle.
//! - Otherwise, spawning is only considered once the previous obstacle's
//!   trailing edge is fully inside the arena, with a probability that rises
//!   with the gap behind it along an exponential-CDF-shaped curve. Close
//!   entries are unlikely, which enforces a soft minimum spacing, and the
//!   uniform comparison threshold is stretched so near-duplicate gaps stay
//!   rare.
//! - Cacti only below level 1; from level 1 up, a biased coin picks birds
//!   roughly one time in five.
//!
//! All of the spawner's randomness flows through one seeded PCG generator,
//! which is what makes the arena deterministic given its [`ArenaSeed`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::core::{Obstacle, ObstacleKind};

use super::seed::ArenaSeed;

/// Spawn probability when the obstacle list is empty.
const EMPTY_LIST_SPAWN_PROBABILITY: f64 = 0.92;
/// Shape parameter of the spacing curve; larger values relax the minimum gap.
const SPACING_SHAPE: f32 = 3.0;
/// Lowest level at which birds start appearing.
const BIRD_MIN_LEVEL: u32 = 1;
/// Probability of a bird (rather than a cactus) once birds are unlocked.
const BIRD_PROBABILITY: f64 = 0.2;

/// Decides when and what to spawn, consuming a seeded RNG.
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    rng: Pcg32,
}

impl ObstacleSpawner {
    #[must_use]
    pub fn new(seed: ArenaSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Picks the obstacle kind for the next spawn attempt.
    ///
    /// Below [`BIRD_MIN_LEVEL`] the course is cacti only.
    pub fn choose_kind(&mut self, level: u32) -> ObstacleKind {
        if level >= BIRD_MIN_LEVEL && self.rng.random_bool(BIRD_PROBABILITY) {
            ObstacleKind::Bird
        } else {
            ObstacleKind::Cactus
        }
    }

    /// Position-dependent arrival test for a non-empty list.
    ///
    /// `trailing_edge` is the rightmost edge of the last-spawned obstacle.
    /// The acceptance probability follows `1 - exp(-k * gap / width)` where
    /// `gap` is the free space behind that edge, sampled against a uniform
    /// draw stretched over `[0, k)`.
    fn should_spawn_behind(&mut self, trailing_edge: f32, arena_width: f32) -> bool {
        let gap_fraction = (arena_width - trailing_edge) / arena_width;
        let acceptance = 1.0 - f32::exp(-SPACING_SHAPE * gap_fraction);
        self.rng.random_range(0.0..SPACING_SHAPE) < acceptance
    }

    /// Attempts to spawn an obstacle of `kind` behind the given list.
    ///
    /// Returns the new obstacle, positioned at the right boundary, when the
    /// arrival policy fires. The caller appends it at the tail, keeping the
    /// list x-ascending.
    pub fn attempt_spawn(
        &mut self,
        kind: ObstacleKind,
        list: &VecDeque<Obstacle>,
        arena_width: f32,
        speed: f32,
    ) -> Option<Obstacle> {
        let accepted = match list.back() {
            None => self.rng.random_bool(EMPTY_LIST_SPAWN_PROBABILITY),
            Some(last) => {
                last.trailing_edge() < arena_width
                    && self.should_spawn_behind(last.trailing_edge(), arena_width)
            }
        };
        if !accepted {
            return None;
        }
        let obstacle = match kind {
            ObstacleKind::Cactus => Obstacle::cactus(arena_width, speed, &mut self.rng),
            ObstacleKind::Bird => Obstacle::bird(arena_width, speed, &mut self.rng),
        };
        Some(obstacle)
    }
}
