//! The scrolling obstacle course plus scoring and leveling state.

use std::collections::VecDeque;

use rand::Rng as _;

use crate::core::{Obstacle, ObstacleKind};

use super::{seed::ArenaSeed, spawner::ObstacleSpawner};

/// Arena width in world units.
pub const ARENA_WIDTH: f32 = 800.0;
/// Arena height in world units.
pub const ARENA_HEIGHT: f32 = 400.0;
/// Score points required per level (level N needs `N * threshold`).
pub const LEVEL_THRESHOLD: u32 = 15;
/// Ticks between coarse bookkeeping steps (spawn, score, level).
pub const TICKS_PER_SCORE: u64 = 60;
/// Base leftward obstacle speed at level 0.
const BASE_OBSTACLE_SPEED: f32 = 5.0;
/// Additional obstacle speed per level.
const SPEED_PER_LEVEL: f32 = 0.5;

/// The environment: obstacle lists, difficulty level, score, and high score.
///
/// Both obstacle lists are kept x-ascending by construction: the spawner
/// only appends at the right boundary and expiry only removes from the
/// head. Score advances once per [`TICKS_PER_SCORE`] ticks, and the level
/// rises by at most one step per check even when the score has overshot
/// several thresholds; the check re-fires every coarse interval until it
/// catches up.
#[derive(Debug, Clone)]
pub struct Arena {
    cacti: VecDeque<Obstacle>,
    birds: VecDeque<Obstacle>,
    level: u32,
    score: u32,
    high_score: u32,
    tick: u64,
    spawner: ObstacleSpawner,
}

impl Arena {
    /// Creates an arena with a random seed.
    ///
    /// `high_score` is the previously persisted best score (0 when none).
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self::with_seed(rand::rng().random(), high_score)
    }

    /// Like [`Self::new`], but deterministic given `seed`.
    #[must_use]
    pub fn with_seed(seed: ArenaSeed, high_score: u32) -> Self {
        Self {
            cacti: VecDeque::new(),
            birds: VecDeque::new(),
            level: 0,
            score: 0,
            high_score,
            tick: 0,
            spawner: ObstacleSpawner::new(seed),
        }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn cacti(&self) -> &VecDeque<Obstacle> {
        &self.cacti
    }

    #[must_use]
    pub fn birds(&self) -> &VecDeque<Obstacle> {
        &self.birds
    }

    /// Iterates over every live obstacle, cacti first.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.cacti.iter().chain(self.birds.iter())
    }

    /// The nearest live cactus (head of the x-ascending list), if any.
    #[must_use]
    pub fn nearest_cactus(&self) -> Option<&Obstacle> {
        self.cacti.front()
    }

    /// The nearest live bird, if any.
    #[must_use]
    pub fn nearest_bird(&self) -> Option<&Obstacle> {
        self.birds.front()
    }

    /// Current leftward obstacle speed, scaled by difficulty level.
    #[must_use]
    pub fn obstacle_speed(&self) -> f32 {
        #[expect(clippy::cast_precision_loss)]
        let level = self.level as f32;
        BASE_OBSTACLE_SPEED + SPEED_PER_LEVEL * level
    }

    /// Scrolls every obstacle one tick, offset by the agent's horizontal
    /// velocity.
    pub fn advance_obstacles(&mut self, agent_vx: f32) {
        for obstacle in self.cacti.iter_mut().chain(self.birds.iter_mut()) {
            obstacle.advance(agent_vx);
        }
    }

    /// Removes obstacles whose trailing edge has passed the left boundary.
    ///
    /// Lists are x-ascending, so this is a prefix trim from the head and
    /// calling it twice in a row removes nothing further.
    pub fn trim_expired(&mut self) {
        while self.cacti.front().is_some_and(Obstacle::is_expired) {
            self.cacti.pop_front();
        }
        while self.birds.front().is_some_and(Obstacle::is_expired) {
            self.birds.pop_front();
        }
    }

    /// One spawn attempt: picks a kind for the current level and runs the
    /// arrival policy against that kind's list.
    pub fn attempt_spawn(&mut self) {
        let kind = self.spawner.choose_kind(self.level);
        let speed = self.obstacle_speed();
        let list = match kind {
            ObstacleKind::Cactus => &self.cacti,
            ObstacleKind::Bird => &self.birds,
        };
        if let Some(obstacle) = self.spawner.attempt_spawn(kind, list, ARENA_WIDTH, speed) {
            match kind {
                ObstacleKind::Cactus => self.cacti.push_back(obstacle),
                ObstacleKind::Bird => self.birds.push_back(obstacle),
            }
        }
    }

    /// Advances the score by one point and updates the high score.
    pub fn increase_score(&mut self) {
        self.score += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    /// Raises the level by at most one step when the score has reached the
    /// next threshold.
    ///
    /// Deliberately stepped rather than looped: an overshooting score catches
    /// up one level per coarse interval.
    pub fn increase_level(&mut self) {
        if self.score >= LEVEL_THRESHOLD * (self.level + 1) {
            self.level += 1;
        }
    }

    /// Advances the environment one tick.
    ///
    /// Obstacles scroll and expire every tick; spawning, scoring, and the
    /// level check run on the coarse [`TICKS_PER_SCORE`] interval.
    pub fn tick(&mut self, agent_vx: f32) {
        self.advance_obstacles(agent_vx);
        self.trim_expired();
        if self.tick % TICKS_PER_SCORE == 0 {
            self.attempt_spawn();
            self.increase_score();
            self.increase_level();
        }
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_arena(seed: u64) -> Arena {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&seed.to_be_bytes());
        Arena::with_seed(ArenaSeed::from_bytes(bytes), 0)
    }

    fn is_x_ascending(list: &VecDeque<Obstacle>) -> bool {
        list.iter().zip(list.iter().skip(1)).all(|(a, b)| a.x() <= b.x())
    }

    #[test]
    fn obstacle_lists_stay_x_ascending() {
        let mut arena = seeded_arena(11);
        for _ in 0..20_000 {
            arena.tick(0.0);
            assert!(is_x_ascending(arena.cacti()));
            assert!(is_x_ascending(arena.birds()));
        }
    }

    #[test]
    fn trim_is_idempotent() {
        let mut arena = seeded_arena(12);
        for _ in 0..10_000 {
            arena.tick(0.0);
        }
        arena.trim_expired();
        let cacti = arena.cacti().len();
        let birds = arena.birds().len();
        arena.trim_expired();
        assert_eq!(arena.cacti().len(), cacti);
        assert_eq!(arena.birds().len(), birds);
    }

    #[test]
    fn level_stays_zero_below_first_threshold() {
        let mut arena = seeded_arena(13);
        for _ in 0..LEVEL_THRESHOLD - 1 {
            arena.increase_score();
            arena.increase_level();
            assert_eq!(arena.level(), 0);
        }
        arena.increase_score();
        arena.increase_level();
        assert_eq!(arena.level(), 1);
    }

    #[test]
    fn level_rises_one_step_per_check_even_on_overshoot() {
        let mut arena = seeded_arena(14);
        // Score far past several thresholds in one burst.
        for _ in 0..LEVEL_THRESHOLD * 5 {
            arena.increase_score();
        }
        arena.increase_level();
        assert_eq!(arena.level(), 1);
        arena.increase_level();
        assert_eq!(arena.level(), 2);
    }

    #[test]
    fn score_advances_once_per_coarse_interval() {
        let mut arena = seeded_arena(15);
        for _ in 0..TICKS_PER_SCORE * 3 {
            arena.tick(0.0);
        }
        assert_eq!(arena.score(), 3);
    }

    #[test]
    fn high_score_tracks_score_once_beaten() {
        let mut arena = seeded_arena(16);
        arena.high_score = 2;
        arena.increase_score();
        assert_eq!(arena.high_score(), 2);
        arena.increase_score();
        arena.increase_score();
        assert_eq!(arena.high_score(), 3);
    }

    #[test]
    fn same_seed_produces_identical_obstacle_stream() {
        let mut a = seeded_arena(17);
        let mut b = seeded_arena(17);
        for _ in 0..5_000 {
            a.tick(0.0);
            b.tick(0.0);
            assert_eq!(a.cacti(), b.cacti());
            assert_eq!(a.birds(), b.birds());
        }
    }

    #[test]
    fn obstacle_speed_scales_with_level() {
        let mut arena = seeded_arena(18);
        assert_eq!(arena.obstacle_speed(), 5.0);
        arena.level = 4;
        assert_eq!(arena.obstacle_speed(), 7.0);
    }
}
