//! Tabular one-step Q-learning over the discretized arena state.
//!
//! A single agent plays a single environment; the value table is the only
//! state that survives an episode boundary. Every tick applies the standard
//! update
//!
//! ```text
//! Q[s,a] += alpha * (r + gamma * max Q[s',·] - Q[s,a])
//! ```
//!
//! with an epsilon-greedy behavior policy. Unvisited states read as all
//! zeros; entries are materialized on first write.

use std::collections::HashMap;

use dinorush_engine::{Action, Agent, Arena, ArenaSeed};
use rand::Rng;

use crate::{
    discretize::{DiscreteState, discretize},
    weights::argmax,
};

/// Learning parameters for the tabular Q-learner.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QLearningConfig {
    /// Learning rate (step size of each update).
    pub alpha: f32,
    /// Discount factor applied to the successor state's value.
    pub gamma: f32,
    /// Probability of taking a uniformly random action instead of the
    /// greedy one.
    pub exploration: f32,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.95,
            exploration: 0.01,
        }
    }
}

/// The action-value table, keyed by discretized state.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<DiscreteState, [f32; Action::COUNT]>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states visited so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Action values for a state; all zeros when unvisited.
    #[must_use]
    pub fn action_values(&self, state: DiscreteState) -> [f32; Action::COUNT] {
        self.values.get(&state).copied().unwrap_or_default()
    }

    /// The greedy action for a state (first action on ties).
    #[must_use]
    pub fn greedy_action(&self, state: DiscreteState) -> Action {
        Action::from_index(argmax(&self.action_values(state))).unwrap()
    }

    /// Value of the best action available in a state.
    #[must_use]
    pub fn max_value(&self, state: DiscreteState) -> f32 {
        self.action_values(state)
            .into_iter()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Dumps the table as an entry list for checkpointing.
    ///
    /// Hash-map key order is arbitrary; entries are sorted by state so that
    /// identical tables serialize identically.
    #[must_use]
    pub fn to_entries(&self) -> Vec<(DiscreteState, [f32; Action::COUNT])> {
        let mut entries: Vec<_> = self.values.iter().map(|(s, v)| (*s, *v)).collect();
        entries.sort_by_key(|(s, _)| {
            (s.speed, s.locomotion, s.distance, s.spacing, s.width, s.height)
        });
        entries
    }

    /// Rebuilds a table from a checkpoint entry list.
    #[must_use]
    pub fn from_entries(entries: Vec<(DiscreteState, [f32; Action::COUNT])>) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }
}

/// Summary of one finished episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeOutcome {
    /// Ticks survived before the crash (or the cutoff).
    pub ticks: u64,
    /// Total reward accumulated over the episode.
    pub total_reward: f32,
    /// Final arena score.
    pub score: u32,
}

/// Drives episodes and updates the value table in place.
#[derive(Debug, Clone)]
pub struct QLearner {
    table: QTable,
    config: QLearningConfig,
}

impl QLearner {
    #[must_use]
    pub fn new(config: QLearningConfig) -> Self {
        Self {
            table: QTable::new(),
            config,
        }
    }

    /// Resumes learning from a previously checkpointed table.
    #[must_use]
    pub fn with_table(config: QLearningConfig, table: QTable) -> Self {
        Self { table, config }
    }

    #[must_use]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> QLearningConfig {
        self.config
    }

    /// Epsilon-greedy action selection.
    pub fn select_action<R>(&self, state: DiscreteState, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(f64::from(self.config.exploration)) {
            Action::from_index(rng.random_range(0..Action::COUNT)).unwrap()
        } else {
            self.table.greedy_action(state)
        }
    }

    /// Applies one Bellman update and returns the applied delta.
    ///
    /// The delta is exactly zero when the current estimate already equals
    /// the bootstrapped target.
    pub fn update(
        &mut self,
        state: DiscreteState,
        action: Action,
        reward: f32,
        next_state: DiscreteState,
    ) -> f32 {
        let target = reward + self.config.gamma * self.table.max_value(next_state);
        let values = self.table.values.entry(state).or_default();
        let delta = self.config.alpha * (target - values[action.index()]);
        values[action.index()] += delta;
        delta
    }

    /// Plays one episode against a fresh arena seeded by `seed`.
    ///
    /// The episode ends on crash or after `tick_limit` ticks; the table
    /// carries over to the next episode unchanged.
    pub fn run_episode<R>(&mut self, seed: ArenaSeed, tick_limit: u64, rng: &mut R) -> EpisodeOutcome
    where
        R: Rng + ?Sized,
    {
        let mut arena = Arena::with_seed(seed, 0);
        let mut agent = Agent::default();
        let mut ticks = 0;

        while ticks < tick_limit && !agent.has_crashed() {
            let state = discretize(&arena, &agent);
            let action = self.select_action(state, rng);
            agent.apply_action(action);
            arena.tick(0.0);
            agent.check_collision(arena.obstacles());
            let reward = agent.collect_reward();
            let next_state = discretize(&arena, &agent);
            self.update(state, action, reward, next_state);
            ticks += 1;
        }

        EpisodeOutcome {
            ticks,
            total_reward: agent.total_reward(),
            score: arena.score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn state(distance: i8) -> DiscreteState {
        DiscreteState {
            speed: 0,
            locomotion: 0,
            distance,
            spacing: -1,
            width: 0,
            height: 0,
        }
    }

    #[test]
    fn unvisited_states_read_as_zero() {
        let table = QTable::new();
        assert_eq!(table.action_values(state(0)), [0.0; Action::COUNT]);
        assert_eq!(table.greedy_action(state(0)), Action::NoOp);
        assert_eq!(table.max_value(state(0)), 0.0);
    }

    #[test]
    fn update_moves_value_toward_target() {
        let mut learner = QLearner::new(QLearningConfig {
            alpha: 0.5,
            gamma: 0.0,
            exploration: 0.0,
        });
        let delta = learner.update(state(0), Action::LowJump, 10.0, state(1));
        assert_eq!(delta, 5.0);
        assert_eq!(
            learner.table().action_values(state(0))[Action::LowJump.index()],
            5.0
        );
    }

    #[test]
    fn update_is_a_no_op_when_estimate_matches_target() {
        let mut learner = QLearner::new(QLearningConfig {
            alpha: 0.5,
            gamma: 0.5,
            exploration: 0.0,
        });
        // Seed Q[s', NoOp] = 4, then make Q[s, Duck] equal its target
        // r + gamma * 4 = 3 + 2 = 5.
        learner.update(state(1), Action::NoOp, 8.0, state(2));
        assert_eq!(learner.table().max_value(state(1)), 4.0);
        learner.update(state(0), Action::Duck, 10.0, state(1));
        assert_eq!(
            learner.table().action_values(state(0))[Action::Duck.index()],
            6.0
        );
        let delta = learner.update(state(0), Action::Duck, 4.0, state(1));
        assert_eq!(delta, 0.0);
        assert_eq!(
            learner.table().action_values(state(0))[Action::Duck.index()],
            6.0
        );
    }

    #[test]
    fn zero_exploration_always_picks_the_greedy_action() {
        let mut learner = QLearner::new(QLearningConfig {
            alpha: 1.0,
            gamma: 0.0,
            exploration: 0.0,
        });
        learner.update(state(0), Action::HighJump, 100.0, state(1));
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(learner.select_action(state(0), &mut rng), Action::HighJump);
        }
    }

    #[test]
    fn full_exploration_reaches_every_action() {
        let learner = QLearner::new(QLearningConfig {
            alpha: 0.1,
            gamma: 0.9,
            exploration: 1.0,
        });
        let mut rng = Pcg32::seed_from_u64(2);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[learner.select_action(state(0), &mut rng).index()] = true;
        }
        assert_eq!(seen, [true; Action::COUNT]);
    }

    #[test]
    fn episode_ends_on_crash_and_table_persists() {
        let mut learner = QLearner::new(QLearningConfig::default());
        let mut rng = Pcg32::seed_from_u64(3);
        let seed = ArenaSeed::from_bytes([7; 16]);
        let outcome = learner.run_episode(seed, 1_000_000, &mut rng);
        assert!(outcome.ticks > 0);
        assert!(!learner.table().is_empty());
        let states_after_first = learner.table().len();
        learner.run_episode(seed, 1_000_000, &mut rng);
        assert!(learner.table().len() >= states_after_first);
    }

    #[test]
    fn entry_round_trip_preserves_the_table() {
        let mut learner = QLearner::new(QLearningConfig::default());
        learner.update(state(0), Action::NoOp, 1.0, state(1));
        learner.update(state(1), Action::Duck, -3.0, state(2));
        let entries = learner.table().to_entries();
        let restored = QTable::from_entries(entries);
        assert_eq!(restored.action_values(state(0)), learner.table().action_values(state(0)));
        assert_eq!(restored.action_values(state(1)), learner.table().action_values(state(1)));
        assert_eq!(restored.len(), learner.table().len());
    }
}
