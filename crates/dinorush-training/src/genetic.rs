//! Genetic algorithm evolving linear-softmax control policies.
//!
//! Each individual is a `[4 x 7]` weight matrix mapping the arena feature
//! vector to action scores; the policy acts by `argmax(softmax(W · f))`.
//! A generation is evaluated on one shared seeded arena: every individual
//! drives its own agent body against the identical obstacle stream, so
//! fitness differences reflect policy differences rather than spawn luck.
//!
//! Reproduction combines a persistent elite archive with crossover over a
//! parent pool drawn from the top third of the evaluated population:
//!
//! 1. The archive merges the generation's results and keeps the best K
//!    individuals seen so far; those K are copied verbatim into the next
//!    generation.
//! 2. Remaining slots are filled by crossover of two distinct parents
//!    sampled softmax-of-fitness weighted from the pool, using one of the
//!    four operators in [`CrossoverOperator`] chosen uniformly, followed
//!    by Gaussian-resample mutation.
//! 3. A pool with fewer than two members degrades to mutated clones of
//!    the single survivor, or to fresh random matrices when the pool is
//!    empty. Population size never changes.

use dinorush_engine::{Action, Agent, Arena, ArenaSeed};
use dinorush_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    features::{FEATURE_COUNT, state_features},
    weights::{CrossoverOperator, WeightMatrix, argmax, softmax},
};

/// Fraction of the population (denominator) admitted to the parent pool.
const PARENT_POOL_DIVISOR: usize = 3;

/// A single candidate policy: a weight matrix plus its last fitness score.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    weights: WeightMatrix,
    fitness: f32,
}

impl Individual {
    /// Creates an individual with standard-normal random weights and no
    /// fitness yet.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            weights: WeightMatrix::random(Action::COUNT, FEATURE_COUNT, rng),
            fitness: f32::MIN,
        }
    }

    /// Wraps an existing weight matrix (e.g. a loaded trained model) as an
    /// individual with no fitness yet.
    #[must_use]
    pub fn from_weights(weights: WeightMatrix) -> Self {
        Self {
            weights,
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Accumulated reward from the last evaluation; `f32::MIN` before the
    /// first one.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Picks the policy's action for the given feature vector.
    #[must_use]
    pub fn select_action(&self, features: &[f32; FEATURE_COUNT]) -> Action {
        let scores = self.weights.action_scores(features);
        let probabilities = softmax(&scores);
        Action::from_index(argmax(&probabilities)).unwrap()
    }
}

/// A generation's worth of individuals, evaluated together.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of `count` random individuals.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(count > 0, "population must not be empty");
        let individuals = (0..count).map(|_| Individual::random(rng)).collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The fittest individual. Meaningful only after evaluation.
    #[must_use]
    pub fn best(&self) -> &Individual {
        &self.individuals[0]
    }

    /// Evaluates every individual on one shared arena seeded by `seed`.
    ///
    /// All agents face the identical obstacle stream. The run ends when
    /// every agent has crashed or after `tick_limit` ticks; each fitness is
    /// the agent's accumulated reward at that point. Afterwards the
    /// population is sorted by fitness, best first.
    pub fn evaluate_fitness(&mut self, seed: ArenaSeed, tick_limit: u64) {
        let mut arena = Arena::with_seed(seed, 0);
        let mut agents: Vec<Agent> = self.individuals.iter().map(|_| Agent::default()).collect();

        for _ in 0..tick_limit {
            if agents.iter().all(Agent::has_crashed) {
                break;
            }
            let features = state_features(&arena);
            for (individual, agent) in self.individuals.iter().zip(&mut agents) {
                if !agent.has_crashed() {
                    agent.apply_action(individual.select_action(&features));
                }
            }
            arena.tick(0.0);
            for agent in &mut agents {
                if !agent.has_crashed() {
                    agent.check_collision(arena.obstacles());
                    agent.collect_reward();
                }
            }
        }

        for (individual, agent) in self.individuals.iter_mut().zip(&agents) {
            individual.fitness = agent.total_reward();
        }
        self.individuals
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
    }

    /// Fitness distribution of the population, for progress reporting.
    #[must_use]
    pub fn fitness_stats(&self) -> DescriptiveStats {
        DescriptiveStats::new(self.individuals.iter().map(Individual::fitness)).unwrap()
    }
}

/// The best individuals seen across all generations, bounded to a capacity.
#[derive(Debug, Clone)]
pub struct EliteArchive {
    capacity: usize,
    elites: Vec<Individual>,
}

impl EliteArchive {
    /// Creates an empty archive keeping at most `capacity` individuals.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "archive capacity must be positive");
        Self {
            capacity,
            elites: Vec::new(),
        }
    }

    #[must_use]
    pub fn elites(&self) -> &[Individual] {
        &self.elites
    }

    /// The best individual seen so far, if any generation has been merged.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.elites.first()
    }

    /// Merges evaluated individuals, keeping the overall top performers.
    pub fn merge(&mut self, individuals: &[Individual]) {
        self.elites.extend(individuals.iter().cloned());
        self.elites
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
        self.elites.truncate(self.capacity);
    }
}

/// Controls reproduction parameters between generations.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    /// Probability of resampling each weight during mutation.
    pub mutation_rate: f32,
    /// Standard deviation of the resampled weights.
    pub mutation_sigma: f32,
}

impl PopulationEvolver {
    /// Produces the next generation from an evaluated population.
    ///
    /// The archive absorbs the generation first; its elites open the next
    /// generation verbatim and the remaining slots come from crossover over
    /// the top third of `population`. The returned population has the same
    /// size as the input.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not sorted by fitness descending.
    #[must_use]
    pub fn evolve<R>(
        &self,
        population: &Population,
        archive: &mut EliteArchive,
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be evaluated and sorted before evolving"
        );

        archive.merge(&population.individuals);

        let size = population.len();
        let mut next: Vec<Individual> = archive
            .elites()
            .iter()
            .take(size)
            .cloned()
            .collect();

        let pool_size = size.div_ceil(PARENT_POOL_DIVISOR);
        let pool = &population.individuals[..pool_size];
        let pool_probabilities =
            softmax(&pool.iter().map(Individual::fitness).collect::<Vec<_>>());

        while next.len() < size {
            let child = match pool {
                [] => {
                    next.push(Individual::random(rng));
                    continue;
                }
                [only] => {
                    let mut weights = only.weights.clone();
                    weights.mutate(self.mutation_rate, self.mutation_sigma, rng);
                    weights
                }
                _ => {
                    let first = weighted_pick(&pool_probabilities, None, rng);
                    let second = weighted_pick(&pool_probabilities, Some(first), rng);
                    let operator: CrossoverOperator = rng.random();
                    let mut weights =
                        operator.apply(&pool[first].weights, &pool[second].weights, rng);
                    weights.mutate(self.mutation_rate, self.mutation_sigma, rng);
                    weights
                }
            };
            next.push(Individual::from_weights(child));
        }

        Population { individuals: next }
    }
}

/// Draws an index distributed by `probabilities`, optionally excluding one
/// index (renormalizing over the rest).
fn weighted_pick<R>(probabilities: &[f32], exclude: Option<usize>, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let eligible = |i: usize| Some(i) != exclude;
    let total: f32 = probabilities
        .iter()
        .enumerate()
        .filter(|(i, _)| eligible(*i))
        .map(|(_, p)| p)
        .sum();
    if total <= 0.0 {
        // Softmax underflow can zero out every eligible weight.
        return (0..probabilities.len()).find(|i| eligible(*i)).unwrap();
    }
    let mut threshold = rng.random_range(0.0..total);
    let mut last = 0;
    for (i, p) in probabilities.iter().enumerate() {
        if !eligible(i) {
            continue;
        }
        if threshold < *p {
            return i;
        }
        threshold -= p;
        last = i;
    }
    // Floating point underrun lands on the last eligible index.
    last
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn seed(value: u64) -> ArenaSeed {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        ArenaSeed::from_bytes(bytes)
    }

    fn evolver() -> PopulationEvolver {
        PopulationEvolver {
            mutation_rate: 0.1,
            mutation_sigma: 1.0,
        }
    }

    #[test]
    fn evaluation_sorts_population_by_fitness_descending() {
        let mut rng = rng();
        let mut population = Population::random(12, &mut rng);
        population.evaluate_fitness(seed(1), 2_000);
        assert!(
            population
                .individuals()
                .iter()
                .zip(population.individuals().iter().skip(1))
                .all(|(a, b)| a.fitness() >= b.fitness())
        );
        assert_eq!(population.best().fitness(), population.individuals()[0].fitness());
    }

    #[test]
    fn evaluation_is_deterministic_for_a_fixed_seed() {
        let mut rng = rng();
        let population = Population::random(8, &mut rng);
        let mut a = population.clone();
        let mut b = population;
        a.evaluate_fitness(seed(2), 1_000);
        b.evaluate_fitness(seed(2), 1_000);
        for (x, y) in a.individuals().iter().zip(b.individuals()) {
            assert_eq!(x.fitness(), y.fitness());
        }
    }

    #[test]
    fn population_size_is_invariant_across_generations() {
        let mut rng = rng();
        let evolver = evolver();
        let mut archive = EliteArchive::new(3);
        let mut population = Population::random(10, &mut rng);
        for generation in 0..4 {
            population.evaluate_fitness(seed(generation), 500);
            population = evolver.evolve(&population, &mut archive, &mut rng);
            assert_eq!(population.len(), 10);
        }
    }

    #[test]
    fn archive_elites_open_the_next_generation_verbatim() {
        let mut rng = rng();
        let mut archive = EliteArchive::new(2);
        let mut population = Population::random(9, &mut rng);
        population.evaluate_fitness(seed(5), 500);
        let next = evolver().evolve(&population, &mut archive, &mut rng);
        for (slot, elite) in next.individuals().iter().zip(archive.elites()) {
            assert_eq!(slot.weights(), elite.weights());
        }
    }

    #[test]
    fn archive_keeps_only_the_top_k_across_merges() {
        let mut rng = rng();
        let mut archive = EliteArchive::new(2);
        let scored = |fitness: f32, rng: &mut Pcg32| Individual {
            weights: WeightMatrix::random(Action::COUNT, FEATURE_COUNT, rng),
            fitness,
        };
        let first = vec![scored(10.0, &mut rng), scored(5.0, &mut rng)];
        let second = vec![scored(20.0, &mut rng), scored(1.0, &mut rng)];
        archive.merge(&first);
        archive.merge(&second);
        assert_eq!(archive.elites().len(), 2);
        assert_eq!(archive.best().unwrap().fitness(), 20.0);
        assert_eq!(archive.elites()[1].fitness(), 10.0);
    }

    #[test]
    fn single_individual_population_evolves_without_panicking() {
        let mut rng = rng();
        let evolver = evolver();
        let mut archive = EliteArchive::new(1);
        let mut population = Population::random(1, &mut rng);
        population.evaluate_fitness(seed(9), 200);
        let next = evolver.evolve(&population, &mut archive, &mut rng);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn weighted_pick_excludes_the_requested_index() {
        let mut rng = rng();
        let probabilities = [0.98, 0.01, 0.01];
        for _ in 0..200 {
            assert_ne!(weighted_pick(&probabilities, Some(0), &mut rng), 0);
        }
    }

    #[test]
    fn select_action_returns_the_highest_scoring_action() {
        // Row 3 (Duck) dominates every feature, so any feature vector with
        // positive entries must select Duck.
        let weights = WeightMatrix::from_fn(Action::COUNT, FEATURE_COUNT, |row, _| {
            if row == 3 { 10.0 } else { 0.0 }
        });
        let individual = Individual::from_weights(weights);
        let action = individual.select_action(&[1.0; FEATURE_COUNT]);
        assert_eq!(action, Action::Duck);
    }
}
