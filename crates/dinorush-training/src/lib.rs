//! Training algorithms for the dinorush arena.
//!
//! Two independent trainers consume the simulation in
//! [`dinorush_engine`]:
//!
//! - [`genetic`] - evolves a population of linear-softmax policies
//!   ([`weights::WeightMatrix`] individuals) by elitism, fitness-weighted
//!   crossover, and Gaussian-resample mutation
//! - [`qlearning`] - a single tabular Q-learning agent over the
//!   [`discretize`] state space, updated every tick
//!
//! Both read the environment through [`features`] (continuous vector for
//! the GA) or [`discretize`] (finite tuple for the Q-table).

pub mod discretize;
pub mod features;
pub mod genetic;
pub mod qlearning;
pub mod weights;
