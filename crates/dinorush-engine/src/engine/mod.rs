//! Arena logic and state management.
//!
//! This module provides the game logic built on top of the [`core`](crate::core)
//! primitives:
//!
//! - [`Agent`] - the controllable runner with its walk/jump/duck state machine
//! - [`Arena`] - the scrolling obstacle course plus scoring and leveling
//! - [`ObstacleSpawner`] - stochastic obstacle arrival process
//! - [`ArenaSeed`] - seed for deterministic arena randomness
//!
//! # Tick Flow
//!
//! One simulation tick proceeds as follows:
//!
//! 1. The controller (human keys or a trainer policy) picks an [`Action`]
//! 2. [`Agent::apply_action`] runs the state machine and integrates physics
//! 3. [`Arena::tick`] scrolls obstacles, trims expired ones, and on the
//!    coarse interval spawns obstacles and advances score and level
//! 4. [`Agent::check_collision`] sweeps the live obstacles
//! 5. [`Agent::collect_reward`] realizes the reward for the transition

pub use self::{agent::*, arena::*, seed::*, spawner::*};

mod agent;
mod arena;
mod seed;
mod spawner;
