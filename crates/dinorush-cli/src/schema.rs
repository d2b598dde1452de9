//! On-disk JSON documents produced by the trainers.

use chrono::{DateTime, Utc};
use dinorush_engine::Action;
use dinorush_training::{
    discretize::DiscreteState,
    qlearning::{QLearningConfig, QTable},
    weights::WeightMatrix,
};
use serde::{Deserialize, Serialize};

/// A trained genetic-algorithm policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub weights: WeightMatrix,
}

/// A Q-table snapshot, written periodically during training and loadable
/// to resume or play.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QTableCheckpoint {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub episodes: u64,
    pub config: QLearningConfig,
    pub entries: Vec<(DiscreteState, [f32; Action::COUNT])>,
}

impl QTableCheckpoint {
    pub fn table(&self) -> QTable {
        QTable::from_entries(self.entries.clone())
    }
}
