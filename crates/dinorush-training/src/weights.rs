//! Weight matrices and the genetic operators that recombine them.
//!
//! A GA individual is a dense `[num_actions x num_features]` matrix; a
//! policy scores each action as the dot product of the matching row with
//! the feature vector. Four structurally different crossover operators are
//! provided and one is drawn uniformly per child, so recombination can
//! exchange whole action rows, whole feature columns, arbitrary element
//! subsets, or blend the two parents additively.
//!
//! Matrices are plain values with copy semantics: crossover reads two
//! parents and writes a fresh child; no weight storage is ever shared
//! between population members.

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_distr::Normal;

/// A dense row-major weight matrix, one row per action.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl WeightMatrix {
    /// Creates a matrix with every weight drawn from the standard normal
    /// distribution.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn random<R>(rows: usize, cols: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(rows > 0 && cols > 0, "weight matrix must be non-empty");
        let normal = Normal::new(0.0, 1.0).unwrap();
        let data = (0..rows * cols).map(|_| normal.sample(rng)).collect();
        Self { rows, cols, data }
    }

    /// Builds a matrix by applying a function to each `(row, col)` index.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        assert!(rows > 0 && cols > 0, "weight matrix must be non-empty");
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Scores every action against a feature vector (`W · features`).
    ///
    /// # Panics
    ///
    /// Panics if the feature length does not match the matrix width; a
    /// mismatched shape is a programmer error, not a runtime condition.
    #[must_use]
    pub fn action_scores(&self, features: &[f32]) -> Vec<f32> {
        assert_eq!(
            self.cols,
            features.len(),
            "weight matrix shape does not match feature vector length"
        );
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.get(row, col) * features[col])
                    .sum()
            })
            .collect()
    }

    /// Applies Gaussian-resample mutation in place.
    ///
    /// Each weight is independently replaced, with probability `rate`, by a
    /// fresh draw from `N(0, sigma)`.
    pub fn mutate<R>(&mut self, rate: f32, sigma: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let normal = Normal::new(0.0, sigma).unwrap();
        for weight in &mut self.data {
            if rng.random_bool(f64::from(rate)) {
                *weight = normal.sample(rng);
            }
        }
    }
}

/// Numerically stable softmax over a score vector.
#[must_use]
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value, first on ties.
#[must_use]
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

/// The four crossover operators, one drawn uniformly per child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverOperator {
    /// Child takes rows `[0, split)` from one parent and the rest from the
    /// other, exchanging whole action policies.
    RowSwap,
    /// Same partition applied to columns, exchanging whole feature
    /// responses.
    ColumnSwap,
    /// Per-weight Bernoulli selection with a mixing probability itself
    /// drawn uniformly per child.
    ElementMask,
    /// `±W1 ± W2` with independently drawn signs.
    SignedAddition,
}

impl Distribution<CrossoverOperator> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CrossoverOperator {
        match rng.random_range(0..4) {
            0 => CrossoverOperator::RowSwap,
            1 => CrossoverOperator::ColumnSwap,
            2 => CrossoverOperator::ElementMask,
            _ => CrossoverOperator::SignedAddition,
        }
    }
}

impl CrossoverOperator {
    /// Crosses two parents into a fresh child matrix.
    ///
    /// # Panics
    ///
    /// Panics if the parents' shapes differ.
    pub fn apply<R>(self, p1: &WeightMatrix, p2: &WeightMatrix, rng: &mut R) -> WeightMatrix
    where
        R: Rng + ?Sized,
    {
        assert_eq!((p1.rows, p1.cols), (p2.rows, p2.cols), "parent shapes differ");
        match self {
            Self::RowSwap => {
                let split = rng.random_range(0..=p1.rows);
                WeightMatrix::from_fn(p1.rows, p1.cols, |row, col| {
                    if row < split { p1.get(row, col) } else { p2.get(row, col) }
                })
            }
            Self::ColumnSwap => {
                let split = rng.random_range(0..=p1.cols);
                WeightMatrix::from_fn(p1.rows, p1.cols, |row, col| {
                    if col < split { p1.get(row, col) } else { p2.get(row, col) }
                })
            }
            Self::ElementMask => {
                let mix = rng.random_range(0.0..=1.0);
                WeightMatrix::from_fn(p1.rows, p1.cols, |row, col| {
                    if rng.random_bool(mix) { p1.get(row, col) } else { p2.get(row, col) }
                })
            }
            Self::SignedAddition => {
                let sign1 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let sign2 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                WeightMatrix::from_fn(p1.rows, p1.cols, |row, col| {
                    sign1 * p1.get(row, col) + sign2 * p2.get(row, col)
                })
            }
        }
    }
}
