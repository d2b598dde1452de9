//! Statistical summaries for training progress reporting.
//!
//! The trainers print per-generation and per-episode summaries; this crate
//! provides the descriptive statistics (min, max, mean, median, dispersion)
//! those summaries are built from.
//!
//! # Example
//!
//! ```
//! use dinorush_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [12.0, -100.0, 55.0, 3.0, 55.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.min, -100.0);
//! assert_eq!(stats.max, 55.0);
//! assert_eq!(stats.mean, 5.0);
//! ```

pub mod descriptive;
