use std::path::PathBuf;

use chrono::Utc;
use dinorush_engine::ArenaSeed;
use dinorush_training::genetic::{EliteArchive, Population, PopulationEvolver};
use rand::Rng as _;

use crate::{schema::PolicyModel, util::Output};

/// Ticks each generation may run before evaluation is cut off.
const TICK_LIMIT: u64 = 20_000;
/// Elites carried verbatim across generations.
const ARCHIVE_CAPACITY: usize = 3;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    fn from_generation(generation: usize) -> Self {
        match generation {
            0..40 => Self::Exploration,
            40..100 => Self::Transition,
            _ => Self::Convergence,
        }
    }

    /// Mutation starts broad and anneals as the population converges.
    const fn evolver(self) -> PopulationEvolver {
        match self {
            Self::Exploration => PopulationEvolver {
                mutation_rate: 0.2,
                mutation_sigma: 1.0,
            },
            Self::Transition => PopulationEvolver {
                mutation_rate: 0.1,
                mutation_sigma: 0.5,
            },
            Self::Convergence => PopulationEvolver {
                mutation_rate: 0.05,
                mutation_sigma: 0.2,
            },
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainGaArg {
    /// Name recorded in the saved model
    #[arg(long, default_value = "linear-softmax")]
    name: String,
    /// Number of generations to evolve
    #[arg(long, default_value_t = 150)]
    generations: usize,
    /// Number of individuals per generation
    #[arg(long, default_value_t = 40)]
    population: usize,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainGaArg) -> anyhow::Result<()> {
    let TrainGaArg {
        name,
        generations,
        population: population_count,
        output,
    } = arg;
    anyhow::ensure!(*generations > 0, "at least one generation is required");

    let mut rng = rand::rng();
    let mut archive = EliteArchive::new(ARCHIVE_CAPACITY);
    let mut population = Population::random(*population_count, &mut rng);

    for generation in 0..*generations {
        let phase = EvolutionPhase::from_generation(generation);
        // Fresh arena seed each generation so elites cannot overfit one
        // obstacle stream.
        let seed: ArenaSeed = rng.random();
        population.evaluate_fitness(seed, TICK_LIMIT);

        let stats = population.fitness_stats();
        eprintln!("Generation #{generation} ({phase:?}):");
        eprintln!(
            "  Fitness: min {:.1} / median {:.1} / mean {:.1} / max {:.1} (stddev {:.1})",
            stats.min, stats.median, stats.mean, stats.max, stats.std_dev,
        );

        if generation + 1 < *generations {
            population = phase.evolver().evolve(&population, &mut archive, &mut rng);
        } else {
            archive.merge(population.individuals());
        }
        if let Some(best) = archive.best() {
            eprintln!("  Best so far: {:.1}", best.fitness());
        }
    }

    let best = archive.best().unwrap();
    let model = PolicyModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness: best.fitness(),
        weights: best.weights().clone(),
    };
    Output::save_json(&model, output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);

    Ok(())
}
