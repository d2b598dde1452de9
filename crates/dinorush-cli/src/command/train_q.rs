use std::{fs, path::PathBuf};

use chrono::Utc;
use dinorush_engine::ArenaSeed;
use dinorush_stats::descriptive::DescriptiveStats;
use dinorush_training::qlearning::{QLearner, QLearningConfig};
use rand::Rng as _;

use crate::{
    schema::QTableCheckpoint,
    util::{Output, read_json_file},
};

/// Ticks an episode may run before it is cut off.
const TICK_LIMIT: u64 = 100_000;
/// Episodes between progress reports.
const REPORT_INTERVAL: u64 = 100;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainQArg {
    /// Name recorded in saved checkpoints
    #[arg(long, default_value = "tabular-q")]
    name: String,
    /// Number of episodes to train for
    #[arg(long, default_value_t = 10_000)]
    episodes: u64,
    /// Episodes between checkpoint snapshots
    #[arg(long, default_value_t = 500)]
    checkpoint_interval: u64,
    /// Directory for periodic checkpoint snapshots
    #[arg(long, default_value = "./data/checkpoints")]
    checkpoint_dir: PathBuf,
    /// Checkpoint to resume training from
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Output file path for the final table (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    alpha: f32,
    /// Discount factor
    #[arg(long, default_value_t = 0.95)]
    gamma: f32,
    /// Probability of a uniformly random action
    #[arg(long, default_value_t = 0.01)]
    exploration: f32,
}

pub(crate) fn run(arg: &TrainQArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        arg.checkpoint_interval > 0,
        "checkpoint interval must be positive"
    );
    let config = QLearningConfig {
        alpha: arg.alpha,
        gamma: arg.gamma,
        exploration: arg.exploration,
    };

    let (mut learner, episodes_before) = match &arg.resume {
        Some(path) => {
            let checkpoint: QTableCheckpoint = read_json_file("checkpoint", path)?;
            eprintln!(
                "Resuming {:?} after {} episodes ({} states)",
                checkpoint.name,
                checkpoint.episodes,
                checkpoint.entries.len(),
            );
            (
                QLearner::with_table(config, checkpoint.table()),
                checkpoint.episodes,
            )
        }
        None => (QLearner::new(config), 0),
    };

    let mut rng = rand::rng();
    let mut recent_ticks = Vec::new();
    let mut best_score = 0;

    for episode in 1..=arg.episodes {
        let seed: ArenaSeed = rng.random();
        let outcome = learner.run_episode(seed, TICK_LIMIT, &mut rng);
        #[expect(clippy::cast_precision_loss)]
        recent_ticks.push(outcome.ticks as f32);
        best_score = best_score.max(outcome.score);

        if episode % REPORT_INTERVAL == 0 {
            let stats = DescriptiveStats::new(recent_ticks.drain(..)).unwrap();
            eprintln!(
                "Episode #{}: survival min {:.0} / median {:.0} / max {:.0} ticks, \
                 best score {}, {} states",
                episodes_before + episode,
                stats.min,
                stats.median,
                stats.max,
                best_score,
                learner.table().len(),
            );
        }

        if episode % arg.checkpoint_interval == 0 {
            write_checkpoint(arg, &learner, episodes_before + episode);
        }
    }

    let total_episodes = episodes_before + arg.episodes;
    let checkpoint = snapshot(&arg.name, &learner, total_episodes);
    Output::save_json(&checkpoint, arg.output.clone())?;

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Episodes: {total_episodes}");
    eprintln!("  States visited: {}", checkpoint.entries.len());
    eprintln!("  Best score: {best_score}");

    Ok(())
}

fn snapshot(name: &str, learner: &QLearner, episodes: u64) -> QTableCheckpoint {
    QTableCheckpoint {
        name: name.to_owned(),
        trained_at: Utc::now(),
        episodes,
        config: learner.config(),
        entries: learner.table().to_entries(),
    }
}

/// Checkpoints are best-effort: a failed write loses the snapshot, not
/// the training run.
fn write_checkpoint(arg: &TrainQArg, learner: &QLearner, episodes: u64) {
    let path = arg
        .checkpoint_dir
        .join(format!("{}-{episodes:06}.json", arg.name));
    let result = fs::create_dir_all(&arg.checkpoint_dir)
        .map_err(anyhow::Error::from)
        .and_then(|()| {
            Output::save_json(&snapshot(&arg.name, learner, episodes), Some(path.clone()))
        });
    match result {
        Ok(()) => eprintln!("Checkpoint saved: {}", path.display()),
        Err(err) => eprintln!("Warning: checkpoint not saved: {err:#}"),
    }
}
