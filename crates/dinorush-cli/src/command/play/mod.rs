use std::path::{Path, PathBuf};

use dinorush_training::genetic::Individual;

use crate::{
    command::play::app::PlayApp,
    schema::PolicyModel,
    tui::Tui,
    util,
};

mod app;
mod session;

const FPS: f64 = 60.0;
const DEFAULT_SCORE_FILE: &str = "./data/high_score.txt";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ManualPlayArg {
    /// Path of the persisted high score
    #[clap(long)]
    score_file: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Path to the trained policy model (JSON format)
    model_path: PathBuf,
    /// Path of the persisted high score
    #[clap(long)]
    score_file: Option<PathBuf>,
}

fn score_path(score_file: Option<&PathBuf>) -> PathBuf {
    score_file
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE_FILE))
}

pub(crate) fn run_manual(arg: &ManualPlayArg) -> anyhow::Result<()> {
    let score_file = score_path(arg.score_file.as_ref());
    let high_score = util::read_high_score(&score_file)?;

    let mut app = PlayApp::manual(high_score);
    Tui::with_tick_rate(FPS).run(&mut app)?;

    persist_high_score(&score_file, app.high_score());
    Ok(())
}

pub(crate) fn run_auto(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let score_file = score_path(arg.score_file.as_ref());
    let high_score = util::read_high_score(&score_file)?;

    let model: PolicyModel = util::read_json_file("policy model", &arg.model_path)?;
    eprintln!(
        "Loaded policy {:?} (fitness {:.3}, trained {})",
        model.name, model.final_fitness, model.trained_at
    );
    let policy = Individual::from_weights(model.weights);

    let mut app = PlayApp::auto(policy, high_score);
    Tui::with_tick_rate(FPS).run(&mut app)?;

    persist_high_score(&score_file, app.high_score());
    Ok(())
}

/// A session worth recording should never be lost to a write error, so
/// failures are reported and swallowed.
fn persist_high_score(path: &Path, score: u32) {
    if let Err(err) = util::write_high_score(path, score) {
        eprintln!("Warning: high score not saved: {err:#}");
    }
}
