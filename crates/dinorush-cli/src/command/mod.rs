use clap::{Parser, Subcommand};

use self::{
    play::{AutoPlayArg, ManualPlayArg},
    train_ga::TrainGaArg,
    train_q::TrainQArg,
};

mod play;
mod train_ga;
mod train_q;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play with the keyboard
    #[command(name = "play")]
    ManualPlay(#[clap(flatten)] ManualPlayArg),
    /// Watch a trained policy play
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Train a policy with the genetic algorithm
    TrainGa(#[clap(flatten)] TrainGaArg),
    /// Train the tabular Q-learning agent
    TrainQ(#[clap(flatten)] TrainQArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args
        .mode
        .unwrap_or(Mode::ManualPlay(ManualPlayArg::default()))
    {
        Mode::ManualPlay(arg) => play::run_manual(&arg)?,
        Mode::AutoPlay(arg) => play::run_auto(&arg)?,
        Mode::TrainGa(arg) => train_ga::run(&arg)?,
        Mode::TrainQ(arg) => train_q::run(&arg)?,
    }
    Ok(())
}
