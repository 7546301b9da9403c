use clap::{Parser, Subcommand};

mod pieces;
mod plan;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// List the canonical piece catalog with indices
    Pieces,
    /// Plan the best placement sequence for a batch of three pieces
    Plan(plan::PlanArg),
    /// Play headless games with the planner and report statistics
    Simulate(simulate::SimulateArg),
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Pieces => pieces::run(),
        Mode::Plan(arg) => plan::run(&arg),
        Mode::Simulate(arg) => simulate::run(&arg),
    }
}
