use std::{fs, path::PathBuf};

use anyhow::Context as _;
use octoblast_engine::{Board, LineKind, Piece, canonical_pieces};
use octoblast_planner::{BATCH_SIZE, TrioPlanner};
use rand::{SeedableRng as _, rngs::StdRng};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlanArg {
    /// ASCII board file ('#' occupied, '.' empty, 8 rows of 8); empty board
    /// when omitted
    #[arg(long)]
    board: Option<PathBuf>,
    /// Catalog indices of the three batch pieces (see `pieces`)
    #[arg(long, value_delimiter = ',', num_args = 3, required = true)]
    pieces: Vec<usize>,
    /// Seed for the rollout random source; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Emit the planned sequence as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &PlanArg) -> anyhow::Result<()> {
    let board = match &arg.board {
        Some(path) => {
            let art = fs::read_to_string(path)
                .with_context(|| format!("failed to read board file {}", path.display()))?;
            art.parse::<Board>()
                .with_context(|| format!("failed to parse board file {}", path.display()))?
        }
        None => Board::EMPTY,
    };

    let catalog = canonical_pieces();
    let mut batch = [Piece::from_ascii("#"); BATCH_SIZE];
    for (slot, &index) in batch.iter_mut().zip(&arg.pieces) {
        *slot = *catalog
            .get(index)
            .with_context(|| format!("piece index {index} out of range (0..{})", catalog.len()))?;
    }

    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let Some(sequence) = TrioPlanner::new().best_trio(board, &batch, &mut rng) else {
        println!("no legal sequence for this batch on this board");
        return Ok(());
    };

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&sequence)?);
        return Ok(());
    }

    for (number, mv) in sequence.moves().iter().enumerate() {
        let cleared: Vec<String> = mv
            .result()
            .cleared_lines()
            .iter()
            .map(|line| match line.kind {
                LineKind::Row => format!("row {}", line.index),
                LineKind::Col => format!("col {}", line.index),
            })
            .collect();
        println!(
            "move {}: batch piece #{} at ({}, {})",
            number + 1,
            mv.batch_index(),
            mv.row(),
            mv.col()
        );
        if cleared.is_empty() {
            println!("  no lines cleared");
        } else {
            println!("  cleared: {}", cleared.join(", "));
        }
        println!("{}", mv.result().board());
        println!();
    }
    println!("total lines cleared: {}", sequence.total_cleared_lines());
    Ok(())
}
