use octoblast_engine::{Board, Piece, canonical_pieces};
use octoblast_planner::{BATCH_SIZE, TrioPlanner};
use octoblast_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use rand::{SeedableRng as _, rngs::StdRng, seq::IndexedRandom as _};

const HISTOGRAM_BINS: usize = 8;
const HISTOGRAM_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[arg(long, default_value_t = 3)]
    games: usize,
    /// Maximum batches per game
    #[arg(long, default_value_t = 10)]
    max_rounds: usize,
    /// Seed for piece draws and rollouts; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let planner = TrioPlanner::new();
    let catalog = canonical_pieces();

    let mut rounds_survived = Vec::with_capacity(arg.games);
    let mut lines_cleared = Vec::with_capacity(arg.games);
    for game in 0..arg.games {
        let mut board = Board::EMPTY;
        let mut rounds = 0_usize;
        let mut lines = 0_usize;
        for _ in 0..arg.max_rounds {
            let mut batch = [Piece::from_ascii("#"); BATCH_SIZE];
            for slot in &mut batch {
                *slot = *catalog.choose(&mut rng).expect("catalog is never empty");
            }
            let Some(sequence) = planner.best_trio(board, &batch, &mut rng) else {
                break;
            };
            board = sequence.final_board();
            lines += sequence.total_cleared_lines();
            rounds += 1;
        }
        eprintln!("game {}: survived {rounds} rounds, cleared {lines} lines", game + 1);
        rounds_survived.push(rounds as f64);
        lines_cleared.push(lines as f64);
    }

    println!();
    print_summary("rounds survived", &rounds_survived);
    print_summary("lines cleared", &lines_cleared);

    if let Some(histogram) = Histogram::new(rounds_survived.iter().copied(), HISTOGRAM_BINS) {
        println!();
        println!("rounds survived distribution:");
        print_histogram(&histogram);
    }
    Ok(())
}

fn print_summary(label: &str, values: &[f64]) {
    let Some(stats) = DescriptiveStats::new(values.iter().copied()) else {
        return;
    };
    println!(
        "{label}: mean {:.2}, median {:.1}, min {:.0}, max {:.0}, std dev {:.2}",
        stats.mean, stats.median, stats.min, stats.max, stats.std_dev
    );
}

fn print_histogram(histogram: &Histogram) {
    let max_count = histogram.max_count().max(1);
    for bin in histogram.bins() {
        let bar_width = bin.count * HISTOGRAM_BAR_WIDTH / max_count;
        println!(
            "{:>6.1}..{:<6.1} | {:<4} {}",
            bin.lower,
            bin.upper,
            bin.count,
            "#".repeat(bar_width)
        );
    }
}
