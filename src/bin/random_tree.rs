use anyhow::{Context, Result};
use clap::Parser;
use gametree::board::cozy;
use gametree::{MoveOptions, Path, TreeStore};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "random_tree", about = "Grow a random game tree and report its shape")]
struct Args {
    /// Number of random lines to play
    #[arg(long, default_value_t = 8)]
    lines: usize,
    /// Plies per line
    #[arg(long, default_value_t = 40)]
    max_plies: usize,
    /// Chance that a line branches off the main line instead of starting at the root
    #[arg(long, default_value_t = 0.5)]
    branch: f64,
    /// RNG seed
    #[arg(long, default_value_t = 1u64)]
    seed: u64,
    /// Starting FEN (defaults to the standard position)
    #[arg(long)]
    fen: Option<String>,
    /// Print the session snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    let mut store = TreeStore::new();
    if let Some(fen) = args.fen.as_deref() { store.set_start_fen(fen).context("starting FEN")?; }

    for _ in 0..args.lines {
        store.go_to_start();
        if rng.gen_bool(args.branch.clamp(0.0, 1.0)) {
            store.go_to_end();
            let len = store.position().len();
            if len > 0 {
                let cut = rng.gen_range(0..len);
                store.go_to_move(&Path::from(vec![0; cut]));
            }
        }
        for _ in 0..args.max_plies {
            let board = store.current_board()?;
            let moves = cozy::legal_moves(&board);
            let Some(&mv) = moves.choose(&mut rng) else { break };
            store.make_move(mv, MoveOptions::default())?;
        }
    }

    let stats = store.stats();
    println!("nodes: {} lines: {} depth: {} result: {}", stats.total, stats.leaves, stats.depth, store.headers().result());
    if args.json {
        println!("{}", store.state().to_json()?);
    }
    Ok(())
}
