use anyhow::{Context, Result};
use clap::Parser;
use gametree::board::{destinations, destinations_for_fen, Dests, Position, Square, START_FEN};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};

#[derive(Parser, Debug)]
#[command(name = "hints", about = "Pseudo-legal move hints for exercise positions")]
struct Args {
    /// FEN string or "startpos" (ignored with --file)
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// File with one FEN per line; '#' starts a comment line
    #[arg(long)]
    file: Option<std::path::PathBuf>,
    /// Only report destinations of the piece on this square
    #[arg(long)]
    square: Option<String>,
    /// Worker threads for --file (defaults to GAMETREE_THREADS or 1)
    #[arg(long)]
    threads: Option<usize>,
    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Serialize)]
struct Line<'a> {
    fen: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dests: Option<Dests>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn env_parse_usize(name: &str) -> Option<usize> { std::env::var(name).ok().and_then(|s| s.parse().ok()) }

fn hints_for(fen: &str, square: Option<Square>) -> gametree::Result<Dests> {
    match square {
        None => destinations_for_fen(fen),
        Some(sq) => {
            let pos = Position::from_fen(fen)?;
            let d = destinations(&pos, sq);
            Ok(if d.is_empty() { Dests::new() } else { Dests::from([(sq, d)]) })
        }
    }
}

fn render(fen: &str, square: Option<Square>) -> Result<String> {
    let line = match hints_for(fen, square) {
        Ok(d) => Line { fen, dests: Some(d), error: None },
        Err(e) => Line { fen, dests: None, error: Some(e.to_string()) },
    };
    serde_json::to_string(&line).context("encode hint line")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let square = args.square.as_deref().map(|s| s.parse::<Square>()).transpose().context("parse --square")?;

    let Some(path) = args.file.as_ref() else {
        let fen = if args.fen == "startpos" { START_FEN } else { args.fen.as_str() };
        println!("{}", render(fen, square)?);
        return Ok(());
    };

    let f = std::fs::File::open(path).with_context(|| format!("open FEN file: {}", path.display()))?;
    let fens: Vec<String> = BufReader::new(f)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .context("read FEN file")?
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let threads = args.threads.or_else(|| env_parse_usize("GAMETREE_THREADS")).unwrap_or(1).max(1);
    let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(fens.len() as u64) };
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} positions {elapsed}").context("progress template")?);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().context("thread pool")?;
    let lines: Vec<String> = pool.install(|| {
        fens.par_iter()
            .map(|fen| {
                let out = render(fen, square);
                pb.inc(1);
                out
            })
            .collect::<Result<Vec<_>>>()
    })?;
    pb.finish_and_clear();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for l in lines { writeln!(out, "{l}")?; }
    Ok(())
}
