use criterion::{criterion_group, criterion_main, Criterion, black_box};
use gametree::board::{all_destinations, destinations_for_fen, Position, START_FEN};

const FENS: [(&str, &str); 3] = [
    ("startpos", START_FEN),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    for (name, fen) in FENS {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_function(format!("dests_{}", name), |b| b.iter(|| black_box(all_destinations(black_box(&pos)))));
        group.bench_function(format!("parse_and_dests_{}", name), |b| b.iter(|| black_box(destinations_for_fen(black_box(fen)).unwrap())));
    }
    group.finish();
}

criterion_group!(benches, bench_movegen);
criterion_main!(benches);
