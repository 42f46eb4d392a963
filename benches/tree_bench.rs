use criterion::{criterion_group, criterion_main, Criterion, black_box};
use gametree::board::cozy;
use gametree::{MoveOptions, Path, TreeState, TreeStore};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn random_store(lines: usize, plies: usize, seed: u64) -> TreeStore {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut store = TreeStore::new();
    for i in 0..lines {
        store.go_to_move(&Path::from(vec![0; i % 8]));
        for _ in 0..plies {
            let board = store.current_board().unwrap();
            let moves = cozy::legal_moves(&board);
            let Some(&mv) = moves.choose(&mut rng) else { break };
            store.make_move(mv, MoveOptions::default()).unwrap();
        }
    }
    store
}

fn bench_tree(c: &mut Criterion) {
    let store = random_store(32, 40, 7);
    let deep = store.tree().mainline_end(&Path::root()).unwrap();
    let json = store.state().to_json().unwrap();
    let mut group = c.benchmark_group("tree");
    group.bench_function("grow_8x40", |b| b.iter(|| black_box(random_store(8, 40, 11))));
    group.bench_function("stats", |b| b.iter(|| black_box(store.tree().stats())));
    group.bench_function("locate_mainline_end", |b| b.iter(|| black_box(store.tree().locate(black_box(&deep)).unwrap())));
    group.bench_function("snapshot_roundtrip", |b| b.iter(|| black_box(TreeState::from_json(black_box(&json)).unwrap())));
    group.finish();
}

criterion_group!(benches, bench_tree);
criterion_main!(benches);
