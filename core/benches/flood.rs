use criterion::{Criterion, criterion_group, criterion_main};
use minesweep_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

fn flood_empty_board(c: &mut Criterion) {
    c.bench_function("flood 256x256 empty", |b| {
        b.iter(|| {
            let grid = MineGrid::new_empty(256, 256, 0).unwrap().into_shared();
            let mut state = RevealState::new(grid);
            black_box(state.uncover(128, 128).unwrap())
        })
    });
}

fn flood_sparse_board(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut grid = MineGrid::new_empty(128, 128, 400).unwrap();
    grid.populate_with_rng(64, 64, &mut rng).unwrap();

    c.bench_function("flood 128x128 sparse", |b| {
        b.iter(|| {
            let mut state = RevealState::new(grid.clone().into_shared());
            black_box(state.uncover(64, 64).unwrap())
        })
    });
}

fn populate(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut grid = MineGrid::new_empty(30, 16, 99).unwrap();

    c.bench_function("populate 30x16/99", |b| {
        b.iter(|| grid.populate_with_rng(0, 0, &mut rng).unwrap())
    });
}

criterion_group!(benches, flood_empty_board, flood_sparse_board, populate);
criterion_main!(benches);
