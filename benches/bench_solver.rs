use criterion::{criterion_group, criterion_main, Criterion};

use cfop::cubie::CubieCube;
use cfop::heuristic::HeuristicTable;
use cfop::last_layer::solve_last_layer;
use cfop::moves::Move::*;
use cfop::scramble::{scramble, scramble_from_str};
use cfop::solver::{solve, SolverConfig};

fn cc_apply_moves() {
    let cc = CubieCube::default();
    let _ = cc.apply_moves(&[R, U, R3, U3]);
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("CubieCube Moves");
    group.bench_function("apply_moves", |b| b.iter(cc_apply_moves));
    group.bench_function("sticker_position", |b| {
        let cc = scramble(20, Some(1)).state;
        b.iter(|| (0..54).map(|p| cc.sticker_position(p) as u32).sum::<u32>())
    });
    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let table = HeuristicTable::build(true, 3).unwrap();
    let state = scramble(20, Some(2)).state;
    c.bench_function("Heuristic", |b| b.iter(|| table.heuristic(&state)));
}

fn bench_last_layer(c: &mut Criterion) {
    let ll = scramble_from_str("R U R' U R U2 R' F R U R' U' F' U2").unwrap();
    let state = CubieCube::from(&ll);
    c.bench_function("Last layer", |b| b.iter(|| solve_last_layer(&state).unwrap()));
}

fn bench_solver(c: &mut Criterion) {
    let table = HeuristicTable::build(true, 3).unwrap();
    let state = scramble(20, Some(3)).state;
    let config = SolverConfig {
        pass1_iters: 2_000,
        pass2_iters: 2_000,
        ..SolverConfig::for_table(&table)
    };
    let mut group = c.benchmark_group("Solver");
    group.sample_size(10);
    group.bench_function("solve", |b| b.iter(|| solve(&table, state, &config).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_solver, bench_moves, bench_heuristic, bench_last_layer);
criterion_main!(benches);
