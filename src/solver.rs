use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::heuristic::HeuristicTable;
use crate::last_layer::solve_last_layer;
use crate::moves::{simplify, Move};
use crate::search::{Search, SearchConfig, SearchStats, SearchStatus};

/// Solver options.
///
/// * `pass1_iters`, `pass1_exploration`: budget and UCB exploration constant of the wide first pass
/// * `pass2_iters`, `pass2_exploration`: the same for the greedier second pass, which continues the first pass's tree
/// * `wildcard`, `sequence_depth`: the sequence hash the heuristic table is built with
/// * `seed`: seed of the rollouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub pass1_iters: usize,
    pub pass2_iters: usize,
    pub pass1_exploration: f64,
    pub pass2_exploration: f64,
    pub wildcard: bool,
    pub sequence_depth: usize,
    pub seed: u64,
    pub rollout_depth: usize,
    pub max_depth: usize,
    pub max_nodes: usize,
    pub timeout: Option<Duration>,
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pass1_iters: PASS1_ITERATIONS,
            pass2_iters: PASS2_ITERATIONS,
            pass1_exploration: PASS1_EXPLORATION,
            pass2_exploration: PASS2_EXPLORATION,
            wildcard: true,
            sequence_depth: SEQUENCE_DEPTH,
            seed: 0,
            rollout_depth: ROLLOUT_DEPTH,
            max_depth: MAX_SEARCH_DEPTH,
            max_nodes: MAX_NODES,
            timeout: None,
            cancel: None,
        }
    }
}

impl SolverConfig {
    /// Default options for searching with `table`.
    pub fn for_table(table: &HeuristicTable) -> Self {
        Self {
            wildcard: table.wildcard(),
            sequence_depth: table.depth(),
            ..Default::default()
        }
    }

    /// Fails unless `table` was built with the wildcard mode and depth of this config.
    pub fn check_table(&self, table: &HeuristicTable) -> Result<(), Error> {
        if table.wildcard() != self.wildcard || table.depth() != self.sequence_depth {
            return Err(Error::TableMismatch(format!(
                "table is wildcard {} depth {}, config wants wildcard {} depth {}",
                table.wildcard(),
                table.depth(),
                self.wildcard,
                self.sequence_depth
            )));
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
            rollout_depth: self.rollout_depth,
            seed: self.seed,
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        }
    }
}

/// Result of the Cross and F2L search.
/// * status: `Solved`, `Exhausted` when the passes ran out of budget or tree, `Interrupted` by the
///   deadline, the cancel flag or the node budget.
/// * solved: whether Cross and F2L are solved by `moves`.
/// * moves: the solving moves, or the path to the closest state found.
/// * final_state: the cube after `moves`.
/// * solve_time: time of the search (not including building the tables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub solved: bool,
    pub moves: Vec<Move>,
    pub final_state: CubieCube,
    pub stats: SearchStats,
    pub solve_time: Duration,
}

/// A complete CFOP solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfopSolution {
    pub f2l: SearchResult,
    /// OLL, PLL and AUF moves, empty when F2L was not solved.
    pub last_layer: Vec<Move>,
    /// F2L and last layer moves with successive turns of a face merged.
    pub solution: Vec<Move>,
    pub solved: bool,
    pub final_state: CubieCube,
    pub solve_time: Duration,
}

/// Search Cross and F2L of `state` with the default options and the given pass budgets.
///
/// # Examples
/// ```rust,no_run
/// use cfop::heuristic::HeuristicTable;
/// use cfop::scramble::scramble;
/// use cfop::solver::cfop_solve;
///
/// fn main() {
///     let table = HeuristicTable::load_or_create("tables", true, 4).unwrap();
///     let scrambled = scramble(20, Some(1));
///     let result = cfop_solve(&table, scrambled.state, 50_000, 100_000).unwrap();
///     println!("{} {:?} ({:?})", result.solved, result.moves, result.solve_time);
/// }
/// ```
pub fn cfop_solve(
    table: &HeuristicTable,
    state: CubieCube,
    pass1_iters: usize,
    pass2_iters: usize,
) -> Result<SearchResult, Error> {
    let config = SolverConfig {
        pass1_iters,
        pass2_iters,
        ..SolverConfig::for_table(table)
    };
    cfop_solve_with(table, state, &config)
}

/// Search Cross and F2L of `state`: a wide first pass, then a greedy second pass on the same tree.
///
/// `table` must have been built with the config's `wildcard` and `sequence_depth`.
pub fn cfop_solve_with(
    table: &HeuristicTable,
    state: CubieCube,
    config: &SolverConfig,
) -> Result<SearchResult, Error> {
    config.check_table(table)?;
    let start_time = Instant::now();
    let mut search = Search::new(table, state, config.search_config())?;
    let mut status = search.run(config.pass1_iters, config.pass1_exploration);
    if status == SearchStatus::Pass1 {
        status = search.run(config.pass2_iters, config.pass2_exploration);
    }
    let (solved, moves, final_state) = search.finish();
    let stats = search.stats();
    let solve_time = start_time.elapsed();
    info!(
        "F2L search {:?}: {} moves, {} nodes, {} iterations, {:?}",
        status,
        moves.len(),
        stats.nodes,
        stats.iterations,
        solve_time
    );
    Ok(SearchResult {
        status,
        solved,
        moves,
        final_state,
        stats,
        solve_time,
    })
}

/// Solve the whole cube: Cross and F2L by search, then the last layer from the algorithm library.
///
/// When the search does not finish F2L the solution holds the path to the closest state found and
/// `solved` is false.
pub fn solve(
    table: &HeuristicTable,
    state: CubieCube,
    config: &SolverConfig,
) -> Result<CfopSolution, Error> {
    let start_time = Instant::now();
    let f2l = cfop_solve_with(table, state, config)?;
    let (last_layer, final_state) = if f2l.solved {
        solve_last_layer(&f2l.final_state)?
    } else {
        (Vec::new(), f2l.final_state)
    };
    let mut moves = f2l.moves.clone();
    moves.extend_from_slice(&last_layer);
    let solution = simplify(&moves);
    Ok(CfopSolution {
        solved: f2l.solved && final_state.is_solved(),
        f2l,
        last_layer,
        solution,
        final_state,
        solve_time: start_time.elapsed(),
    })
}

/// Solve a cube given by its facelet string, see [crate::facelet::FaceCube].
pub fn solve_facelets(
    table: &HeuristicTable,
    cubestring: &str,
    config: &SolverConfig,
) -> Result<CfopSolution, Error> {
    let state = CubieCube::try_from(cubestring)?;
    solve(table, state, config)
}
