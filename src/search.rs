use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::heuristic::HeuristicTable;
use crate::moves::{is_redundant, Move};

/// Index of a node in the search arena.
pub type NodeId = u32;

const ROOT: NodeId = 0;

/// A node of the search tree.
///
/// Nodes live in one arena and refer to each other by index. The children of a node are created
/// together and occupy `first_child..first_child + child_count`, in move order.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: CubieCube,
    pub parent: Option<NodeId>,
    /// The move leading here from the parent.
    pub mv: Option<Move>,
    pub depth: u16,
    pub visits: u32,
    /// Sum of the rewards backed up through this node.
    pub value: f64,
    pub heuristic: f32,
    /// Reward of the heuristic alone, relative to the root.
    pub reward: f32,
    pub first_child: NodeId,
    pub child_count: u8,
    pub expanded: bool,
    /// No unpruned continuation below this node is left.
    pub dead: bool,
}

impl SearchNode {
    pub fn children(&self) -> std::ops::Range<NodeId> {
        self.first_child..self.first_child + self.child_count as NodeId
    }

    /// Mean backed up reward.
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}

/// Exploitation score of a visited node, the exploration bonus is added by the search.
pub trait Scorer {
    fn score(&self, node: &SearchNode) -> f64;
}

/// Mean backed up reward plus the weighted heuristic reward of the node itself.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    pub weight: f64,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, node: &SearchNode) -> f64 {
        node.mean_value() + self.weight * node.reward as f64
    }
}

/// Reward of a heuristic value: 1 when solved, falling linearly to 0 beyond the root's value.
pub fn reward(h: u32, root_h: u32) -> f32 {
    if h == 0 {
        1.0
    } else {
        (1.0 - h as f32 / (root_h as f32 + 1.0)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    Init,
    Pass1,
    Pass2,
    Solved,
    /// The second pass used its whole budget, or every branch is dead.
    Exhausted,
    /// Stopped early by the deadline, the cancel flag or the node budget.
    Interrupted,
}

/// Limits and randomness of one search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub max_nodes: usize,
    /// Random moves played from each new leaf, 0 disables rollouts.
    pub rollout_depth: usize,
    pub seed: u64,
    pub timeout: Option<Duration>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_SEARCH_DEPTH,
            max_nodes: MAX_NODES,
            rollout_depth: ROLLOUT_DEPTH,
            seed: 0,
            timeout: None,
            cancel: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes in the arena.
    pub nodes: usize,
    /// Nodes visited at least once.
    pub visited: usize,
    pub iterations: usize,
}

/// UCB tree search for a move sequence solving Cross and F2L.
pub struct Search<'a, S: Scorer = HeuristicScorer> {
    table: &'a HeuristicTable,
    nodes: Vec<SearchNode>,
    scorer: S,
    config: SearchConfig,
    rng: StdRng,
    status: SearchStatus,
    root_heuristic: u32,
    /// The node whose path, followed by the finisher, solves Cross and F2L.
    solution: Option<(NodeId, Vec<Move>)>,
    iterations: usize,
    deadline: Option<Instant>,
}

impl<'a> Search<'a, HeuristicScorer> {
    pub fn new(
        table: &'a HeuristicTable,
        state: CubieCube,
        config: SearchConfig,
    ) -> Result<Self, Error> {
        Self::with_scorer(table, state, config, HeuristicScorer::default())
    }
}

impl<'a, S: Scorer> Search<'a, S> {
    pub fn with_scorer(
        table: &'a HeuristicTable,
        state: CubieCube,
        config: SearchConfig,
        scorer: S,
    ) -> Result<Self, Error> {
        state.verify()?;
        let h = table.heuristic(&state);
        let root = SearchNode {
            state,
            parent: None,
            mv: None,
            depth: 0,
            visits: 0,
            value: 0.0,
            heuristic: h as f32,
            reward: reward(h, h),
            first_child: 0,
            child_count: 0,
            expanded: false,
            dead: false,
        };
        let solution = if state.is_cross_f2l_solved() {
            Some((ROOT, Vec::new()))
        } else {
            table.finisher(&state).map(|f| (ROOT, f))
        };
        let status = if solution.is_some() {
            SearchStatus::Solved
        } else {
            SearchStatus::Init
        };
        Ok(Self {
            table,
            nodes: vec![root],
            scorer,
            rng: StdRng::seed_from_u64(config.seed),
            deadline: config.timeout.map(|t| Instant::now() + t),
            config,
            status,
            root_heuristic: h,
            solution,
            iterations: 0,
        })
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id as usize]
    }

    pub fn root(&self) -> &SearchNode {
        self.node(ROOT)
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            nodes: self.nodes.len(),
            visited: self.nodes.iter().filter(|n| n.visits > 0).count(),
            iterations: self.iterations,
        }
    }

    /// Run up to `iterations` more select, expand, evaluate, backup rounds with exploration constant
    /// `exploration`. The first call is pass 1 and leaves the tree for the second call, pass 2, which
    /// ends `Exhausted` if its budget runs out unsolved. A finished search is left untouched.
    pub fn run(&mut self, iterations: usize, exploration: f64) -> SearchStatus {
        self.status = match self.status {
            SearchStatus::Init => SearchStatus::Pass1,
            SearchStatus::Pass1 => SearchStatus::Pass2,
            done => return done,
        };
        info!(
            "{:?}: {} iterations, exploration {}, h(root) = {}",
            self.status, iterations, exploration, self.root_heuristic
        );

        let mut interrupted = false;
        for i in 0..iterations {
            if self.should_stop() {
                interrupted = true;
                break;
            }
            if self.root().dead {
                self.status = SearchStatus::Exhausted;
                break;
            }
            let Some(leaf) = self.select(exploration) else {
                continue;
            };
            self.iterations += 1;
            if self.expand(leaf) {
                self.status = SearchStatus::Solved;
                break;
            }
            if self.node(leaf).dead {
                continue;
            }
            let r = self.rollout(leaf);
            self.backpropagate(leaf, r);

            if (i + 1) % 10_000 == 0 {
                debug!(
                    "{:?} iteration {}: {} nodes, best h {}",
                    self.status,
                    i + 1,
                    self.nodes.len(),
                    self.node(self.best_effort()).heuristic
                );
            }
        }
        if self.status != SearchStatus::Solved {
            if self.root().dead {
                self.status = SearchStatus::Exhausted;
            } else if interrupted {
                self.status = SearchStatus::Interrupted;
            } else if self.status == SearchStatus::Pass2 {
                self.status = SearchStatus::Exhausted;
            }
        }
        info!(
            "{:?} after {} iterations, {} nodes",
            self.status,
            self.iterations,
            self.nodes.len()
        );
        self.status
    }

    fn should_stop(&self) -> bool {
        if let Some(cancel) = &self.config.cancel {
            if cancel.load(Ordering::Relaxed) {
                warn!("search cancelled");
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                warn!("search deadline reached");
                return true;
            }
        }
        if self.nodes.len() + N_MOVE > self.config.max_nodes {
            warn!("node budget of {} reached", self.config.max_nodes);
            return true;
        }
        false
    }

    /// Walk down from the root to an unexpanded node. Nodes found without live children are marked dead.
    fn select(&mut self, exploration: f64) -> Option<NodeId> {
        let mut id = ROOT;
        while self.node(id).expanded {
            match self.best_child(id, exploration) {
                Some(child) => id = child,
                None => {
                    self.mark_dead(id);
                    return None;
                }
            }
        }
        Some(id)
    }

    /// Unvisited children first, in move order, then the highest upper confidence bound.
    fn best_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.node(id);
        let log_visits = (node.visits.max(1) as f64).ln();
        let mut best: Option<(NodeId, f64)> = None;
        for child in node.children() {
            let c = self.node(child);
            if c.dead {
                continue;
            }
            if c.visits == 0 {
                return Some(child);
            }
            let ucb = self.scorer.score(c) + exploration * (log_visits / c.visits as f64).sqrt();
            if best.map_or(true, |(_, b)| ucb > b) {
                best = Some((child, ucb));
            }
        }
        best.map(|(child, _)| child)
    }

    /// A suffix of the path to `id` extended by `child` that the sequence hash can shorten.
    fn is_redundant_path(&self, id: NodeId, child: &CubieCube) -> bool {
        let mut ancestor = id;
        for len in 2..=self.table.depth() {
            match self.node(ancestor).parent {
                Some(parent) => ancestor = parent,
                None => break,
            }
            let mut effect = self.node(ancestor).state.inverse_cubie_cube();
            effect.multiply(*child);
            if self.table.sequence.is_redundant_suffix(&effect, len) {
                return true;
            }
        }
        false
    }

    /// Create the children of `id`. Returns true when one of them finishes Cross and F2L.
    fn expand(&mut self, id: NodeId) -> bool {
        let node = self.node(id).clone();
        if node.depth as usize >= self.config.max_depth {
            self.mark_dead(id);
            return false;
        }

        let first_child = self.nodes.len() as NodeId;
        let mut child_count = 0;
        let mut solved = None;
        for m in ALL_MOVES {
            if is_redundant(node.mv, m) {
                continue;
            }
            let state = node.state.apply_move(m);
            if self.is_redundant_path(id, &state) {
                continue;
            }
            let h = self.table.heuristic(&state);
            let child = first_child + child_count as NodeId;
            self.nodes.push(SearchNode {
                state,
                parent: Some(id),
                mv: Some(m),
                depth: node.depth + 1,
                visits: 0,
                value: 0.0,
                heuristic: h as f32,
                reward: reward(h, self.root_heuristic),
                first_child: 0,
                child_count: 0,
                expanded: false,
                dead: false,
            });
            child_count += 1;
            if solved.is_none() {
                if state.is_cross_f2l_solved() {
                    solved = Some((child, Vec::new()));
                } else if let Some(finisher) = self.table.finisher(&state) {
                    solved = Some((child, finisher));
                }
            }
        }

        let n = &mut self.nodes[id as usize];
        n.first_child = first_child;
        n.child_count = child_count;
        n.expanded = true;
        if child_count == 0 {
            self.mark_dead(id);
        }
        if let Some((child, finisher)) = solved {
            info!(
                "Cross and F2L found at depth {}, finisher {}",
                self.node(child).depth,
                finisher.len()
            );
            self.solution = Some((child, finisher));
            return true;
        }
        false
    }

    /// Best reward seen on a short random walk from `id`.
    fn rollout(&mut self, id: NodeId) -> f64 {
        let node = self.node(id);
        let mut best = node.reward;
        let mut state = node.state;
        let mut last = node.mv;
        for _ in 0..self.config.rollout_depth {
            if best >= 1.0 {
                break;
            }
            let candidates: Vec<Move> = ALL_MOVES
                .into_iter()
                .filter(|&m| !is_redundant(last, m))
                .collect();
            let Some(&m) = candidates.choose(&mut self.rng) else {
                break;
            };
            state = state.apply_move(m);
            last = Some(m);
            best = best.max(reward(self.table.heuristic(&state), self.root_heuristic));
        }
        best as f64
    }

    fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(i) = current {
            let node = &mut self.nodes[i as usize];
            node.visits += 1;
            node.value += reward;
            current = node.parent;
        }
    }

    /// Mark `id` dead, and every ancestor left without a live child.
    fn mark_dead(&mut self, id: NodeId) {
        self.nodes[id as usize].dead = true;
        let mut current = self.node(id).parent;
        while let Some(p) = current {
            let parent = self.node(p);
            if parent.children().any(|c| !self.node(c).dead) {
                break;
            }
            self.nodes[p as usize].dead = true;
            current = self.node(p).parent;
        }
    }

    /// Moves from the root to `id`.
    pub fn path(&self, id: NodeId) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.node(id).depth as usize);
        let mut current = id;
        while let Some(m) = self.node(current).mv {
            moves.push(m);
            match self.node(current).parent {
                Some(p) => current = p,
                None => break,
            }
        }
        moves.reverse();
        moves
    }

    /// The solving sequence, once found.
    pub fn solution(&self) -> Option<Vec<Move>> {
        self.solution.as_ref().map(|(id, finisher)| {
            let mut moves = self.path(*id);
            moves.extend_from_slice(finisher);
            moves
        })
    }

    /// The node with the lowest heuristic, the root only if every other node is further from solved.
    pub fn best_effort(&self) -> NodeId {
        let mut best = ROOT;
        for (i, node) in self.nodes.iter().enumerate().skip(1) {
            let best_h = self.node(best).heuristic;
            if node.heuristic < best_h || (best == ROOT && node.heuristic == best_h) {
                best = i as NodeId;
            }
        }
        best
    }

    /// Whether Cross and F2L were solved, the moves found, and the state they lead to.
    ///
    /// An unsolved search returns the path to its best effort node. That path is empty when no node
    /// below the root reached a heuristic as low as the root's.
    pub fn finish(&self) -> (bool, Vec<Move>, CubieCube) {
        let (solved, moves) = match self.solution() {
            Some(moves) => (true, moves),
            None => (false, self.path(self.best_effort())),
        };
        let final_state = self.root().state.apply_moves(&moves);
        (solved, moves, final_state)
    }
}

#[cfg(test)]
mod test {
    use crate::heuristic::HeuristicTable;
    use crate::moves::Move::*;
    use crate::scramble::scramble;
    use crate::search::*;

    fn small_config() -> SearchConfig {
        SearchConfig {
            max_nodes: 200_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_reward() {
        assert_eq!(reward(0, 10), 1.0);
        assert_eq!(reward(11, 10), 0.0);
        assert_eq!(reward(40, 10), 0.0);
        assert!((reward(5, 9) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_solved_root() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = CubieCube::default().apply_moves(&[U, R, U3, R3]);
        let mut search = Search::new(&table, state, small_config()).unwrap();
        assert_eq!(search.status(), SearchStatus::Init);
        let solved = CubieCube::default().apply_move(U2);
        let mut done = Search::new(&table, solved, small_config()).unwrap();
        assert_eq!(done.status(), SearchStatus::Solved);
        assert_eq!(done.run(10, 0.5), SearchStatus::Solved);
        assert_eq!(done.solution(), Some(vec![]));
        // R then U R' finishes it during the first root expansion
        assert_eq!(search.run(1, 0.5), SearchStatus::Solved);
        let (solved, moves, final_state) = search.finish();
        assert!(solved);
        assert!(final_state.is_cross_f2l_solved());
        assert_eq!(state.apply_moves(&moves), final_state);
    }

    #[test]
    fn test_invalid_state() {
        let table = HeuristicTable::build(true, 1).unwrap();
        let mut state = CubieCube::default();
        state.co[0] = 1;
        assert!(matches!(
            Search::new(&table, state, small_config()),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_solve_at_root_expansion() {
        let table = HeuristicTable::build(true, 3).unwrap();
        let moves = [R, U, F, L];
        let state = CubieCube::default().apply_moves(&moves);
        let mut search = Search::new(&table, state, small_config()).unwrap();
        assert_eq!(search.run(10, 0.5), SearchStatus::Solved);
        let (solved, found, final_state) = search.finish();
        assert!(solved);
        assert!(found.len() <= 4);
        assert!(final_state.is_cross_f2l_solved());
        assert_eq!(state.apply_moves(&found), final_state);
    }

    #[test]
    fn test_arena_links() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = scramble(12, Some(3)).state;
        let mut search = Search::new(&table, state, small_config()).unwrap();
        search.run(200, 0.5);
        let root = search.root();
        assert!(root.expanded);
        for child in root.children() {
            let c = search.node(child);
            assert_eq!(c.parent, Some(0));
            assert_eq!(c.depth, 1);
            let m = c.mv.unwrap();
            assert_eq!(state.apply_move(m), c.state);
            assert_eq!(search.path(child), vec![m]);
        }
        if search.status() != SearchStatus::Solved {
            assert_eq!(root.visits as usize, search.stats().iterations);
        }
    }

    #[test]
    fn test_deterministic() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = scramble(20, Some(11)).state;
        let run = || {
            let mut search = Search::new(&table, state, small_config()).unwrap();
            search.run(300, 0.5);
            search.run(300, 0.1);
            (search.finish(), search.stats())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_best_effort() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = scramble(20, Some(5)).state;
        let mut search = Search::new(&table, state, small_config()).unwrap();
        search.run(500, 0.5);
        let (solved, moves, final_state) = search.finish();
        assert_eq!(state.apply_moves(&moves), final_state);
        if !solved {
            assert!(table.heuristic(&final_state) <= table.heuristic(&state));
        }
    }

    #[test]
    fn test_budget_exhausted_after_second_pass() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = scramble(20, Some(5)).state;
        let mut search = Search::new(&table, state, small_config()).unwrap();
        assert_eq!(search.run(50, 0.5), SearchStatus::Pass1);
        assert_eq!(search.run(100, 0.1), SearchStatus::Exhausted);
        assert_eq!(search.stats().iterations, 150);
        let (solved, moves, final_state) = search.finish();
        assert!(!solved);
        assert_eq!(state.apply_moves(&moves), final_state);
        // a finished search does not run again
        assert_eq!(search.run(100, 0.1), SearchStatus::Exhausted);
        assert_eq!(search.stats().iterations, 150);
    }

    #[test]
    fn test_best_child_ties_and_unvisited() {
        let table = HeuristicTable::build(true, 1).unwrap();
        let state = scramble(20, Some(4)).state;
        let mut search = Search::new(&table, state, small_config()).unwrap();
        assert!(!search.expand(ROOT));
        let children: Vec<NodeId> = search.root().children().collect();
        assert!(children.len() > 3);
        search.nodes[ROOT as usize].visits = children.len() as u32;
        for &c in &children {
            let node = &mut search.nodes[c as usize];
            node.visits = 1;
            node.value = 0.25;
            node.reward = 0.5;
        }
        // equal statistics: the lowest move index wins
        assert_eq!(search.best_child(ROOT, 0.5), Some(children[0]));
        search.nodes[children[0] as usize].dead = true;
        assert_eq!(search.best_child(ROOT, 0.5), Some(children[1]));

        // an unvisited child comes before any visited one
        search.nodes[children[1] as usize].value = 100.0;
        search.nodes[children[3] as usize].visits = 0;
        assert_eq!(search.best_child(ROOT, 0.5), Some(children[3]));
        search.nodes[children[3] as usize].visits = 1;
        assert_eq!(search.best_child(ROOT, 0.5), Some(children[1]));
    }

    #[test]
    fn test_best_effort_falls_back_to_root() {
        let table = HeuristicTable::build(true, 1).unwrap();
        let state = scramble(20, Some(6)).state;
        let mut search = Search::new(&table, state, small_config()).unwrap();
        assert!(!search.expand(ROOT));
        let root_h = search.root().heuristic;
        let children: Vec<NodeId> = search.root().children().collect();
        for &c in &children {
            search.nodes[c as usize].heuristic = root_h + 1.0;
        }
        assert_eq!(search.best_effort(), ROOT);
        let (solved, moves, final_state) = search.finish();
        assert!(!solved);
        assert!(moves.is_empty());
        assert_eq!(final_state, state);
        // a tie with the root goes to the first node below it
        search.nodes[children[2] as usize].heuristic = root_h;
        search.nodes[children[5] as usize].heuristic = root_h;
        assert_eq!(search.best_effort(), children[2]);
    }

    #[test]
    fn test_cancel() {
        let table = HeuristicTable::build(true, 2).unwrap();
        let state = scramble(20, Some(9)).state;
        let cancel = Arc::new(AtomicBool::new(true));
        let config = SearchConfig {
            cancel: Some(cancel.clone()),
            ..small_config()
        };
        let mut search = Search::new(&table, state, config).unwrap();
        assert_eq!(search.run(1000, 0.5), SearchStatus::Interrupted);
        assert_eq!(search.run(1000, 0.1), SearchStatus::Interrupted);
        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.stats().nodes, 1);
    }

    #[test]
    fn test_max_depth_exhausts() {
        let table = HeuristicTable::build(true, 1).unwrap();
        let state = scramble(20, Some(2)).state;
        let config = SearchConfig {
            max_depth: 1,
            rollout_depth: 0,
            ..small_config()
        };
        let mut search = Search::new(&table, state, config).unwrap();
        assert_eq!(search.run(100, 0.5), SearchStatus::Exhausted);
        let (solved, moves, final_state) = search.finish();
        assert!(!solved);
        let root_h = search.root().heuristic;
        if moves.is_empty() {
            // nothing got closer than the root, which is returned unchanged
            assert_eq!(search.best_effort(), ROOT);
            assert_eq!(final_state, state);
            assert!(search
                .root()
                .children()
                .all(|c| search.node(c).heuristic > root_h));
        } else {
            assert_eq!(moves.len(), 1);
            assert!(search.node(search.best_effort()).heuristic <= root_h);
        }
    }
}
