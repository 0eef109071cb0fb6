//! A* graph search over sliding puzzle boards.
//!
//! The engine owns every node it creates in a flat arena ([`SearchTree`]); a node's
//! parent is stored as a [`NodeId`] into that arena, so the ancestry of any node is an
//! acyclic chain back to the root. Nodes are never mutated after they are pushed.
//!
//! The closed set is never reopened: a board is expanded at most once, through the
//! first node that reaches it. This yields optimal paths only when the heuristic is
//! consistent, which holds for every [`HeuristicKind`] provided by this crate.
use crate::engine::{Board, Direction};
use crate::error::{Error, Result};
use crate::heuristics::{HeuristicEvaluator, HeuristicKind};
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::mem::size_of;

/// Expansions between two progress lines in the debug log.
const PROGRESS_INTERVAL: usize = 10_000;

/// Handle of a node inside a [`SearchTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A board together with its path cost, heuristic estimate and generating node.
#[derive(Clone, Debug)]
pub struct SearchNode {
    state: Board,
    g: u32,
    h: u32,
    parent: Option<NodeId>,
}

impl SearchNode {
    pub fn new(state: Board, g: u32, h: u32, parent: Option<NodeId>) -> Self {
        SearchNode {
            state,
            g,
            h,
            parent,
        }
    }

    pub fn state(&self) -> &Board {
        &self.state
    }

    /// Number of moves from the root to this node.
    pub fn g(&self) -> u32 {
        self.g
    }

    /// Heuristic estimate of the moves left to the goal.
    pub fn h(&self) -> u32 {
        self.h
    }

    /// Estimated total cost, always derived from `g` and `h`.
    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena holding the nodes of one search.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        SearchTree { nodes: Vec::new() }
    }

    /// Stores `node` and returns its handle.
    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks the parent chain of `id` back to the root and returns the boards in
    /// root-to-`id` order. A root node yields a single-element path.
    ///
    /// The tree is only read, so repeated calls return identical paths.
    pub fn reconstruct_path(&self, id: NodeId) -> Vec<Board> {
        let mut path = Vec::with_capacity(self.node(id).g() as usize + 1);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            path.push(node.state().clone());
            current = node.parent();
        }
        path.reverse();
        path
    }

    /// Builds a new tree holding only `id` and its ancestors, discarding every other node.
    ///
    /// Returns the compacted tree and the handle of `id` inside it.
    pub fn retain_chain(&self, id: NodeId) -> (SearchTree, NodeId) {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.node(node_id).parent();
        }

        let mut compact = SearchTree::new();
        let mut parent = None;
        for &old_id in chain.iter().rev() {
            let node = self.node(old_id);
            let new_id = compact.insert(SearchNode::new(
                node.state().clone(),
                node.g(),
                node.h(),
                parent,
            ));
            parent = Some(new_id);
        }
        // The chain always contains `id` itself.
        (compact, parent.unwrap_or(NodeId(0)))
    }
}

/// Produces the successors of `parent`: one per direction the blank can move without
/// leaving the grid, in the order of [`Direction::ALL`].
///
/// Each successor costs one more move than `parent` and is scored with `evaluator`.
pub fn generate_successors(
    parent_id: NodeId,
    parent: &SearchNode,
    evaluator: &HeuristicEvaluator,
) -> Vec<SearchNode> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| parent.state().slide_blank(dir))
        .map(|next| {
            let h = evaluator.estimate(&next);
            SearchNode::new(next, parent.g() + 1, h, Some(parent_id))
        })
        .collect()
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the lowest `f` first, then the
/// lowest `h`, then the earliest pushed entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    g: u32,
    h: u32,
    seq: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.g + other.h, other.h, other.seq).cmp(&(self.g + self.h, self.h, self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Where a search currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// The frontier still holds nodes and the goal has not been popped.
    Running,
    /// The goal was popped; the payload is the goal node.
    Succeeded(NodeId),
    /// The frontier ran empty without reaching the goal.
    Exhausted,
}

/// A found solution: the goal node's chain plus the search statistics.
#[derive(Clone, Debug)]
pub struct Solution {
    tree: SearchTree,
    goal: NodeId,
    expanded_nodes: usize,
}

impl Solution {
    /// Boards from the initial board to the goal, both included.
    pub fn path(&self) -> Vec<Board> {
        self.tree.reconstruct_path(self.goal)
    }

    pub fn goal_node(&self) -> &SearchNode {
        self.tree.node(self.goal)
    }

    /// Number of moves in the solution (path length minus one).
    pub fn depth(&self) -> u32 {
        self.goal_node().g()
    }

    pub fn expanded_nodes(&self) -> usize {
        self.expanded_nodes
    }
}

/// Result of a finished search. Running out of frontier is a regular outcome, not an error.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Solved(Solution),
    Exhausted { expanded_nodes: usize },
}

impl SearchOutcome {
    pub fn expanded_nodes(&self) -> usize {
        match self {
            SearchOutcome::Solved(solution) => solution.expanded_nodes(),
            SearchOutcome::Exhausted { expanded_nodes } => *expanded_nodes,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }
}

/// One A* run from an initial board to a goal board.
///
/// The search can be driven one pop at a time with [`AStarSearch::step`], which keeps
/// [`AStarSearch::expanded_nodes`] observable while it runs, or to completion with
/// [`AStarSearch::run`].
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::HeuristicKind;
/// use npuzzle_solver::solver::{AStarSearch, SearchStatus};
///
/// let initial = Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
/// let mut search = AStarSearch::new(initial, Board::goal(3), HeuristicKind::Manhattan).unwrap();
/// assert!(matches!(search.run(), SearchStatus::Succeeded(_)));
///
/// let outcome = search.finish();
/// let solution = outcome.solution().unwrap();
/// assert_eq!(solution.depth(), 2);
/// assert_eq!(solution.path().len(), 3);
/// ```
#[derive(Debug)]
pub struct AStarSearch {
    evaluator: HeuristicEvaluator,
    tree: SearchTree,
    frontier: BinaryHeap<FrontierEntry>,
    visited: HashSet<Board>,
    expanded_nodes: usize,
    next_seq: u64,
    peak_frontier: usize,
    status: SearchStatus,
}

impl AStarSearch {
    /// Prepares a search: the root node is scored and pushed, the visited set is empty.
    ///
    /// # Returns
    /// * `Err(Error::SizeMismatch)` if `initial` and `goal` differ in size.
    pub fn new(initial: Board, goal: Board, heuristic: HeuristicKind) -> Result<Self> {
        if initial.size() != goal.size() {
            return Err(Error::SizeMismatch {
                initial: initial.size(),
                goal: goal.size(),
            });
        }

        let evaluator = HeuristicEvaluator::new(&goal, heuristic);
        let h = evaluator.estimate(&initial);
        let mut search = AStarSearch {
            evaluator,
            tree: SearchTree::new(),
            frontier: BinaryHeap::new(),
            visited: HashSet::new(),
            expanded_nodes: 0,
            next_seq: 0,
            peak_frontier: 0,
            status: SearchStatus::Running,
        };
        search.push(SearchNode::new(initial, 0, h, None));
        Ok(search)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Number of nodes popped and expanded so far. The goal pop is not counted.
    pub fn expanded_nodes(&self) -> usize {
        self.expanded_nodes
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Largest number of entries the frontier has held at once.
    pub fn peak_frontier_len(&self) -> usize {
        self.peak_frontier
    }

    /// Estimated peak memory of the search structures, in bytes.
    ///
    /// Counts every node in the arena and every visited board, which only grow
    /// during a search, plus the frontier at its largest. Each board is charged its
    /// inline size and its tile buffer; allocator and hash table overhead is ignored.
    pub fn peak_memory_bytes(&self) -> usize {
        let tile_bytes = self.evaluator.goal().tiles().len() * size_of::<u16>();
        self.tree.len() * (size_of::<SearchNode>() + tile_bytes)
            + self.visited.len() * (size_of::<Board>() + tile_bytes)
            + self.peak_frontier * size_of::<FrontierEntry>()
    }

    pub fn heuristic(&self) -> HeuristicKind {
        self.evaluator.kind()
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    fn push(&mut self, node: SearchNode) {
        let entry = FrontierEntry {
            g: node.g(),
            h: node.h(),
            seq: self.next_seq,
            node: self.tree.insert(node),
        };
        self.next_seq += 1;
        self.frontier.push(entry);
        self.peak_frontier = self.peak_frontier.max(self.frontier.len());
    }

    /// Pops the most promising node and either finishes the search or expands it.
    ///
    /// A popped node whose board was already expanded through another node is dropped
    /// without being counted. Once the search has finished, further calls return the
    /// final status unchanged.
    pub fn step(&mut self) -> SearchStatus {
        if self.status != SearchStatus::Running {
            return self.status;
        }

        let entry = match self.frontier.pop() {
            Some(entry) => entry,
            None => {
                warn!(
                    "{} search exhausted the frontier after {} expansions",
                    self.heuristic(),
                    self.expanded_nodes
                );
                self.status = SearchStatus::Exhausted;
                return self.status;
            }
        };

        let current = self.tree.node(entry.node);
        if !self.visited.insert(current.state().clone()) {
            return self.status;
        }

        if current.state() == self.evaluator.goal() {
            info!(
                "{} search reached the goal at depth {} after {} expansions",
                self.heuristic(),
                current.g(),
                self.expanded_nodes
            );
            self.status = SearchStatus::Succeeded(entry.node);
            return self.status;
        }

        let successors = generate_successors(entry.node, current, &self.evaluator);
        for successor in successors {
            if !self.visited.contains(successor.state()) {
                self.push(successor);
            }
        }

        self.expanded_nodes += 1;
        if self.expanded_nodes % PROGRESS_INTERVAL == 0 {
            debug!(
                "{} expansions, frontier {}, visited {}",
                self.expanded_nodes,
                self.frontier.len(),
                self.visited.len()
            );
        }
        self.status
    }

    /// Steps until the goal is popped or the frontier is empty.
    pub fn run(&mut self) -> SearchStatus {
        while self.status == SearchStatus::Running {
            self.step();
        }
        self.status
    }

    /// Steps until the search finishes or `max_expansions` nodes have been expanded in
    /// total. Returns `SearchStatus::Running` if the cap was hit first; the search can
    /// be resumed afterwards.
    pub fn run_with_limit(&mut self, max_expansions: usize) -> SearchStatus {
        while self.status == SearchStatus::Running && self.expanded_nodes < max_expansions {
            self.step();
        }
        self.status
    }

    /// Runs the search to completion and hands the result to the caller.
    ///
    /// On success only the goal node and its ancestors are kept; every other node is
    /// dropped together with the frontier and the visited set.
    pub fn finish(mut self) -> SearchOutcome {
        match self.run() {
            SearchStatus::Succeeded(goal) => {
                let (tree, goal) = self.tree.retain_chain(goal);
                SearchOutcome::Solved(Solution {
                    tree,
                    goal,
                    expanded_nodes: self.expanded_nodes,
                })
            }
            _ => SearchOutcome::Exhausted {
                expanded_nodes: self.expanded_nodes,
            },
        }
    }
}

/// Solves `initial` towards `goal` with A* under `heuristic`.
///
/// # Returns
/// * `Ok(SearchOutcome::Solved)` with the optimal path when the goal is reachable.
/// * `Ok(SearchOutcome::Exhausted)` when it is not.
/// * `Err(Error::SizeMismatch)` if the boards differ in size.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::HeuristicKind;
/// use npuzzle_solver::solver::solve_astar;
///
/// let initial = Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
/// let outcome = solve_astar(&initial, &Board::goal(3), HeuristicKind::Hamming).unwrap();
/// let path = outcome.solution().unwrap().path();
/// assert_eq!(path.first(), Some(&initial));
/// assert_eq!(path.last(), Some(&Board::goal(3)));
/// ```
pub fn solve_astar(
    initial: &Board,
    goal: &Board,
    heuristic: HeuristicKind,
) -> Result<SearchOutcome> {
    Ok(AStarSearch::new(initial.clone(), goal.clone(), heuristic)?.finish())
}
