use crate::engine::{Board, BLANK};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The heuristics the A* engine can be driven with.
///
/// `Hamming` and `Manhattan` are admissible and consistent for the unit-cost sliding
/// puzzle. `Zero` always estimates 0, which turns A* into uniform-cost search.
/// Parsing an unknown name fails with `Error::InvalidHeuristic`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// Number of non-blank tiles not on their goal cell.
    Hamming,
    /// Sum over non-blank tiles of the row and column distance to their goal cell.
    Manhattan,
    /// Constant 0.
    Zero,
}

impl HeuristicKind {
    /// The heuristics compared by the experiment driver.
    pub const INFORMED: [HeuristicKind; 2] = [HeuristicKind::Hamming, HeuristicKind::Manhattan];

    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::Hamming => "Hamming",
            HeuristicKind::Manhattan => "Manhattan",
            HeuristicKind::Zero => "Zero",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HeuristicKind {
    type Err = Error;

    /// Parses a heuristic name, ignoring ASCII case.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::heuristics::HeuristicKind;
    /// assert_eq!("manhattan".parse::<HeuristicKind>().unwrap(), HeuristicKind::Manhattan);
    /// assert!("euclid".parse::<HeuristicKind>().is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hamming" => Ok(HeuristicKind::Hamming),
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "zero" | "uniform" => Ok(HeuristicKind::Zero),
            _ => Err(Error::InvalidHeuristic {
                name: s.to_string(),
            }),
        }
    }
}

/// Counts the non-blank cells of `state` whose value differs from `goal` at the same cell.
///
/// # Panics
/// Panics if the boards differ in size; [`evaluate`] reports that case as an error.
pub fn hamming_distance(state: &Board, goal: &Board) -> u32 {
    assert_eq!(state.size(), goal.size(), "state and goal differ in size");
    state
        .tiles()
        .iter()
        .zip(goal.tiles())
        .filter(|&(&value, &target)| value != BLANK && value != target)
        .count() as u32
}

/// Sums, over all non-blank tiles, the row distance plus the column distance between
/// the tile's cell in `state` and its cell in `goal`.
///
/// For the canonical goal (see [`Board::goal`]) tile `v` belongs at
/// `((v - 1) / size, (v - 1) % size)`.
///
/// # Panics
/// Panics if the boards differ in size; [`evaluate`] reports that case as an error.
pub fn manhattan_distance(state: &Board, goal: &Board) -> u32 {
    HeuristicEvaluator::new(goal, HeuristicKind::Manhattan).estimate(state)
}

/// Scores `state` against `goal` with the heuristic `kind`.
///
/// Pure and side-effect free; the result is always `>= 0` and is `0` when `state == goal`.
///
/// # Returns
/// * `Err(Error::SizeMismatch)` if `state` and `goal` differ in size.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::{evaluate, HeuristicKind};
///
/// let goal = Board::goal(3);
/// let state = Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
/// assert_eq!(evaluate(&state, &goal, HeuristicKind::Hamming).unwrap(), 2);
/// assert_eq!(evaluate(&state, &goal, HeuristicKind::Manhattan).unwrap(), 2);
/// assert_eq!(evaluate(&goal, &goal, HeuristicKind::Manhattan).unwrap(), 0);
/// assert!(evaluate(&Board::goal(2), &goal, HeuristicKind::Hamming).is_err());
/// ```
pub fn evaluate(state: &Board, goal: &Board, kind: HeuristicKind) -> Result<u32> {
    if state.size() != goal.size() {
        return Err(Error::SizeMismatch {
            initial: state.size(),
            goal: goal.size(),
        });
    }
    Ok(match kind {
        HeuristicKind::Hamming => hamming_distance(state, goal),
        HeuristicKind::Manhattan => manhattan_distance(state, goal),
        HeuristicKind::Zero => 0,
    })
}

/// A heuristic bound to one goal board.
///
/// The goal cell of every value is looked up once, so scoring the many states of a
/// single search does not rescan the goal.
#[derive(Clone, Debug)]
pub struct HeuristicEvaluator {
    kind: HeuristicKind,
    goal: Board,
    // goal_cells[v] is the (row, column) of value v in the goal.
    goal_cells: Vec<(usize, usize)>,
}

impl HeuristicEvaluator {
    pub fn new(goal: &Board, kind: HeuristicKind) -> Self {
        let size = goal.size();
        let mut goal_cells = vec![(0, 0); goal.tiles().len()];
        for (idx, &value) in goal.tiles().iter().enumerate() {
            goal_cells[value as usize] = (idx / size, idx % size);
        }
        HeuristicEvaluator {
            kind,
            goal: goal.clone(),
            goal_cells,
        }
    }

    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    /// Scores `state` against the bound goal.
    ///
    /// # Panics
    /// Panics if `state` and the goal differ in size.
    pub fn estimate(&self, state: &Board) -> u32 {
        assert_eq!(state.size(), self.goal.size(), "state and goal differ in size");
        match self.kind {
            HeuristicKind::Hamming => hamming_distance(state, &self.goal),
            HeuristicKind::Manhattan => {
                let size = state.size();
                state
                    .tiles()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &value)| value != BLANK)
                    .map(|(idx, &value)| {
                        let (goal_r, goal_c) = self.goal_cells[value as usize];
                        ((idx / size).abs_diff(goal_r) + (idx % size).abs_diff(goal_c)) as u32
                    })
                    .sum()
            }
            HeuristicKind::Zero => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_str_array, random_solvable_board};
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_heuristics_on_sample_board() {
        let goal = Board::goal(3);
        let state = board_from_str_array(&["1 2 3", "4 0 6", "7 5 8"]).unwrap();
        // 5 and 8 are each one cell away from home.
        assert_eq!(hamming_distance(&state, &goal), 2);
        assert_eq!(manhattan_distance(&state, &goal), 2);
        assert_eq!(evaluate(&state, &goal, HeuristicKind::Zero).unwrap(), 0);
    }

    #[test]
    fn test_evaluate_rejects_boards_of_different_sizes() {
        for kind in [HeuristicKind::Hamming, HeuristicKind::Manhattan, HeuristicKind::Zero] {
            assert!(matches!(
                evaluate(&Board::goal(2), &Board::goal(3), kind),
                Err(Error::SizeMismatch { initial: 2, goal: 3 })
            ));
            assert!(matches!(
                evaluate(&Board::goal(4), &Board::goal(3), kind),
                Err(Error::SizeMismatch { initial: 4, goal: 3 })
            ));
        }
    }

    #[test]
    #[should_panic(expected = "state and goal differ in size")]
    fn test_hamming_distance_panics_on_size_mismatch() {
        hamming_distance(&Board::goal(2), &Board::goal(3));
    }

    #[test]
    #[should_panic(expected = "state and goal differ in size")]
    fn test_estimate_panics_on_size_mismatch() {
        let evaluator = HeuristicEvaluator::new(&Board::goal(3), HeuristicKind::Manhattan);
        evaluator.estimate(&Board::goal(4));
    }

    #[test]
    fn test_manhattan_counts_full_displacement() {
        let goal = Board::goal(3);
        let state = board_from_str_array(&["8 1 2", "0 4 3", "7 6 5"]).unwrap();
        // 8: (0,0)->(2,1) = 3, 1: (0,1)->(0,0) = 1, 2: (0,2)->(0,1) = 1,
        // 4: (1,1)->(1,0) = 1, 3: (1,2)->(0,2) = 1, 7: 0, 6: (2,1)->(1,2) = 2,
        // 5: (2,2)->(1,1) = 2
        assert_eq!(manhattan_distance(&state, &goal), 11);
        assert_eq!(hamming_distance(&state, &goal), 7);
    }

    #[test]
    fn test_blank_is_never_counted() {
        let goal = Board::goal(2);
        // Only the blank and 3 are swapped; 3 is misplaced, the blank does not count.
        let state = board_from_str_array(&["1 2", "0 3"]).unwrap();
        assert_eq!(hamming_distance(&state, &goal), 1);
        assert_eq!(manhattan_distance(&state, &goal), 1);
    }

    #[test]
    fn test_manhattan_uses_goal_positions() {
        let goal = board_from_str_array(&["0 1", "2 3"]).unwrap();
        let state = board_from_str_array(&["1 0", "2 3"]).unwrap();
        assert_eq!(manhattan_distance(&state, &goal), 1);
        assert_eq!(manhattan_distance(&goal, &goal), 0);
    }

    #[test]
    fn test_parse_heuristic_names() {
        assert_eq!("Hamming".parse::<HeuristicKind>().unwrap(), HeuristicKind::Hamming);
        assert_eq!(" MANHATTAN ".parse::<HeuristicKind>().unwrap(), HeuristicKind::Manhattan);
        assert_eq!("uniform".parse::<HeuristicKind>().unwrap(), HeuristicKind::Zero);

        let err = "linear".parse::<HeuristicKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidHeuristic { ref name } if name == "linear"));
        assert!(err.to_string().contains("unknown heuristic 'linear'"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for kind in [HeuristicKind::Hamming, HeuristicKind::Manhattan, HeuristicKind::Zero] {
            assert_eq!(kind.to_string().parse::<HeuristicKind>().unwrap(), kind);
        }
    }

    proptest! {
        #[test]
        fn prop_goal_scores_zero(size in 2usize..=5) {
            let goal = Board::goal(size);
            for kind in [HeuristicKind::Hamming, HeuristicKind::Manhattan, HeuristicKind::Zero] {
                prop_assert_eq!(evaluate(&goal, &goal, kind).unwrap(), 0);
            }
        }

        #[test]
        fn prop_manhattan_dominates_hamming(size in 2usize..=5, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let state = random_solvable_board(size, &mut rng).unwrap();
            let goal = Board::goal(size);
            prop_assert!(hamming_distance(&state, &goal) <= manhattan_distance(&state, &goal));
        }

        #[test]
        fn prop_single_move_changes_manhattan_by_one(size in 2usize..=5, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let state = random_solvable_board(size, &mut rng).unwrap();
            let goal = Board::goal(size);
            let h = manhattan_distance(&state, &goal);
            for dir in crate::engine::Direction::ALL {
                if let Some(next) = state.slide_blank(dir) {
                    prop_assert_eq!(manhattan_distance(&next, &goal).abs_diff(h), 1);
                }
            }
        }
    }
}
