//! Batch runner: draws solvable boards and solves each one under every configured heuristic.

use crate::config::ExperimentConfig;
use crate::engine::Board;
use crate::error::Result;
use crate::heuristics::HeuristicKind;
use crate::report::{effective_branching_factor, TrialRecord};
use crate::solver::{AStarSearch, SearchStatus};
use crate::utils::random_solvable_board;
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Instant;

/// The outcome of one heuristic on one board.
#[derive(Debug, Clone)]
pub struct HeuristicRun {
    pub record: TrialRecord,
    /// Boards from the initial board to the goal; `None` if the goal was not reached.
    pub path: Option<Vec<Board>>,
}

/// All runs performed on one drawn board.
#[derive(Debug, Clone)]
pub struct Trial {
    pub index: usize,
    pub initial: Board,
    pub runs: Vec<HeuristicRun>,
}

/// Solves `initial` under `heuristic`, timing the search.
///
/// With `max_expansions` set, a search that hits the cap is reported as unsolved.
/// An exhausted search on a board that passed the solvability filter points at a bug
/// in the filter and is logged as an error.
pub fn run_heuristic(
    index: usize,
    initial: &Board,
    goal: &Board,
    heuristic: HeuristicKind,
    max_expansions: Option<usize>,
) -> Result<HeuristicRun> {
    let start = Instant::now();
    let mut search = AStarSearch::new(initial.clone(), goal.clone(), heuristic)?;
    let status = match max_expansions {
        Some(limit) => search.run_with_limit(limit),
        None => search.run(),
    };
    let path = match status {
        SearchStatus::Succeeded(goal_id) => Some(search.tree().reconstruct_path(goal_id)),
        SearchStatus::Exhausted => {
            error!(
                "Trial {}: {} search exhausted on a board reported as solvable",
                index, heuristic
            );
            None
        }
        SearchStatus::Running => {
            warn!(
                "Trial {}: {} search stopped at the cap of {} expansions",
                index,
                heuristic,
                search.expanded_nodes()
            );
            None
        }
    };
    let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let nodes_expanded = search.expanded_nodes();
    let memory_bytes = search.peak_memory_bytes();
    let solution_depth = path.as_ref().map(|p| (p.len() - 1) as u32);
    Ok(HeuristicRun {
        record: TrialRecord {
            trial: index,
            heuristic: heuristic.to_string(),
            solved: path.is_some(),
            execution_time_ms,
            memory_bytes,
            nodes_expanded,
            solution_depth,
            effective_branching_factor: solution_depth
                .map(|depth| effective_branching_factor(nodes_expanded, depth))
                .unwrap_or(0.0),
        },
        path,
    })
}

/// Runs `config.trials` trials and returns every record in trial order.
///
/// `on_trial` is called after each trial, e.g. to print the solution steps.
pub fn run_experiment(
    config: &ExperimentConfig,
    mut on_trial: impl FnMut(&Trial),
) -> Result<Vec<TrialRecord>> {
    config.validate()?;

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let goal = Board::try_goal(config.size)?;
    let mut records = Vec::with_capacity(config.trials * config.heuristics.len());

    for index in 0..config.trials {
        let initial = random_solvable_board(config.size, &mut rng)?;
        let mut runs = Vec::with_capacity(config.heuristics.len());
        for &heuristic in &config.heuristics {
            let run = run_heuristic(index, &initial, &goal, heuristic, config.max_expansions)?;
            records.push(run.record.clone());
            runs.push(run);
        }
        let trial = Trial {
            index,
            initial,
            runs,
        };
        on_trial(&trial);
    }

    info!(
        "Finished {} trials on {}x{} boards",
        config.trials, config.size, config.size
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_str_array, is_board_solvable};

    #[test]
    fn test_run_heuristic_records_solution() {
        let initial = board_from_str_array(&["1 2 3", "4 0 6", "7 5 8"]).unwrap();
        let run = run_heuristic(3, &initial, &Board::goal(3), HeuristicKind::Manhattan, None)
            .unwrap();
        assert_eq!(run.record.trial, 3);
        assert_eq!(run.record.heuristic, "Manhattan");
        assert!(run.record.solved);
        assert_eq!(run.record.solution_depth, Some(2));
        assert_eq!(run.path.as_ref().map(Vec::len), Some(3));
        assert!(run.record.execution_time_ms >= 0.0);
        assert!(run.record.memory_bytes > 0);
    }

    #[test]
    fn test_run_heuristic_reports_capped_search_as_unsolved() {
        let initial = board_from_str_array(&["8 6 7", "2 5 4", "3 0 1"]).unwrap();
        let run = run_heuristic(0, &initial, &Board::goal(3), HeuristicKind::Hamming, Some(5))
            .unwrap();
        assert!(!run.record.solved);
        assert_eq!(run.record.nodes_expanded, 5);
        assert!(run.record.memory_bytes > 0);
        assert_eq!(run.record.solution_depth, None);
        assert!(run.path.is_none());
    }

    #[test]
    fn test_run_experiment_is_reproducible() {
        let config = ExperimentConfig::new(3).with_trials(3).with_seed(2024);

        let mut initials = Vec::new();
        let records = run_experiment(&config, |trial| {
            assert!(is_board_solvable(&trial.initial));
            assert_eq!(trial.runs.len(), 2);
            initials.push(trial.initial.clone());
        })
        .unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.solved));

        // Both heuristics find the same optimal depth on each board.
        for pair in records.chunks(2) {
            assert_eq!(pair[0].heuristic, "Hamming");
            assert_eq!(pair[1].heuristic, "Manhattan");
            assert_eq!(pair[0].solution_depth, pair[1].solution_depth);
        }

        let mut again = Vec::new();
        run_experiment(&config, |trial| again.push(trial.initial.clone())).unwrap();
        assert_eq!(initials, again);
    }

    #[test]
    fn test_run_experiment_rejects_invalid_config() {
        let config = ExperimentConfig::new(3).with_trials(0);
        assert!(run_experiment(&config, |_| {}).is_err());
    }
}
