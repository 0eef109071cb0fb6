use clap::Parser;
use npuzzle_solver::engine::Board;
use npuzzle_solver::error::Error;
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::solver::{AStarSearch, SearchStatus};
use npuzzle_solver::utils::{board_from_text, is_board_solvable};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Heuristic guiding the search: hamming, manhattan or zero
    #[clap(short = 'H', long, default_value = "manhattan")]
    heuristic: HeuristicKind,

    /// Stop after this many expansions
    #[clap(short, long)]
    max_expansions: Option<usize>,

    /// Goal board file; defaults to the canonical goal with the blank last
    #[clap(short, long)]
    goal_file: Option<PathBuf>,

    /// Path to the board file (one row per line, values separated by spaces)
    board_file: PathBuf,
}

fn read_board_file(path: &Path) -> Result<Board, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read {}", path.display()),
        source,
    })?;
    board_from_text(&content)
}

fn print_solution_steps(path: &[Board]) {
    println!("\nSolution Steps:\n");
    for (i, board) in path.iter().enumerate() {
        println!("Step {}:", i);
        println!("{}", board);
        if i + 1 < path.len() {
            println!("  ↓");
        }
    }
    println!("Total steps: {}", path.len().saturating_sub(1));
}

fn run(args: Args) -> Result<ExitCode, Error> {
    let initial = read_board_file(&args.board_file)?;
    let goal = match &args.goal_file {
        Some(path) => read_board_file(path)?,
        None => Board::goal(initial.size()),
    };
    println!("Loaded board from {}\n", args.board_file.display());
    println!("Initial board state:\n{}\n", initial);

    if args.goal_file.is_none() && !is_board_solvable(&initial) {
        println!("This board cannot reach the goal (inversion parity). Nothing to search.");
        return Ok(ExitCode::FAILURE);
    }

    println!("Searching with the {} heuristic...", args.heuristic);
    let mut search = AStarSearch::new(initial, goal, args.heuristic)?;
    let status = match args.max_expansions {
        Some(limit) => search.run_with_limit(limit),
        None => search.run(),
    };

    match status {
        SearchStatus::Succeeded(goal_id) => {
            print_solution_steps(&search.tree().reconstruct_path(goal_id));
            println!("Nodes expanded: {}", search.expanded_nodes());
            Ok(ExitCode::SUCCESS)
        }
        SearchStatus::Exhausted => {
            println!(
                "No solution found. Nodes expanded: {}",
                search.expanded_nodes()
            );
            Ok(ExitCode::FAILURE)
        }
        SearchStatus::Running => {
            println!(
                "Gave up after {} expansions (frontier still holds {} nodes).",
                search.expanded_nodes(),
                search.frontier_len()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
