use clap::Parser;
use npuzzle_solver::engine::{Direction, Game, MAX_SIZE};
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::solver::{AStarSearch, SearchStatus};
use npuzzle_solver::utils::random_solvable_board;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board width
    #[clap(short, long, default_value_t = 3)]
    size: usize,

    /// Seed for the starting board; random if omitted
    #[clap(long)]
    seed: Option<u64>,
}

/// Expansion budget of a hint search, so large boards do not hang the prompt.
const HINT_EXPANSION_LIMIT: usize = 200_000;

/// Asks A* for the first move of an optimal solution from the current board.
fn hint(game: &Game) -> Option<Direction> {
    let mut search = AStarSearch::new(
        game.board().clone(),
        game.goal().clone(),
        HeuristicKind::Manhattan,
    )
    .ok()?;
    let goal_id = match search.run_with_limit(HINT_EXPANSION_LIMIT) {
        SearchStatus::Succeeded(goal_id) => goal_id,
        _ => return None,
    };
    let path = search.tree().reconstruct_path(goal_id);
    let next = path.get(1)?;
    Direction::ALL
        .into_iter()
        .find(|&dir| game.board().slide_blank(dir).as_ref() == Some(next))
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if !(2..=MAX_SIZE).contains(&args.size) {
        eprintln!("Board size must be between 2 and {}.", MAX_SIZE);
        return;
    }

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let board = match random_solvable_board(args.size, &mut rng) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };
    let mut game = Game::new_with_board(board);
    println!("Welcome to the {}-puzzle!", args.size * args.size - 1);

    loop {
        println!("---------------------");
        println!("Steps: {}", game.steps());
        println!("{}", game.board());

        if game.is_solved() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Steps: {}", game.steps());
            println!("---------------------");
            break;
        }

        print!("Move the blank with w/a/s/d, 'h' for a hint, 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                println!("\nThanks for playing!");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let direction = match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made).");
                }
                continue;
            }
            "h" => {
                match hint(&game) {
                    Some(dir) => println!("Hint: move the blank {}.", dir),
                    None => println!("No hint available."),
                }
                continue;
            }
            "w" => Direction::Up,
            "a" => Direction::Left,
            "s" => Direction::Down,
            "d" => Direction::Right,
            _ => {
                println!("Invalid input. Use w/a/s/d, 'h', 'u' or 'q'.");
                continue;
            }
        };

        if !game.process_move(direction) {
            println!("The blank cannot move {} from here.", direction);
        }
    }
}
