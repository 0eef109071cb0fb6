use clap::Parser;
use npuzzle_solver::config::ExperimentConfig;
use npuzzle_solver::experiment::{run_experiment, Trial};
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::report::{summarize, write_csv, Summary};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board width (3 for the 8-puzzle)
    #[clap(short, long, default_value_t = 3)]
    size: usize,

    /// Number of random solvable boards to solve
    #[clap(short, long, default_value_t = 100)]
    trials: usize,

    /// Seed of the board generator
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Heuristics to compare; repeat the flag for several
    #[clap(short = 'H', long = "heuristic", default_values_t = HeuristicKind::INFORMED.to_vec())]
    heuristics: Vec<HeuristicKind>,

    /// Stop each search after this many expansions
    #[clap(short, long)]
    max_expansions: Option<usize>,

    /// Write one CSV row per trial and heuristic to this file
    #[clap(long)]
    csv: Option<PathBuf>,

    /// Print every solution step
    #[clap(short, long)]
    verbose: bool,
}

fn print_trial(trial: &Trial, verbose: bool) {
    println!("Experiment #{}", trial.index + 1);
    println!("Initial State:\n{}", trial.initial);
    for run in &trial.runs {
        let record = &run.record;
        if verbose {
            if let Some(path) = &run.path {
                println!("\n{} solution steps:", record.heuristic);
                for (i, board) in path.iter().enumerate() {
                    println!("Step {}:\n{}", i, board);
                }
            }
        }
        match record.solution_depth {
            Some(depth) => println!(
                "  {:<10} depth {:<3} expanded {:<8} EBF {:.4} time {:.3} ms memory {} bytes",
                record.heuristic,
                depth,
                record.nodes_expanded,
                record.effective_branching_factor,
                record.execution_time_ms,
                record.memory_bytes
            ),
            None => println!(
                "  {:<10} unsolved after {} expansions",
                record.heuristic, record.nodes_expanded
            ),
        }
    }
    println!("======================================");
}

fn print_statistics(label: &str, summary: &Summary) {
    println!("{}:", label);
    println!("  Mean: {:.4}", summary.mean);
    println!("  Standard Deviation: {:.4}", summary.std_dev);
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = ExperimentConfig::new(args.size)
        .with_trials(args.trials)
        .with_seed(args.seed)
        .with_heuristics(args.heuristics)
        .with_max_expansions(args.max_expansions)
        .with_csv_path(args.csv);

    println!(
        "Starting heuristic evaluation for {} boards of size {}x{} (seed {})...",
        config.trials, config.size, config.size, config.seed
    );

    let verbose = args.verbose;
    let records = match run_experiment(&config, |trial| print_trial(trial, verbose)) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("\n--- Evaluation Complete ---");
    for summary in summarize(&records) {
        println!("{} Heuristic:", summary.heuristic);
        println!("Solved: {}/{}", summary.solved, summary.trials);
        println!("Total Execution Time (ms): {:.3}", summary.total_time_ms);
        print_statistics("Execution Time (ms)", &summary.execution_time_ms);
        print_statistics("Memory Usage (bytes)", &summary.memory_bytes);
        print_statistics("Nodes Expanded", &summary.nodes_expanded);
        print_statistics("Solution Depth", &summary.solution_depth);
        print_statistics("Effective Branching Factor", &summary.effective_branching_factor);
        println!("__________________________________________");
    }

    if let Some(path) = &config.csv_path {
        if let Err(e) = write_csv(path, &records) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        println!("Data exported to {}", path.display());
    }

    ExitCode::SUCCESS
}
