use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cpu_time::ProcessTime;
use log::{info, warn, LevelFilter};

use sudosat_lib::config::SolverConfig;
use sudosat_lib::solver::{SolveResult, Solver};
use sudosat_lib::{dimacs, sudoku};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeuristicArg {
    Naive,
    Vsids,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one CNF file per puzzle
    Encode {
        /// Puzzle file, one puzzle per line
        #[arg(value_name = "PUZZLES")]
        puzzles: PathBuf,

        /// Directory receiving the sudoku_<n>.cnf files
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Solve every puzzle and print the grids
    Solve {
        /// Puzzle file, one puzzle per line
        #[arg(value_name = "PUZZLES")]
        puzzles: PathBuf,

        /// Decision heuristic
        #[arg(long, value_enum, default_value_t = HeuristicArg::Naive)]
        heuristic: HeuristicArg,
    },
}

#[derive(Parser, Debug)]
#[command(version, about = "Sudoku puzzles as SAT problems", long_about = None)]
struct Args {
    /// Use verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn read_puzzles(path: &Path) -> anyhow::Result<Vec<(usize, sudoku::Sudoku)>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(sudoku::read_puzzles(file)?)
}

fn encode(puzzles: &Path, out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)?;
    let mut written = 0;
    for (n, (line, puzzle)) in read_puzzles(puzzles)?.into_iter().enumerate() {
        let formula = sudoku::encode(&puzzle)?;
        let path = out_dir.join(format!("sudoku_{}.cnf", n + 1));
        let mut out = BufWriter::new(File::create(&path)?);
        dimacs::write_formula(&formula, &mut out)?;
        info!("line {line}: {} clauses to {}", formula.len(), path.display());
        written += 1;
    }
    println!("{written} puzzles encoded");
    Ok(())
}

fn solve(puzzles: &Path, heuristic: HeuristicArg) -> anyhow::Result<()> {
    let config = SolverConfig::vsids(heuristic == HeuristicArg::Vsids);
    let mut total_conflicts = 0;

    for (line, puzzle) in read_puzzles(puzzles)? {
        let start = ProcessTime::now();
        let formula = sudoku::encode(&puzzle)?;
        let outcome = Solver::new(&formula, config).solve()?;
        total_conflicts += outcome.stats.conflicts;

        match &outcome.result {
            SolveResult::Sat(assignment) => {
                let solution = sudoku::decode(puzzle.size(), assignment)?;
                if !solution.is_solution_of(&puzzle) {
                    warn!("line {line}: decoded grid is not a solution");
                }
                println!("line {line}: {} conflicts, {:.3}s", outcome.stats.conflicts, start.elapsed().as_secs_f64());
                println!("{solution}");
            },
            other => println!("line {line}: {other}\n"),
        }
    }

    println!("total conflicts: {total_conflicts}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .filter_level(if args.verbose { LevelFilter::Info } else { LevelFilter::Warn })
        .parse_default_env()
        .init();

    match &args.command {
        Command::Encode { puzzles, out_dir } => encode(puzzles, out_dir),
        Command::Solve { puzzles, heuristic } => solve(puzzles, *heuristic),
    }
}
