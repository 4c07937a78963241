use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use cpu_time::ProcessTime;
use log::{info, LevelFilter};

use sudosat_lib::config::{Heuristic, Limits, SolverConfig, DEFAULT_DECAY};
use sudosat_lib::solver::{Outcome, SolveResult, Solver};
use sudosat_lib::{dimacs, dpll, sudoku};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Cdcl,
    Dpll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeuristicArg {
    Naive,
    Vsids,
    Random,
}

#[derive(Parser, Debug)]
#[command(version, about = "Solve a CNF formula in DIMACS format", long_about = None)]
struct Args {
    /// Search algorithm
    #[arg(long, value_enum, default_value_t = Algorithm::Cdcl)]
    solver: Algorithm,

    /// Decision heuristic
    #[arg(long, value_enum, default_value_t = HeuristicArg::Naive)]
    heuristic: HeuristicArg,

    /// Seed of the random heuristic
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    seed: u64,

    /// Activity decay factor applied after each conflict
    #[arg(long, default_value_t = DEFAULT_DECAY)]
    decay: f64,

    /// Give up after N conflicts
    #[arg(long, value_name = "N")]
    max_conflicts: Option<u64>,

    /// Give up after MS milliseconds of cpu time
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Do not write the model next to the input file
    #[arg(long)]
    no_output: bool,

    /// Print the model as a sudoku grid of side N
    #[arg(long, value_name = "N")]
    sudoku: Option<usize>,

    /// Use verbose output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// DIMACS file, `-` reads stdin
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl Args {
    fn config(&self) -> SolverConfig {
        let heuristic = match self.heuristic {
            HeuristicArg::Naive => Heuristic::Naive,
            HeuristicArg::Vsids => Heuristic::Vsids,
            HeuristicArg::Random => Heuristic::Random { seed: self.seed },
        };
        SolverConfig {
            heuristic,
            decay: self.decay,
            limits: Limits {
                max_conflicts: self.max_conflicts,
                timeout: self.timeout.map(Duration::from_millis),
            },
        }
    }

    fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

#[cfg(target_os = "linux")]
fn peak_memory_kb() -> Option<u64> {
    procfs::process::Process::myself().ok()?.status().ok()?.vmhwm
}

#[cfg(not(target_os = "linux"))]
fn peak_memory_kb() -> Option<u64> {
    None
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .filter_level(level)
        .parse_default_env()
        .init();

    let start = ProcessTime::now();

    let formula = if args.reads_stdin() {
        dimacs::parse(io::stdin().lock())?
    } else {
        dimacs::read_file(&args.file)
            .with_context(|| format!("reading {}", args.file.display()))?
    };
    info!("{} variables, {} clauses", formula.num_vars(), formula.len());

    let config = args.config();
    let Outcome { result, stats } = match args.solver {
        Algorithm::Cdcl => Solver::new(&formula, config).solve()?,
        Algorithm::Dpll => dpll::solve(&formula, config)?,
    };

    println!("{result}");
    println!("{stats}");

    if let SolveResult::Sat(assignment) = &result {
        if !args.no_output && !args.reads_stdin() {
            let path = dimacs::output_path(&args.file);
            let mut out = BufWriter::new(File::create(&path)?);
            dimacs::write_assignment(assignment, &mut out)?;
            info!("model written to {}", path.display());
        }
        if let Some(size) = args.sudoku {
            print!("{}", sudoku::decode(size, assignment)?);
        }
    }

    println!("cpu time:     {:.3}s", start.elapsed().as_secs_f64());
    if let Some(kb) = peak_memory_kb() {
        println!("peak memory:  {} kB", kb);
    }

    Ok(())
}
