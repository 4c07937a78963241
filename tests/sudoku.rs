use sudosat_lib::config::{Heuristic, SolverConfig};
use sudosat_lib::solver::{SolveResult, Solver};
use sudosat_lib::sudoku::{self, Sudoku};
use sudosat_lib::dpll;

const PUZZLE: &str = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const SOLUTION: &str = "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

fn solve_puzzle(puzzle: &Sudoku, config: SolverConfig) -> (Sudoku, u64) {
    let formula = sudoku::encode(puzzle).unwrap();
    let outcome = Solver::new(&formula, config).solve().unwrap();
    let assignment = outcome.result.assignment().expect("puzzle has a solution");
    (sudoku::decode(puzzle.size(), assignment).unwrap(), outcome.stats.conflicts)
}

#[test]
fn test_full_grid_needs_no_search() {
    let grid: Sudoku = "1234341221434321".parse().unwrap();
    let formula = sudoku::encode(&grid).unwrap();
    let outcome = Solver::new(&formula, SolverConfig::default()).solve().unwrap();
    assert_eq!(outcome.stats.decisions, 0);
    assert_eq!(outcome.stats.conflicts, 0);
    let decoded = sudoku::decode(4, outcome.result.assignment().unwrap()).unwrap();
    assert_eq!(decoded, grid);
}

#[test]
fn test_nine_by_nine() {
    let puzzle: Sudoku = PUZZLE.parse().unwrap();
    let expected: Sudoku = SOLUTION.parse().unwrap();

    let (naive, conflicts) = solve_puzzle(&puzzle, SolverConfig::vsids(false));
    println!("{naive}conflicts: {conflicts}");
    assert_eq!(naive, expected);
    assert!(naive.is_solution_of(&puzzle));

    let (vsids, _) = solve_puzzle(&puzzle, SolverConfig::vsids(true));
    assert_eq!(vsids, naive);
}

#[test]
fn test_small_puzzles_every_heuristic() {
    let puzzle: Sudoku = "1.......2.......".parse().unwrap();
    for heuristic in [Heuristic::Naive, Heuristic::Vsids, Heuristic::Random { seed: 7 }] {
        let (solution, _) = solve_puzzle(&puzzle, SolverConfig::with_heuristic(heuristic));
        assert!(solution.is_solution_of(&puzzle), "{solution}");

        let formula = sudoku::encode(&puzzle).unwrap();
        let outcome = dpll::solve(&formula, SolverConfig::with_heuristic(heuristic)).unwrap();
        let solution = sudoku::decode(4, outcome.result.assignment().unwrap()).unwrap();
        assert!(solution.is_solution_of(&puzzle), "{solution}");
    }
}

#[test]
fn test_contradictory_givens() {
    // two 1s in the first row
    let puzzle: Sudoku = "1..1............".parse().unwrap();
    let formula = sudoku::encode(&puzzle).unwrap();
    let outcome = Solver::new(&formula, SolverConfig::default()).solve().unwrap();
    assert_eq!(outcome.result, SolveResult::Unsat);
    assert_eq!(outcome.stats.decisions, 0);
}
