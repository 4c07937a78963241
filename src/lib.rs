pub mod types;
pub mod error;
pub mod config;
pub mod clause_db;
pub mod trail;
pub mod propagation;
pub mod analysis;
pub mod varorder;
pub mod solver;
pub mod dpll;
pub mod dimacs;
pub mod sudoku;

pub use config::{Heuristic, Limits, SolverConfig};
pub use error::{Error, Result};
pub use solver::{solve, Outcome, SolveResult, Solver, SolverStats};
pub use types::{Assignment, Clause, Formula, Lit, Var};
