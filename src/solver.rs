use std::fmt;

use cpu_time::ProcessTime;
use log::{debug, info};

use crate::analysis::{analyze, Analysis};
use crate::clause_db::{ClauseRef, ClauseStore};
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::propagation::propagate;
use crate::trail::Trail;
use crate::types::{Assignment, Formula};
use crate::varorder::VarOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Sat(Assignment),
    Unsat,
    // a caller imposed limit was hit first
    Unknown,
}

impl SolveResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Sat(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveResult::Sat(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveResult::Sat(_) => write!(f, "SAT"),
            SolveResult::Unsat => write!(f, "UNSAT"),
            SolveResult::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub conflicts    : u64,
    pub decisions    : u64,
    pub propagations : u64,
    pub learnt       : u64,
    pub max_level    : usize,
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "conflicts:    {}", self.conflicts)?;
        writeln!(f, "decisions:    {}", self.decisions)?;
        writeln!(f, "propagations: {}", self.propagations)?;
        writeln!(f, "learnt:       {}", self.learnt)?;
        write!(f, "max level:    {}", self.max_level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result : SolveResult,
    pub stats  : SolverStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Propagate,
    Decide,
    Analyze(ClauseRef),
    Backtrack(usize),
    Sat,
    Unsat,
}

/// CDCL search over a single formula. All search state is owned by the
/// solver, independent solves share nothing.
pub struct Solver {
    clauses : ClauseStore,
    trail   : Trail,
    order   : VarOrder,
    config  : SolverConfig,
    stats   : SolverStats,
}

impl Solver {
    pub fn new(formula: &Formula, config: SolverConfig) -> Solver {
        let num_vars = formula.num_vars();
        let mut order = VarOrder::new(num_vars, config.heuristic, config.decay);
        for v in formula.variables() {
            order.new_var(v);
        }

        Solver {
            clauses: ClauseStore::from_formula(formula),
            trail: Trail::new(num_vars),
            order,
            config,
            stats: SolverStats::default(),
        }
    }

    pub fn solve(mut self) -> Result<Outcome> {
        let result = self.run()?;
        info!("{} after {} conflicts, {} decisions", result, self.stats.conflicts, self.stats.decisions);
        Ok(Outcome { result, stats: self.stats })
    }

    fn out_of_budget(&self, start: &ProcessTime) -> bool {
        let limits = &self.config.limits;
        if let Some(max) = limits.max_conflicts {
            if self.stats.conflicts >= max {
                return true;
            }
        }
        match limits.timeout {
            Some(t) => start.elapsed() >= t,
            None => false,
        }
    }

    fn run(&mut self) -> Result<SolveResult> {
        let start = ProcessTime::now();
        let mut phase = Phase::Init;

        loop {
            phase = match phase {
                Phase::Sat => return Ok(SolveResult::Sat(self.trail.assignment())),
                Phase::Unsat => return Ok(SolveResult::Unsat),
                Phase::Propagate if self.out_of_budget(&start) => {
                    info!("limit reached, giving up");
                    return Ok(SolveResult::Unknown);
                },
                p => self.step(p)?,
            };
        }
    }

    fn step(&mut self, phase: Phase) -> Result<Phase> {
        let next = match phase {
            Phase::Init => {
                debug_assert!(self.trail.is_empty());
                Phase::Propagate
            },
            Phase::Propagate => {
                let before = self.trail.len();
                let confl = propagate(&self.clauses, &mut self.trail);
                self.stats.propagations += (self.trail.len() - before) as u64;

                match confl {
                    Some(c) if self.trail.decision_level() == 0 => {
                        debug!("conflict at level 0 in {}", self.clauses.get(c));
                        Phase::Unsat
                    },
                    Some(c) => Phase::Analyze(c),
                    None if self.clauses.all_satisfied(&self.trail) => Phase::Sat,
                    None => Phase::Decide,
                }
            },
            Phase::Decide => {
                let lit = match self.order.pick_lit(&self.trail, &self.clauses) {
                    Some(l) => l,
                    None => return Err(Error::InternalInvariantViolation(
                        "no unassigned variable left but the formula is not satisfied".to_string()
                    )),
                };
                self.trail.decide(lit);
                self.stats.decisions += 1;
                self.stats.max_level = self.stats.max_level.max(self.trail.decision_level());
                debug!("decided {lit} at level {}", self.trail.decision_level());
                Phase::Propagate
            },
            Phase::Analyze(confl) => {
                self.stats.conflicts += 1;
                debug!("conflict at level {} in {}", self.trail.decision_level(), self.clauses.get(confl));

                match analyze(confl, &self.clauses, &self.trail, &mut self.order) {
                    Analysis::Refuted => {
                        debug!("learned the empty clause");
                        Phase::Unsat
                    },
                    Analysis::Learnt { clause, backtrack_level } => {
                        debug!("learned {clause}, backtracking to level {backtrack_level}");
                        self.clauses.add(clause);
                        self.stats.learnt += 1;
                        self.order.decay();
                        Phase::Backtrack(backtrack_level)
                    },
                }
            },
            Phase::Backtrack(lev) => {
                let removed = self.trail.backtrack(lev);
                debug!("backtracked to level {lev}, {removed} assignments undone");
                Phase::Propagate
            },
            Phase::Sat | Phase::Unsat => phase,
        };
        Ok(next)
    }
}

/// Solves `formula` with the default configuration, returning the result and
/// the number of conflicts met on the way.
pub fn solve(formula: &Formula, use_vsids: bool) -> Result<(SolveResult, u64)> {
    let outcome = Solver::new(formula, SolverConfig::vsids(use_vsids)).solve()?;
    Ok((outcome.result, outcome.stats.conflicts))
}
