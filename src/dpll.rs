use cpu_time::ProcessTime;
use log::{debug, info, trace};

use crate::clause_db::{ClauseRef, ClauseState, ClauseStore};
use crate::config::{Heuristic, SolverConfig};
use crate::error::{Error, Result};
use crate::propagation::propagate;
use crate::solver::{Outcome, SolveResult, SolverStats};
use crate::trail::Trail;
use crate::types::{Formula, Lit, Sign, State, Var};
use crate::varorder::VarOrder;

#[derive(Debug, Clone, Copy)]
struct Branch {
    var     : Var,
    flipped : bool,     // already tried true after false
}

/// Baseline DPLL: unit propagation, pure literals and chronological
/// backtracking, without learning. One open branch per decision level.
pub struct Dpll {
    clauses  : ClauseStore,
    trail    : Trail,
    order    : VarOrder,
    config   : SolverConfig,
    stats    : SolverStats,
    branches : Vec<Branch>,
    num_vars : usize,
}

impl Dpll {
    pub fn new(formula: &Formula, config: SolverConfig) -> Dpll {
        let num_vars = formula.num_vars();
        let mut order = VarOrder::new(num_vars, config.heuristic, config.decay);
        for v in formula.variables() {
            order.new_var(v);
        }

        Dpll {
            clauses: ClauseStore::from_formula(formula),
            trail: Trail::new(num_vars),
            order,
            config,
            stats: SolverStats::default(),
            branches: Vec::new(),
            num_vars,
        }
    }

    pub fn solve(mut self) -> Result<Outcome> {
        let result = self.run()?;
        info!("dpll: {} after {} conflicts, {} decisions", result, self.stats.conflicts, self.stats.decisions);
        Ok(Outcome { result, stats: self.stats })
    }

    // a literal whose variable occurs with one polarity only in the open clauses
    fn pure_literal(&self) -> Option<Lit> {
        let n = self.num_vars + 1;
        let mut pos = vec![false; n];
        let mut neg = vec![false; n];

        for clause in self.clauses.all() {
            if clause.state(&self.trail) == ClauseState::Satisfied {
                continue;
            }
            for &l in clause.lits() {
                if self.trail.state(l) == State::Undef {
                    if l.is_positive() { pos[l.var().index()] = true; } else { neg[l.var().index()] = true; }
                }
            }
        }

        (1..n).find(|&v| pos[v] != neg[v])
            .map(|v| Var::from_u32(v as u32).to_lit(Sign::from_bool(pos[v])))
    }

    // unit and pure literal rules to fixpoint
    fn simplify(&mut self) -> Option<ClauseRef> {
        loop {
            let before = self.trail.len();
            let confl = propagate(&self.clauses, &mut self.trail);
            self.stats.propagations += (self.trail.len() - before) as u64;
            if confl.is_some() {
                return confl;
            }

            match self.pure_literal() {
                Some(lit) => {
                    trace!("pure literal {lit}");
                    self.trail.assign(lit, None);
                    self.stats.propagations += 1;
                },
                None => return None,
            }
        }
    }

    // undo up to the most recent branch still open and take its true side
    fn backtrack(&mut self) -> bool {
        while let Some(branch) = self.branches.pop() {
            self.trail.backtrack(self.branches.len());
            if !branch.flipped {
                debug!("flipping {} to true at level {}", branch.var, self.branches.len() + 1);
                self.trail.decide(branch.var.to_lit(Sign::Pos));
                self.branches.push(Branch { var: branch.var, flipped: true });
                return true;
            }
        }
        false
    }

    fn run(&mut self) -> Result<SolveResult> {
        let start = ProcessTime::now();
        let limits = self.config.limits;

        loop {
            if limits.max_conflicts.map_or(false, |m| self.stats.conflicts >= m)
                || limits.timeout.map_or(false, |t| start.elapsed() >= t) {
                return Ok(SolveResult::Unknown);
            }

            if let Some(confl) = self.simplify() {
                self.stats.conflicts += 1;
                debug!("conflict at level {} in {}", self.trail.decision_level(), self.clauses.get(confl));

                if self.order.heuristic() == Heuristic::Vsids {
                    for l in self.clauses.get(confl).lits() {
                        self.order.bump(l.var());
                    }
                    self.order.decay();
                }

                if !self.backtrack() {
                    return Ok(SolveResult::Unsat);
                }
                continue;
            }

            if self.clauses.all_satisfied(&self.trail) {
                return Ok(SolveResult::Sat(self.trail.assignment()));
            }

            let lit = match self.order.pick_lit(&self.trail, &self.clauses) {
                Some(l) => l,
                None => return Err(Error::InternalInvariantViolation(
                    "no unassigned variable left but the formula is not satisfied".to_string()
                )),
            };
            self.branches.push(Branch { var: lit.var(), flipped: false });
            self.trail.decide(lit);
            self.stats.decisions += 1;
            self.stats.max_level = self.stats.max_level.max(self.trail.decision_level());
            debug!("decided {lit} at level {}", self.trail.decision_level());
        }
    }
}

pub fn solve(formula: &Formula, config: SolverConfig) -> Result<Outcome> {
    Dpll::new(formula, config).solve()
}
