use std::fmt;

use crate::clause_db::ClauseRef;
use crate::types::{Assignment, Lit, Sign, State, Var};

/// Partial assignment with, per assigned variable, its decision level and
/// (if it was propagated) its antecedent clause.
///
/// Assignments are kept in the order they were made, so the entries of a
/// level always follow the entries of lower levels and backtracking is a
/// pop from the end.
#[derive(Debug)]
pub struct Trail {
    model   : Vec<Sign>,
    level   : Vec<usize>,
    reason  : Vec<Option<ClauseRef>>,
    index   : Vec<usize>,            // position of each assigned variable in `trail`
    trail   : Vec<Lit>,
    lim     : Vec<usize>,            // trail length at the start of each decision level
}

impl Trail {
    pub fn new(num_vars: usize) -> Trail {
        Trail {
            model: vec![Sign::Undef; num_vars + 1],
            level: vec![0; num_vars + 1],
            reason: vec![None; num_vars + 1],
            index: vec![0; num_vars + 1],
            trail: Vec::new(),
            lim: Vec::new(),
        }
    }

    pub fn decision_level(&self) -> usize {
        self.lim.len()
    }

    pub fn value(&self, var: Var) -> Sign {
        self.model[var.index()]
    }

    pub fn state(&self, lit: Lit) -> State {
        match self.value(lit.var()) {
            Sign::Undef => State::Undef,
            s => if s == lit.sign() { State::Sat } else { State::Unsat },
        }
    }

    pub fn is_assigned(&self, var: Var) -> bool {
        self.value(var) != Sign::Undef
    }

    pub fn level(&self, var: Var) -> Option<usize> {
        if self.is_assigned(var) { Some(self.level[var.index()]) } else { None }
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        if self.is_assigned(var) { self.reason[var.index()] } else { None }
    }

    // position on the trail, later assignments have larger positions
    pub fn position(&self, var: Var) -> Option<usize> {
        if self.is_assigned(var) { Some(self.index[var.index()]) } else { None }
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn lits(&self) -> &[Lit] {
        &self.trail
    }

    // makes `lit` true at the current decision level
    pub fn assign(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        let v = lit.var().index();
        debug_assert!(self.model[v] == Sign::Undef, "variable {} assigned twice", lit.var());
        self.model[v] = lit.sign();
        self.level[v] = self.decision_level();
        self.reason[v] = reason;
        self.index[v] = self.trail.len();
        self.trail.push(lit);
    }

    // opens a new decision level with `lit` as its decision
    pub fn decide(&mut self, lit: Lit) {
        self.lim.push(self.trail.len());
        self.assign(lit, None);
    }

    fn undo_one(&mut self) {
        if let Some(lit) = self.trail.pop() {
            let v = lit.var().index();
            self.model[v] = Sign::Undef;
            self.reason[v] = None;
        }
    }

    // removes every entry whose level exceeds `lev`, returns how many were removed
    pub fn backtrack(&mut self, lev: usize) -> usize {
        let mut removed = 0;
        while let Some(&lit) = self.trail.last() {
            if self.level[lit.var().index()] <= lev {
                break;
            }
            self.undo_one();
            removed += 1;
        }
        self.lim.truncate(lev);
        removed
    }

    pub fn assignment(&self) -> Assignment {
        self.trail.iter()
            .map(|l| (l.var(), l.is_positive()))
            .collect()
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lev = 0;
        write!(f, "[")?;
        for lit in self.trail.iter() {
            let l = self.level[lit.var().index()];
            if l != lev {
                write!(f, "]\n[")?;
                lev = l;
            }
            match self.reason[lit.var().index()] {
                Some(_) => write!(f, "{}, ", lit)?,
                None => write!(f, "{}*, ", lit)?,
            }
        }
        write!(f, "]")
    }
}
