use std::fmt;

use crate::trail::Trail;
use crate::types::{Clause, Formula, Lit, State};

/// Stable handle to a clause: its position in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseRef(pub usize);

impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    Satisfied,
    Unit(Lit),
    Conflicting,
    Unresolved,     // two or more unassigned literals
}

impl Clause {
    pub fn state(&self, trail: &Trail) -> ClauseState {
        let mut unassigned: Option<Lit> = None;
        let mut count = 0;
        for &l in self.lits() {
            match trail.state(l) {
                State::Sat => return ClauseState::Satisfied,
                State::Undef => {
                    count += 1;
                    unassigned.get_or_insert(l);
                },
                State::Unsat => {},
            }
        }
        match (count, unassigned) {
            (0, _) => ClauseState::Conflicting,
            (1, Some(l)) => ClauseState::Unit(l),
            _ => ClauseState::Unresolved,
        }
    }

    pub fn is_satisfied(&self, trail: &Trail) -> bool {
        self.lits().iter().any(|&l| trail.state(l) == State::Sat)
    }
}

/// Append-only store of original and learned clauses.
#[derive(Debug, Default)]
pub struct ClauseStore {
    clauses  : Vec<Clause>,
    original : usize,
}

impl ClauseStore {
    pub fn new() -> ClauseStore {
        ClauseStore { clauses: Vec::new(), original: 0 }
    }

    pub fn from_formula(formula: &Formula) -> ClauseStore {
        let mut store = ClauseStore::new();
        for clause in formula.clauses() {
            store.add(clause.clone());
        }
        store.original = store.len();
        store
    }

    pub fn add(&mut self, clause: Clause) -> ClauseRef {
        self.clauses.push(clause);
        ClauseRef(self.clauses.len() - 1)
    }

    pub fn get(&self, cref: ClauseRef) -> &Clause {
        &self.clauses[cref.0]
    }

    pub fn all(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseRef, &Clause)> + '_ {
        self.clauses.iter().enumerate().map(|(i, c)| (ClauseRef(i), c))
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn num_original(&self) -> usize {
        self.original
    }

    pub fn num_learnt(&self) -> usize {
        self.clauses.len() - self.original
    }

    pub fn all_satisfied(&self, trail: &Trail) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied(trail))
    }
}
