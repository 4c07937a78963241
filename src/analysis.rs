use log::trace;

use crate::clause_db::{ClauseRef, ClauseStore};
use crate::trail::Trail;
use crate::types::{Clause, Var};
use crate::varorder::VarOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Learnt { clause: Clause, backtrack_level: usize },
    // resolution produced the empty clause
    Refuted,
}

// picks the literal of `clause` propagated at `level` that was assigned last
fn pivot(clause: &Clause, trail: &Trail, level: usize) -> Option<(Var, ClauseRef)> {
    clause.lits().iter()
        .filter_map(|l| {
            let v = l.var();
            match (trail.level(v), trail.reason(v)) {
                (Some(lev), Some(reason)) if lev == level => Some((v, reason)),
                _ => None,
            }
        })
        .max_by_key(|&(v, _)| trail.position(v))
}

/// Merge-all conflict analysis.
///
/// Starting from the conflicting clause, resolves away every literal that was
/// propagated at the current decision level. What is left holds at most the
/// decision literal of the current level plus literals of lower levels; the
/// backtrack level is the highest of those lower levels, or 0.
///
/// Every variable resolved on, and every variable of the learned clause, gets
/// its activity bumped.
pub fn analyze(
    confl: ClauseRef,
    clauses: &ClauseStore,
    trail: &Trail,
    order: &mut VarOrder,
) -> Analysis {
    let current = trail.decision_level();
    let mut learnt: Clause = clauses.get(confl).clone();

    loop {
        let (var, reason) = match pivot(&learnt, trail, current) {
            Some(p) => p,
            None => break,
        };
        order.bump(var);
        let resolved = learnt.resolve(clauses.get(reason), var);
        trace!("resolving {learnt} with {} on {var}: {resolved}", clauses.get(reason));
        learnt = resolved;
    }

    debug_assert!(!learnt.is_tautology(), "learned a tautology: {learnt}");

    for l in learnt.lits() {
        order.bump(l.var());
    }

    if learnt.is_empty() {
        return Analysis::Refuted;
    }

    let backtrack_level = learnt.lits().iter()
        .filter_map(|l| trail.level(l.var()))
        .filter(|&lev| lev != current)
        .max()
        .unwrap_or(0);

    Analysis::Learnt { clause: learnt, backtrack_level }
}
