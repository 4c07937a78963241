use log::trace;

use crate::clause_db::{ClauseRef, ClauseState, ClauseStore};
use crate::trail::Trail;

// Boolean constraint propagation by repeated passes over the store, in store
// order. A unit assignment is visible to every later clause of the same pass,
// the first conflicting clause ends propagation. Returns the conflict, or
// None once a whole pass assigns nothing.
pub fn propagate(clauses: &ClauseStore, trail: &mut Trail) -> Option<ClauseRef> {
    loop {
        let mut progress = false;

        for (cref, clause) in clauses.iter() {
            match clause.state(trail) {
                ClauseState::Satisfied | ClauseState::Unresolved => {},
                ClauseState::Unit(lit) => {
                    trail.assign(lit, Some(cref));
                    trace!("propagated {lit} at level {} from {cref}", trail.decision_level());
                    progress = true;
                },
                ClauseState::Conflicting => {
                    trace!("conflict in {cref}: {clause}");
                    return Some(cref);
                },
            }
        }

        if !progress {
            return None;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{Formula, Lit, Var};

    fn store(clauses: Vec<Vec<i32>>) -> ClauseStore {
        ClauseStore::from_formula(&Formula::from(clauses))
    }

    #[test]
    fn test_propagation() {
        let clauses = store(vec![vec![1, 2], vec![-1]]);
        let mut trail = Trail::new(2);
        assert_eq!(propagate(&clauses, &mut trail), None);
        assert_eq!(trail.lits(), &[Lit::from_i32(-1), Lit::from_i32(2)]);
        assert_eq!(trail.reason(Var::from_u32(1)), Some(ClauseRef(1)));
        assert_eq!(trail.reason(Var::from_u32(2)), Some(ClauseRef(0)));
    }

    #[test]
    fn test_same_pass_sees_new_assignment() {
        // clause 0 forces 1, which makes clause 1 unit in the same pass
        let clauses = store(vec![vec![1], vec![-1, 2], vec![-2, 3]]);
        let mut trail = Trail::new(3);
        assert_eq!(propagate(&clauses, &mut trail), None);
        assert_eq!(trail.lits(), &[Lit::from_i32(1), Lit::from_i32(2), Lit::from_i32(3)]);
        assert!(trail.lits().iter().all(|l| trail.level(l.var()) == Some(0)));
    }

    #[test]
    fn test_unit_ties_broken_by_store_order() {
        // both clauses are unit on variable 2 after deciding -1: the first one wins
        let clauses = store(vec![vec![1, 2, 3], vec![1, 2], vec![1, -2]]);
        let mut trail = Trail::new(3);
        trail.decide(Lit::from_i32(-3));
        trail.assign(Lit::from_i32(-1), None);
        let confl = propagate(&clauses, &mut trail);
        assert_eq!(trail.reason(Var::from_u32(2)), Some(ClauseRef(0)));
        assert_eq!(confl, Some(ClauseRef(2)));
    }

    #[test]
    fn test_conflict_propagation() {
        let clauses = store(vec![vec![1, 2], vec![-2, 1], vec![-1]]);
        let mut trail = Trail::new(2);
        let confl = propagate(&clauses, &mut trail);
        assert_eq!(confl, Some(ClauseRef(1)));
    }

    #[test]
    fn test_first_conflict_reported() {
        let clauses = store(vec![vec![-1, 2], vec![-1, -2], vec![-1, 3], vec![-1, -3]]);
        let mut trail = Trail::new(3);
        trail.decide(Lit::from_i32(1));
        assert_eq!(propagate(&clauses, &mut trail), Some(ClauseRef(1)));
        assert!(!trail.is_assigned(Var::from_u32(3)));
    }
}
