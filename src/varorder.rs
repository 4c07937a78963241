use crate::clause_db::ClauseStore;
use crate::config::Heuristic;
use crate::trail::Trail;
use crate::types::{Lit, Sign, Var};

/// Activity table and decision heuristic.
pub struct VarOrder {
    heuristic   : Heuristic,
    activity    : Vec<f64>,
    present     : Vec<bool>,            // variable appears in the formula
    decay       : f64,
    rng         : Option<fastrand::Rng>,
}

impl VarOrder {
    pub fn new(num_vars: usize, heuristic: Heuristic, decay: f64) -> VarOrder {
        let rng = match heuristic {
            Heuristic::Random { seed } => Some(fastrand::Rng::with_seed(seed)),
            _ => None,
        };
        VarOrder {
            heuristic,
            activity: vec![0.0; num_vars + 1],
            present: vec![false; num_vars + 1],
            decay,
            rng,
        }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn new_var(&mut self, var: Var) {
        self.present[var.index()] = true;
    }

    pub fn bump(&mut self, var: Var) {
        self.activity[var.index()] += 1.0;
    }

    pub fn decay(&mut self) {
        for val in self.activity.iter_mut() {
            *val *= self.decay;
        }
    }

    pub fn activity(&self, var: Var) -> f64 {
        self.activity[var.index()]
    }

    fn unassigned<'a>(&'a self, trail: &'a Trail) -> impl Iterator<Item = Var> + 'a {
        self.present.iter()
            .enumerate()
            .filter(|&(_, &p)| p)
            .map(|(v, _)| Var::from_u32(v as u32))
            .filter(move |&v| !trail.is_assigned(v))
    }

    // next branching variable, None when every variable of the formula is assigned
    pub fn pick(&mut self, trail: &Trail, clauses: &ClauseStore) -> Option<Var> {
        match self.heuristic {
            Heuristic::Naive => clauses.all().iter()
                .flat_map(|c| c.lits().iter())
                .map(|l| l.var())
                .find(|&v| !trail.is_assigned(v)),
            Heuristic::Vsids => {
                let mut best: Option<Var> = None;
                for v in self.unassigned(trail) {
                    // strict comparison keeps the lowest id on ties
                    match best {
                        Some(b) if self.activity(v) <= self.activity(b) => {},
                        _ => best = Some(v),
                    }
                }
                best
            },
            Heuristic::Random { .. } => {
                let vars: Vec<Var> = self.unassigned(trail).collect();
                if vars.is_empty() {
                    return None;
                }
                let i = match self.rng.as_ref() {
                    Some(rng) => rng.usize(..vars.len()),
                    None => 0,
                };
                Some(vars[i])
            },
        }
    }

    // decisions always try false first
    pub fn pick_lit(&mut self, trail: &Trail, clauses: &ClauseStore) -> Option<Lit> {
        self.pick(trail, clauses).map(|v| v.to_lit(Sign::Neg))
    }
}
