use sudosat_lib::config::{Heuristic, SolverConfig};
use sudosat_lib::solver::Solver;
use sudosat_lib::types::{Assignment, Formula, Var};
use sudosat_lib::dpll;

fn random_3sat(rng: &fastrand::Rng, nvars: u32, nclauses: usize) -> Formula {
    let mut clauses = Vec::with_capacity(nclauses);
    for _ in 0..nclauses {
        let mut clause: Vec<i32> = Vec::with_capacity(3);
        while clause.len() < 3 {
            let v = rng.u32(1..=nvars) as i32;
            if clause.iter().all(|l| l.abs() != v) {
                clause.push(if rng.bool() { v } else { -v });
            }
        }
        clauses.push(clause);
    }
    Formula::from(clauses)
}

fn brute_force(formula: &Formula, nvars: u32) -> bool {
    (0..1u32 << nvars).any(|bits| {
        let assignment: Assignment = (1..=nvars)
            .map(|v| (Var::from_u32(v), bits & (1 << (v - 1)) != 0))
            .collect();
        assignment.satisfies_all(formula)
    })
}

#[test]
fn test_agrees_with_brute_force() {
    let rng = fastrand::Rng::with_seed(2023);
    let heuristics = [Heuristic::Naive, Heuristic::Vsids, Heuristic::Random { seed: 5 }];
    let mut sat = 0;

    for round in 0..60 {
        let nvars = 8;
        let formula = random_3sat(&rng, nvars, 20 + round % 25);
        let expected = brute_force(&formula, nvars);
        if expected {
            sat += 1;
        }

        for heuristic in heuristics {
            let config = SolverConfig::with_heuristic(heuristic);
            for outcome in [
                Solver::new(&formula, config).solve().unwrap(),
                dpll::solve(&formula, config).unwrap(),
            ] {
                assert_eq!(outcome.result.is_sat(), expected, "round {round}, {heuristic:?}");
                if let Some(assignment) = outcome.result.assignment() {
                    assert!(assignment.satisfies_all(&formula));
                }
            }
        }
    }
    // the clause/variable ratios cover both sides of the threshold
    assert!(sat > 0 && sat < 60);
}
