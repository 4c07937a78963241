use std::time::Duration;

pub const DEFAULT_DECAY: f64 = 0.95;

/// Decision heuristic, chosen once per solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// first unassigned variable in clause store order
    #[default]
    Naive,
    /// highest activity score, ties to the lowest variable id
    Vsids,
    /// uniform choice among unassigned variables
    Random { seed: u64 },
}

/// Budget imposed by the caller; exceeding it ends the solve without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    pub max_conflicts: Option<u64>,
    pub timeout: Option<Duration>,    // process cpu time
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub heuristic : Heuristic,
    pub decay     : f64,
    pub limits    : Limits,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            heuristic: Heuristic::Naive,
            decay: DEFAULT_DECAY,
            limits: Limits::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_heuristic(heuristic: Heuristic) -> SolverConfig {
        SolverConfig { heuristic, ..SolverConfig::default() }
    }

    pub fn vsids(use_vsids: bool) -> SolverConfig {
        SolverConfig::with_heuristic(if use_vsids { Heuristic::Vsids } else { Heuristic::Naive })
    }
}
