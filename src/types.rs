use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Neg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

// value of a variable on the trail
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sign { Pos, Neg, Undef, }

// value of a literal on the trail
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State { Sat, Unsat, Undef, }

impl Var {
    pub fn from_u32(v: u32) -> Var {
        debug_assert!(v > 0, "variable ids start at 1");
        Var(v)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_lit(self, sign: Sign) -> Lit {
        match sign {
            Sign::Neg => Lit(-(self.0 as i32)),
            _ => Lit(self.0 as i32),
        }
    }
}

impl Lit {
    pub fn from_i32(l: i32) -> Lit {
        debug_assert!(l != 0 && l != i32::MIN, "{l} is not a literal");
        Lit(l)
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn sign(self) -> Sign {
        if self.0 > 0 { Sign::Pos } else { Sign::Neg }
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl Sign {
    pub fn from_bool(b: bool) -> Sign {
        if b { Sign::Pos } else { Sign::Neg }
    }

}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A disjunction of distinct literals, kept in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    lits : Box<[Lit]>
}

impl Clause {
    pub fn from_lits(lits: Vec<Lit>) -> Clause {
        let mut seen: HashSet<Lit> = HashSet::with_capacity(lits.len());
        let lits: Vec<Lit> = lits.into_iter().filter(|&l| seen.insert(l)).collect();
        Clause { lits: lits.into_boxed_slice() }
    }

    pub fn from_i32s(lits: &[i32]) -> Clause {
        Clause::from_lits(lits.iter().map(|&l| Lit::from_i32(l)).collect())
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn contains(&self, lit: Lit) -> bool {
        self.lits.contains(&lit)
    }

    pub fn is_tautology(&self) -> bool {
        self.lits.iter().any(|&l| self.contains(-l))
    }

    // union of both clauses minus the complementary pair on `var`
    pub fn resolve(&self, other: &Clause, var: Var) -> Clause {
        let lits: Vec<Lit> = self.lits.iter()
            .chain(other.lits.iter())
            .filter(|l| l.var() != var)
            .copied()
            .collect();
        Clause::from_lits(lits)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, l) in self.lits.iter().enumerate() {
            if i > 0 { write!(f, " ")?; }
            write!(f, "{}", l)?;
        }
        write!(f, ")")
    }
}

/// An ordered sequence of clauses, as loaded from the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new() -> Formula {
        Formula { clauses: Vec::new() }
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Formula {
        Formula { clauses }
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // largest variable id, the dense range is 1..=num_vars
    pub fn num_vars(&self) -> usize {
        self.clauses.iter()
            .flat_map(|c| c.lits().iter())
            .map(|l| l.var().index())
            .max()
            .unwrap_or(0)
    }

    // variables that appear in at least one clause, ascending
    pub fn variables(&self) -> Vec<Var> {
        let mut seen = vec![false; self.num_vars() + 1];
        for l in self.clauses.iter().flat_map(|c| c.lits().iter()) {
            seen[l.var().index()] = true;
        }
        seen.iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(v, _)| Var::from_u32(v as u32))
            .collect()
    }
}

impl From<Vec<Vec<i32>>> for Formula {
    fn from(clauses: Vec<Vec<i32>>) -> Formula {
        Formula::from_clauses(clauses.iter().map(|c| Clause::from_i32s(c)).collect())
    }
}

/// Partial mapping from variables to truth values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<Var, bool>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment { values: BTreeMap::new() }
    }

    pub fn insert(&mut self, var: Var, value: bool) {
        self.values.insert(var, value);
    }

    pub fn value(&self, var: Var) -> Option<bool> {
        self.values.get(&var).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // assigned literals in ascending variable order
    pub fn lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values.iter().map(|(&v, &b)| v.to_lit(Sign::from_bool(b)))
    }

    pub fn satisfies(&self, clause: &Clause) -> bool {
        clause.lits().iter().any(|&l| self.value(l.var()) == Some(l.is_positive()))
    }

    pub fn satisfies_all(&self, formula: &Formula) -> bool {
        formula.clauses().iter().all(|c| self.satisfies(c))
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Assignment {
        Assignment { values: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lit_var() {
        let l = Lit::from_i32(-7);
        assert_eq!(l.var(), Var::from_u32(7));
        assert_eq!(l.sign(), Sign::Neg);
        assert_eq!(-l, Lit::from_i32(7));
        assert_eq!(-(-l), l);
        assert_eq!(Var::from_u32(7).to_lit(Sign::Neg), l);
    }

    #[test]
    fn test_clause_duplicates_collapse() {
        let clause = Clause::from_i32s(&[3, 1, 3, -2, 1]);
        assert_eq!(clause.lits(), Clause::from_i32s(&[3, 1, -2]).lits());
        assert!(!clause.is_tautology());
        assert!(Clause::from_i32s(&[1, 2, -1]).is_tautology());
    }

    #[test]
    fn test_long_clause_keeps_first_occurrence_order() {
        let lits: Vec<i32> = (1..=2000).rev().chain(1..=2000).collect();
        let clause = Clause::from_i32s(&lits);
        assert_eq!(clause.len(), 2000);
        assert_eq!(clause.lits()[0], Lit::from_i32(2000));
        assert_eq!(clause.lits()[1999], Lit::from_i32(1));
    }

    #[test]
    fn test_resolve() {
        let left = Clause::from_i32s(&[1, -2, 3]);
        let right = Clause::from_i32s(&[2, 3, -4]);
        let out = left.resolve(&right, Var::from_u32(2));
        assert_eq!(out, Clause::from_i32s(&[1, 3, -4]));
    }

    #[test]
    fn test_formula_variables() {
        let formula = Formula::from(vec![vec![1, -5], vec![3]]);
        assert_eq!(formula.num_vars(), 5);
        assert_eq!(formula.variables(), [1, 3, 5].into_iter().map(Var::from_u32).collect::<Vec<Var>>());
    }

    #[test]
    fn test_assignment_satisfies() {
        let assignment: Assignment = [(Var::from_u32(1), false), (Var::from_u32(2), true)]
            .into_iter()
            .collect();
        assert!(assignment.satisfies(&Clause::from_i32s(&[-1, 3])));
        assert!(!assignment.satisfies(&Clause::from_i32s(&[1, -2])));
        assert_eq!(assignment.lits().map(Lit::to_i32).collect::<Vec<i32>>(), vec![-1, 2]);
    }
}
