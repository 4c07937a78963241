use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};
use crate::types::{Assignment, Clause, Formula, Lit, Var};

pub const MAX_SIZE: usize = 35;

fn box_size(size: usize) -> Option<usize> {
    (1..=size).find(|b| b * b == size)
}

fn digit_char(v: usize) -> char {
    std::char::from_digit(v as u32, 36)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

/// A square grid of side `size` = `box_size`², cells hold digits 1..=size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    size     : usize,
    box_size : usize,
    cells    : Vec<Option<usize>>,
}

impl Sudoku {
    pub fn new(size: usize) -> Result<Sudoku> {
        if size == 0 || size > MAX_SIZE {
            return Err(Error::InvalidPuzzle(format!("unsupported size {size}")));
        }
        let b = box_size(size)
            .ok_or_else(|| Error::InvalidPuzzle(format!("size {size} is not a square")))?;
        Ok(Sudoku { size, box_size: b, cells: vec![None; size * size] })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn box_size(&self) -> usize {
        self.box_size
    }

    // rows and columns are 1-indexed
    pub fn get(&self, r: usize, c: usize) -> Option<usize> {
        self.cells[self.cell_index(r, c)]
    }

    pub fn set(&mut self, r: usize, c: usize, v: Option<usize>) {
        debug_assert!(v.map_or(true, |v| (1..=self.size).contains(&v)), "digit {v:?} out of range");
        let i = self.cell_index(r, c);
        self.cells[i] = v;
    }

    fn cell_index(&self, r: usize, c: usize) -> usize {
        debug_assert!((1..=self.size).contains(&r) && (1..=self.size).contains(&c), "cell ({r}, {c}) out of range");
        (r - 1) * self.size + (c - 1)
    }

    pub fn givens(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.cells.iter()
            .enumerate()
            .filter_map(move |(i, v)| v.map(|v| (i / self.size + 1, i % self.size + 1, v)))
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    // no digit twice in a row, column or box
    pub fn is_consistent(&self) -> bool {
        units(self.size, self.box_size).iter().all(|unit| {
            let mut seen = vec![false; self.size + 1];
            unit.iter().filter_map(|&(r, c)| self.get(r, c)).all(|v| {
                let fresh = !seen[v];
                seen[v] = true;
                fresh
            })
        })
    }

    pub fn is_solution_of(&self, puzzle: &Sudoku) -> bool {
        self.size == puzzle.size
            && self.is_complete()
            && self.is_consistent()
            && puzzle.givens().all(|(r, c, v)| self.get(r, c) == Some(v))
    }

    // the single line form accepted by `from_str`
    pub fn to_line(&self) -> String {
        self.cells.iter()
            .map(|v| v.map_or('.', digit_char))
            .collect()
    }
}

impl FromStr for Sudoku {
    type Err = Error;

    fn from_str(s: &str) -> Result<Sudoku> {
        let chars: Vec<char> = s.trim().chars().collect();
        let size = (1..=MAX_SIZE).find(|n| n * n == chars.len())
            .ok_or_else(|| Error::InvalidPuzzle(format!("{} cells is not a square grid", chars.len())))?;

        let mut sudoku = Sudoku::new(size)?;
        for (i, ch) in chars.into_iter().enumerate() {
            let v = match ch {
                '.' | '0' => None,
                _ => match ch.to_digit(36) {
                    Some(d) if (d as usize) <= size => Some(d as usize),
                    _ => return Err(Error::InvalidPuzzle(format!("bad cell '{ch}' at position {i}"))),
                },
            };
            sudoku.cells[i] = v;
        }
        Ok(sudoku)
    }
}

impl fmt::Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 1..=self.size {
            let row: Vec<String> = (1..=self.size)
                .map(|c| self.get(r, c).map_or('.', digit_char).to_string())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// Cell/digit to variable numbering in base `size + 1`:
/// `var(r, c, v) = r*(size+1)^2 + c*(size+1) + v`. For 9x9 grids this is the
/// usual `rcv` decimal numbering, for larger grids it stays collision free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    size : usize,
    base : usize,
}

impl Encoding {
    pub fn new(size: usize) -> Encoding {
        Encoding { size, base: size + 1 }
    }

    pub fn var(&self, r: usize, c: usize, v: usize) -> Var {
        debug_assert!((1..=self.size).contains(&r) && (1..=self.size).contains(&c) && (1..=self.size).contains(&v));
        Var::from_u32((r * self.base * self.base + c * self.base + v) as u32)
    }

    pub fn lit(&self, r: usize, c: usize, v: usize, value: bool) -> Lit {
        let l = Lit::from_i32(self.var(r, c, v).to_u32() as i32);
        if value { l } else { -l }
    }

    pub fn decode(&self, var: Var) -> Option<(usize, usize, usize)> {
        let id = var.index();
        let v = id % self.base;
        let c = (id / self.base) % self.base;
        let r = id / (self.base * self.base);
        let range = 1..=self.size;
        if range.contains(&r) && range.contains(&c) && range.contains(&v) {
            Some((r, c, v))
        } else {
            None
        }
    }

    pub fn num_vars(&self) -> usize {
        self.var(self.size, self.size, self.size).index()
    }
}

// rows, columns and boxes as lists of cells
fn units(size: usize, b: usize) -> Vec<Vec<(usize, usize)>> {
    let mut units = Vec::with_capacity(3 * size);
    for r in 1..=size {
        units.push((1..=size).map(|c| (r, c)).collect());
    }
    for c in 1..=size {
        units.push((1..=size).map(|r| (r, c)).collect());
    }
    for br in 0..b {
        for bc in 0..b {
            units.push((0..size).map(|i| (br * b + i / b + 1, bc * b + i % b + 1)).collect());
        }
    }
    units
}

fn exactly_one(lits: &[Lit], clauses: &mut Vec<Clause>) {
    clauses.push(Clause::from_lits(lits.to_vec()));
    for (i, &l) in lits.iter().enumerate() {
        for &k in &lits[i + 1..] {
            clauses.push(Clause::from_lits(vec![-l, -k]));
        }
    }
}

/// The rules of the game: every cell holds exactly one digit, every row,
/// column and box holds every digit exactly once.
pub fn rules(size: usize) -> Result<Vec<Clause>> {
    let b = box_size(size)
        .ok_or_else(|| Error::InvalidPuzzle(format!("size {size} is not a square")))?;
    let enc = Encoding::new(size);
    let mut clauses = Vec::new();

    for r in 1..=size {
        for c in 1..=size {
            let lits: Vec<Lit> = (1..=size).map(|v| enc.lit(r, c, v, true)).collect();
            exactly_one(&lits, &mut clauses);
        }
    }

    for unit in units(size, b) {
        for v in 1..=size {
            let lits: Vec<Lit> = unit.iter().map(|&(r, c)| enc.lit(r, c, v, true)).collect();
            exactly_one(&lits, &mut clauses);
        }
    }

    Ok(clauses)
}

// givens as unit clauses, followed by the rules
pub fn encode(sudoku: &Sudoku) -> Result<Formula> {
    let enc = Encoding::new(sudoku.size);
    let mut formula = Formula::new();
    for (r, c, v) in sudoku.givens() {
        formula.push(Clause::from_lits(vec![enc.lit(r, c, v, true)]));
    }
    for clause in rules(sudoku.size)? {
        formula.push(clause);
    }
    Ok(formula)
}

// places every true cell variable of `assignment` on an empty grid
pub fn decode(size: usize, assignment: &Assignment) -> Result<Sudoku> {
    let enc = Encoding::new(size);
    let mut sudoku = Sudoku::new(size)?;
    for l in assignment.lits().filter(|l| l.is_positive()) {
        if let Some((r, c, v)) = enc.decode(l.var()) {
            if let Some(w) = sudoku.get(r, c) {
                return Err(Error::InvalidPuzzle(format!("cell ({r}, {c}) holds both {w} and {v}")));
            }
            sudoku.set(r, c, Some(v));
        }
    }
    Ok(sudoku)
}

/// Reads one puzzle per line, returning each with its 1-based line number.
/// Lines that are not a valid puzzle are reported and skipped.
pub fn read_puzzles<R: Read>(input: R) -> Result<Vec<(usize, Sudoku)>> {
    let mut puzzles = Vec::new();
    for (i, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Sudoku>() {
            Ok(sudoku) => puzzles.push((i + 1, sudoku)),
            Err(e) => warn!("skipping line {}: {}", i + 1, e),
        }
    }
    Ok(puzzles)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nine_by_nine_numbering() {
        let enc = Encoding::new(9);
        assert_eq!(enc.var(1, 1, 1), Var::from_u32(111));
        assert_eq!(enc.var(9, 3, 7), Var::from_u32(937));
        assert_eq!(enc.decode(Var::from_u32(524)), Some((5, 2, 4)));
        assert_eq!(enc.decode(Var::from_u32(520)), None);
        assert_eq!(enc.num_vars(), 999);
    }

    #[test]
    fn test_sixteen_by_sixteen_collision_free() {
        let enc = Encoding::new(16);
        let mut seen = HashSet::new();
        for r in 1..=16 {
            for c in 1..=16 {
                for v in 1..=16 {
                    let var = enc.var(r, c, v);
                    assert!(seen.insert(var));
                    assert_eq!(enc.decode(var), Some((r, c, v)));
                }
            }
        }
        assert_eq!(seen.len(), 4096);
    }

    #[test]
    fn test_parse_puzzle() {
        let sudoku: Sudoku = "1.3.0.1.........".parse().unwrap();
        assert_eq!(sudoku.size(), 4);
        assert_eq!(sudoku.box_size(), 2);
        assert_eq!(sudoku.get(1, 1), Some(1));
        assert_eq!(sudoku.get(1, 2), None);
        assert_eq!(sudoku.get(1, 3), Some(3));
        assert_eq!(sudoku.get(2, 1), None);
        assert_eq!(sudoku.get(2, 3), Some(1));
        assert_eq!(sudoku.givens().collect::<Vec<_>>(), vec![(1, 1, 1), (1, 3, 3), (2, 3, 1)]);
        assert_eq!(sudoku.to_line(), "1.3...1.........");
    }

    #[test]
    #[should_panic]
    fn test_get_row_zero() {
        let sudoku = Sudoku::new(4).unwrap();
        sudoku.get(0, 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_set_digit_too_large() {
        let mut sudoku = Sudoku::new(4).unwrap();
        sudoku.set(1, 1, Some(5));
    }

    #[test]
    fn test_parse_letters() {
        let line = format!("G{}", ".".repeat(255));
        let sudoku: Sudoku = line.parse().unwrap();
        assert_eq!(sudoku.size(), 16);
        assert_eq!(sudoku.get(1, 1), Some(16));
        assert_eq!(sudoku.to_line(), line);
    }

    #[test]
    fn test_invalid_puzzles() {
        for line in ["123", "5...............", "1.3.x...........", ".".repeat(36).as_str()] {
            assert!(matches!(line.parse::<Sudoku>(), Err(Error::InvalidPuzzle(_))), "{line}");
        }
    }

    #[test]
    fn test_rules_count() {
        // 4 * n^2 exactly-one groups of n literals
        let clauses = rules(4).unwrap();
        assert_eq!(clauses.len(), 4 * 16 * (1 + 6));
        assert_eq!(rules(9).unwrap().len(), 4 * 81 * (1 + 36));
        assert!(rules(6).is_err());
    }

    #[test]
    fn test_consistency() {
        let good: Sudoku = "1234341221434321".parse().unwrap();
        assert!(good.is_complete());
        assert!(good.is_consistent());
        let bad: Sudoku = "1234341221434312".parse().unwrap();
        assert!(!bad.is_consistent());
    }

    #[test]
    fn test_decode() {
        let enc = Encoding::new(4);
        let assignment: Assignment = [
            (enc.var(1, 1, 2), true),
            (enc.var(1, 1, 3), false),
            (enc.var(4, 4, 4), true),
        ].into_iter().collect();
        let sudoku = decode(4, &assignment).unwrap();
        assert_eq!(sudoku.get(1, 1), Some(2));
        assert_eq!(sudoku.get(4, 4), Some(4));
        assert_eq!(sudoku.givens().count(), 2);
    }

    #[test]
    fn test_read_puzzles_skips_bad_lines() {
        let input = "1234341221434321\nnot a puzzle\n\n................\n";
        let puzzles = read_puzzles(input.as_bytes()).unwrap();
        assert_eq!(puzzles.iter().map(|(n, _)| *n).collect::<Vec<usize>>(), vec![1, 4]);
    }
}
