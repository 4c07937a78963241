use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{Assignment, Clause, Formula, Lit};

/// Largest variable id accepted by the reader. Solver state is sized by the
/// largest id, not by the number of distinct variables.
pub const MAX_VAR: u32 = 1 << 22;

// `p cnf <vars> <clauses>`
fn parse_problem_line(line: &str, lineno: usize) -> Result<(usize, usize)> {
    let elems: Vec<&str> = line.split_whitespace().collect();
    if elems.len() != 4 || elems[1] != "cnf" {
        return Err(Error::malformed(lineno, format!("bad problem line '{line}'")));
    }
    let nvars = elems[2].parse()
        .map_err(|_| Error::malformed(lineno, format!("bad variable count '{}'", elems[2])))?;
    let nclauses = elems[3].parse()
        .map_err(|_| Error::malformed(lineno, format!("bad clause count '{}'", elems[3])))?;
    Ok((nvars, nclauses))
}

/// Reads a CNF formula in DIMACS format.
///
/// Comment lines start with `c`, a line starting with `%` ends the input.
/// Clauses are terminated by `0` and may span several lines. The problem line
/// is only checked against what was actually read.
pub fn parse<R: Read>(input: R) -> Result<Formula> {
    let reader = BufReader::new(input);

    let mut header: Option<(usize, usize)> = None;
    let mut formula = Formula::new();
    let mut pending: Vec<Lit> = Vec::new();
    let mut lineno = 0;

    for line in reader.lines() {
        let line = line?;
        lineno += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        } else if line.starts_with('%') {
            break;
        } else if line.starts_with('p') {
            header = Some(parse_problem_line(line, lineno)?);
            continue;
        }

        for token in line.split_whitespace() {
            let lit: i32 = token.parse()
                .map_err(|_| Error::malformed(lineno, format!("'{token}' is not a literal")))?;
            if lit.unsigned_abs() > MAX_VAR {
                return Err(Error::malformed(lineno, format!("variable {} exceeds {}", lit.unsigned_abs(), MAX_VAR)));
            } else if lit != 0 {
                pending.push(Lit::from_i32(lit));
            } else if pending.is_empty() {
                return Err(Error::malformed(lineno, "empty clause"));
            } else {
                formula.push(Clause::from_lits(std::mem::take(&mut pending)));
            }
        }
    }

    if !pending.is_empty() {
        return Err(Error::malformed(lineno, "last clause is not terminated by 0"));
    }
    if formula.is_empty() {
        return Err(Error::malformed(lineno, "no clauses"));
    }

    match header {
        Some((nvars, nclauses)) => {
            if nclauses != formula.len() {
                warn!("problem line declares {} clauses, found {}", nclauses, formula.len());
            }
            if nvars < formula.num_vars() {
                warn!("problem line declares {} variables, found variable {}", nvars, formula.num_vars());
            }
        },
        None => debug!("no problem line"),
    }

    Ok(formula)
}

pub fn parse_str(s: &str) -> Result<Formula> {
    parse(s.as_bytes())
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Formula> {
    parse(File::open(path)?)
}

pub fn write_formula<W: Write>(formula: &Formula, out: &mut W) -> Result<()> {
    writeln!(out, "p cnf {} {}", formula.num_vars(), formula.len())?;
    for clause in formula.clauses() {
        for l in clause.lits() {
            write!(out, "{} ", l)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

// one `<literal> 0` line per assigned variable
pub fn write_assignment<W: Write>(assignment: &Assignment, out: &mut W) -> Result<()> {
    for l in assignment.lits() {
        writeln!(out, "{} 0", l)?;
    }
    Ok(())
}

/// `foo/bar.cnf` -> `foo/bar.out`
pub fn output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("out")
}
