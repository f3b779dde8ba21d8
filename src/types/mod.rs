//! Module `types` provides various building blocks, including
//! some common traits.

/// methods on flags used in Var and Clause
pub mod flags;
/// methods on literals
pub mod lit;

pub use self::{flags::*, lit::*};

pub use crate::{
    assign::AssignReason,
    cdb::ClauseRef,
    config::Config,
    primitive::{Ema, Ema2, EmaIF},
};

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// 'Variable' identifier or 'variable' index, starting with one.
pub type VarId = usize;

/// Decision Level Representation.
pub type DecisionLevel = u32;

/// Capture a conflict: the falsified literal and the clause it fell out of.
pub type ConflictContext = (Lit, AssignReason);

/// Return type of unit propagation.
pub type PropagationResult = Result<(), ConflictContext>;

/// API for reward based activity management.
pub trait ActivityIF<Ix> {
    /// return one's activity.
    fn activity(&self, ix: Ix) -> f64;
    /// set activity
    fn set_activity(&mut self, ix: Ix, val: f64);
    /// modify one's activity at conflict analysis.
    fn reward_at_analysis(&mut self, _ix: Ix) {}
    /// update reward decay.
    fn update_activity_decay(&mut self, _decay: f64) {}
    /// decay activities or increase the increment step.
    fn update_activity_tick(&mut self) {}
}

/// API for object instantiation based on `Config` and `CNFDescription`.
/// This is implemented by all the solver modules except `Config` and
/// `CNFDescription` themselves.
pub trait Instantiate {
    /// make and return an object from `Config` and `CNFDescription`.
    fn instantiate(conf: &Config, cnf: &CNFDescription) -> Self;
    /// update by a solver event.
    fn handle(&mut self, _e: SolverEvent) {}
}

/// API for O(n) deletion from a list, providing `delete_unstable`.
pub trait Delete<T> {
    /// *O(n)* item deletion protocol.
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool;
}

impl<T> Delete<T> for Vec<T> {
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool,
    {
        if let Some(i) = self.iter().position(filter) {
            self.swap_remove(i);
        }
    }
}

/// Events across solver modules; the argument of `Instantiate::handle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverEvent {
    /// a new variable was allocated.
    NewVar,
    /// a var was asserted at the root level.
    Assert(VarId),
    /// a conflict was found.
    Conflict,
    /// restart executed.
    Restart,
    /// a var was eliminated by the simplifier.
    Eliminate(VarId),
    /// a var was collapsed onto its equivalence-class representative.
    Replace(VarId),
    /// a var was moved into a sub-solver by the component splitter.
    Decompose(VarId),
    /// restore the caller-facing state for another `solve` call.
    Reinitialize,
}

/// A reference to a clause. Long clauses live in the arena; binary and
/// ternary ones exist only as watch entries and are reported by kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefClause {
    /// a long clause was stored in the arena.
    Clause(ClauseRef),
    /// the clause became a pair of binary watch entries.
    Binary,
    /// the clause became a triple of ternary watch entries.
    Ternary,
    /// an identical implicit clause was already attached.
    RegisteredClause,
    /// the clause collapsed to a unit.
    UnitClause(Lit),
    /// the clause was satisfied or tautological; nothing was stored.
    Dead,
    /// the clause shrank to nothing; the formula is unsatisfiable.
    EmptyClause,
}

/// Internal errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// a given CNF contains an empty clause or derives one while loading.
    EmptyClause,
    /// a clause contains a literal out of range; '0' is an example.
    InvalidLiteral,
    /// an eliminated or otherwise removed variable was used again.
    RemovedVariable,
    /// exceptions caused by file operations.
    IOError,
    /// UNSAT without further context.
    Inconsistent,
    OutOfMemory,
    /// UNSAT found by propagation at the root level.
    RootLevelConflict(ConflictContext),
    TimeOut,
    /// the caller raised the interrupt flag.
    Interrupted,
    SolverBug,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A return type used by solver functions.
pub type MaybeInconsistent = Result<(), SolverError>;

/// CNF locator
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CNFIndicator {
    /// not specified
    #[default]
    Void,
    /// from a file
    File(String),
    /// embedded directly
    LitVec(usize),
}

impl fmt::Display for CNFIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CNFIndicator::Void => write!(f, "(no CNF specified)"),
            CNFIndicator::File(file) => write!(f, "CNF file({file})"),
            CNFIndicator::LitVec(n) => write!(f, "a vec({n} clauses)"),
        }
    }
}

/// Data storage about a problem.
#[derive(Clone, Debug, Default)]
pub struct CNFDescription {
    pub num_of_variables: usize,
    pub num_of_clauses: usize,
    pub pathname: CNFIndicator,
}

impl fmt::Display for CNFDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let CNFDescription {
            num_of_variables: nv,
            num_of_clauses: nc,
            pathname: path,
        } = &self;
        write!(f, "CNF({nv}, {nc}, {path})")
    }
}

impl<V: AsRef<[i32]>> From<&[V]> for CNFDescription {
    fn from(vec: &[V]) -> Self {
        let num_of_variables = vec
            .iter()
            .map(|clause| clause.as_ref().iter().map(|l| l.abs()).max().unwrap_or(0))
            .max()
            .unwrap_or(0) as usize;
        CNFDescription {
            num_of_variables,
            num_of_clauses: vec.len(),
            pathname: CNFIndicator::LitVec(vec.len()),
        }
    }
}

/// A wrapper structure to make a CNFDescription from a file.
/// To make CNFDescription clone-able, a BufReader should be separated from it.
/// If you want to make a CNFDescription which isn't connected to a file,
/// just call `CNFDescription::default()` directly.
#[derive(Debug)]
pub struct CNFReader {
    pub cnf: CNFDescription,
    pub reader: BufReader<File>,
}

impl TryFrom<&Path> for CNFReader {
    type Error = SolverError;
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let pathname = if path.to_string_lossy().is_empty() {
            "--".to_string()
        } else {
            path.file_name()
                .map_or("aStrangeNamed".to_string(), |f| {
                    f.to_string_lossy().into_owned()
                })
        };
        let fs = File::open(path).map_or(Err(SolverError::IOError), Ok)?;
        let mut reader = BufReader::new(fs);
        let mut buf = String::new();
        let mut nv: usize = 0;
        let mut nc: usize = 0;
        let mut found_valid_header = false;
        loop {
            buf.clear();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_k) => {
                    let mut iter = buf.split_whitespace();
                    if iter.next() == Some("p") && iter.next() == Some("cnf") {
                        if let Some(v) = iter.next().and_then(|s| s.parse::<usize>().ok()) {
                            if let Some(c) = iter.next().and_then(|s| s.parse::<usize>().ok()) {
                                nv = v;
                                nc = c;
                                found_valid_header = true;
                                break;
                            }
                        }
                    }
                    continue;
                }
                Err(e) => {
                    println!("{e}");
                    return Err(SolverError::IOError);
                }
            }
        }
        if !found_valid_header {
            return Err(SolverError::IOError);
        }
        let cnf = CNFDescription {
            num_of_variables: nv,
            num_of_clauses: nc,
            pathname: CNFIndicator::File(pathname),
        };
        Ok(CNFReader { cnf, reader })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnf_reader() {
        if let Ok(reader) = CNFReader::try_from(Path::new("cnfs/sample.cnf")) {
            assert_eq!(reader.cnf.num_of_variables, 10);
            assert_eq!(reader.cnf.num_of_clauses, 18);
        } else {
            panic!("failed to load cnfs/sample.cnf");
        }
    }

    #[test]
    fn test_cnf_description_from_vec() {
        let v: Vec<Vec<i32>> = vec![vec![1, -5], vec![2, 3]];
        let cnf = CNFDescription::from(v.as_slice());
        assert_eq!(cnf.num_of_variables, 5);
        assert_eq!(cnf.num_of_clauses, 2);
    }
}
