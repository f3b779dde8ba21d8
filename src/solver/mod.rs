//! Module `solver` provides the top-level API as a SAT solver.

/// Solver builder
mod build;
/// Conflict analysis
mod conflict;
/// Inner variable renumbering
mod renumber;
/// Restart control
mod restart;
/// CDCL search
mod search;
/// Assignment validation
mod validate;

pub use self::{
    restart::{ProgressUpdate, RestartDecision, RestartIF, Restarter},
    validate::ValidateIF,
};

// the build and search splits of the API stay crate-internal; callers go
// through `SatSolverIF`, which keeps `solve` unambiguous.
pub(crate) use self::conflict::{analyze_final, handle_conflict};
pub(crate) use self::renumber::renumber_vars;
pub(crate) use self::{build::SatSolverBuildIF, search::SatSolverSearchIF};

use {
    crate::{
        assign::{AssignIF, AssignStack, Removed},
        cdb::ClauseDB,
        processor::Eliminator,
        state::State,
        types::*,
        varmap::VarMap,
    },
    std::sync::{atomic::AtomicBool, Arc},
};

/// Normal results returned by Solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Certificate {
    SAT(Vec<i32>),
    UNSAT,
}

/// The return type of `Solver::solve`. This captures the three cases:
/// * `Ok(Certificate::SAT(_))` -- solved with a satisfiable assignment set,
/// * `Ok(Certificate::UNSAT)` -- proved unsatisfiability, and
/// * `Err(_)` -- running out of a budget, an interrupt, or a bug.
pub type SolverResult = Result<Certificate, SolverError>;

/// The SAT solver object consisting of six sub modules.
#[derive(Debug)]
pub struct Solver {
    /// assignment management
    pub asg: AssignStack,
    /// clause database
    pub cdb: ClauseDB,
    /// inprocessor
    pub elim: Eliminator,
    /// restart controller
    pub rst: Restarter,
    /// misc data and budgets
    pub state: State,
    /// outer/inner numbering and model reconstruction
    pub vmap: VarMap,
}

/// API for SAT solver like `add_clause`, `solve`, `value` and so on.
pub trait SatSolverIF {
    /// make a solver and load a CNF file into it.
    ///
    /// # Errors
    ///
    /// IO error by failing to load a CNF file, or an inconsistent input.
    fn build(config: &Config) -> Result<Solver, SolverError>
    where
        Self: Sized;
    /// allocate a decision variable; return its (outer) id.
    fn new_var(&mut self) -> VarId;
    /// add an irredundant clause over outer literals.
    ///
    /// # Errors
    ///
    /// * `SolverError::EmptyClause` if the formula became trivially UNSAT.
    /// * `SolverError::RemovedVariable` on a var removed by inprocessing.
    fn add_clause<V: AsRef<[i32]>>(&mut self, vec: V) -> MaybeInconsistent;
    /// run search without assumptions.
    fn solve(&mut self) -> SolverResult;
    /// run search under the given assumption literals.
    fn solve_with(&mut self, assumptions: &[i32]) -> SolverResult;
    /// read a var's value; total after a SAT answer.
    fn value(&self, vi: VarId) -> Option<bool>;
    /// after UNSAT under assumptions, the conflicting subset of the
    /// assumptions, in the polarity they were passed.
    fn conflict(&self) -> Vec<i32>;
    /// a handle for cooperative termination; set it to make `solve`
    /// return `Err(SolverError::Interrupted)` at the next restart boundary.
    fn interrupter(&self) -> Arc<AtomicBool>;
}

impl SatSolverIF for Solver {
    fn build(config: &Config) -> Result<Solver, SolverError> {
        Solver::solver_build(config)
    }
    fn new_var(&mut self) -> VarId {
        let (outer, _inner) = self.vmap.add_var();
        self.asg.handle(SolverEvent::NewVar);
        self.cdb.handle(SolverEvent::NewVar);
        self.cdb.certification_store.register_var(outer as i32);
        outer
    }
    fn add_clause<V: AsRef<[i32]>>(&mut self, vec: V) -> MaybeInconsistent {
        let mut lits: Vec<Lit> = Vec::with_capacity(vec.as_ref().len());
        for i in vec.as_ref().iter() {
            if *i == 0 {
                return Err(SolverError::InvalidLiteral);
            }
            let outer = i.unsigned_abs() as VarId;
            while self.vmap.num_outer_vars() < outer {
                self.new_var();
            }
            let ol = Lit::from(*i);
            match self.vmap.lit_to_inner(ol) {
                Some(l) if self.asg.var(l.vi()).removed() == Removed::None => lits.push(l),
                _ => return Err(SolverError::RemovedVariable),
            }
        }
        // user clauses are axioms; a DRUP proof records only derivations
        self.cdb.certification_store.suspend(true);
        let ret = self.add_unchecked_clause(&mut lits);
        self.cdb.certification_store.suspend(false);
        ret
    }
    fn solve(&mut self) -> SolverResult {
        <Solver as SatSolverSearchIF>::solve(self)
    }
    fn solve_with(&mut self, assumptions: &[i32]) -> SolverResult {
        <Solver as SatSolverSearchIF>::solve_with(self, assumptions)
    }
    fn value(&self, vi: VarId) -> Option<bool> {
        self.state.model.get(vi).copied().flatten()
    }
    fn conflict(&self) -> Vec<i32> {
        self.state
            .conflicts
            .iter()
            .map(|l| {
                // report the assumption exactly as it was passed, even if
                // the var was folded onto a representative on the way in
                self.state
                    .assumed_pairs
                    .iter()
                    .find(|(inner, _)| inner == l)
                    .map_or_else(
                        || i32::from(self.vmap.lit_to_outer(*l)),
                        |(_, outer)| i32::from(*outer),
                    )
            })
            .collect()
    }
    fn interrupter(&self) -> Arc<AtomicBool> {
        self.state.interrupt.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_growth() {
        let mut s = Solver::instantiate(&Config::default(), &CNFDescription::default());
        assert_eq!(s.new_var(), 1);
        assert_eq!(s.new_var(), 2);
        // adding a clause over unseen vars grows the solver
        assert!(s.add_clause([3, -4]).is_ok());
        assert_eq!(s.asg.num_vars, 4);
        assert!(s.add_clause([0]).is_err());
    }
}
