//! Crate `validator` implements a model checker.
use {
    super::Solver,
    crate::{
        assign::{AssignIF, PropagateIF},
        cdb::ClauseDBIF,
        types::*,
    },
};

/// API for SAT validation: load an assignment and check it against the
/// irredundant clauses.
pub trait ValidateIF {
    /// load an assignment set into the solver.
    ///
    /// # Errors
    ///
    /// if the assignment clashes at the root level.
    fn inject_assignment(&mut self, vec: &[i32]) -> MaybeInconsistent;
    /// return `None` if the loaded assignment is a model of the problem,
    /// otherwise a falsified clause in outer numbering.
    fn validate(&self) -> Option<Vec<i32>>;
}

impl ValidateIF for Solver {
    /// inject an assignment set represented by a list of `i32`.
    ///
    /// # Example
    ///
    /// ```
    /// use resol::{config::Config, types::*, solver::{Solver, ValidateIF}};
    ///
    /// let cnf = CNFDescription {
    ///     num_of_variables: 4,
    ///     ..CNFDescription::default()
    /// };
    /// let mut s = Solver::instantiate(&Config::default(), &cnf);
    /// assert_eq!(s.inject_assignment(&[1i32, -2, 3]), Ok(()));
    /// ```
    fn inject_assignment(&mut self, vec: &[i32]) -> MaybeInconsistent {
        if vec.is_empty() {
            return Err(SolverError::Inconsistent);
        }
        for i in vec {
            let l = self
                .vmap
                .lit_to_inner(Lit::from(*i))
                .ok_or(SolverError::RemovedVariable)?;
            self.asg.assign_at_root_level(l)?;
        }
        Ok(())
    }
    fn validate(&self) -> Option<Vec<i32>> {
        self.cdb
            .validate(&self.asg.assign_ref(), true)
            .map(|lits| {
                lits.iter()
                    .map(|l| i32::from(self.vmap.lit_to_outer(*l)))
                    .collect::<Vec<i32>>()
            })
    }
}
