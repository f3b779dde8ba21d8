/// Solver Builder
use {
    super::{Restarter, Solver},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        processor::Eliminator,
        state::{State, StateIF},
        types::*,
        varmap::VarMap,
    },
    std::{
        fs::File,
        io::{BufRead, BufReader},
        path::Path,
    },
};

/// API for loading problems into a solver.
pub trait SatSolverBuildIF {
    /// make a solver and load a CNF file into it.
    ///
    /// # Errors
    ///
    /// IO error by failing to load a CNF file, or an inconsistent input.
    fn solver_build(config: &Config) -> Result<Solver, SolverError>;
    /// add a clause of inner literals, normalising against the root
    /// assignment. Returns `Err(SolverError::EmptyClause)` on trivial UNSAT.
    fn add_unchecked_clause(&mut self, lits: &mut Vec<Lit>) -> MaybeInconsistent;
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::instantiate(&Config::default(), &CNFDescription::default())
    }
}

impl Instantiate for Solver {
    /// ```
    /// use resol::{config::Config, types::*, solver::Solver};
    /// let s = Solver::instantiate(&Config::default(), &CNFDescription::default());
    ///```
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Solver {
        Solver {
            asg: AssignStack::instantiate(config, cnf),
            cdb: ClauseDB::instantiate(config, cnf),
            elim: Eliminator::instantiate(config, cnf),
            rst: Restarter::instantiate(config, cnf),
            state: State::instantiate(config, cnf),
            vmap: VarMap::instantiate(config, cnf),
        }
    }
}

impl TryFrom<&Path> for Solver {
    type Error = SolverError;
    /// return a new solver built for a CNF file.
    ///
    /// # Example
    /// ```
    /// use std::path::Path;
    /// use resol::solver::Solver;
    ///
    /// let mut s = Solver::try_from(Path::new("cnfs/sample.cnf")).expect("fail to load");
    ///```
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let config = Config::from(path.to_path_buf());
        Solver::solver_build(&config)
    }
}

impl TryFrom<&str> for Solver {
    type Error = SolverError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Solver::try_from(Path::new(s))
    }
}

impl TryFrom<Vec<Vec<i32>>> for Solver {
    type Error = SolverError;
    /// return a new solver loaded with a vec-of-vec representation.
    ///
    /// # Example
    /// ```
    /// use resol::solver::{Certificate, SatSolverIF, Solver};
    ///
    /// let mut s = Solver::try_from(vec![vec![1i32, 2], vec![-1, 2]]).expect("panic");
    /// assert!(matches!(s.solve(), Ok(Certificate::SAT(_))));
    ///```
    fn try_from(vec: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        use crate::solver::SatSolverIF;
        let cnf = CNFDescription::from(vec.as_slice());
        let mut solver = Solver::instantiate(&Config::default(), &cnf);
        for v in vec.iter() {
            match solver.add_clause(v) {
                Ok(_) => (),
                // a trivially false input leaves a loaded, UNSAT-bound solver
                Err(SolverError::EmptyClause) | Err(SolverError::RootLevelConflict(_)) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(solver)
    }
}

impl SatSolverBuildIF for Solver {
    fn solver_build(config: &Config) -> Result<Solver, SolverError> {
        let CNFReader { cnf, reader } = CNFReader::try_from(config.cnf_file.as_path())?;
        Solver::instantiate(config, &cnf).inject(reader)
    }
    fn add_unchecked_clause(&mut self, lits: &mut Vec<Lit>) -> MaybeInconsistent {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut state,
            ..
        } = self;
        debug_assert_eq!(asg.decision_level(), asg.root_level());
        lits.sort_unstable();
        let mut j = 0;
        let mut l_: Option<Lit> = None; // last literal; [x, !x] means tautology.
        for i in 0..lits.len() {
            let li = lits[i];
            let sat = asg.assigned(li);
            if sat == Some(true) || Some(!li) == l_ {
                return Ok(()); // satisfied or tautological; nothing to store
            } else if sat != Some(false) && Some(li) != l_ {
                lits[j] = li;
                j += 1;
                l_ = Some(li);
            }
        }
        lits.truncate(j);
        match lits.len() {
            0 => {
                state.ok = false;
                Err(SolverError::EmptyClause)
            }
            1 => {
                cdb.certificate_add_assertion(lits[0]);
                if asg.assign_at_root_level(lits[0]).is_err() {
                    state.ok = false;
                    return Err(SolverError::EmptyClause);
                }
                if let Some(cc) = asg.propagate(cdb) {
                    state.ok = false;
                    return Err(SolverError::RootLevelConflict(cc));
                }
                Ok(())
            }
            _ => {
                cdb.new_clause(asg, lits, false);
                Ok(())
            }
        }
    }
}

impl Solver {
    fn inject(mut self, mut reader: BufReader<File>) -> Result<Solver, SolverError> {
        self.state.flush("loading...");
        self.cdb.certification_store.suspend(true);
        let mut buf = String::new();
        loop {
            buf.clear();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) if buf.starts_with('c') => continue,
                Ok(_) => {
                    use crate::solver::SatSolverIF;
                    let mut v: Vec<Lit> = Vec::new();
                    for s in buf.split_whitespace() {
                        match s.parse::<i32>() {
                            Ok(0) => break,
                            Ok(val) => {
                                while self.asg.num_vars < val.unsigned_abs() as usize {
                                    self.new_var();
                                }
                                v.push(Lit::from(val));
                            }
                            Err(_) => (),
                        }
                    }
                    if !v.is_empty() {
                        match self.add_unchecked_clause(&mut v) {
                            Ok(_) => (),
                            Err(SolverError::EmptyClause)
                            | Err(SolverError::RootLevelConflict(_)) => break,
                            Err(e) => return Err(e),
                        }
                    }
                }
                Err(e) => {
                    println!("{e}");
                    return Err(SolverError::IOError);
                }
            }
        }
        debug_assert!(self.state.target.num_of_variables <= self.asg.num_vars);
        self.cdb.certification_store.suspend(false);
        Ok(self)
    }
}
