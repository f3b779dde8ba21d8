/*!
# resol — a modular CDCL SAT solver with inprocessing

`resol` decides satisfiability of propositional formulas in CNF. The core
is a conflict-driven clause-learning engine over binary, ternary and long
watched clauses, interleaved with an inprocessing simplifier: bounded
variable elimination and addition, subsumption and strengthening,
equivalent-literal replacement, failed-literal probing and disconnected
component splitting. Satisfying assignments are reconstructed over every
removed variable; refutations can be certified in DRUP.

# Examples

```
use resol::*;

let mut s = Solver::try_from(vec![vec![1i32, 2], vec![-1, 2], vec![1, -2]])
    .expect("panic");
if let Ok(Certificate::SAT(ans)) = s.solve() {
    assert_eq!(ans, vec![1, 2]);
}
```

Incremental use with assumptions:

```
use resol::*;

let mut s = Solver::try_from(vec![vec![-1i32, -2]]).expect("panic");
assert_eq!(s.solve_with(&[1, 2]), Ok(Certificate::UNSAT));
let mut why = s.conflict();
why.sort_unstable();
assert_eq!(why, vec![1, 2]);
```
*/
/// Boolean constraint propagation and decision var selection
pub mod assign;
/// clause database: arena, watch lists, reduction, certification
pub mod cdb;
/// solver configuration and CLI
pub mod config;
/// EMA and RNG building blocks
pub mod primitive;
/// the inprocessing simplifier
pub mod processor;
/// the top-level solver API
pub mod solver;
/// disconnected component splitting
pub mod splitter;
/// internal data, budgets and progress reporting
pub mod state;
/// plumbing types and common traits
pub mod types;
/// outer/inner numbering and model reconstruction
pub mod varmap;

pub use crate::{
    config::Config,
    solver::{Certificate, SatSolverIF, Solver, SolverResult, ValidateIF},
    types::{Lit, SolverError, VarId},
};
