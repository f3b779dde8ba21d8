//! Boundary behaviours of the public API.
use resol::*;

#[test]
fn empty_formula_is_sat() {
    let mut s = Solver::try_from(Vec::<Vec<i32>>::new()).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::SAT(vec![])));
}

#[test]
fn empty_clause_is_unsat() {
    let mut s = Solver::try_from(vec![Vec::<i32>::new()]).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    // and the solver keeps answering
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    assert!(s.conflict().is_empty());
}

#[test]
fn unit_chain_propagates() {
    // {x} then {-x ∨ y} forces x = y = true
    let mut s = Solver::try_from(vec![vec![1i32], vec![-1, 2]]).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::SAT(vec![1, 2])));
    assert_eq!(s.value(1), Some(true));
    assert_eq!(s.value(2), Some(true));
}

#[test]
fn contradicting_units_are_unsat() {
    let mut s = Solver::try_from(vec![vec![1i32], vec![-1]]).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn round_trip_law() {
    // adding a clause and assuming its negation forces UNSAT
    let clause = vec![1i32, -3, 4];
    let mut s = Solver::try_from(vec![clause.clone()]).expect("panic");
    let negated: Vec<i32> = clause.iter().map(|l| -l).collect();
    assert_eq!(s.solve_with(&negated), Ok(Certificate::UNSAT));
    assert!(!s.conflict().is_empty());
    // and without the assumptions the clause is satisfiable
    assert!(matches!(s.solve(), Ok(Certificate::SAT(_))));
}

#[test]
fn models_are_total_and_valid() {
    let mut s = Solver::try_from("cnfs/uf8.cnf").expect("failed to load");
    let Ok(Certificate::SAT(ans)) = s.solve() else {
        panic!("uf8.cnf must be satisfiable")
    };
    assert_eq!(ans.len(), 8);
    for v in 1..=8usize {
        assert!(s.value(v).is_some());
    }
    let mut validator = Solver::try_from("cnfs/uf8.cnf").expect("failed to load");
    validator.inject_assignment(&ans).expect("broken model");
    assert_eq!(validator.validate(), None);
}

#[test]
fn interrupt_returns_unknown() {
    let mut s = Solver::try_from(vec![vec![1i32, 2], vec![-1, 2]]).expect("panic");
    s.interrupter()
        .store(true, std::sync::atomic::Ordering::Relaxed);
    assert_eq!(s.solve(), Err(SolverError::Interrupted));
    // an honoured interrupt is consumed; the solver stays usable
    assert!(matches!(s.solve(), Ok(Certificate::SAT(_))));
}
