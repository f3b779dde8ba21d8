//! Laws of the inprocessing pipeline.
use resol::{processor::EliminateIF, types::*, *};

fn load(path: &str) -> Solver {
    Solver::try_from(path).expect("failed to load")
}

#[test]
fn simplify_is_idempotent() {
    let mut s = load("cnfs/uf8.cnf");
    let Solver {
        ref mut asg,
        ref mut cdb,
        ref mut elim,
        ref mut state,
        ref mut vmap,
        ..
    } = s;
    elim.simplify(asg, cdb, state, vmap).expect("consistent");
    let clauses = cdb.num_clauses();
    let eliminated = asg.num_eliminated_vars;
    elim.simplify(asg, cdb, state, vmap).expect("consistent");
    // no oscillation: a second run may only shrink the database
    assert!(cdb.num_clauses() <= clauses);
    assert!(eliminated <= asg.num_eliminated_vars);
}

#[test]
fn elimination_preserves_satisfiability() {
    let with = {
        let mut s = load("cnfs/uf8.cnf");
        s.solve().expect("must finish")
    };
    let without = {
        let mut s = load("cnfs/uf8.cnf");
        s.state.config.set_switches(false, false, false, false, false);
        s.solve().expect("must finish")
    };
    assert_eq!(
        matches!(with, Certificate::SAT(_)),
        matches!(without, Certificate::SAT(_))
    );
    if let Certificate::SAT(ans) = with {
        let mut validator = load("cnfs/uf8.cnf");
        validator.inject_assignment(&ans).expect("broken model");
        assert_eq!(validator.validate(), None);
    }
}

#[test]
fn renumbering_stability() {
    // the answer sequence is invariant under inner renumbering
    let cnf = vec![
        vec![1i32, 2, 3],
        vec![-1, 4],
        vec![-4, 5],
        vec![-5, -1],
        vec![6, 7],
        vec![-6, 7],
    ];
    let mut with = Solver::try_from(cnf.clone()).expect("panic");
    let mut without = Solver::try_from(cnf).expect("panic");
    without.state.config.set_renumber(false);
    let a = with.solve().expect("must finish");
    let b = without.solve().expect("must finish");
    assert_eq!(
        matches!(a, Certificate::SAT(_)),
        matches!(b, Certificate::SAT(_))
    );
    assert_eq!(with.value(7), without.value(7));
}

#[test]
fn equivalence_collapse_solves_cycles() {
    // 1 → 2 → 3 → 1 and 1 must hold somewhere: all three align
    let mut s = Solver::try_from(vec![
        vec![-1i32, 2],
        vec![-2, 3],
        vec![-3, 1],
        vec![1, 2, 3],
        vec![4, -1],
    ])
    .expect("panic");
    let Ok(Certificate::SAT(_)) = s.solve() else {
        panic!("satisfiable")
    };
    assert_eq!(s.value(1), Some(true));
    assert_eq!(s.value(2), Some(true));
    assert_eq!(s.value(3), Some(true));
    assert_eq!(s.value(4), Some(true));
}

#[test]
fn equivalence_clash_is_unsat() {
    // 1 ≡ 2 and 1 ≡ ¬2
    let mut s = Solver::try_from(vec![
        vec![-1i32, 2],
        vec![-2, 1],
        vec![1, 2],
        vec![-1, -2],
    ])
    .expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn eliminated_vars_get_values() {
    // var 2 occurs once per polarity; a perfect elimination target
    let mut s = Solver::try_from(vec![
        vec![1i32, 2],
        vec![-2, 3],
        vec![1, 3, 4],
        vec![-4, -1, 3],
    ])
    .expect("panic");
    let Ok(Certificate::SAT(ans)) = s.solve() else {
        panic!("satisfiable")
    };
    assert_eq!(ans.len(), 4);
    for v in 1..=4usize {
        assert!(s.value(v).is_some());
    }
    // (1 ∨ 2) and (¬2 ∨ 3) must hold under the extended model
    let m = |v: usize| s.value(v).unwrap();
    assert!(m(1) || m(2));
    assert!(!m(2) || m(3));
}
