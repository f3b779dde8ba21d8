//! End-to-end scenarios over small formulas.
use resol::{types::*, *};

#[test]
fn all_sign_patterns_of_two_vars() {
    // (a ∨ b) ∧ (¬a ∨ b) ∧ (a ∨ ¬b) ∧ (¬a ∨ ¬b)
    let mut s = Solver::try_from(vec![
        vec![1i32, 2],
        vec![-1, 2],
        vec![1, -2],
        vec![-1, -2],
    ])
    .expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn forced_by_two_units() {
    // (a ∨ b ∨ c) ∧ ¬a ∧ ¬b => c
    let mut s =
        Solver::try_from(vec![vec![1i32, 2, 3], vec![-1], vec![-2]]).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::SAT(vec![-1, -2, 3])));
    assert_eq!(s.value(3), Some(true));
}

#[test]
fn pigeonhole_three_into_two() {
    // p(i,j): pigeon i sits in hole j; vars 1..=6 as 2*(i-1)+j
    let p = |i: i32, j: i32| 2 * (i - 1) + j;
    let mut cnf: Vec<Vec<i32>> = Vec::new();
    for i in 1..=3 {
        cnf.push(vec![p(i, 1), p(i, 2)]);
    }
    for j in 1..=2 {
        for i in 1..=3 {
            for k in (i + 1)..=3 {
                cnf.push(vec![-p(i, j), -p(k, j)]);
            }
        }
    }
    let mut s = Solver::try_from(cnf).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn resolution_on_a_funnel_var_is_unsat() {
    // (a∨b)∧(a∨¬b)∧(¬a∨c)∧(¬a∨¬c)∧(d): resolving out a leaves c∧¬c
    let mut s = Solver::try_from(vec![
        vec![1i32, 2],
        vec![1, -2],
        vec![-1, 3],
        vec![-1, -3],
        vec![4],
    ])
    .expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn disconnected_components() {
    // {(a∨b), (¬a∨b)} and {(c∨d), (¬c∨d)}: b and d are forced
    let mut s = Solver::try_from(vec![
        vec![1i32, 2],
        vec![-1, 2],
        vec![3, 4],
        vec![-3, 4],
    ])
    .expect("panic");
    let Ok(Certificate::SAT(ans)) = s.solve() else {
        panic!("two satisfiable components")
    };
    assert!(ans.contains(&2));
    assert!(ans.contains(&4));
    assert_eq!(s.value(2), Some(true));
    assert_eq!(s.value(4), Some(true));
}

#[test]
fn splitter_handles_the_small_component() {
    use resol::state::Stat;
    let mut config = Config::default();
    // splitting alone; nothing else may dissolve the components first
    config.set_switches(false, false, false, true, false);
    let cnf = CNFDescription {
        num_of_variables: 5,
        ..CNFDescription::default()
    };
    let mut s = Solver::instantiate(&config, &cnf);
    for c in [
        vec![1i32, 2],
        vec![-1, 2],
        vec![3, 4, 5],
        vec![-3, 4],
        vec![-4, 5],
    ] {
        s.add_clause(c).expect("panic");
    }
    let Ok(Certificate::SAT(ans)) = s.solve() else {
        panic!("two satisfiable components")
    };
    assert_eq!(s.state[Stat::Decompose], 2);
    assert!(ans.contains(&2));
    let mut validator = Solver::instantiate(&Config::default(), &cnf);
    for c in [
        vec![1i32, 2],
        vec![-1, 2],
        vec![3, 4, 5],
        vec![-3, 4],
        vec![-4, 5],
    ] {
        validator.add_clause(c).expect("panic");
    }
    validator.inject_assignment(&ans).expect("broken model");
    assert_eq!(validator.validate(), None);
}

#[test]
fn final_conflict_under_assumptions() {
    // (¬x ∨ ¬y) under assumptions [x, y]
    let mut s = Solver::try_from(vec![vec![-1i32, -2]]).expect("panic");
    assert_eq!(s.solve_with(&[1, 2]), Ok(Certificate::UNSAT));
    let mut why = s.conflict();
    why.sort_unstable();
    assert_eq!(why, vec![1, 2]);
}

#[test]
fn assumption_sequences() {
    // keep every var in place across calls: no elimination, no splitting
    let mut config = Config::default();
    config.set_switches(false, false, false, false, true);
    let cnf = CNFDescription {
        num_of_variables: 2,
        ..CNFDescription::default()
    };
    let mut s = Solver::instantiate(&config, &cnf);
    s.add_clause([-1, -2]).expect("panic");
    assert!(matches!(s.solve_with(&[1]), Ok(Certificate::SAT(_))));
    assert_eq!(s.value(1), Some(true));
    assert_eq!(s.value(2), Some(false));
    assert!(matches!(s.solve_with(&[2]), Ok(Certificate::SAT(_))));
    assert_eq!(s.value(1), Some(false));
    assert_eq!(s.solve_with(&[1, 2]), Ok(Certificate::UNSAT));
    assert!(matches!(s.solve(), Ok(Certificate::SAT(_))));
}

#[test]
fn contradictory_assumptions() {
    let mut s = Solver::try_from(vec![vec![1i32, 2, 3]]).expect("panic");
    assert_eq!(s.solve_with(&[1, -1]), Ok(Certificate::UNSAT));
    let why = s.conflict();
    assert_eq!(why.len(), 2);
    assert!(why.contains(&1) && why.contains(&-1));
}

#[test]
fn larger_instances_from_files() {
    let mut s = Solver::try_from("cnfs/sample.cnf").expect("failed to load");
    let Ok(Certificate::SAT(ans)) = s.solve() else {
        panic!("sample.cnf must be satisfiable")
    };
    let mut validator = Solver::try_from("cnfs/sample.cnf").expect("failed to load");
    validator.inject_assignment(&ans).expect("broken model");
    assert_eq!(validator.validate(), None);
}
