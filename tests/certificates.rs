//! Proof emission and budget behaviour.
use {
    resol::{types::*, *},
    std::{fs, path::PathBuf},
};

fn pigeonhole(pigeons: i32, holes: i32) -> Vec<Vec<i32>> {
    let p = |i: i32, j: i32| holes * (i - 1) + j;
    let mut cnf: Vec<Vec<i32>> = Vec::new();
    for i in 1..=pigeons {
        cnf.push((1..=holes).map(|j| p(i, j)).collect());
    }
    for j in 1..=holes {
        for i in 1..=pigeons {
            for k in (i + 1)..=pigeons {
                cnf.push(vec![-p(i, j), -p(k, j)]);
            }
        }
    }
    cnf
}

#[test]
fn drup_proof_ends_with_the_empty_clause() {
    let proof = PathBuf::from("resol_test_proof.drup");
    let mut config = Config::default();
    config.use_certification = true;
    config.output_dir = std::env::temp_dir();
    config.proof_file = proof.clone();
    let cnf = CNFDescription {
        num_of_variables: 2,
        num_of_clauses: 4,
        ..CNFDescription::default()
    };
    let mut s = Solver::instantiate(&config, &cnf);
    for c in [[1i32, 2], [-1, 2], [1, -2], [-1, -2]] {
        s.add_clause(c).expect("panic");
    }
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    let path = std::env::temp_dir().join(proof);
    let text = fs::read_to_string(&path).expect("no proof written");
    let last = text.lines().rev().find(|l| !l.trim().is_empty());
    assert_eq!(last.map(str::trim), Some("0"));
    let _ = fs::remove_file(path);
}

#[test]
fn conflict_budget_yields_unknown() {
    let mut config = Config::default();
    config.rst_mode = config::RestartMode::Geometric;
    config.rst_geo_base = 1.0;
    config.conflict_budget = 1;
    // keep the simplifier out so the search itself must hit the budget
    config.set_switches(false, false, false, false, false);
    let cnf_vec = pigeonhole(4, 3);
    let desc = CNFDescription::from(cnf_vec.as_slice());
    let mut s = Solver::instantiate(&config, &desc);
    for c in cnf_vec.iter() {
        s.add_clause(c).expect("panic");
    }
    assert_eq!(s.solve(), Err(SolverError::TimeOut));
    // budgets don't poison the solver: lift it and finish
    s.state.config.conflict_budget = 0;
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}

#[test]
fn pigeonhole_four_into_three() {
    let mut s = Solver::try_from(pigeonhole(4, 3)).expect("panic");
    assert_eq!(s.solve(), Ok(Certificate::UNSAT));
}
