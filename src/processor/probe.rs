//! Failed-literal probing with lazy hyper-binary resolution.
use {
    crate::{
        assign::{AssignIF, AssignReason, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        state::{Stat, State},
        types::*,
    },
};

/// assume candidate literals one at a time at a throwaway decision level.
/// A conflict asserts the negation; a quiet propagation yields redundant
/// hyper-binaries for every literal implied through a non-binary reason.
pub fn probe(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    let mut candidates: Vec<Lit> = Vec::new();
    for vi in 1..=asg.num_vars {
        let v = asg.var(vi);
        if asg.assign(vi).is_some() || v.is(FlagVar::ELIMINATED) || v.is(FlagVar::FROZEN) {
            continue;
        }
        for positive in [true, false] {
            let l = Lit::from_assign(vi, positive);
            // probing pays off where binary implications fan out
            if !cdb.binary_links_of(l).is_empty() {
                candidates.push(l);
            }
        }
        if state.config.prb_lim <= candidates.len() {
            break;
        }
    }
    let mut hyper_binaries: Vec<(Lit, Lit)> = Vec::new();
    for l in candidates.iter() {
        if state.take_interrupt() {
            return Err(SolverError::Interrupted);
        }
        if asg.assigned(*l).is_some() {
            continue;
        }
        let bottom = asg.stack_len();
        asg.assign_by_decision(*l);
        let conflicted = asg.propagate(cdb).is_some();
        if conflicted {
            asg.cancel_until(asg.root_level);
            state[Stat::FailedLiteral] += 1;
            cdb.certificate_add_assertion(!*l);
            asg.assign_at_root_level(!*l)?;
            if let Some(cc) = asg.propagate(cdb) {
                return Err(SolverError::RootLevelConflict(cc));
            }
            continue;
        }
        for i in bottom + 1..asg.stack_len() {
            let u = asg.stack(i);
            match asg.reason(u.vi()) {
                AssignReason::TernaryLink(_, _) | AssignReason::Implication(_) => {
                    if !cdb.registered_binary(!*l, u) {
                        hyper_binaries.push((!*l, u));
                    }
                }
                _ => (),
            }
        }
        asg.cancel_until(asg.root_level);
    }
    //
    //## attach the hyper-binaries after all probes are unwound
    //
    for (a, b) in hyper_binaries.drain(..) {
        if asg.assigned(a).is_some() || asg.assigned(b).is_some() {
            continue;
        }
        if cdb.new_clause(asg, &mut vec![a, b], true) == RefClause::Binary {
            state[Stat::HyperBinary] += 1;
            // the new binary dominates any ternary carrying both literals
            let mut doomed = Vec::new();
            for (lits, _) in cdb.watch_clauses_of(a) {
                if lits.len() == 3 && lits.contains(&b) {
                    doomed.push((lits[0], lits[1], lits[2]));
                }
            }
            for (l0, l1, l2) in doomed {
                cdb.remove_ternary(l0, l1, l2);
            }
        }
    }
    if let Some(cc) = asg.propagate(cdb) {
        return Err(SolverError::RootLevelConflict(cc));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdb::ClauseDB;

    fn setup(nv: usize) -> (AssignStack, ClauseDB, State) {
        let config = Config::default();
        let cnf = CNFDescription {
            num_of_variables: nv,
            ..CNFDescription::default()
        };
        (
            AssignStack::instantiate(&config, &cnf),
            ClauseDB::instantiate(&config, &cnf),
            State::instantiate(&config, &cnf),
        )
    }

    #[test]
    fn test_failed_literal() {
        let (mut asg, mut cdb, mut state) = setup(3);
        // 1 implies both 2 and -2: probing must assert -1
        cdb.new_clause(&asg, &mut vec![Lit::from(-1), Lit::from(2)], false);
        cdb.new_clause(&asg, &mut vec![Lit::from(-1), Lit::from(-2)], false);
        probe(&mut asg, &mut cdb, &mut state).expect("no conflict");
        assert_eq!(asg.assigned(Lit::from(-1)), Some(true));
        assert_eq!(state[Stat::FailedLiteral], 1);
    }
}
