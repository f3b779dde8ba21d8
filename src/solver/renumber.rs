//! Inner variable renumbering: compact the inner space over live vars,
//! rewriting every literal-bearing structure in one pass.
use {
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::ClauseDB,
        processor::{EliminateIF, Eliminator},
        state::{Stat, State},
        types::*,
        varmap::VarMap,
    },
};

/// returns `true` if a re-mapping happened. The caller must be at the root
/// level with a fully propagated trail, no assumptions and the simplifier
/// dormant.
pub(crate) fn renumber_vars(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &Eliminator,
    state: &mut State,
    vmap: &mut VarMap,
) -> bool {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    debug_assert!(!asg.remains());
    debug_assert!(!elim.is_running());
    let mut map: Vec<VarId> = vec![0; asg.num_vars + 1];
    let mut new_to_outer: Vec<VarId> = vec![0];
    let mut n = 0;
    for vi in 1..=asg.num_vars {
        if !asg.var(vi).is(FlagVar::ELIMINATED) {
            n += 1;
            map[vi] = n;
            new_to_outer.push(vmap.to_outer(vi));
        }
    }
    if n == asg.num_vars {
        return false;
    }
    cdb.apply_renumber(&map, n);
    asg.apply_renumber(&map, n);
    vmap.rebuild(new_to_outer);
    cdb.certification_store.update_map(vmap.certificate_map());
    state[Stat::Renumber] += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assign::{PropagateIF, Removed},
        cdb::ClauseDBIF,
    };

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    #[test]
    fn test_renumber_compacts() {
        let config = Config::default();
        let cnf = CNFDescription {
            num_of_variables: 5,
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let elim = Eliminator::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        let mut vmap = VarMap::instantiate(&config, &cnf);
        cdb.new_clause(&asg, &mut lits(&[3, 4, -5]), false);
        cdb.new_clause(&asg, &mut lits(&[3, -4]), false);
        // drop var 2 from the inner space
        asg.make_var_removed(2, Removed::Eliminated);
        assert!(renumber_vars(
            &mut asg, &mut cdb, &elim, &mut state, &mut vmap
        ));
        assert_eq!(asg.num_vars, 4);
        // former var 3 is now inner 2, still outer 3
        assert_eq!(vmap.to_inner(3), Some(2));
        assert_eq!(vmap.to_outer(2), 3);
        let bins = cdb.binaries();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].0.vi().min(bins[0].1.vi()), 2);
        // propagation still works on the renumbered clauses
        assert!(asg.assign_at_root_level(Lit::from(-2)).is_ok());
        assert!(asg.propagate(&mut cdb).is_none());
        assert_eq!(asg.assigned(Lit::from(-3)), Some(true));
    }
}
