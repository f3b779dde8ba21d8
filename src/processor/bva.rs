//! Bounded variable addition: factor a shared tail out of clause pairs
//! through a fresh definition variable.
use {
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseDBIF, ClauseRef},
        state::{Stat, State},
        types::*,
        varmap::VarMap,
    },
    std::collections::BTreeMap,
};

/// skip clauses longer than this when building the tail index.
const TAIL_LEN_MAX: usize = 8;
/// a pair must share at least this many tails to pay for its definition.
const MIN_SHARED_TAILS: usize = 3;

/// one greedy round per call, at most `bva_lim` rounds: find the literal
/// pair `(a, b)` sharing the most clause tails, introduce `x` with
/// `(¬x ∨ a)` and `(¬x ∨ b)`, and replace each pair of clauses
/// `(a ∨ T)`, `(b ∨ T)` by `(x ∨ T)` — a net saving of `m - 2` clauses.
pub fn add_bounded_vars(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    vmap: &mut VarMap,
) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    for _ in 0..state.config.bva_lim {
        if !add_one_var(asg, cdb, state, vmap) {
            break;
        }
    }
    Ok(())
}

fn add_one_var(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    vmap: &mut VarMap,
) -> bool {
    //
    //## index: tail -> the literals (with their clause) completing it
    //
    // BTreeMaps keep the scan order independent of hashing
    let mut tails: BTreeMap<Vec<Lit>, Vec<(Lit, ClauseRef)>> = BTreeMap::new();
    for cr in cdb.long_refs(false) {
        if cdb.is_dead(cr) || TAIL_LEN_MAX < cdb.lits(cr).len() {
            continue;
        }
        let lits = cdb.lits(cr).to_vec();
        for l in lits.iter() {
            let mut tail: Vec<Lit> = lits.iter().copied().filter(|x| x != l).collect();
            tail.sort_unstable();
            tails.entry(tail).or_default().push((*l, cr));
        }
    }
    //
    //## count shared tails per literal pair
    //
    let mut pairs: BTreeMap<(Lit, Lit), Vec<(ClauseRef, ClauseRef, Vec<Lit>)>> = BTreeMap::new();
    for (tail, entries) in tails.iter() {
        for (i, (a, ca)) in entries.iter().enumerate() {
            for (b, cb) in entries.iter().skip(i + 1) {
                if a.vi() == b.vi() {
                    continue;
                }
                let key = if usize::from(*a) < usize::from(*b) {
                    (*a, *b)
                } else {
                    (*b, *a)
                };
                pairs
                    .entry(key)
                    .or_default()
                    .push((*ca, *cb, tail.clone()));
            }
        }
    }
    let Some(((a, b), matches)) = pairs
        .into_iter()
        .max_by_key(|(_, m)| m.len())
        .filter(|(_, m)| MIN_SHARED_TAILS <= m.len())
    else {
        return false;
    };
    //
    //## commit: allocate the definition var and rewrite the matched pairs
    //
    let (_outer, inner) = vmap.add_hidden_var();
    asg.handle(SolverEvent::NewVar);
    cdb.handle(SolverEvent::NewVar);
    cdb.certification_store.register_var(_outer as i32);
    let x = Lit::from_assign(inner, true);
    cdb.new_clause(asg, &mut vec![!x, a], false);
    cdb.new_clause(asg, &mut vec![!x, b], false);
    for (ca, cb, tail) in matches.iter() {
        if cdb.is_dead(*ca) || cdb.is_dead(*cb) {
            continue;
        }
        let mut vec = tail.clone();
        vec.push(x);
        cdb.new_clause(asg, &mut vec, false);
        cdb.remove_clause(*ca);
        cdb.remove_clause(*cb);
    }
    state[Stat::AddedVar] += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    #[test]
    fn test_factoring_saves_clauses() {
        let config = Config::default();
        let cnf = CNFDescription {
            num_of_variables: 8,
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        let mut vmap = VarMap::instantiate(&config, &cnf);
        // three tails shared by literals 1 and 2
        for tail in [[3, 4, 5], [4, 5, 6], [5, 6, 7]] {
            for head in [1, 2] {
                let mut v = lits(&tail);
                v.push(Lit::from(head));
                cdb.new_clause(&asg, &mut v, false);
            }
        }
        let before = cdb.num_clauses();
        assert_eq!(before, 6);
        add_bounded_vars(&mut asg, &mut cdb, &mut state, &mut vmap).expect("consistent");
        assert_eq!(state[Stat::AddedVar], 1);
        // 6 clauses become 3 + 2 definitions
        assert_eq!(cdb.num_clauses(), 5);
        assert_eq!(asg.num_vars, 9);
    }
}
