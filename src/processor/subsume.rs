//! Backward subsumption and self-subsuming resolution.
use {
    super::{EliminateIF, Eliminator},
    crate::{
        assign::AssignStack,
        cdb::{abstraction_of, ClauseDB, ClauseDBIF, ClauseRef},
        state::{Stat, State},
        types::*,
    },
};

/// drain the clause queue, removing subsumed clauses and strengthening
/// self-subsumed ones. `timedout` is the shared bogo budget.
pub(super) fn backward_subsumption_check(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    timedout: &mut usize,
) -> MaybeInconsistent {
    while let Some(cr) = elim.pop_queued_clause(cdb) {
        if *timedout == 0 {
            elim.clear_clause_queue(cdb);
            return Ok(());
        }
        let lits = cdb.lits(cr).to_vec();
        debug_assert!(1 < lits.len());
        let abst = abstraction_of(&lits);
        // walk the occurrence lists of the rarest var in the clause
        let best = lits
            .iter()
            .map(|l| l.vi())
            .min_by_key(|vi| elim[*vi].pos_occurs.len() + elim[*vi].neg_occurs.len())
            .unwrap();
        let mut targets = elim[best].pos_occurs.clone();
        targets.extend(elim[best].neg_occurs.iter());
        for dr in targets.iter() {
            if *dr == cr || cdb.is_dead(*dr) || cdb.is_dead(cr) {
                continue;
            }
            let dlen = cdb.lits(*dr).len();
            *timedout = timedout.saturating_sub(lits.len() + dlen);
            if dlen < lits.len() {
                continue;
            }
            // abstraction pre-filter: C can't subsume D unless every
            // content bit of C appears in D
            if abst & !abstraction_of(cdb.lits(*dr)) != 0 {
                continue;
            }
            match have_subsuming_lit(&lits, cdb.lits(*dr)) {
                Some(l) if l == NULL_LIT => {
                    let dead_lits = cdb.lits(*dr).to_vec();
                    elim.remove_cid_occur(&dead_lits, *dr);
                    cdb.remove_clause(*dr);
                    elim.num_subsumed += 1;
                    state[Stat::Subsume] += 1;
                }
                Some(l) => {
                    strengthen_clause(asg, cdb, elim, state, *dr, !l)?;
                    elim.enqueue_var(asg, l.vi(), true);
                }
                None => (),
            }
        }
    }
    Ok(())
}

/// subsume and strengthen long clauses against the irredundant binaries.
pub(super) fn subsume_with_binaries(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    timedout: &mut usize,
) -> MaybeInconsistent {
    for (a, b, red) in cdb.binaries() {
        if red {
            continue;
        }
        if *timedout == 0 {
            return Ok(());
        }
        let mut targets = elim[a.vi()].pos_occurs.clone();
        if !bool::from(a) {
            targets = elim[a.vi()].neg_occurs.clone();
        }
        for dr in targets.iter() {
            if cdb.is_dead(*dr) {
                continue;
            }
            *timedout = timedout.saturating_sub(cdb.lits(*dr).len());
            if cdb.lits(*dr).contains(&b) {
                // (a ∨ b) ⊆ D
                let dead_lits = cdb.lits(*dr).to_vec();
                elim.remove_cid_occur(&dead_lits, *dr);
                cdb.remove_clause(*dr);
                elim.num_subsumed += 1;
                state[Stat::Subsume] += 1;
            } else if cdb.lits(*dr).contains(&!b) {
                strengthen_clause(asg, cdb, elim, state, *dr, !b)?;
            }
        }
    }
    Ok(())
}

/// returns a literal if these clauses can be merged by the literal.
/// `Some(NULL_LIT)` means `other` is a superset of `c` as is.
fn have_subsuming_lit(c: &[Lit], other: &[Lit]) -> Option<Lit> {
    debug_assert!(1 < c.len());
    debug_assert!(1 < other.len());
    let mut ret: Lit = NULL_LIT;
    'next: for l in c.iter() {
        for lo in other.iter() {
            if *l == *lo {
                continue 'next;
            } else if ret == NULL_LIT && *l == !*lo {
                ret = *l;
                continue 'next;
            }
        }
        return None;
    }
    Some(ret)
}

/// removes `l` from clause `cr`, keeping the occurrence lists consistent.
pub(super) fn strengthen_clause(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    cr: ClauseRef,
    l: Lit,
) -> MaybeInconsistent {
    debug_assert!(!cdb.is_dead(cr));
    debug_assert!(1 < cdb.lits(cr).len());
    let old_lits = cdb.lits(cr).to_vec();
    match cdb.transform_by_elimination(asg, cr, l) {
        RefClause::Clause(_) => {
            elim.remove_lit_occur(l, cr);
            elim.enqueue_clause(cdb, cr);
        }
        RefClause::Binary | RefClause::Ternary | RefClause::RegisteredClause => {
            // the clause left the arena; it is implicit (or retired) now
            elim.remove_cid_occur(&old_lits, cr);
            for q in old_lits.iter() {
                elim.enqueue_var(asg, q.vi(), true);
            }
        }
        _ => unreachable!("strengthen_clause"),
    }
    elim.num_strengthened += 1;
    state[Stat::Strengthen] += 1;
    elim.enqueue_var(asg, l.vi(), true);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    #[test]
    fn test_have_subsuming_lit() {
        // full subsumption
        assert_eq!(
            have_subsuming_lit(&lits(&[1, 2]), &lits(&[1, 2, 3])),
            Some(NULL_LIT)
        );
        // self-subsuming resolution on 2
        assert_eq!(
            have_subsuming_lit(&lits(&[1, 2]), &lits(&[1, -2, 3])),
            Some(Lit::from(2))
        );
        // no relation
        assert_eq!(have_subsuming_lit(&lits(&[1, 4]), &lits(&[1, 2, 3])), None);
        // two flipped literals block the merge
        assert_eq!(
            have_subsuming_lit(&lits(&[1, 2, 3]), &lits(&[1, -2, -3])),
            None
        );
    }
}
