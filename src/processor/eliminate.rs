//! Bounded variable elimination by distribution.
use {
    super::{subsume, EliminateIF, Eliminator},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF, ClauseRef},
        state::{Stat, State},
        types::*,
        varmap::VarMap,
    },
};

/// where a clause over the candidate var lives.
#[derive(Clone, Debug)]
enum OccForm {
    Long(ClauseRef),
    Bin,
    Tri,
}

/// a snapshot of one clause over the candidate var; `lits[0]` is the
/// candidate literal for implicit clauses.
#[derive(Clone, Debug)]
struct OccClause {
    form: OccForm,
    lits: Vec<Lit>,
    red: bool,
}

pub(super) fn eliminate_var(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    vmap: &mut VarMap,
    vi: VarId,
    timedout: &mut usize,
) -> MaybeInconsistent {
    if asg.assign(vi).is_some()
        || elim[vi].aborted
        || asg.var(vi).is(FlagVar::FROZEN)
        || asg.var(vi).is(FlagVar::ELIMINATED)
    {
        return Ok(());
    }
    let lp = Lit::from_assign(vi, true);
    let ln = !lp;
    elim[vi].pos_occurs.retain(|cr| !cdb.is_dead(*cr));
    elim[vi].neg_occurs.retain(|cr| !cdb.is_dead(*cr));
    let pos_all = gather(cdb, elim, lp);
    let neg_all = gather(cdb, elim, ln);
    if elim.elim_var_occ < pos_all.len() * neg_all.len() {
        elim[vi].aborted = true;
        return Ok(());
    }
    let pos: Vec<&OccClause> = pos_all.iter().filter(|c| !c.red).collect();
    let neg: Vec<&OccClause> = neg_all.iter().filter(|c| !c.red).collect();
    //
    //## feasibility: compute all resolvents, giving up on any limit
    //
    let limit = pos.len() + neg.len() + elim.elim_grw_lim;
    let mut resolvents: Vec<Vec<Lit>> = Vec::new();
    for p in pos.iter() {
        for n in neg.iter() {
            if *timedout == 0 {
                // budget is gone; leave the formula untouched
                return Ok(());
            }
            *timedout = timedout.saturating_sub(p.lits.len() + n.lits.len());
            if let Some(res) = merge(asg, &p.lits, &n.lits, vi) {
                if res.is_empty() {
                    return Err(SolverError::RootLevelConflict((lp, AssignReason::None)));
                }
                if elim.aggressive && subsumed_by_binary(cdb, &res, vi) {
                    continue;
                }
                if elim.elim_cls_lim != 0 && elim.elim_cls_lim < res.len() {
                    return Ok(());
                }
                resolvents.push(res);
                if limit < resolvents.len() {
                    return Ok(());
                }
            }
        }
    }
    //
    //## accepted; build the model-extension records from the smaller side
    //
    make_eliminated_clauses(vmap, vi, &pos, &neg);
    //
    //## produce clauses in cross product
    //
    let mut units: Vec<Lit> = Vec::new();
    for mut res in resolvents.drain(..) {
        match res.len() {
            1 => units.push(res[0]),
            3 if covered_by_binary(cdb, &res) => (),
            _ => match cdb.new_clause(asg, &mut res, false) {
                RefClause::Clause(cr) => {
                    elim.add_cid_occur(&res, cr);
                    elim.enqueue_clause(cdb, cr);
                }
                RefClause::Binary => {
                    subsume_ternaries_with(cdb, res[0], res[1], vi);
                }
                _ => (),
            },
        }
        for q in res.iter() {
            elim.enqueue_var(asg, q.vi(), true);
        }
    }
    //
    //## detach every clause containing the var; deletions are delayed
    //## until the whole transformation is committed
    //
    for oc in pos_all.iter().chain(neg_all.iter()) {
        cdb.certification_store.delay_delete(&oc.lits);
    }
    cdb.certification_store.suspend(true);
    for oc in pos_all.iter().chain(neg_all.iter()) {
        match oc.form {
            OccForm::Long(cr) => {
                if !cdb.is_dead(cr) {
                    debug_assert!(!asg.locked(cr, cdb.lits(cr)[0]));
                    elim.remove_cid_occur(&oc.lits, cr);
                    cdb.remove_clause(cr);
                }
            }
            OccForm::Bin => cdb.remove_binary(oc.lits[0], oc.lits[1]),
            OccForm::Tri => cdb.remove_ternary(oc.lits[0], oc.lits[1], oc.lits[2]),
        }
    }
    cdb.certification_store.suspend(false);
    cdb.certification_store.flush_delayed(true);
    asg.handle(SolverEvent::Eliminate(vi));
    elim[vi].clear();
    elim.num_eliminated += 1;
    state[Stat::Eliminate] += 1;
    //
    //## assert unit resolvents, then refresh the occurrence world
    //
    for u in units.iter() {
        if asg.assigned(*u) == Some(true) {
            continue;
        }
        cdb.certificate_add_assertion(*u);
        asg.assign_at_root_level(*u)?;
    }
    if let Some(cc) = asg.propagate(cdb) {
        return Err(SolverError::RootLevelConflict(cc));
    }
    for oc in pos_all.iter().chain(neg_all.iter()) {
        for q in oc.lits.iter() {
            let w = q.vi();
            if w != vi && !asg.var(w).is(FlagVar::ELIMINATED) {
                elim[w].num_imp_pos = cdb.num_implicit_with(Lit::from_assign(w, true));
                elim[w].num_imp_neg = cdb.num_implicit_with(Lit::from_assign(w, false));
                elim.enqueue_var(asg, w, true);
            }
        }
    }
    subsume::backward_subsumption_check(asg, cdb, elim, state, timedout)
}

/// collect every clause containing `l`: the registered long ones plus the
/// implicit ones read off the watch lists.
fn gather(cdb: &ClauseDB, elim: &Eliminator, l: Lit) -> Vec<OccClause> {
    let mut vec = Vec::new();
    let occurs = if bool::from(l) {
        &elim[l.vi()].pos_occurs
    } else {
        &elim[l.vi()].neg_occurs
    };
    for cr in occurs.iter() {
        if !cdb.is_dead(*cr) {
            vec.push(OccClause {
                form: OccForm::Long(*cr),
                lits: cdb.lits(*cr).to_vec(),
                red: cdb.is_learnt(*cr),
            });
        }
    }
    for (lits, red) in cdb.watch_clauses_of(l) {
        let form = if lits.len() == 2 {
            OccForm::Bin
        } else {
            OccForm::Tri
        };
        vec.push(OccClause { form, lits, red });
    }
    vec
}

/// return the resolvent of two clauses on `v`, normalised against the root
/// assignment; `None` if it is tautological or satisfied.
fn merge(asg: &AssignStack, pb: &[Lit], qb: &[Lit], v: VarId) -> Option<Vec<Lit>> {
    let mut vec: Vec<Lit> = Vec::with_capacity(pb.len() + qb.len());
    for l in pb.iter().chain(qb.iter()) {
        if l.vi() == v {
            continue;
        }
        match asg.assigned(*l) {
            Some(true) => return None,
            Some(false) => continue,
            None => {
                if vec.contains(&!*l) {
                    return None;
                }
                if !vec.contains(l) {
                    vec.push(*l);
                }
            }
        }
    }
    Some(vec)
}

/// aggressive screening: an irredundant binary over other vars makes the
/// resolvent redundant before it is ever stored.
fn subsumed_by_binary(cdb: &ClauseDB, res: &[Lit], v: VarId) -> bool {
    for a in res.iter() {
        for (b, red) in cdb.binary_links_of(!*a) {
            if !red && b.vi() != v && *a != b && res.contains(&b) {
                return true;
            }
        }
    }
    false
}

/// is a ternary resolvent already covered by an attached binary clause?
fn covered_by_binary(cdb: &ClauseDB, res: &[Lit]) -> bool {
    debug_assert_eq!(res.len(), 3);
    cdb.registered_binary(res[0], res[1])
        || cdb.registered_binary(res[0], res[2])
        || cdb.registered_binary(res[1], res[2])
}

/// a fresh binary subsumes attached ternaries containing both its literals.
/// Clauses over the var being eliminated are left for the main deletion.
fn subsume_ternaries_with(cdb: &mut ClauseDB, a: Lit, b: Lit, skip: VarId) {
    let mut doomed = Vec::new();
    for (lits, _red) in cdb.watch_clauses_of(a) {
        if lits.len() == 3 && lits.contains(&b) && lits.iter().all(|l| l.vi() != skip) {
            doomed.push((lits[0], lits[1], lits[2]));
        }
    }
    for (l0, l1, l2) in doomed {
        cdb.remove_ternary(l0, l1, l2);
    }
}

/// push the blocked-clause records for `vi` onto the reconstruction stack,
/// in outer numbering: the clauses of the smaller irredundant side, then
/// the witness unit of the opposite polarity.
fn make_eliminated_clauses(vmap: &mut VarMap, vi: VarId, pos: &[&OccClause], neg: &[&OccClause]) {
    let lp = Lit::from_assign(vi, true);
    if neg.len() < pos.len() {
        for oc in neg.iter() {
            push_record(vmap, !lp, &oc.lits);
        }
        let w = vmap.lit_to_outer(lp);
        vmap.rcn.push_blocked(w, vec![w]);
    } else {
        for oc in pos.iter() {
            push_record(vmap, lp, &oc.lits);
        }
        let w = vmap.lit_to_outer(!lp);
        vmap.rcn.push_blocked(w, vec![w]);
    }
}

fn push_record(vmap: &mut VarMap, witness: Lit, lits: &[Lit]) {
    debug_assert!(lits.contains(&witness));
    let w = vmap.lit_to_outer(witness);
    let clause = vmap.lits_to_outer(lits);
    vmap.rcn.push_blocked(w, clause);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    #[test]
    fn test_merge() {
        let cnf = CNFDescription {
            num_of_variables: 5,
            ..CNFDescription::default()
        };
        let asg = AssignStack::instantiate(&Config::default(), &cnf);
        // (1 ∨ 2) x (-1 ∨ 3) on var 1 => (2 ∨ 3)
        assert_eq!(
            merge(&asg, &lits(&[1, 2]), &lits(&[-1, 3]), 1),
            Some(lits(&[2, 3]))
        );
        // tautological resolvent
        assert_eq!(merge(&asg, &lits(&[1, 2]), &lits(&[-1, -2]), 1), None);
        // merged duplicates collapse
        assert_eq!(
            merge(&asg, &lits(&[1, 2, 4]), &lits(&[-1, 2, 5]), 1),
            Some(lits(&[2, 4, 5]))
        );
    }
}
