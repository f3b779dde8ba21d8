//! Conflict analysis: first-UIP learning, minimisation and on-the-fly
//! subsumption of consulted reason clauses.
use {
    super::restart::{ProgressUpdate, RestartIF, Restarter},
    crate::{
        assign::{AssignIF, AssignReason, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        state::{Stat, State},
        types::*,
    },
};

pub fn handle_conflict(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    rst: &mut Restarter,
    state: &mut State,
    cc: &ConflictContext,
) -> MaybeInconsistent {
    let mut conflicting_level = asg.decision_level();
    // a conflict clause may live entirely below the current level when
    // vacuous assumption levels are open; fall back to its highest level.
    {
        let mut buf = Vec::new();
        AssignStack::conflict_lits(cdb, cc, &mut buf);
        let max_lvl = buf
            .iter()
            .map(|l| asg.level(l.vi()))
            .max()
            .unwrap_or(asg.root_level());
        if max_lvl == asg.root_level() {
            return Err(SolverError::RootLevelConflict(*cc));
        }
        if max_lvl < conflicting_level {
            asg.cancel_until(max_lvl);
            conflicting_level = max_lvl;
        }
    }
    rst.update(ProgressUpdate::Counter);
    rst.update(ProgressUpdate::ASG(asg.stack_len()));

    let assign_level = conflict_analyze(asg, cdb, state, cc).max(asg.root_level());
    let new_learnt = &mut state.new_learnt;
    let learnt_len = new_learnt.len();
    if learnt_len == 0 {
        return Err(SolverError::EmptyClause);
    }
    let l0 = new_learnt[0];
    if learnt_len == 1 {
        //
        //## A NEW ASSERTION by UNIT LEARNT CLAUSE GENERATION
        //
        asg.cancel_until(asg.root_level);
        cdb.certificate_add_assertion(l0);
        state.otf_queue.clear();
        if asg.assign_at_root_level(l0).is_err() {
            return Err(SolverError::RootLevelConflict((l0, asg.reason(l0.vi()))));
        }
        rst.handle(SolverEvent::Assert(l0.vi()));
        asg.update_activity_tick();
        cdb.update_activity_tick();
        return Ok(());
    }
    //
    //## Learnt Literal Rewarding
    //
    for lit in new_learnt.iter() {
        asg.reward_at_analysis(lit.vi());
    }
    asg.cancel_until(assign_level);
    debug_assert_eq!(asg.assigned(l0), None);
    let l1 = new_learnt[1];
    debug_assert_eq!(
        new_learnt.iter().skip(1).map(|l| asg.level(l.vi())).max(),
        Some(assign_level)
    );
    let glue = match cdb.new_clause(asg, new_learnt, true) {
        RefClause::Binary | RefClause::RegisteredClause if learnt_len == 2 => {
            debug_assert_eq!(asg.assigned(l1), Some(false));
            asg.assign_by_implication(l0, AssignReason::BinaryLink(l1), assign_level);
            1
        }
        RefClause::Ternary | RefClause::RegisteredClause if learnt_len == 3 => {
            let l2 = state.new_learnt[2];
            asg.assign_by_implication(l0, AssignReason::TernaryLink(l1, l2), assign_level);
            2
        }
        RefClause::Clause(cr) => {
            debug_assert_eq!(cdb.lits(cr)[0], l0);
            let glue = cdb.lbd_of(asg, cr);
            cdb.set_glue_of(cr, glue);
            asg.assign_by_implication(l0, AssignReason::Implication(cr), assign_level);
            glue as u16
        }
        _ => unreachable!("a learnt clause can't be unit here"),
    };
    rst.update(ProgressUpdate::LBD(glue));
    state.c_lvl.update(conflicting_level as f64);
    state.b_lvl.update(assign_level as f64);
    apply_on_the_fly_subsumptions(asg, cdb, state);
    asg.update_activity_tick();
    cdb.update_activity_tick();
    Ok(())
}

/// strengthen reason clauses which the fresh learnt proved over-wide.
/// Queued during analysis, applied only after the backjump so watch
/// invariants are re-established on a clean trail.
fn apply_on_the_fly_subsumptions(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
    while let Some((cr, p)) = state.otf_queue.pop() {
        if cdb.is_dead(cr) || asg.locked(cr, cdb.lits(cr)[0]) {
            continue;
        }
        if !cdb.lits(cr).contains(&p) {
            continue;
        }
        let learnt = &state.new_learnt;
        if cdb.lits(cr).len() <= learnt.len() {
            continue;
        }
        if !learnt
            .iter()
            .all(|l| *l != p && cdb.lits(cr).contains(l))
        {
            continue;
        }
        cdb.transform_by_elimination(asg, cr, p);
        state[Stat::Strengthen] += 1;
    }
}

///
/// ## Conflict Analysis
///
#[allow(clippy::cognitive_complexity)]
fn conflict_analyze(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    cc: &ConflictContext,
) -> DecisionLevel {
    state.otf_queue.clear();
    let learnt = &mut state.new_learnt;
    learnt.clear();
    learnt.push(NULL_LIT);
    let root_level = asg.root_level();
    let dl = asg.decision_level();
    let mut path_cnt = 0;
    let mut ti = asg.stack_len() - 1; // trail index
    let mut reason = cc.1;
    let mut p = cc.0;
    let mut first_round = true;
    loop {
        let mut mark = |asg: &mut AssignStack, learnt: &mut Vec<Lit>, q: Lit| {
            let vi = q.vi();
            let lvl = asg.level(vi);
            if !asg.var(vi).is(FlagVar::CA_SEEN) && root_level < lvl {
                debug_assert!(!asg.var(vi).is(FlagVar::ELIMINATED));
                debug_assert!(asg.assign(vi).is_some(), "unassigned var in analysis: {q}");
                asg.var_mut(vi).turn_on(FlagVar::CA_SEEN);
                asg.reward_at_analysis(vi);
                if dl <= lvl {
                    path_cnt += 1;
                } else {
                    learnt.push(q);
                }
            }
        };
        match reason {
            AssignReason::BinaryLink(x) => {
                if first_round {
                    mark(asg, learnt, p);
                }
                mark(asg, learnt, x);
            }
            AssignReason::TernaryLink(x, y) => {
                if first_round {
                    mark(asg, learnt, p);
                }
                mark(asg, learnt, x);
                mark(asg, learnt, y);
            }
            AssignReason::Implication(cr) => {
                debug_assert!(!cdb.is_dead(cr));
                cdb.update_at_analysis(asg, cr);
                let len = cdb.lits(cr).len();
                let skip = usize::from(!first_round);
                let mut resolved = 0;
                for i in skip..len {
                    let q = cdb.lits(cr)[i];
                    let vi = q.vi();
                    if asg.var(vi).is(FlagVar::CA_SEEN) || asg.level(vi) == root_level {
                        resolved += 1;
                    }
                    mark(asg, learnt, q);
                }
                // every sibling literal was involved already: the final
                // learnt may subsume this clause minus the resolved literal.
                if !first_round && resolved == len - 1 && 3 < len {
                    state.otf_queue.push((cr, p));
                }
            }
            AssignReason::Decision(_) | AssignReason::None => {
                unreachable!("found a strange var in conflict analysis")
            }
        }
        first_round = false;
        // set the index of the next literal to ti
        while {
            let vi = asg.stack(ti).vi();
            let lvl = asg.level(vi);
            !asg.var(vi).is(FlagVar::CA_SEEN) || lvl != dl
        } {
            debug_assert!(0 < ti, "conflict analysis broke the bottom of the trail");
            ti -= 1;
        }
        p = asg.stack(ti);
        asg.var_mut(p.vi()).turn_off(FlagVar::CA_SEEN);
        path_cnt -= 1;
        if path_cnt == 0 {
            break;
        }
        debug_assert!(0 < ti);
        ti -= 1;
        reason = asg.reason(p.vi());
    }
    debug_assert!(learnt.iter().all(|l| *l != !p));
    debug_assert_eq!(asg.level(p.vi()), dl);
    learnt[0] = !p;
    state.minimize_learnt(asg, cdb)
}

impl State {
    fn minimize_learnt(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB) -> DecisionLevel {
        let State {
            ref mut new_learnt, ..
        } = self;
        let mut to_clear: Vec<Lit> = vec![new_learnt[0]];
        // the abstract-levels mask: bit (level mod 32) per learnt literal
        let mut levels: u32 = 0;
        for l in &new_learnt[1..] {
            to_clear.push(*l);
            levels |= 1 << (asg.level(l.vi()) & 31);
        }
        let l0 = new_learnt[0];
        new_learnt.retain(|l| *l == l0 || !l.is_redundant(asg, cdb, &mut to_clear, levels));
        let len = new_learnt.len();
        if 2 < len && len < 30 {
            cdb.minimize_with_bi_clauses(asg, new_learnt);
        }
        // find the correct backtrack level from the remaining literals
        let mut level_to_return = 0;
        if 1 < new_learnt.len() {
            let mut max_i = 1;
            level_to_return = asg.level(new_learnt[max_i].vi());
            for (i, l) in new_learnt.iter().enumerate().skip(2) {
                let lv = asg.level(l.vi());
                if level_to_return < lv {
                    level_to_return = lv;
                    max_i = i;
                }
            }
            new_learnt.swap(1, max_i);
        }
        for l in &to_clear {
            asg.var_mut(l.vi()).turn_off(FlagVar::CA_SEEN);
        }
        level_to_return
    }
}

/// return `true` if the `lit` is redundant: every path from it through the
/// implication graph ends in the learnt clause without passing a decision.
impl Lit {
    fn is_redundant(
        self,
        asg: &mut AssignStack,
        cdb: &ClauseDB,
        clear: &mut Vec<Lit>,
        levels: u32,
    ) -> bool {
        if matches!(asg.reason(self.vi()), AssignReason::Decision(_)) {
            return false;
        }
        let mut stack = vec![self];
        let top = clear.len();
        let mut antecedents: Vec<Lit> = Vec::new();
        while let Some(sl) = stack.pop() {
            antecedents.clear();
            match asg.reason(sl.vi()) {
                AssignReason::BinaryLink(x) => antecedents.push(x),
                AssignReason::TernaryLink(x, y) => {
                    antecedents.push(x);
                    antecedents.push(y);
                }
                AssignReason::Implication(cr) => {
                    antecedents.extend(cdb.lits(cr).iter().skip(1));
                }
                AssignReason::Decision(_) | AssignReason::None => {
                    unreachable!("strange redundancy check")
                }
            }
            for q in antecedents.iter() {
                let vi = q.vi();
                let lv = asg.level(vi);
                if 0 < lv && !asg.var(vi).is(FlagVar::CA_SEEN) {
                    if matches!(
                        asg.reason(vi),
                        AssignReason::BinaryLink(_)
                            | AssignReason::TernaryLink(_, _)
                            | AssignReason::Implication(_)
                    ) && 0 != levels & (1 << (lv & 31))
                    {
                        asg.var_mut(vi).turn_on(FlagVar::CA_SEEN);
                        stack.push(*q);
                        clear.push(*q);
                    } else {
                        // one of the roots is a decision var at an unchecked level.
                        for l in &clear[top..] {
                            asg.var_mut(l.vi()).turn_off(FlagVar::CA_SEEN);
                        }
                        clear.truncate(top);
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// build the final conflict clause of an assumption run: the subset of
/// assumptions that drove the failed one to false.
pub fn analyze_final(asg: &mut AssignStack, cdb: &ClauseDB, state: &mut State, failed: Lit) {
    state.conflicts.clear();
    let mut seen = vec![false; asg.num_vars + 1];
    seen[failed.vi()] = true;
    state.conflicts.push(failed);
    if asg.decision_level() == asg.root_level() {
        // refuted by root facts alone; the failed assumption is the whole story
        return;
    }
    let bottom = asg.len_upto(asg.root_level());
    for i in (bottom..asg.stack_len()).rev() {
        let l = asg.stack(i);
        let vi = l.vi();
        if !seen[vi] {
            continue;
        }
        match asg.reason(vi) {
            AssignReason::Decision(_) => {
                // an assumption this chain hangs on
                state.conflicts.push(l);
            }
            AssignReason::BinaryLink(x) => {
                if 0 < asg.level(x.vi()) {
                    seen[x.vi()] = true;
                }
            }
            AssignReason::TernaryLink(x, y) => {
                if 0 < asg.level(x.vi()) {
                    seen[x.vi()] = true;
                }
                if 0 < asg.level(y.vi()) {
                    seen[y.vi()] = true;
                }
            }
            AssignReason::Implication(cr) => {
                for q in cdb.lits(cr).iter().skip(1) {
                    if 0 < asg.level(q.vi()) {
                        seen[q.vi()] = true;
                    }
                }
            }
            AssignReason::None => (),
        }
        seen[vi] = false;
    }
}
