//! The simplify driver: occurrence registration, the
//! subsumption/elimination loop, and root-level clause cleaning.
use {
    super::{eliminate::eliminate_var, subsume, EliminateIF, Eliminator, EliminatorMode, LitOccurs},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        state::{State, StateIF},
        types::*,
        varmap::VarMap,
    },
};

/// the bogo-prop budget of one simplification episode.
const SIMPLIFY_BUDGET: usize = 1_000_000;

impl EliminateIF for Eliminator {
    fn is_running(&self) -> bool {
        self.mode == EliminatorMode::Running
    }
    fn prepare(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB) {
        self.mode = EliminatorMode::Running;
        if self.var.len() != asg.num_vars + 1 {
            self.var = LitOccurs::new(asg.num_vars);
            self.var_queue.resize(asg.num_vars);
        } else {
            for w in self.var.iter_mut() {
                w.clear();
            }
            self.var_queue.clear();
        }
        self.clause_queue.clear();
        for red in [false, true] {
            for cr in cdb.long_refs(red) {
                let lits = cdb.lits(cr).to_vec();
                self.add_cid_occur(&lits, cr);
                if !red {
                    self.enqueue_clause(cdb, cr);
                }
            }
        }
        for (a, b, red) in cdb.binaries() {
            if !red {
                self.count_implicit(a);
                self.count_implicit(b);
            }
        }
        for (a, b, c, red) in cdb.ternaries() {
            if !red {
                self.count_implicit(a);
                self.count_implicit(b);
                self.count_implicit(c);
            }
        }
        for vi in 1..=asg.num_vars {
            let v = asg.var(vi);
            if asg.assign(vi).is_none()
                && !v.is(FlagVar::ELIMINATED)
                && !v.is(FlagVar::FROZEN)
            {
                self.enqueue_var(asg, vi, true);
            }
        }
    }
    fn enqueue_var(&mut self, asg: &AssignStack, vi: VarId, upward: bool) {
        if self.mode != EliminatorMode::Running {
            return;
        }
        let v = asg.var(vi);
        if v.is(FlagVar::ELIMINATED) || v.is(FlagVar::FROZEN) {
            return;
        }
        let Eliminator {
            ref mut var_queue,
            ref var,
            ..
        } = self;
        var_queue.insert(var, vi, upward);
    }
    fn simplify(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
        vmap: &mut VarMap,
    ) -> MaybeInconsistent {
        if !self.enable {
            return Ok(());
        }
        clean_at_root(asg, cdb)?;
        self.prepare(asg, cdb);
        let mut timedout: usize = SIMPLIFY_BUDGET;
        let mut result = Ok(());
        loop {
            if state.is_interrupted() {
                // leave gracefully; every committed transformation is
                // self-contained, so nothing needs to be undone
                break;
            }
            result = subsume::backward_subsumption_check(asg, cdb, self, state, &mut timedout)
                .and_then(|_| {
                    subsume::subsume_with_binaries(asg, cdb, self, state, &mut timedout)
                });
            if result.is_err() || timedout == 0 {
                break;
            }
            let mut eliminated_here = false;
            while let Some(vi) = self.pop_cheapest_var(asg) {
                let before = self.num_eliminated;
                result = eliminate_var(asg, cdb, self, state, vmap, vi, &mut timedout);
                if result.is_err() {
                    break;
                }
                eliminated_here |= before < self.num_eliminated;
                if timedout == 0 {
                    break;
                }
            }
            if result.is_err() || timedout == 0 || !eliminated_here {
                break;
            }
        }
        self.stop(cdb);
        if result.is_ok() {
            result = clean_at_root(asg, cdb);
        }
        result
    }
    fn stop(&mut self, cdb: &mut ClauseDB) {
        self.clear_clause_queue(cdb);
        for w in self.var.iter_mut() {
            w.clear();
        }
        self.var_queue.clear();
        self.mode = EliminatorMode::Dormant;
    }
    fn stats(&self, vi: VarId) -> Option<(usize, usize)> {
        if self.mode != EliminatorMode::Running {
            return None;
        }
        let w = &self.var[vi];
        Some((
            w.pos_occurs.len() + w.num_imp_pos,
            w.neg_occurs.len() + w.num_imp_neg,
        ))
    }
}

impl Eliminator {
    fn count_implicit(&mut self, l: Lit) {
        if bool::from(l) {
            self.var[l.vi()].num_imp_pos += 1;
        } else {
            self.var[l.vi()].num_imp_neg += 1;
        }
    }
}

/// propagate and rewrite the whole database against the root assignment:
/// satisfied clauses go away, falsified literals are stripped, shrunken
/// clauses re-enter as their shorter forms, and fresh units are asserted.
pub fn clean_at_root(asg: &mut AssignStack, cdb: &mut ClauseDB) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    loop {
        if let Some(cc) = asg.propagate(cdb) {
            return Err(SolverError::RootLevelConflict(cc));
        }
        let mut changed = false;
        for (a, b, _red) in cdb.binaries() {
            match (asg.assigned(a), asg.assigned(b)) {
                (Some(true), _) | (_, Some(true)) => {
                    cdb.remove_binary(a, b);
                    changed = true;
                }
                (Some(false), None) => {
                    cdb.certificate_add_assertion(b);
                    asg.assign_at_root_level(b)?;
                    cdb.remove_binary(a, b);
                    changed = true;
                }
                (None, Some(false)) => {
                    cdb.certificate_add_assertion(a);
                    asg.assign_at_root_level(a)?;
                    cdb.remove_binary(a, b);
                    changed = true;
                }
                (Some(false), Some(false)) => {
                    return Err(SolverError::RootLevelConflict((a, AssignReason::BinaryLink(b))));
                }
                (None, None) => (),
            }
        }
        for (a, b, c, red) in cdb.ternaries() {
            let lits = [a, b, c];
            if lits.iter().any(|l| asg.assigned(*l) == Some(true)) {
                cdb.remove_ternary(a, b, c);
                changed = true;
                continue;
            }
            let mut remains: Vec<Lit> = lits
                .iter()
                .filter(|l| asg.assigned(**l).is_none())
                .copied()
                .collect();
            if remains.len() == 3 {
                continue;
            }
            changed = true;
            match remains.len() {
                0 => {
                    return Err(SolverError::RootLevelConflict((
                        a,
                        AssignReason::TernaryLink(b, c),
                    )))
                }
                1 => {
                    cdb.certificate_add_assertion(remains[0]);
                    cdb.remove_ternary(a, b, c);
                    asg.assign_at_root_level(remains[0])?;
                }
                2 => {
                    cdb.new_clause(asg, &mut remains, red);
                    cdb.remove_ternary(a, b, c);
                }
                _ => unreachable!(),
            }
        }
        for red in [false, true] {
            for cr in cdb.long_refs(red) {
                if cdb.is_dead(cr) {
                    continue;
                }
                match cdb.transform_by_simplification(asg, cr) {
                    RefClause::Clause(_) => (),
                    RefClause::EmptyClause => {
                        let l0 = cdb.lits(cr)[0];
                        return Err(SolverError::RootLevelConflict((
                            l0,
                            AssignReason::Implication(cr),
                        )));
                    }
                    RefClause::UnitClause(l) => {
                        cdb.certificate_add_assertion(l);
                        cdb.remove_clause(cr);
                        asg.assign_at_root_level(l)?;
                        changed = true;
                    }
                    RefClause::Dead
                    | RefClause::Binary
                    | RefClause::Ternary
                    | RefClause::RegisteredClause => {
                        changed = true;
                    }
                }
            }
        }
        if !changed && !asg.remains() {
            return Ok(());
        }
    }
}
