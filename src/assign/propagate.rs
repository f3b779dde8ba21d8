//! Boolean constraint propagation over binary, ternary and long watches.
use {
    super::{AssignIF, AssignReason, AssignStack},
    crate::{
        cdb::{ClauseDBIF, Watch},
        types::*,
    },
};

/// API for Boolean Constraint Propagation like
/// [`propagate`](`crate::assign::PropagateIF::propagate`),
/// [`assign_by_decision`](`crate::assign::PropagateIF::assign_by_decision`),
/// [`cancel_until`](`crate::assign::PropagateIF::cancel_until`), and so on.
pub trait PropagateIF {
    /// add an assignment at root level as a precondition.
    ///
    /// # Errors
    ///
    /// emit `SolverError::RootLevelConflict` if the solver becomes inconsistent.
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent;
    /// unsafe enqueue (assign by implication); doesn't emit an exception.
    ///
    /// ## Warning
    /// Callers must assure the consistency after this assignment.
    fn assign_by_implication(&mut self, l: Lit, reason: AssignReason, lv: DecisionLevel);
    /// unsafe assume (assign by decision); doesn't emit an exception.
    /// ## Caveat
    /// Callers have to assure the consistency after this assignment.
    fn assign_by_decision(&mut self, l: Lit);
    /// execute *backjump*.
    fn cancel_until(&mut self, lv: DecisionLevel);
    /// execute *boolean constraint propagation* or *unit propagation*.
    fn propagate<C>(&mut self, cdb: &mut C) -> Option<ConflictContext>
    where
        C: ClauseDBIF;
}

#[cfg(feature = "unsafe_access")]
macro_rules! var_assign {
    ($asg: expr, $var: expr) => {
        unsafe { *$asg.assign.get_unchecked($var) }
    };
}
#[cfg(not(feature = "unsafe_access"))]
macro_rules! var_assign {
    ($asg: expr, $var: expr) => {
        $asg.assign[$var]
    };
}

macro_rules! lit_assign {
    ($asg: expr, $lit: expr) => {
        match $lit {
            l => match var_assign!($asg, l.vi()) {
                Some(x) if !bool::from(l) => Some(!x),
                x => x,
            },
        }
    };
}

macro_rules! set_assign {
    ($asg: expr, $lit: expr) => {
        match $lit {
            l => {
                $asg.assign[l.vi()] = Some(bool::from(l));
            }
        }
    };
}

macro_rules! unset_assign {
    ($asg: expr, $var: expr) => {
        $asg.assign[$var] = None;
    };
}

impl PropagateIF for AssignStack {
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent {
        self.cancel_until(self.root_level);
        let vi = l.vi();
        debug_assert!(vi < self.var.len());
        debug_assert!(!self.var[vi].is(FlagVar::ELIMINATED));
        debug_assert!(self.trail_lim.is_empty());
        match var_assign!(self, vi) {
            None => {
                set_assign!(self, l);
                self.level[vi] = self.root_level;
                self.reason[vi] = AssignReason::Decision(0);
                debug_assert!(!self.trail.contains(&!l));
                self.trail.push(l);
                self.make_var_asserted(vi);
                Ok(())
            }
            Some(x) if x == bool::from(l) => Ok(()),
            _ => Err(SolverError::RootLevelConflict((l, self.reason[vi]))),
        }
    }
    fn assign_by_implication(&mut self, l: Lit, reason: AssignReason, lv: DecisionLevel) {
        debug_assert!(usize::from(l) != 0, "null literal is about to be enqueued");
        let vi = l.vi();
        debug_assert!(vi < self.var.len());
        debug_assert!(!self.var[vi].is(FlagVar::ELIMINATED));
        debug_assert!(
            var_assign!(self, vi) == Some(bool::from(l)) || var_assign!(self, vi).is_none()
        );
        set_assign!(self, l);
        self.level[vi] = lv;
        self.reason[vi] = reason;
        debug_assert!(!self.trail.contains(&l));
        debug_assert!(!self.trail.contains(&!l));
        self.trail.push(l);
        if self.root_level == lv {
            self.make_var_asserted(vi);
        }
    }
    fn assign_by_decision(&mut self, l: Lit) {
        let vi = l.vi();
        debug_assert!(vi < self.var.len());
        debug_assert!(!self.trail.contains(&l));
        debug_assert!(!self.trail.contains(&!l), "the trail contains a strange literal");
        debug_assert!(!self.var[vi].is(FlagVar::ELIMINATED));
        self.level_up();
        let dl = self.trail_lim.len() as DecisionLevel;
        set_assign!(self, l);
        self.level[vi] = dl;
        self.reason[vi] = AssignReason::Decision(dl);
        self.trail.push(l);
        self.num_decision += 1;
        debug_assert!(self.q_head < self.trail.len());
    }
    fn cancel_until(&mut self, lv: DecisionLevel) {
        if self.trail_lim.len() as u32 <= lv {
            return;
        }
        let lim = self.trail_lim[lv as usize];
        for i in lim..self.trail.len() {
            let l = self.trail[i];
            let vi = l.vi();
            debug_assert!(
                var_assign!(self, vi).is_some(),
                "cancel_until found an unassigned var in the trail: {l}",
            );
            self.var[vi].set(FlagVar::PHASE, var_assign!(self, vi).unwrap());
            unset_assign!(self, vi);
            self.reason[vi] = AssignReason::None;
            self.var_order.insert(&self.var, vi);
        }
        self.trail.truncate(lim);
        self.trail_lim.truncate(lv as usize);
        self.q_head = self.trail.len();
        debug_assert!(self
            .trail
            .iter()
            .all(|l| var_assign!(self, l.vi()).is_some()));
        debug_assert!(self.trail.iter().all(|k| !self.trail.contains(&!*k)));
        if lv == self.root_level {
            self.num_restart += 1;
        }
    }
    /// UNIT PROPAGATION.
    /// Note:
    ///  - *Precondition*: no dead clause is watched. They cause crashes.
    ///  - The trail is processed in enqueue order; watch lists are compacted
    ///    in place, keeping surviving entries in their relative order.
    fn propagate<C>(&mut self, cdb: &mut C) -> Option<ConflictContext>
    where
        C: ClauseDBIF,
    {
        while let Some(p) = self.trail.get(self.q_head).copied() {
            self.num_propagation += 1;
            self.q_head += 1;
            let false_lit = !p;
            let dl = self.decision_level();
            let mut ws = cdb.take_watchers(p);
            let n = ws.len();
            let mut i = 0;
            let mut j = 0;

            macro_rules! conflict_found {
                ($cc: expr) => {{
                    // keep this entry and everything not inspected yet
                    for k in (i - 1)..n {
                        ws[j] = ws[k];
                        j += 1;
                    }
                    ws.truncate(j);
                    cdb.restore_watchers(p, ws);
                    self.num_conflict += 1;
                    return Some($cc);
                }};
            }

            'next_watch: while i < n {
                self.num_bogo += 1;
                let w = ws[i];
                i += 1;
                match w {
                    Watch::Binary { other, .. } => {
                        debug_assert_ne!(other, false_lit);
                        match lit_assign!(self, other) {
                            Some(true) => (),
                            Some(false) => conflict_found!((false_lit, AssignReason::BinaryLink(other))),
                            None => {
                                self.assign_by_implication(
                                    other,
                                    AssignReason::BinaryLink(false_lit),
                                    dl,
                                );
                            }
                        }
                        ws[j] = w;
                        j += 1;
                    }
                    Watch::Ternary { o1, o2, .. } => {
                        let v1 = lit_assign!(self, o1);
                        let v2 = lit_assign!(self, o2);
                        if v1 != Some(true) && v2 != Some(true) {
                            match (v1, v2) {
                                (Some(false), Some(false)) => {
                                    conflict_found!((false_lit, AssignReason::TernaryLink(o1, o2)))
                                }
                                (None, Some(false)) => {
                                    self.assign_by_implication(
                                        o1,
                                        AssignReason::TernaryLink(false_lit, o2),
                                        dl,
                                    );
                                }
                                (Some(false), None) => {
                                    self.assign_by_implication(
                                        o2,
                                        AssignReason::TernaryLink(false_lit, o1),
                                        dl,
                                    );
                                }
                                (None, None) => (),
                                _ => unreachable!(),
                            }
                        }
                        ws[j] = w;
                        j += 1;
                    }
                    Watch::Long { cref, blocker } => {
                        if lit_assign!(self, blocker) == Some(true) {
                            ws[j] = w;
                            j += 1;
                            continue 'next_watch;
                        }
                        let (false_pos, other, new_pos) = {
                            let c = cdb.lits(cref);
                            debug_assert!(c[0] == false_lit || c[1] == false_lit);
                            let (fp, o) = if c[0] == false_lit { (0, c[1]) } else { (1, c[0]) };
                            if lit_assign!(self, o) == Some(true) {
                                ws[j] = Watch::Long { cref, blocker: o };
                                j += 1;
                                continue 'next_watch;
                            }
                            let mut np = None;
                            for (k, lk) in c.iter().enumerate().skip(2) {
                                self.num_bogo += 1;
                                if lit_assign!(self, *lk) != Some(false) {
                                    np = Some(k);
                                    break;
                                }
                            }
                            (fp, o, np)
                        };
                        if let Some(k) = new_pos {
                            // the entry moves to the new watch literal's list
                            cdb.transform_by_updating_watch(cref, false_pos, k);
                            continue 'next_watch;
                        }
                        if false_pos == 0 {
                            cdb.swap_watch(cref);
                        }
                        match lit_assign!(self, other) {
                            Some(false) => conflict_found!((other, AssignReason::Implication(cref))),
                            None => {
                                debug_assert_eq!(cdb.lits(cref)[0], other);
                                self.assign_by_implication(
                                    other,
                                    AssignReason::Implication(cref),
                                    dl,
                                );
                            }
                            Some(true) => unreachable!("a satisfied watch survived the blocker check"),
                        }
                        ws[j] = Watch::Long { cref, blocker: other };
                        j += 1;
                    }
                }
            }
            ws.truncate(j);
            cdb.restore_watchers(p, ws);
        }
        None
    }
}

#[allow(dead_code)]
impl AssignStack {
    /// expand a conflict context into the literals of the falsified clause.
    pub fn conflict_lits<C>(cdb: &C, cc: &ConflictContext, out: &mut Vec<Lit>)
    where
        C: ClauseDBIF,
    {
        out.clear();
        match cc.1 {
            AssignReason::BinaryLink(other) => {
                out.push(cc.0);
                out.push(other);
            }
            AssignReason::TernaryLink(o1, o2) => {
                out.push(cc.0);
                out.push(o1);
                out.push(o2);
            }
            AssignReason::Implication(cr) => {
                out.extend_from_slice(cdb.lits(cr));
            }
            _ => unreachable!("not a conflict context"),
        }
    }
}
