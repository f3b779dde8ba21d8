//! main struct AssignStack
use {
    super::{AssignIF, AssignReason, Removed, Var, VarIdHeap},
    crate::{cdb::ClauseRef, config::PolarityMode, primitive::Rng, types::*},
    std::{fmt, ops::Range, slice::Iter},
};

/// A record of assignments, called 'trail' in Glucose.
#[derive(Clone, Debug)]
pub struct AssignStack {
    /// assignment of vars
    pub(super) assign: Vec<Option<bool>>,
    /// decision levels of vars
    pub(super) level: Vec<DecisionLevel>,
    /// reasons of assignments
    pub(super) reason: Vec<AssignReason>,
    /// vars
    pub(super) var: Vec<Var>,
    /// record of assignment
    pub(super) trail: Vec<Lit>,
    pub(super) trail_lim: Vec<usize>,
    /// the-number-of-assigned-and-propagated-vars
    pub(super) q_head: usize,
    pub root_level: DecisionLevel,
    /// var order heap
    pub(super) var_order: VarIdHeap,
    /// assumptions of the ongoing `solve` call
    pub(super) assumption: Vec<Lit>,

    //
    //## Statistics
    //
    /// the number of vars.
    pub num_vars: usize,
    /// the number of asserted vars.
    pub num_asserted_vars: usize,
    /// the number of vars removed from the inner space.
    pub num_eliminated_vars: usize,
    pub num_decision: usize,
    pub num_propagation: usize,
    /// watch inspections; the unit of inprocessing budgets.
    pub num_bogo: usize,
    pub num_conflict: usize,
    pub num_restart: usize,

    //
    //## Var Rewarding
    //
    pub(super) activity_inc: f64,
    pub(super) activity_decay: f64,

    //
    //## Decision
    //
    pub(super) rng: Rng,
    pub(super) pol_mode: PolarityMode,
    pub(super) flip_chance: f64,
}

impl Default for AssignStack {
    fn default() -> AssignStack {
        AssignStack {
            assign: vec![None],
            level: vec![0],
            reason: vec![AssignReason::None],
            var: Var::new_vars(0),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            q_head: 0,
            root_level: 0,
            var_order: VarIdHeap::new(0),
            assumption: Vec::new(),
            num_vars: 0,
            num_asserted_vars: 0,
            num_eliminated_vars: 0,
            num_decision: 0,
            num_propagation: 0,
            num_bogo: 0,
            num_conflict: 0,
            num_restart: 0,
            activity_inc: 1.0,
            activity_decay: 0.95,
            rng: Rng::default(),
            pol_mode: PolarityMode::Automatic,
            flip_chance: 0.001,
        }
    }
}

impl<'a> IntoIterator for &'a AssignStack {
    type Item = &'a Lit;
    type IntoIter = Iter<'a, Lit>;
    fn into_iter(self) -> Self::IntoIter {
        self.trail.iter()
    }
}

impl Instantiate for AssignStack {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> AssignStack {
        let nv = cnf.num_of_variables;
        AssignStack {
            assign: vec![None; nv + 1],
            level: vec![0; nv + 1],
            reason: vec![AssignReason::None; nv + 1],
            var: Var::new_vars(nv),
            trail: Vec::with_capacity(nv),
            var_order: VarIdHeap::new(nv),
            num_vars: nv,
            activity_decay: config.vrw_dcy,
            rng: Rng::new(config.seed),
            pol_mode: config.pol_mode,
            ..AssignStack::default()
        }
    }
    #[inline]
    fn handle(&mut self, e: SolverEvent) {
        match e {
            SolverEvent::NewVar => {
                self.assign.push(None);
                self.level.push(0);
                self.reason.push(AssignReason::None);
                self.var.push(Var::default());
                self.var_order.expand();
                self.num_vars += 1;
                let vi = self.num_vars;
                self.var_order.insert(&self.var, vi);
            }
            SolverEvent::Eliminate(vi) => {
                self.make_var_removed(vi, Removed::Eliminated);
            }
            SolverEvent::Replace(vi) => {
                self.make_var_removed(vi, Removed::Replaced);
            }
            SolverEvent::Decompose(vi) => {
                self.make_var_removed(vi, Removed::Decomposed);
            }
            SolverEvent::Reinitialize => {
                debug_assert_eq!(self.decision_level(), self.root_level);
            }
            _ => (),
        }
    }
}

impl AssignIF for AssignStack {
    fn assigned(&self, l: Lit) -> Option<bool> {
        match self.assign[l.vi()] {
            Some(x) if !bool::from(l) => Some(!x),
            x => x,
        }
    }
    #[inline]
    fn assign(&self, vi: VarId) -> Option<bool> {
        self.assign[vi]
    }
    #[inline]
    fn level(&self, vi: VarId) -> DecisionLevel {
        self.level[vi]
    }
    #[inline]
    fn reason(&self, vi: VarId) -> AssignReason {
        self.reason[vi]
    }
    #[inline]
    fn set_reason(&mut self, vi: VarId, r: AssignReason) {
        self.reason[vi] = r;
    }
    fn level_ref(&self) -> &[DecisionLevel] {
        &self.level
    }
    #[inline]
    fn var(&self, vi: VarId) -> &Var {
        &self.var[vi]
    }
    #[inline]
    fn var_mut(&mut self, vi: VarId) -> &mut Var {
        &mut self.var[vi]
    }
    fn root_level(&self) -> DecisionLevel {
        self.root_level
    }
    fn decision_level(&self) -> DecisionLevel {
        self.trail_lim.len() as DecisionLevel
    }
    fn stack(&self, i: usize) -> Lit {
        self.trail[i]
    }
    fn stack_range(&self, r: Range<usize>) -> &[Lit] {
        &self.trail[r]
    }
    fn stack_len(&self) -> usize {
        self.trail.len()
    }
    fn len_upto(&self, n: DecisionLevel) -> usize {
        self.trail_lim.get(n as usize).map_or(self.trail.len(), |n| *n)
    }
    fn stack_iter(&self) -> Iter<'_, Lit> {
        self.trail.iter()
    }
    fn remains(&self) -> bool {
        self.q_head < self.trail.len()
    }
    fn locked(&self, cr: ClauseRef, l0: Lit) -> bool {
        self.assigned(l0) == Some(true) && self.reason[l0.vi()] == AssignReason::Implication(cr)
    }
    fn assign_ref(&self) -> Vec<Option<bool>> {
        self.assign.clone()
    }
    fn satisfies(&self, vec: &[Lit]) -> bool {
        vec.iter().any(|l| self.assigned(*l) == Some(true))
    }
    fn make_var_asserted(&mut self, vi: VarId) {
        self.reason[vi] = AssignReason::Decision(0);
        self.num_asserted_vars += 1;
        self.var[vi].activity = 0.0;
        self.var_order.remove(&self.var, vi);
    }
    fn make_var_removed(&mut self, vi: VarId, kind: Removed) {
        debug_assert_ne!(kind, Removed::None);
        if !self.var[vi].is(FlagVar::ELIMINATED) {
            self.var[vi].turn_on(FlagVar::ELIMINATED);
            self.var[vi].removed = kind;
            self.var[vi].activity = 0.0;
            self.var_order.remove(&self.var, vi);
            debug_assert_eq!(self.decision_level(), self.root_level);
            self.trail.retain(|l| l.vi() != vi);
            self.q_head = self.q_head.min(self.trail.len());
            self.num_eliminated_vars += 1;
        }
    }
}

impl AssignStack {
    /// return the decision var of level `lv`.
    pub fn decision_vi(&self, lv: DecisionLevel) -> VarId {
        debug_assert!(0 < lv);
        self.trail[self.trail_lim[lv as usize - 1]].vi()
    }
    /// open a decision level carrying no decision; used for satisfied assumptions.
    pub fn begin_vacuous_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }
    /// replace the assumption set for one `solve` call, freezing the vars.
    pub fn set_assumptions(&mut self, lits: Vec<Lit>) {
        for l in self.assumption.iter() {
            self.var[l.vi()].turn_off(FlagVar::FROZEN);
        }
        for l in lits.iter() {
            self.var[l.vi()].turn_on(FlagVar::FROZEN);
        }
        self.assumption = lits;
    }
    pub fn num_assumptions(&self) -> usize {
        self.assumption.len()
    }
    pub fn assumption(&self, i: usize) -> Lit {
        self.assumption[i]
    }
    /// the number of vars whose value is fixed one way or another.
    pub fn num_unresolved_vars(&self) -> usize {
        self.num_vars - self.trail.len() - self.num_eliminated_vars
    }
    pub(super) fn level_up(&mut self) {
        self.trail_lim.push(self.trail.len());
    }
    /// compact the var space along `map` (old inner -> new inner; 0 drops).
    /// *precondition*: root level, fully propagated, no assumptions.
    pub fn apply_renumber(&mut self, map: &[VarId], new_n: usize) {
        debug_assert!(self.trail_lim.is_empty());
        debug_assert!(self.assumption.is_empty());
        let remap = |l: Lit| Lit::from_assign(map[l.vi()], bool::from(l));
        let mut assign = vec![None; new_n + 1];
        let mut level = vec![0; new_n + 1];
        let mut reason = vec![AssignReason::None; new_n + 1];
        let mut var = Var::new_vars(new_n);
        for old in 1..=self.num_vars {
            let new = map[old];
            if new == 0 {
                continue;
            }
            assign[new] = self.assign[old];
            level[new] = self.level[old];
            reason[new] = match self.reason[old] {
                AssignReason::BinaryLink(x) => AssignReason::BinaryLink(remap(x)),
                AssignReason::TernaryLink(x, y) => {
                    AssignReason::TernaryLink(remap(x), remap(y))
                }
                r => r,
            };
            var[new] = self.var[old].clone();
        }
        self.assign = assign;
        self.level = level;
        self.reason = reason;
        self.var = var;
        for l in self.trail.iter_mut() {
            debug_assert_ne!(map[l.vi()], 0, "a removed var survived on the trail");
            *l = remap(*l);
        }
        self.q_head = self.trail.len();
        self.num_vars = new_n;
        self.num_eliminated_vars = 0;
        self.var_order = VarIdHeap::new(new_n);
        self.var_order.clear();
        for vi in 1..=new_n {
            if self.assign[vi].is_none() {
                self.var_order.insert(&self.var, vi);
            }
        }
    }
}

impl fmt::Display for AssignStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.trail.iter().map(|l| i32::from(*l)).collect::<Vec<_>>();
        let levels = self.decision_level();
        write!(
            f,
            "ASG:: trail({}):{:?}\n      level: {}, asserted: {}, eliminated: {}",
            self.trail.len(),
            &v,
            levels,
            self.num_asserted_vars,
            self.num_eliminated_vars,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{super::PropagateIF, *};

    fn lit(i: i32) -> Lit {
        Lit::from(i)
    }

    #[test]
    fn test_propagation() {
        let config = Config::default();
        let cnf = CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&config, &cnf);
        // [] + 1 => [1]
        assert!(asg.assign_at_root_level(lit(1)).is_ok());
        assert_eq!(asg.trail, vec![lit(1)]);

        // [1] + 1 => [1]
        assert!(asg.assign_at_root_level(lit(1)).is_ok());
        assert_eq!(asg.trail, vec![lit(1)]);

        // [1] + 2 => [1, 2]
        assert!(asg.assign_at_root_level(lit(2)).is_ok());
        assert_eq!(asg.trail, vec![lit(1), lit(2)]);

        // [1, 2] + -1 => ABORT & [1, 2]
        assert!(asg.assign_at_root_level(lit(-1)).is_err());
        assert_eq!(asg.decision_level(), 0);
        assert_eq!(asg.stack_len(), 2);

        // [1, 2] + 3 => [1, 2, 3]
        asg.assign_by_decision(lit(3));
        assert_eq!(asg.trail, vec![lit(1), lit(2), lit(3)]);
        assert_eq!(asg.decision_level(), 1);
        assert_eq!(asg.stack_len(), 3);
        assert_eq!(asg.len_upto(0), 2);

        // [1, 2, 3] + 4 => [1, 2, 3, 4]
        asg.assign_by_decision(lit(4));
        assert_eq!(asg.trail, vec![lit(1), lit(2), lit(3), lit(4)]);
        assert_eq!(asg.decision_level(), 2);
        assert_eq!(asg.stack_len(), 4);
        assert_eq!(asg.len_upto(1), 3);

        // [1, 2, 3, 4] => [1, 2, 3]
        asg.cancel_until(1);
        assert_eq!(asg.trail, vec![lit(1), lit(2), lit(3)]);
        assert_eq!(asg.decision_level(), 1);
        assert_eq!(asg.stack_len(), 3);
        assert_eq!(asg.trail_lim, vec![2]);
        assert_eq!(asg.assigned(lit(1)), Some(true));
        assert_eq!(asg.assigned(lit(-1)), Some(false));
        assert_eq!(asg.assigned(lit(4)), None);

        // [1, 2, 3] => [1, 2, -4]
        asg.assign_at_root_level(Lit::from(-4i32))
            .expect("impossible");
        assert_eq!(asg.trail, vec![lit(1), lit(2), lit(-4)]);
        assert_eq!(asg.decision_level(), 0);
        assert_eq!(asg.stack_len(), 3);

        assert_eq!(asg.assigned(lit(-4)), Some(true));
        assert_eq!(asg.assigned(lit(-3)), None);
    }
}
