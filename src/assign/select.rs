/// Decision var selection
use {
    super::{AssignIF, AssignStack},
    crate::{config::PolarityMode, types::*},
};

/// API for var selection, depending on an internal heap.
pub trait VarSelectIF {
    /// select a new decision variable with its polarity.
    fn select_decision_literal(&mut self) -> Lit;
    /// update the internal heap on var order.
    fn update_order(&mut self, v: VarId);
    /// rebuild the internal var_order.
    fn rebuild_order(&mut self);
}

impl VarSelectIF for AssignStack {
    fn select_decision_literal(&mut self) -> Lit {
        let vi = self.select_var();
        let positive = match self.pol_mode {
            PolarityMode::PosFirst => true,
            PolarityMode::NegFirst => false,
            PolarityMode::Random => self.rng.chance(0.5),
            PolarityMode::Automatic => {
                let saved = self.var[vi].is(FlagVar::PHASE);
                if self.rng.chance(self.flip_chance) {
                    !saved
                } else {
                    saved
                }
            }
        };
        Lit::from_assign(vi, positive)
    }
    fn update_order(&mut self, v: VarId) {
        self.var_order.update(&self.var, v);
    }
    fn rebuild_order(&mut self) {
        self.var_order.clear();
        for vi in 1..self.var.len() {
            if self.assign[vi].is_none() && !self.var[vi].is(FlagVar::ELIMINATED) {
                self.var_order.insert(&self.var, vi);
            }
        }
    }
}

impl AssignStack {
    /// select the highest-activity unassigned var, dropping stale entries lazily.
    fn select_var(&mut self) -> VarId {
        loop {
            let vi = self
                .var_order
                .pop(&self.var)
                .expect("no decision candidate remains");
            if self.assign[vi].is_none() && !self.var[vi].is(FlagVar::ELIMINATED) {
                return vi;
            }
        }
    }
}
