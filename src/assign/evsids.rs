/// Var activity by EVSIDS: bump on analysis, decay by scaling the increment.
use {
    super::{AssignIF, AssignStack},
    crate::types::*,
};

const ACTIVITY_MAX: f64 = 1e100;
const ACTIVITY_SCALE_DOWN: f64 = 1e-100;

impl ActivityIF<VarId> for AssignStack {
    fn activity(&self, vi: VarId) -> f64 {
        self.var[vi].activity
    }
    fn set_activity(&mut self, vi: VarId, val: f64) {
        self.var[vi].activity = val;
    }
    fn reward_at_analysis(&mut self, vi: VarId) {
        self.var[vi].activity += self.activity_inc;
        if ACTIVITY_MAX < self.var[vi].activity {
            self.rescale_activities();
        }
        if self.var_order.contains(vi) {
            self.var_order.update(&self.var, vi);
        }
    }
    fn update_activity_tick(&mut self) {
        self.activity_inc /= self.activity_decay;
    }
}

impl AssignStack {
    fn rescale_activities(&mut self) {
        for v in self.var.iter_mut().skip(1) {
            v.activity *= ACTIVITY_SCALE_DOWN;
        }
        self.activity_inc *= ACTIVITY_SCALE_DOWN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::VarSelectIF;

    #[test]
    fn test_bump_reorders_heap() {
        let config = Config::default();
        let cnf = CNFDescription {
            num_of_variables: 3,
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&config, &cnf);
        asg.rebuild_order();
        asg.reward_at_analysis(3);
        assert_eq!(asg.select_decision_literal().vi(), 3);
    }
}
