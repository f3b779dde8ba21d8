//! Clause activity management; the f32 twin of the var scheme.
use {super::ClauseDB, crate::types::*};

const ACTIVITY_MAX: f32 = 1e20;
const ACTIVITY_SCALE_DOWN: f32 = 1e-20;

impl ActivityIF<ClauseRef> for ClauseDB {
    fn activity(&self, cr: ClauseRef) -> f64 {
        self.arena.activity(cr) as f64
    }
    fn set_activity(&mut self, cr: ClauseRef, val: f64) {
        self.arena.set_activity(cr, val as f32);
    }
    fn reward_at_analysis(&mut self, cr: ClauseRef) {
        let a = self.arena.activity(cr) + self.cla_inc;
        self.arena.set_activity(cr, a);
        if ACTIVITY_MAX < a {
            self.rescale_activities();
        }
    }
    fn update_activity_tick(&mut self) {
        self.cla_inc /= self.cla_decay;
    }
}

impl ClauseDB {
    fn rescale_activities(&mut self) {
        for i in 0..self.long_red.len() {
            let cr = self.long_red[i];
            if self.arena.is(cr, FlagClause::DEAD) {
                continue;
            }
            let a = self.arena.activity(cr) * ACTIVITY_SCALE_DOWN;
            self.arena.set_activity(cr, a);
        }
        self.cla_inc *= ACTIVITY_SCALE_DOWN;
    }
}
