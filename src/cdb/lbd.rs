use {
    super::{ClauseDB, ClauseRef},
    crate::{assign::AssignIF, types::*},
};

impl ClauseDB {
    /// glue of a long clause under the current assignment: the number of
    /// distinct non-root decision levels among its literals.
    pub(crate) fn lbd_of(&mut self, asg: &impl AssignIF, cr: ClauseRef) -> usize {
        let key: usize = self.lbd_temp[0] + 1;
        self.lbd_temp[0] = key;
        let mut cnt = 0;
        for i in 0..self.arena.len(cr) {
            let lv = asg.level(self.arena.lit(cr, i).vi());
            if lv == 0 {
                continue;
            }
            let p = &mut self.lbd_temp[lv as usize];
            if *p != key {
                *p = key;
                cnt += 1;
            }
        }
        cnt
    }
}
