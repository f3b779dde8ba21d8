//! Learnt clause database reduction.
use {
    super::{ClauseDB, ClauseDBIF},
    crate::{assign::AssignIF, types::*},
    std::cmp::Ordering,
};

impl ClauseDB {
    /// drop the worse half of the unprotected long learnts. Locked clauses
    /// and those within the glue bound survive unconditionally.
    pub(super) fn reduce_db(&mut self, asg: &mut impl AssignIF) {
        debug_assert_eq!(asg.decision_level(), asg.root_level());
        let co_lbd_bound = self.co_lbd_bound;
        let ClauseDB {
            ref arena,
            ref mut long_red,
            ..
        } = self;
        long_red.retain(|cr| !arena.is(*cr, FlagClause::DEAD));
        let mut perm: Vec<(u16, f32, ClauseRef)> = Vec::with_capacity(long_red.len());
        for cr in long_red.iter() {
            let glue = arena.glue(*cr);
            if glue <= co_lbd_bound {
                continue;
            }
            if asg.locked(*cr, arena.lit(*cr, 0)) {
                continue;
            }
            perm.push((glue, arena.activity(*cr), *cr));
        }
        // best first: small glue, then high activity
        perm.sort_unstable_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
        });
        let keep = perm.len() / 2;
        let mut tmp = Vec::new();
        for (_, _, cr) in perm.drain(keep..) {
            tmp.push(cr);
        }
        for cr in tmp {
            self.remove_clause(cr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::AssignStack;

    #[test]
    fn test_reduce_halves_learnts() {
        let mut config = Config::default();
        config.rdc_start = 0;
        config.rdc_lbd_thr = 0;
        let cnf = CNFDescription {
            num_of_variables: 30,
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        for i in 1..=6 {
            let mut v: Vec<Lit> = (0..4)
                .map(|k| Lit::from_assign((i + k) as usize, k % 2 == 0))
                .collect();
            let RefClause::Clause(cr) = cdb.new_clause(&asg, &mut v, true) else {
                panic!("expected a long clause")
            };
            cdb.arena.set_glue(cr, i as u16 + 4);
        }
        assert_eq!(cdb.num_learnt, 6);
        assert!(cdb.reduce(&mut asg));
        assert_eq!(cdb.num_learnt, 3);
    }
}
