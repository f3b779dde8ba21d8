//! Module `processor` implements the inprocessing simplifier:
//!
//! * private module `subsume` provides clause subsumption and strengthening
//! * private module `eliminate` provides bounded variable elimination
//! * private module `replace` collapses equivalent literals
//! * private module `probe` provides failed-literal probing with
//!   hyper-binary resolution
//! * private module `bva` provides bounded variable addition
//!
//! Everything runs at the root level between search episodes, under a
//! shared bogo-propagation budget, and exits gracefully with partial
//! progress when the budget is gone.

/// bounded variable addition
mod bva;
/// var elimination
mod eliminate;
/// occurrence-cost heap
mod heap;
/// failed-literal probing
mod probe;
/// equivalent-literal replacement
mod replace;
/// the simplify driver
mod simplify;
/// clause subsumption
mod subsume;

pub use self::{
    bva::add_bounded_vars,
    probe::probe,
    replace::replace_equivalences,
    simplify::clean_at_root,
};

use {
    crate::{
        assign::AssignStack,
        cdb::{ClauseDB, ClauseRef},
        state::State,
        types::*,
        varmap::VarMap,
    },
    heap::VarOccHeap,
    std::ops::{Index, IndexMut},
};

/// API for the simplifier: `prepare`, `simplify`, `stop` and so on.
pub trait EliminateIF: Instantiate {
    /// check if the simplifier is in occurrence mode.
    fn is_running(&self) -> bool;
    /// rebuild occurrence lists and queues.
    fn prepare(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB);
    /// enqueue a var into the elimination heap.
    fn enqueue_var(&mut self, asg: &AssignStack, vi: VarId, upward: bool);
    /// simplify the database by clause subsumption, strengthening and
    /// bounded variable elimination, to a fixpoint or a budget.
    ///
    /// # Errors
    ///
    /// if the formula turned out to be inconsistent.
    fn simplify(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
        vmap: &mut VarMap,
    ) -> MaybeInconsistent;
    /// leave occurrence mode, dropping the occurrence lists.
    fn stop(&mut self, cdb: &mut ClauseDB);
    /// return a var's occurrence counts `(pos, neg)` while running.
    fn stats(&self, vi: VarId) -> Option<(usize, usize)>;
}

#[derive(Copy, Clone, Eq, Debug, PartialEq)]
enum EliminatorMode {
    Dormant,
    Running,
}

/// Mapping from a var to its clauses.
#[derive(Clone, Debug, Default)]
pub struct LitOccurs {
    pub aborted: bool,
    /// long clauses with the positive literal
    pub pos_occurs: Vec<ClauseRef>,
    /// long clauses with the negative literal
    pub neg_occurs: Vec<ClauseRef>,
    /// irredundant binary/ternary occurrences of the positive literal
    pub num_imp_pos: usize,
    /// irredundant binary/ternary occurrences of the negative literal
    pub num_imp_neg: usize,
}

impl LitOccurs {
    /// return a new vector of $n$ `LitOccurs`s.
    pub fn new(n: usize) -> Vec<LitOccurs> {
        vec![LitOccurs::default(); n + 1]
    }
    pub fn clear(&mut self) {
        self.aborted = false;
        self.pos_occurs.clear();
        self.neg_occurs.clear();
        self.num_imp_pos = 0;
        self.num_imp_neg = 0;
    }
    /// the elimination cost driving the heap order.
    pub fn activity(&self) -> usize {
        if self.aborted {
            usize::MAX
        } else {
            (self.pos_occurs.len() + self.num_imp_pos)
                .saturating_mul(self.neg_occurs.len() + self.num_imp_neg)
        }
    }
}

/// The inprocessing simplifier.
#[derive(Debug)]
pub struct Eliminator {
    pub enable: bool,
    mode: EliminatorMode,
    /// long clauses awaiting backward subsumption
    clause_queue: Vec<ClauseRef>,
    var_queue: VarOccHeap,
    /// occurrence lists indexed by var
    var: Vec<LitOccurs>,
    /// resolvent length cap; 0 means no limit
    elim_cls_lim: usize,
    /// allowed growth of the clause count per elimination
    elim_grw_lim: usize,
    /// skip a var when its occurrence count exceeds this
    elim_var_occ: usize,
    aggressive: bool,
    pub num_subsumed: usize,
    pub num_strengthened: usize,
    pub num_eliminated: usize,
}

impl Default for Eliminator {
    fn default() -> Eliminator {
        Eliminator {
            enable: true,
            mode: EliminatorMode::Dormant,
            clause_queue: Vec::new(),
            var_queue: VarOccHeap::new(0),
            var: LitOccurs::new(0),
            elim_cls_lim: 32,
            elim_grw_lim: 0,
            elim_var_occ: 10_000,
            aggressive: false,
            num_subsumed: 0,
            num_strengthened: 0,
            num_eliminated: 0,
        }
    }
}

impl Instantiate for Eliminator {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Eliminator {
        let nv = cnf.num_of_variables;
        Eliminator {
            enable: config.use_elim(),
            var_queue: VarOccHeap::new(nv),
            var: LitOccurs::new(nv),
            elim_cls_lim: config.elim_cls_lim,
            elim_grw_lim: config.elim_grw_lim,
            elim_var_occ: config.elim_var_occ,
            aggressive: config.use_elim_aggressive(),
            ..Eliminator::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        if e == SolverEvent::NewVar {
            self.var.push(LitOccurs::default());
        }
    }
}

impl Index<VarId> for Eliminator {
    type Output = LitOccurs;
    #[inline]
    fn index(&self, i: VarId) -> &Self::Output {
        &self.var[i]
    }
}

impl IndexMut<VarId> for Eliminator {
    #[inline]
    fn index_mut(&mut self, i: VarId) -> &mut Self::Output {
        &mut self.var[i]
    }
}

impl Index<Lit> for Eliminator {
    type Output = LitOccurs;
    #[inline]
    fn index(&self, l: Lit) -> &Self::Output {
        &self.var[l.vi()]
    }
}

impl IndexMut<Lit> for Eliminator {
    #[inline]
    fn index_mut(&mut self, l: Lit) -> &mut Self::Output {
        &mut self.var[l.vi()]
    }
}

impl Eliminator {
    /// register a long clause in the occurrence lists.
    pub(super) fn add_cid_occur(&mut self, lits: &[Lit], cr: ClauseRef) {
        for l in lits.iter() {
            let w = &mut self.var[l.vi()];
            if bool::from(*l) {
                w.pos_occurs.push(cr);
            } else {
                w.neg_occurs.push(cr);
            }
        }
    }
    /// withdraw a long clause from the occurrence lists.
    pub(super) fn remove_cid_occur(&mut self, lits: &[Lit], cr: ClauseRef) {
        for l in lits.iter() {
            self.remove_lit_occur(*l, cr);
        }
    }
    /// withdraw one literal's registration.
    pub(super) fn remove_lit_occur(&mut self, l: Lit, cr: ClauseRef) {
        let w = &mut self.var[l.vi()];
        if bool::from(l) {
            w.pos_occurs.delete_unstable(|c| *c == cr);
        } else {
            w.neg_occurs.delete_unstable(|c| *c == cr);
        }
    }
    /// schedule a clause for backward subsumption.
    pub(super) fn enqueue_clause(&mut self, cdb: &mut ClauseDB, cr: ClauseRef) {
        use crate::cdb::ClauseDBIF;
        if self.mode != EliminatorMode::Running
            || cdb.is_dead(cr)
            || cdb.flag(cr, FlagClause::ENQUEUED)
        {
            return;
        }
        cdb.set_flag(cr, FlagClause::ENQUEUED, true);
        self.clause_queue.push(cr);
    }
    pub(super) fn pop_queued_clause(&mut self, cdb: &mut ClauseDB) -> Option<ClauseRef> {
        use crate::cdb::ClauseDBIF;
        while let Some(cr) = self.clause_queue.pop() {
            if cdb.is_dead(cr) {
                continue;
            }
            cdb.set_flag(cr, FlagClause::ENQUEUED, false);
            return Some(cr);
        }
        None
    }
    pub(super) fn clear_clause_queue(&mut self, cdb: &mut ClauseDB) {
        use crate::cdb::ClauseDBIF;
        for cr in self.clause_queue.drain(..) {
            if !cdb.is_dead(cr) {
                cdb.set_flag(cr, FlagClause::ENQUEUED, false);
            }
        }
    }
    pub(super) fn pop_cheapest_var(&mut self, asg: &AssignStack) -> Option<VarId> {
        let Eliminator {
            ref mut var_queue,
            ref var,
            ..
        } = self;
        var_queue.select_var(var, asg)
    }
}
