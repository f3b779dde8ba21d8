//! Module `varmap` maintains the two-layer variable numbering and the
//! reconstruction stack that extends models across eliminating
//! transformations.
//!
//! *Outer* numbering is the caller's view and survives every renumbering,
//! replacement and elimination. *Inner* numbering is dense and owned by the
//! search engine. Everything recorded here is in outer numbering.
use crate::types::*;

/// One deferred obligation for model extension.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReconstructionStep {
    /// a clause removed by variable elimination, blocking on `witness`.
    Blocked { witness: Lit, clause: Vec<Lit> },
    /// `var` was collapsed onto the literal `rep`.
    Replaced { var: VarId, rep: Lit },
    /// `var` was solved in a component sub-solver with this value.
    Decomposed { var: VarId, value: bool },
}

/// A chronological stack of reconstruction steps, walked in reverse to
/// extend a model of the reduced formula to all outer variables.
#[derive(Clone, Debug, Default)]
pub struct Reconstructor {
    steps: Vec<ReconstructionStep>,
}

impl Reconstructor {
    pub fn push_blocked(&mut self, witness: Lit, clause: Vec<Lit>) {
        debug_assert!(clause.contains(&witness));
        self.steps.push(ReconstructionStep::Blocked { witness, clause });
    }
    pub fn push_replaced(&mut self, var: VarId, rep: Lit) {
        debug_assert_ne!(var, rep.vi());
        self.steps.push(ReconstructionStep::Replaced { var, rep });
    }
    pub fn push_decomposed(&mut self, var: VarId, value: bool) {
        self.steps.push(ReconstructionStep::Decomposed { var, value });
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    pub fn clear(&mut self) {
        self.steps.clear();
    }
    /// walk the stack newest-first, filling in removed variables.
    pub fn extend_model(&self, model: &mut [Option<bool>]) {
        for step in self.steps.iter().rev() {
            match step {
                ReconstructionStep::Blocked { witness, clause } => {
                    if !clause
                        .iter()
                        .any(|l| model[l.vi()] == Some(bool::from(*l)))
                    {
                        model[witness.vi()] = Some(bool::from(*witness));
                    }
                }
                ReconstructionStep::Replaced { var, rep } => {
                    model[*var] = model[rep.vi()].map(|b| if bool::from(*rep) { b } else { !b });
                }
                ReconstructionStep::Decomposed { var, value } => {
                    if model[*var].is_none() {
                        model[*var] = Some(*value);
                    }
                }
            }
        }
    }
}

/// The outer/inner map pair plus the reconstruction stack.
#[derive(Clone, Debug, Default)]
pub struct VarMap {
    /// outer -> inner; `None` once the var left the inner space
    to_inner: Vec<Option<VarId>>,
    /// inner -> outer
    to_outer: Vec<VarId>,
    /// outer vars invented by inprocessing; excluded from reported models
    hidden: Vec<VarId>,
    /// outer var -> the outer literal it collapsed onto, for replaced vars
    alias: Vec<Option<Lit>>,
    pub rcn: Reconstructor,
}

impl Instantiate for VarMap {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        let nv = cnf.num_of_variables;
        VarMap {
            to_inner: (0..=nv).map(Some).collect(),
            to_outer: (0..=nv).collect(),
            hidden: Vec::new(),
            alias: vec![None; nv + 1],
            rcn: Reconstructor::default(),
        }
    }
}

impl VarMap {
    /// the number of outer vars ever allocated.
    pub fn num_outer_vars(&self) -> usize {
        self.to_inner.len() - 1
    }
    /// allocate a fresh var present in both spaces; return `(outer, inner)`.
    pub fn add_var(&mut self) -> (VarId, VarId) {
        let inner = self.to_outer.len();
        let outer = self.to_inner.len();
        self.to_inner.push(Some(inner));
        self.to_outer.push(outer);
        self.alias.push(None);
        (outer, inner)
    }
    /// record a replacement in both the reconstruction stack and the alias
    /// table consulted by `lit_to_inner`.
    pub fn push_replaced(&mut self, var: VarId, rep: Lit) {
        self.rcn.push_replaced(var, rep);
        self.alias[var] = Some(rep);
    }
    /// follow replacement aliases down to a live representative.
    pub fn resolve_alias(&self, mut l: Lit) -> Lit {
        while let Some(Some(a)) = self.alias.get(l.vi()) {
            l = if bool::from(l) { *a } else { !*a };
        }
        l
    }
    /// allocate a fresh var invisible in reported models.
    pub fn add_hidden_var(&mut self) -> (VarId, VarId) {
        let pair = self.add_var();
        self.hidden.push(pair.0);
        pair
    }
    pub fn is_hidden(&self, outer: VarId) -> bool {
        self.hidden.contains(&outer)
    }
    #[inline]
    pub fn to_inner(&self, outer: VarId) -> Option<VarId> {
        self.to_inner.get(outer).copied().flatten()
    }
    #[inline]
    pub fn to_outer(&self, inner: VarId) -> VarId {
        self.to_outer[inner]
    }
    #[inline]
    pub fn lit_to_outer(&self, l: Lit) -> Lit {
        Lit::from_assign(self.to_outer[l.vi()], bool::from(l))
    }
    pub fn lit_to_inner(&self, l: Lit) -> Option<Lit> {
        let l = self.resolve_alias(l);
        self.to_inner(l.vi())
            .map(|vi| Lit::from_assign(vi, bool::from(l)))
    }
    pub fn lits_to_outer(&self, lits: &[Lit]) -> Vec<Lit> {
        lits.iter().map(|l| self.lit_to_outer(*l)).collect()
    }
    /// replace the inner space after a renumbering; `to_outer` lists the
    /// surviving outer var of every new inner slot, densely.
    pub fn rebuild(&mut self, to_outer: Vec<VarId>) {
        for m in self.to_inner.iter_mut() {
            *m = None;
        }
        self.to_inner[0] = Some(0);
        for (inner, outer) in to_outer.iter().enumerate().skip(1) {
            self.to_inner[*outer] = Some(inner);
        }
        self.to_outer = to_outer;
    }
    /// the certificate's literal map: inner lit ordinal -> outer i32.
    pub fn certificate_map(&self) -> Vec<i32> {
        let mut map = vec![0; 2 * self.to_outer.len()];
        for (inner, outer) in self.to_outer.iter().enumerate().skip(1) {
            map[2 * inner] = -(*outer as i32);
            map[2 * inner + 1] = *outer as i32;
        }
        map
    }
    /// build the outer model from the inner assignment and extend it over
    /// every removed variable.
    pub fn extend_model(&self, inner: &[Option<bool>]) -> Vec<Option<bool>> {
        let mut model: Vec<Option<bool>> = vec![None; self.to_inner.len()];
        for (vi, val) in inner.iter().enumerate().skip(1) {
            if vi < self.to_outer.len() {
                model[self.to_outer[vi]] = *val;
            }
        }
        self.rcn.extend_model(&mut model);
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_extension() {
        // clauses (x ∨ a) and (¬x ∨ b) removed by eliminating x;
        // with a=false the first record must flip x to true.
        let mut rcn = Reconstructor::default();
        let x = Lit::from(1i32);
        let a = Lit::from(2i32);
        let b = Lit::from(3i32);
        rcn.push_blocked(x, vec![x, a]);
        rcn.push_blocked(!x, vec![!x, b]);
        let mut model = vec![None, None, Some(false), Some(true)];
        rcn.extend_model(&mut model);
        // (¬x ∨ b) is satisfied by b, so x is set by the (x ∨ a) record
        assert_eq!(model[1], Some(true));
    }

    #[test]
    fn test_replaced_extension() {
        let mut rcn = Reconstructor::default();
        // var 2 ≡ ¬var 1
        rcn.push_replaced(2, Lit::from(-1i32));
        let mut model = vec![None, Some(true), None];
        rcn.extend_model(&mut model);
        assert_eq!(model[2], Some(false));
    }

    #[test]
    fn test_rebuild_maps() {
        let cnf = CNFDescription {
            num_of_variables: 5,
            ..CNFDescription::default()
        };
        let mut vm = VarMap::instantiate(&Config::default(), &cnf);
        // drop outer vars 2 and 4 from the inner space
        vm.rebuild(vec![0, 1, 3, 5]);
        assert_eq!(vm.to_inner(3), Some(2));
        assert_eq!(vm.to_inner(2), None);
        assert_eq!(vm.to_outer(3), 5);
        assert_eq!(vm.lit_to_outer(Lit::from(-2i32)), Lit::from(-3i32));
    }
}
