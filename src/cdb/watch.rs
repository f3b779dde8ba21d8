//! Watch lists over binary, ternary and long clauses.
use {
    super::ClauseRef,
    crate::types::*,
    std::ops::{Index, IndexMut},
};

/// One watch entry. Binary and ternary clauses live entirely in these
/// entries; a long clause is reached through its `ClauseRef` with a cached
/// blocking literal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Watch {
    Binary { other: Lit, red: bool },
    Ternary { o1: Lit, o2: Lit, red: bool },
    Long { cref: ClauseRef, blocker: Lit },
}

/// For every literal L, the list of watches to inspect when L becomes true;
/// each entry stands for a clause containing ¬L.
#[derive(Clone, Debug, Default)]
pub struct WatchLists {
    watch: Vec<Vec<Watch>>,
}

impl Index<Lit> for WatchLists {
    type Output = Vec<Watch>;
    #[inline]
    fn index(&self, l: Lit) -> &Self::Output {
        &self.watch[usize::from(l)]
    }
}

impl IndexMut<Lit> for WatchLists {
    #[inline]
    fn index_mut(&mut self, l: Lit) -> &mut Self::Output {
        &mut self.watch[usize::from(l)]
    }
}

impl WatchLists {
    pub fn new(num_vars: usize) -> Self {
        WatchLists {
            watch: vec![Vec::new(); 2 * (num_vars + 1)],
        }
    }
    /// make room for one more var.
    pub fn expand(&mut self) {
        self.watch.push(Vec::new());
        self.watch.push(Vec::new());
    }
    pub fn num_slots(&self) -> usize {
        self.watch.len()
    }
    pub fn iter_lists(&self) -> std::slice::Iter<'_, Vec<Watch>> {
        self.watch.iter()
    }
    pub fn iter_lists_mut(&mut self) -> std::slice::IterMut<'_, Vec<Watch>> {
        self.watch.iter_mut()
    }
    pub fn take(&mut self, l: Lit) -> Vec<Watch> {
        std::mem::take(&mut self.watch[usize::from(l)])
    }
    pub fn put(&mut self, l: Lit, ws: Vec<Watch>) {
        self.watch[usize::from(l)] = ws;
    }
    pub fn clear(&mut self) {
        for ws in self.watch.iter_mut() {
            ws.clear();
        }
    }
    pub fn attach_binary(&mut self, l0: Lit, l1: Lit, red: bool) {
        self.watch[usize::from(!l0)].push(Watch::Binary { other: l1, red });
        self.watch[usize::from(!l1)].push(Watch::Binary { other: l0, red });
    }
    pub fn detach_binary(&mut self, l0: Lit, l1: Lit) {
        self.watch[usize::from(!l0)]
            .delete_unstable(|w| matches!(w, Watch::Binary { other, .. } if *other == l1));
        self.watch[usize::from(!l1)]
            .delete_unstable(|w| matches!(w, Watch::Binary { other, .. } if *other == l0));
    }
    pub fn attach_ternary(&mut self, l0: Lit, l1: Lit, l2: Lit, red: bool) {
        self.watch[usize::from(!l0)].push(Watch::Ternary { o1: l1, o2: l2, red });
        self.watch[usize::from(!l1)].push(Watch::Ternary { o1: l0, o2: l2, red });
        self.watch[usize::from(!l2)].push(Watch::Ternary { o1: l0, o2: l1, red });
    }
    pub fn detach_ternary(&mut self, l0: Lit, l1: Lit, l2: Lit) {
        let same = |a: Lit, b: Lit, x: Lit, y: Lit| (a == x && b == y) || (a == y && b == x);
        self.watch[usize::from(!l0)]
            .delete_unstable(|w| matches!(w, Watch::Ternary { o1, o2, .. } if same(*o1, *o2, l1, l2)));
        self.watch[usize::from(!l1)]
            .delete_unstable(|w| matches!(w, Watch::Ternary { o1, o2, .. } if same(*o1, *o2, l0, l2)));
        self.watch[usize::from(!l2)]
            .delete_unstable(|w| matches!(w, Watch::Ternary { o1, o2, .. } if same(*o1, *o2, l0, l1)));
    }
    pub fn attach_long(&mut self, cref: ClauseRef, l0: Lit, l1: Lit) {
        self.watch[usize::from(!l0)].push(Watch::Long { cref, blocker: l1 });
        self.watch[usize::from(!l1)].push(Watch::Long { cref, blocker: l0 });
    }
    pub fn detach_long(&mut self, cref: ClauseRef, l0: Lit, l1: Lit) {
        self.watch[usize::from(!l0)]
            .delete_unstable(|w| matches!(w, Watch::Long { cref: c, .. } if *c == cref));
        self.watch[usize::from(!l1)]
            .delete_unstable(|w| matches!(w, Watch::Long { cref: c, .. } if *c == cref));
    }
    /// is the binary clause `(l0 ∨ l1)` attached? Returns its redundancy.
    pub fn registered_binary(&self, l0: Lit, l1: Lit) -> Option<bool> {
        self.watch[usize::from(!l0)].iter().find_map(|w| match w {
            Watch::Binary { other, red } if *other == l1 => Some(*red),
            _ => None,
        })
    }
    /// is the ternary clause `(l0 ∨ l1 ∨ l2)` attached? Returns its redundancy.
    pub fn registered_ternary(&self, l0: Lit, l1: Lit, l2: Lit) -> Option<bool> {
        let same = |a: Lit, b: Lit, x: Lit, y: Lit| (a == x && b == y) || (a == y && b == x);
        self.watch[usize::from(!l0)].iter().find_map(|w| match w {
            Watch::Ternary { o1, o2, red } if same(*o1, *o2, l1, l2) => Some(*red),
            _ => None,
        })
    }
    /// binary implications of `l`: the pairs `(implied, red)` over clauses `(¬l ∨ implied)`.
    pub fn bin_links(&self, l: Lit) -> impl Iterator<Item = (Lit, bool)> + '_ {
        self.watch[usize::from(l)].iter().filter_map(|w| match w {
            Watch::Binary { other, red } => Some((*other, *red)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_registration() {
        let mut w = WatchLists::new(4);
        let a = Lit::from(1);
        let b = Lit::from(-2);
        w.attach_binary(a, b, false);
        assert_eq!(w.registered_binary(a, b), Some(false));
        assert_eq!(w.registered_binary(b, a), Some(false));
        assert_eq!(w.registered_binary(a, !b), None);
        // (1 ∨ -2): -1 implies -2
        assert_eq!(w.bin_links(!a).collect::<Vec<_>>(), vec![(b, false)]);
        w.detach_binary(a, b);
        assert_eq!(w.registered_binary(a, b), None);
    }

    #[test]
    fn test_ternary_registration() {
        let mut w = WatchLists::new(4);
        let (a, b, c) = (Lit::from(1), Lit::from(2), Lit::from(3));
        w.attach_ternary(a, b, c, true);
        assert_eq!(w.registered_ternary(a, b, c), Some(true));
        assert_eq!(w.registered_ternary(b, c, a), Some(true));
        w.detach_ternary(a, b, c);
        assert_eq!(w.registered_ternary(a, b, c), None);
        assert!(w[!a].is_empty() && w[!b].is_empty() && w[!c].is_empty());
    }
}
