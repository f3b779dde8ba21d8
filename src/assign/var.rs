//! Var struct and its small world
use {
    crate::types::{FlagIF, FlagVar},
    std::fmt,
};

/// How a variable left the inner search space.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Removed {
    /// still a search variable.
    #[default]
    None,
    /// resolved away by bounded variable elimination.
    Eliminated,
    /// collapsed onto the representative of its equivalence class.
    Replaced,
    /// moved into a sub-solver by the component splitter.
    Decomposed,
}

/// Object representing a variable.
#[derive(Clone, Debug)]
pub struct Var {
    /// the `Flag`s (8 bits)
    pub(crate) flags: FlagVar,
    /// a dynamic evaluation criterion like EVSIDS.
    pub(crate) activity: f64,
    /// how the var was removed, if it was.
    pub(crate) removed: Removed,
}

impl Default for Var {
    fn default() -> Var {
        Var {
            flags: FlagVar::empty(),
            activity: 0.0,
            removed: Removed::None,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let st = |flag, mes| if self.is(flag) { mes } else { "" };
        write!(
            f,
            "V{{{:?}{}{}}}",
            self.removed,
            st(FlagVar::FROZEN, ", frozen"),
            st(FlagVar::CA_SEEN, ", seen"),
        )
    }
}

impl Var {
    /// return a new vector of $n$ `Var`s.
    pub fn new_vars(n: usize) -> Vec<Var> {
        vec![Var::default(); n + 1]
    }
    pub fn activity(&self) -> f64 {
        self.activity
    }
    pub fn removed(&self) -> Removed {
        self.removed
    }
}

impl FlagIF for Var {
    type FlagType = FlagVar;
    #[inline]
    fn is(&self, flag: Self::FlagType) -> bool {
        self.flags.contains(flag)
    }
    #[inline]
    fn set(&mut self, f: Self::FlagType, b: bool) {
        self.flags.set(f, b);
    }
    #[inline]
    fn turn_off(&mut self, flag: Self::FlagType) {
        self.flags.remove(flag);
    }
    #[inline]
    fn turn_on(&mut self, flag: Self::FlagType) {
        self.flags.insert(flag);
    }
}
