/// API for object properties.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag is on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags::bitflags! {
    /// Misc flags used by clause headers in the arena.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagClause: u8 {
        /// a clause generated by conflict analysis; removable.
        const LEARNT       = 0b0000_0001;
        /// a freed clause awaiting arena compaction.
        const DEAD         = 0b0000_0010;
        /// the length word holds a forwarding offset during compaction.
        const RELOCED      = 0b0000_0100;
        /// enqueued in the simplifier's subsumption queue.
        const ENQUEUED     = 0b0000_1000;
        /// registered in the simplifier's occurrence lists.
        const OCCUR_LINKED = 0b0001_0000;
    }
}

bitflags::bitflags! {
    /// Misc flags used by `Var`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u8 {
        /// the previous assigned value of a Var.
        const PHASE      = 0b0000_0001;
        /// removed from the inner search space (any `Removed` kind).
        const ELIMINATED = 0b0000_0100;
        /// enqueued in the simplifier's var queue.
        const ENQUEUED   = 0b0000_1000;
        /// checked during the current conflict analysis.
        const CA_SEEN    = 0b0001_0000;
        /// an assumption var; must not be eliminated, replaced or split off.
        const FROZEN     = 0b0010_0000;
    }
}
