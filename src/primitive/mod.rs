/// Exponential moving averages
pub mod ema;
/// a per-solver pseudo random number generator
pub mod rng;

pub use self::{
    ema::{Ema, Ema2, EmaIF},
    rng::Rng,
};
