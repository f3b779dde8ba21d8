//! Exponential moving average structs with a calibration stage.
use std::fmt;

/// API for exponential moving averages.
pub trait EmaIF {
    /// return the current value.
    fn get(&self) -> f64;
    /// return the fast value; identical to `get` for a single-speed EMA.
    fn get_fast(&self) -> f64 {
        self.get()
    }
    /// return the ratio of short-term to long-term average.
    fn trend(&self) -> f64 {
        1.0
    }
}

/// A single-speed exponential moving average.
#[derive(Clone, Debug)]
pub struct Ema {
    val: f64,
    cal: f64,
    sca: f64,
}

impl EmaIF for Ema {
    fn get(&self) -> f64 {
        self.val / self.cal
    }
}

impl Ema {
    pub fn new(s: usize) -> Ema {
        Ema {
            val: 0.0,
            cal: 0.0,
            sca: 1.0 / (s as f64),
        }
    }
    pub fn update(&mut self, x: f64) {
        self.val = self.sca * x + (1.0 - self.sca) * self.val;
        self.cal = self.sca + (1.0 - self.sca) * self.cal;
    }
    pub fn with_value(mut self, x: f64) -> Self {
        self.val = x;
        self.cal = 1.0;
        self
    }
}

impl fmt::Display for Ema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EMA:{:.3}", self.get())
    }
}

/// A pair of fast and slow exponential moving averages over one signal.
#[derive(Clone, Debug)]
pub struct Ema2 {
    fast: f64,
    slow: f64,
    calf: f64,
    cals: f64,
    fe: f64,
    se: f64,
}

impl EmaIF for Ema2 {
    fn get(&self) -> f64 {
        self.slow / self.cals
    }
    fn get_fast(&self) -> f64 {
        self.fast / self.calf
    }
    fn trend(&self) -> f64 {
        self.get_fast() / self.get()
    }
}

impl Ema2 {
    pub fn new(f: usize) -> Ema2 {
        Ema2 {
            fast: 0.0,
            slow: 0.0,
            calf: 0.0,
            cals: 0.0,
            fe: 1.0 / (f as f64),
            se: 1.0 / (f as f64),
        }
    }
    pub fn with_slow(mut self, s: usize) -> Ema2 {
        self.se = 1.0 / (s as f64);
        self
    }
    pub fn with_value(mut self, x: f64) -> Ema2 {
        self.fast = x;
        self.slow = x;
        self.calf = 1.0;
        self.cals = 1.0;
        self
    }
    pub fn update(&mut self, x: f64) {
        self.fast = self.fe * x + (1.0 - self.fe) * self.fast;
        self.slow = self.se * x + (1.0 - self.se) * self.slow;
        self.calf = self.fe + (1.0 - self.fe) * self.calf;
        self.cals = self.se + (1.0 - self.se) * self.cals;
    }
    pub fn reset_fast(&mut self) {
        self.fast = self.slow;
        self.calf = self.cals;
    }
}

impl fmt::Display for Ema2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EMA2:{:.3}/{:.3}", self.get_fast(), self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_converges() {
        let mut e = Ema::new(10);
        for _ in 0..1000 {
            e.update(4.0);
        }
        assert!((e.get() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_ema2_trend() {
        let mut e = Ema2::new(10).with_slow(1000);
        for _ in 0..2000 {
            e.update(1.0);
        }
        for _ in 0..20 {
            e.update(10.0);
        }
        assert!(1.0 < e.trend());
    }
}
