//! Seeded random source for spin planning
//!
//! A `SpinRng` is resolved once and then threaded through every planning call.
//! Rebuilding it from the seed per spin would replay the first draw forever.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Seed for reproducible spins: a number or a string hashed to 32 bits
///
/// Any JSON number is accepted. Negative integers keep their two's complement
/// bits; integral floats seed like the matching integer, other floats by
/// their bit pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl Seed {
    /// Numeric value fed to the generator
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Signed(n) => *n as u64,
            Seed::Float(x) => float_seed(*x),
            Seed::Text(s) => hash_seed(s) as u64,
        }
    }
}

fn float_seed(x: f64) -> u64 {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) {
        (x as i64) as u64
    } else {
        x.to_bits()
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl From<i64> for Seed {
    fn from(n: i64) -> Self {
        Seed::Signed(n)
    }
}

impl From<f64> for Seed {
    fn from(x: f64) -> Self {
        Seed::Float(x)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

/// Stable 32-bit FNV-1a hash of a string seed
pub fn hash_seed(s: &str) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    s.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

enum Source {
    Seeded(Pcg32),
    Entropy(Pcg32),
    Custom(Box<dyn FnMut() -> f64>),
}

/// Persistent uniform source of floats in [0, 1)
pub struct SpinRng {
    source: Source,
}

impl SpinRng {
    /// Reproducible generator: same seed, same sequence
    pub fn from_seed(seed: &Seed) -> Self {
        Self {
            source: Source::Seeded(Pcg32::seed_from_u64(seed.to_u64())),
        }
    }

    /// Non-deterministic generator seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Entropy(Pcg32::from_rng(&mut rand::rng())),
        }
    }

    /// Caller-supplied source; values outside [0, 1) are folded back in
    pub fn from_fn(f: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            source: Source::Custom(Box::new(f)),
        }
    }

    /// Seeded if a seed is given, entropy otherwise
    pub fn resolve(seed: Option<&Seed>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Whether the sequence is reproducible from a seed
    pub fn is_deterministic(&self) -> bool {
        matches!(self.source, Source::Seeded(_))
    }

    /// Next float in [0, 1); advances the state on every call
    pub fn next_f64(&mut self) -> f64 {
        match &mut self.source {
            Source::Seeded(rng) | Source::Entropy(rng) => rng.random::<f64>(),
            Source::Custom(f) => fold_unit(f()),
        }
    }

    /// Uniform integer in [lo, hi] (inclusive)
    pub fn next_u32_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.next_f64() * span).floor() as u32;
        lo + offset.min(hi - lo)
    }
}

impl fmt::Debug for SpinRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.source {
            Source::Seeded(_) => "seeded",
            Source::Entropy(_) => "entropy",
            Source::Custom(_) => "custom",
        };
        f.debug_struct("SpinRng").field("source", &kind).finish()
    }
}

fn fold_unit(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let r = x.rem_euclid(1.0);
    if r >= 1.0 { 0.0 } else { r }
}
