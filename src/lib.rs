//! Spin Wheel - weighted prize-wheel selection and spin animation
//!
//! Core modules:
//! - `spin`: Deterministic spin core (selection, planning, time-stepped animation)
//! - `engine`: Stateful engine with lifecycle events and a persistent RNG
//! - `config`: Spin configuration, per-spin overrides and easing curves
//! - `rng`: Seeded random source
//! - `error`: Error taxonomy
//!
//! Two ways to drive a spin:
//! - Controlled: call [`spin::plan_spin`], [`spin::begin_spin`] and [`spin::step`]
//!   yourself and keep the returned snapshots.
//! - Imperative: create a [`SpinEngine`], call `spin`/`tick` and subscribe to events.

pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod spin;

pub use config::{Easing, RotationDirection, SpinConfig, SpinOverrides};
pub use engine::{SpinCompletion, SpinEngine, SpinEvent, SpinEventKind, Subscription};
pub use error::{Result, SpinError};
pub use rng::{Seed, SpinRng};
pub use spin::{Segment, SpinPhase, SpinPlan, SpinState};

/// Default behavior constants
pub mod consts {
    /// Rotation bounds used when neither config nor overrides set them
    pub const DEFAULT_MIN_ROTATIONS: u32 = 3;
    pub const DEFAULT_MAX_ROTATIONS: u32 = 6;

    /// Spin duration (ms)
    pub const DEFAULT_DURATION_MS: f64 = 6000.0;

    /// Degrees in one full revolution
    pub const FULL_TURN: f64 = 360.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= consts::FULL_TURN { 0.0 } else { a }
}

/// Clamp `value` into [lo, hi]
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Linear interpolation; extrapolates for `t` outside [0, 1]
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic ease-out: `1 - (1 - t)^3`
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
