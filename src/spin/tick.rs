//! Time-stepped spin animation
//!
//! Advances a snapshot by a caller-supplied delta. Pure: takes a state,
//! returns the next one.

use super::state::{SpinPhase, SpinPlan, SpinState};
use crate::config::SpinConfig;
use crate::{clamp, lerp};

/// Start (or restart) a spin from the state's current angle.
///
/// Re-spinning mid-animation keeps the wheel where it is visually; only the
/// target and the clock change. The option list is carried over as is, so a
/// snapshot planned against the config's segments should hold them too.
pub fn begin_spin<T: Clone>(state: &SpinState<T>, plan: &SpinPlan) -> SpinState<T> {
    SpinState {
        phase: SpinPhase::Spinning,
        angle: state.angle,
        elapsed_ms: 0.0,
        duration_ms: plan.duration_ms,
        spin_start_angle: state.angle,
        target_angle: Some(plan.target_angle),
        winning_index: Some(plan.winning_index),
        options: state.options.clone(),
    }
}

/// Advance a spinning state by `delta_ms`.
///
/// Anything other than an active spin is returned unchanged. Negative deltas
/// count as zero; a zero-duration spin stops on the first step.
pub fn step<T: Clone>(state: &SpinState<T>, config: &SpinConfig<T>, delta_ms: f64) -> SpinState<T> {
    let target = match (state.phase, state.target_angle) {
        (SpinPhase::Spinning, Some(target)) => target,
        _ => return state.clone(),
    };

    // NaN counts as no time passing
    let delta_ms = if delta_ms > 0.0 { delta_ms } else { 0.0 };
    let duration = state.duration_ms.max(0.0);
    let elapsed = clamp(state.elapsed_ms + delta_ms, 0.0, duration);

    let t = if duration == 0.0 { 1.0 } else { elapsed / duration };
    let eased = config.eased(t);

    let phase = if t >= 1.0 {
        SpinPhase::Stopped
    } else {
        SpinPhase::Spinning
    };

    SpinState {
        phase,
        angle: lerp(state.spin_start_angle, target, eased),
        elapsed_ms: elapsed,
        duration_ms: state.duration_ms,
        spin_start_angle: state.spin_start_angle,
        target_angle: state.target_angle,
        winning_index: state.winning_index,
        options: state.options.clone(),
    }
}
