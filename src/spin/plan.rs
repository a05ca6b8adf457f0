//! Winner selection and spin planning
//!
//! Draw order per spin is fixed (rotations, then winner, then jitter) so a
//! seeded generator replays identical plans.

use super::slot::{alignment_angle, segment_at, slot_width};
use super::state::{Segment, SpinPlan, SpinState};
use crate::config::{RotationDirection, SpinConfig, SpinOverrides};
use crate::consts::FULL_TURN;
use crate::error::{Result, SpinError};
use crate::normalize_angle;
use crate::rng::SpinRng;

/// Pick a segment index with probability proportional to its weight.
///
/// Returns `None` only for an empty list. Zero-weight segments are never
/// picked unless every weight is zero, in which case the pick is uniform.
pub fn select_weighted_index<T>(segments: &[Segment<T>], rng: &mut SpinRng) -> Option<usize> {
    let count = segments.len();
    if count == 0 {
        return None;
    }

    let total: f64 = segments.iter().map(Segment::effective_weight).sum();
    if total.is_nan() || total <= 0.0 {
        let index = (rng.next_f64() * count as f64).floor() as usize;
        return Some(index.min(count - 1));
    }

    let mut threshold = rng.next_f64() * total;
    let mut last_weighted = count - 1;
    for (i, segment) in segments.iter().enumerate() {
        let weight = segment.effective_weight();
        if weight <= 0.0 {
            continue;
        }
        threshold -= weight;
        if threshold <= 0.0 {
            return Some(i);
        }
        last_weighted = i;
    }

    // Float drift left a sliver of threshold
    Some(last_weighted)
}

/// Compute the outcome of the next spin from the current snapshot.
///
/// Uses the state's options when present, the config's otherwise. Fails
/// without touching the generator when the overrides or target are invalid.
pub fn plan_spin<T>(
    state: &SpinState<T>,
    config: &SpinConfig<T>,
    overrides: &SpinOverrides,
    rng: &mut SpinRng,
) -> Result<SpinPlan> {
    let options = if state.options.is_empty() {
        &config.segments
    } else {
        &state.options
    };
    let count = options.len();
    if count == 0 {
        return Err(SpinError::EmptySegments);
    }

    config.validate_overrides(overrides)?;
    if let Some(index) = overrides.target_index {
        if index >= count {
            return Err(SpinError::TargetIndexOutOfBounds { index, len: count });
        }
    }

    let (min_rotations, max_rotations) = config.rotation_bounds(overrides);
    let rotations = rng.next_u32_inclusive(min_rotations, max_rotations);

    let winning_index = match (overrides.target_index, overrides.target_angle) {
        (Some(index), _) => index,
        (None, Some(angle)) => {
            segment_at(angle, config.pointer_angle, count).ok_or(SpinError::EmptySegments)?
        }
        (None, None) => select_weighted_index(options, rng).ok_or(SpinError::EmptySegments)?,
    };

    let base_angle = match overrides.target_angle {
        Some(angle) => angle,
        None => {
            let aligned = alignment_angle(winning_index, count, config.pointer_angle);
            aligned + jitter_offset(config.jitter_factor, count, rng)
        }
    };
    let base_angle = normalize_angle(base_angle);

    let current = normalize_angle(state.angle);
    let full_turns = rotations as f64 * FULL_TURN;
    let delta = match config.direction {
        RotationDirection::Clockwise => normalize_angle(base_angle - current) + full_turns,
        RotationDirection::CounterClockwise => {
            -(normalize_angle(current - base_angle) + full_turns)
        }
    };

    let plan = SpinPlan {
        winning_index,
        target_angle: state.angle + delta,
        duration_ms: config.effective_duration_ms(overrides),
        rotations,
    };
    log::trace!(
        "Planned spin: winner {} after {} rotations ({:.2} -> {:.2})",
        plan.winning_index,
        plan.rotations,
        state.angle,
        plan.target_angle
    );
    Ok(plan)
}

/// Uniform offset within +/- half of `jitter_factor` slots
fn jitter_offset(jitter_factor: f64, count: usize, rng: &mut SpinRng) -> f64 {
    if jitter_factor <= 0.0 {
        return 0.0;
    }
    let half_range = jitter_factor * slot_width(count) / 2.0;
    (rng.next_f64() * 2.0 - 1.0) * half_range
}
