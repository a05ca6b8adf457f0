//! Equal-angle slot geometry
//!
//! In the wheel's own frame, segment `i` of `n` is centered at `i * 360/n`
//! and spans half a slot on either side:
//! - weight never changes slot width, only selection odds
//! - rotating the wheel by `r` moves every slot center by `r`

use serde::{Deserialize, Serialize};

use crate::consts::FULL_TURN;
use crate::normalize_angle;

/// Angular width of one slot for `count` segments
#[inline]
pub fn slot_width(count: usize) -> f64 {
    FULL_TURN / count as f64
}

/// Wheel rotation that puts the center of slot `index` under the pointer
#[inline]
pub fn alignment_angle(index: usize, count: usize, pointer_angle: f64) -> f64 {
    pointer_angle - slot_width(count) * index as f64
}

/// Index of the slot sitting under the pointer for a given wheel rotation
pub fn segment_at(rotation: f64, pointer_angle: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let offset = normalize_angle(pointer_angle - rotation);
    let slot = (offset / slot_width(count)).round() as usize;
    Some(slot % count)
}

/// One segment's slot in the wheel frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    /// Start angle (degrees, normalized to [0, 360))
    pub start: f64,
    /// End angle (degrees, normalized to [0, 360))
    pub end: f64,
}

impl Slot {
    pub fn for_index(index: usize, count: usize) -> Self {
        let width = slot_width(count);
        let center = width * index as f64;
        Self {
            index,
            start: normalize_angle(center - width / 2.0),
            end: normalize_angle(center + width / 2.0),
        }
    }

    /// Angular span (handles wraparound)
    pub fn span(&self) -> f64 {
        let mut span = self.end - self.start;
        if span <= 0.0 {
            span += FULL_TURN;
        }
        span
    }

    /// Center angle in the wheel frame
    pub fn center(&self) -> f64 {
        normalize_angle(self.start + self.span() / 2.0)
    }

    /// Check if a wheel-frame angle falls inside the slot (start inclusive)
    pub fn contains_angle(&self, angle: f64) -> bool {
        let angle = normalize_angle(angle);
        if self.start < self.end {
            angle >= self.start && angle < self.end
        } else {
            // Wraparound case (e.g. slot 0 spanning 315..45)
            angle >= self.start || angle < self.end
        }
    }

    /// Where this slot's center sits on screen for a given wheel rotation
    pub fn screen_center(&self, rotation: f64) -> f64 {
        normalize_angle(self.center() + rotation)
    }
}
