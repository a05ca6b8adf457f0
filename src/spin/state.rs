//! Spin state and core types
//!
//! Snapshots are values: every transition builds a new `SpinState`, nothing
//! is mutated in place once handed out.

use serde::{Deserialize, Serialize};

use super::slot::segment_at;
use crate::normalize_angle;

/// One selectable, weighted entry on the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment<T = ()> {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Relative selection weight (default 1, negative counts as 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Segment<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            weight: None,
            payload: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Weight used for selection: missing = 1, negative or NaN = 0
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            None => 1.0,
            Some(w) if w > 0.0 => w,
            Some(_) => 0.0,
        }
    }
}

/// Lifecycle phase of a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SpinPhase {
    /// No spin yet (or reset)
    #[default]
    Idle,
    /// Animating toward the target angle
    Spinning,
    /// Reached the target
    Stopped,
}

impl SpinPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinPhase::Idle => "idle",
            SpinPhase::Spinning => "spinning",
            SpinPhase::Stopped => "stopped",
        }
    }
}

/// Precomputed outcome of one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub winning_index: usize,
    /// Absolute, unbounded target angle (degrees), full rotations included
    pub target_angle: f64,
    pub duration_ms: f64,
    /// Full revolutions included in the target
    pub rotations: u32,
}

/// Immutable snapshot of the spin timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinState<T = ()> {
    pub phase: SpinPhase,
    /// Current wheel rotation (degrees, unbounded)
    pub angle: f64,
    pub elapsed_ms: f64,
    /// Duration of the current spin
    pub duration_ms: f64,
    /// Angle when the current spin began
    pub spin_start_angle: f64,
    pub target_angle: Option<f64>,
    pub winning_index: Option<usize>,
    pub options: Vec<Segment<T>>,
}

impl<T> SpinState<T> {
    /// Fresh idle state resting at `start_angle`
    pub fn new(start_angle: f64, options: Vec<Segment<T>>) -> Self {
        Self {
            phase: SpinPhase::Idle,
            angle: start_angle,
            elapsed_ms: 0.0,
            duration_ms: 0.0,
            spin_start_angle: start_angle,
            target_angle: None,
            winning_index: None,
            options,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// Linear progress of the current spin in [0, 1]
    pub fn progress(&self) -> f64 {
        match self.phase {
            SpinPhase::Idle => 0.0,
            SpinPhase::Stopped => 1.0,
            SpinPhase::Spinning if self.duration_ms <= 0.0 => 1.0,
            SpinPhase::Spinning => (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0),
        }
    }

    /// Current angle folded into [0, 360)
    pub fn normalized_angle(&self) -> f64 {
        normalize_angle(self.angle)
    }

    /// Segment chosen by the current plan
    pub fn winning_segment(&self) -> Option<&Segment<T>> {
        self.winning_index.and_then(|i| self.options.get(i))
    }

    /// Index of the segment whose slot currently sits under the pointer
    pub fn segment_under_pointer(&self, pointer_angle: f64) -> Option<usize> {
        segment_at(self.angle, pointer_angle, self.options.len())
    }
}
