//! Spin configuration and per-spin overrides
//!
//! Loaded from JSON or built in code. The engine keeps its own copy, so
//! changes to a config after the engine is created are never observed.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SpinError};
use crate::rng::Seed;
use crate::spin::Segment;
use crate::{clamp, ease_out_cubic};

/// Direction the wheel turns while spinning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RotationDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationDirection::Clockwise => "clockwise",
            RotationDirection::CounterClockwise => "counter-clockwise",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clockwise" | "cw" | "1" | "+1" => Some(RotationDirection::Clockwise),
            "counter-clockwise" | "counterclockwise" | "ccw" | "-1" => {
                Some(RotationDirection::CounterClockwise)
            }
            _ => None,
        }
    }

    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(&self) -> f64 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::CounterClockwise => -1.0,
        }
    }
}

/// Easing curve mapping linear progress [0, 1] to eased progress
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutQuart,
    /// Caller-supplied curve (not serialized)
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::Custom(f) => f(t),
        }
    }
}

/// Per-spin overrides (take precedence over the config)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinOverrides {
    pub duration_ms: Option<f64>,
    pub min_rotations: Option<u32>,
    pub max_rotations: Option<u32>,
    /// Force the winner
    pub target_index: Option<usize>,
    /// Force the resting alignment angle (degrees); winner follows from slot geometry
    pub target_angle: Option<f64>,
}

impl SpinOverrides {
    pub fn target_index(index: usize) -> Self {
        Self {
            target_index: Some(index),
            ..Default::default()
        }
    }

    pub fn target_angle(angle: f64) -> Self {
        Self {
            target_angle: Some(angle),
            ..Default::default()
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_rotations(mut self, min: u32, max: u32) -> Self {
        self.min_rotations = Some(min);
        self.max_rotations = Some(max);
        self
    }
}

/// Behavior parameters shared across spins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig<T = ()> {
    /// Selectable segments (at least one)
    pub segments: Vec<Segment<T>>,

    // === Rotation ===
    pub min_rotations: u32,
    pub max_rotations: u32,
    pub direction: RotationDirection,

    // === Geometry (degrees) ===
    /// Fixed reference angle the winning slot lines up with
    pub pointer_angle: f64,
    /// Wheel rotation before the first spin
    pub start_angle: f64,

    // === Timing ===
    pub duration_ms: f64,
    pub easing: Easing,

    /// Fraction of a slot's width to randomly offset the resting angle by (0..=1)
    pub jitter_factor: f64,

    /// Seed for reproducible spins; `None` uses entropy
    pub seed: Option<Seed>,
}

impl<T> Default for SpinConfig<T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),

            min_rotations: DEFAULT_MIN_ROTATIONS,
            max_rotations: DEFAULT_MAX_ROTATIONS,
            direction: RotationDirection::Clockwise,

            pointer_angle: 0.0,
            start_angle: 0.0,

            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::EaseOutCubic,

            jitter_factor: 0.0,
            seed: None,
        }
    }
}

impl<T> SpinConfig<T> {
    pub fn new(segments: Vec<Segment<T>>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn with_rotations(mut self, min: u32, max: u32) -> Self {
        self.min_rotations = min;
        self.max_rotations = max;
        self
    }

    pub fn with_direction(mut self, direction: RotationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_pointer_angle(mut self, angle: f64) -> Self {
        self.pointer_angle = angle;
        self
    }

    pub fn with_start_angle(mut self, angle: f64) -> Self {
        self.start_angle = angle;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Check the config invariants; never clamps
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(SpinError::EmptySegments);
        }
        validate_duration(self.duration_ms)?;
        validate_rotations(self.min_rotations, self.max_rotations)?;
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(SpinError::InvalidJitter(self.jitter_factor));
        }
        validate_angle("pointer_angle", self.pointer_angle)?;
        validate_angle("start_angle", self.start_angle)?;
        Ok(())
    }

    /// Check per-spin overrides against this config
    pub fn validate_overrides(&self, overrides: &SpinOverrides) -> Result<()> {
        if let Some(duration) = overrides.duration_ms {
            validate_duration(duration)?;
        }
        let (min, max) = self.rotation_bounds(overrides);
        validate_rotations(min, max)?;
        if let Some(angle) = overrides.target_angle {
            validate_angle("target_angle", angle)?;
        }
        Ok(())
    }

    /// Effective (min, max) rotations: override > config
    pub fn rotation_bounds(&self, overrides: &SpinOverrides) -> (u32, u32) {
        (
            overrides.min_rotations.unwrap_or(self.min_rotations),
            overrides.max_rotations.unwrap_or(self.max_rotations),
        )
    }

    /// Effective duration: override > config
    pub fn effective_duration_ms(&self, overrides: &SpinOverrides) -> f64 {
        overrides.duration_ms.unwrap_or(self.duration_ms)
    }

    /// Eased progress, clamped to [0, 1]
    pub fn eased(&self, t: f64) -> f64 {
        clamp(self.easing.apply(t), 0.0, 1.0)
    }
}

impl<T: serde::de::DeserializeOwned> SpinConfig<T> {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "Loaded spin config ({} segments, {} ms)",
            config.segments.len(),
            config.duration_ms
        );
        Ok(config)
    }
}

fn validate_duration(duration_ms: f64) -> Result<()> {
    if duration_ms.is_finite() && duration_ms >= 0.0 {
        Ok(())
    } else {
        Err(SpinError::InvalidDuration(duration_ms))
    }
}

fn validate_rotations(min: u32, max: u32) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(SpinError::InvalidRotations { min, max })
    }
}

fn validate_angle(name: &'static str, angle: f64) -> Result<()> {
    if angle.is_finite() {
        Ok(())
    } else {
        Err(SpinError::InvalidAngle(name, angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Segment> {
        vec![Segment::new("a"), Segment::new("b"), Segment::new("c")]
    }

    #[test]
    fn test_default_config() {
        let config: SpinConfig = SpinConfig::default();
        assert_eq!(config.min_rotations, 3);
        assert_eq!(config.max_rotations, 6);
        assert_eq!(config.duration_ms, 6000.0);
        assert_eq!(config.direction, RotationDirection::Clockwise);
        assert!(config.seed.is_none());
        // No segments yet
        assert_eq!(config.validate(), Err(SpinError::EmptySegments));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SpinConfig::new(abc());
        assert!(base.validate().is_ok());

        let bad = base.clone().with_duration_ms(-1.0);
        assert_eq!(bad.validate(), Err(SpinError::InvalidDuration(-1.0)));

        let bad = base.clone().with_rotations(5, 2);
        assert_eq!(
            bad.validate(),
            Err(SpinError::InvalidRotations { min: 5, max: 2 })
        );

        let bad = base.clone().with_jitter(1.5);
        assert_eq!(bad.validate(), Err(SpinError::InvalidJitter(1.5)));

        let bad = base.with_pointer_angle(f64::NAN);
        assert!(matches!(
            bad.validate(),
            Err(SpinError::InvalidAngle("pointer_angle", _))
        ));
    }

    #[test]
    fn test_validate_overrides() {
        let config = SpinConfig::new(abc()).with_rotations(2, 4);
        assert!(config.validate_overrides(&SpinOverrides::default()).is_ok());

        // Override min above config max
        let overrides = SpinOverrides {
            min_rotations: Some(5),
            ..Default::default()
        };
        assert_eq!(
            config.validate_overrides(&overrides),
            Err(SpinError::InvalidRotations { min: 5, max: 4 })
        );

        let overrides = SpinOverrides::default().with_duration_ms(-10.0);
        assert_eq!(
            config.validate_overrides(&overrides),
            Err(SpinError::InvalidDuration(-10.0))
        );

        let overrides = SpinOverrides::default().with_rotations(7, 9);
        assert_eq!(config.rotation_bounds(&overrides), (7, 9));
        assert!(config.validate_overrides(&overrides).is_ok());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "segments": [{"id": "a"}, {"id": "b", "weight": 2}],
            "direction": "counter-clockwise",
            "duration_ms": 1500,
            "easing": "linear",
            "seed": "lucky"
        }"#;
        let config: SpinConfig = SpinConfig::from_json(json).unwrap();
        assert_eq!(config.segments.len(), 2);
        assert_eq!(config.direction, RotationDirection::CounterClockwise);
        assert_eq!(config.duration_ms, 1500.0);
        assert_eq!(config.easing.apply(0.3), 0.3);
        assert_eq!(config.seed, Some(Seed::Text("lucky".into())));
        // Unset fields keep defaults
        assert_eq!(config.max_rotations, 6);
    }

    #[test]
    fn test_from_json_validates() {
        let err = SpinConfig::<()>::from_json(r#"{"segments": []}"#).unwrap_err();
        assert_eq!(err, SpinError::EmptySegments);

        let err = SpinConfig::<()>::from_json("not json").unwrap_err();
        assert!(matches!(err, SpinError::Config(_)));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(
            RotationDirection::from_str("CCW"),
            Some(RotationDirection::CounterClockwise)
        );
        assert_eq!(
            RotationDirection::from_str("-1").map(|d| d.sign()),
            Some(-1.0)
        );
        assert_eq!(RotationDirection::from_str("sideways"), None);
        assert_eq!(RotationDirection::Clockwise.as_str(), "clockwise");
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::EaseOutQuart,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-12, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{:?}", easing);
        }
    }

    #[test]
    fn test_eased_clamps_custom_curve() {
        fn overshoot(t: f64) -> f64 {
            t * 1.5
        }
        let config = SpinConfig::new(abc()).with_easing(Easing::Custom(overshoot));
        assert_eq!(config.eased(1.0), 1.0);
        assert_eq!(config.eased(0.5), 0.75);
    }
}
