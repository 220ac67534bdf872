//! Transition interpolators
//!
//! An interpolator is the pluggable strategy that knows which view state
//! fields a transition animates, how to blend them, and when two states are
//! close enough to be considered equal. The transition manager never looks
//! at field semantics itself.

use std::fmt;

use meridian_core::{FieldKey, ViewState, BEARING, LATITUDE, LONGITUDE, PITCH, ZOOM};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, TransitionError};

/// Default tolerance used to absorb floating point noise from input sources
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Full turn, in degrees, for angular fields such as bearing and longitude
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Strategy computing intermediate view states
///
/// Implementations must be pure: `interpolate(from, to, 0.0)` equals `from`
/// and `interpolate(from, to, 1.0)` equals `to` under `are_props_equal`.
pub trait TransitionInterpolator: Send + Sync + fmt::Debug {
    /// Fields this interpolator animates
    fn animated_fields(&self) -> &[FieldKey];

    /// Blend the animated fields of two states at `progress` in `[0, 1]`
    fn interpolate(&self, from: &ViewState, to: &ViewState, progress: f64) -> Result<ViewState>;

    /// Structural equality restricted to the animated fields
    fn are_props_equal(&self, a: &ViewState, b: &ViewState) -> bool;

    /// Normalize both endpoints before a transition starts
    ///
    /// The returned states hold only the animated fields.
    fn initialize_props(&self, from: &ViewState, to: &ViewState) -> (ViewState, ViewState) {
        let fields = self.animated_fields();
        (from.pick(fields.iter()), to.pick(fields.iter()))
    }

    /// Whether a change between two states can be animated at all
    fn can_transition(&self, from: &ViewState, to: &ViewState) -> bool {
        self.animated_fields()
            .iter()
            .all(|field| from.contains(field) && to.contains(field))
    }
}

// ============================================================================
// Field Specification
// ============================================================================

/// An animated field and its optional wraparound period
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Values `period` apart describe the same position (e.g. 360 for angles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
}

impl FieldSpec {
    pub fn new(key: impl Into<FieldKey>) -> Self {
        Self {
            key: key.into(),
            period: None,
        }
    }

    /// A field whose values wrap around every `period`
    pub fn periodic(key: impl Into<FieldKey>, period: f64) -> Self {
        Self {
            key: key.into(),
            period: Some(period),
        }
    }

    /// Signed distance from `a` to `b`, taking the short way around for periodic fields
    fn delta(&self, a: f64, b: f64) -> f64 {
        let d = b - a;
        match self.period {
            Some(period) => {
                let half = period * 0.5;
                let wrapped = (d + half).rem_euclid(period) - half;
                // rem_euclid maps +half to -half; keep the sign of the raw delta
                if wrapped == -half && d > 0.0 {
                    half
                } else {
                    wrapped
                }
            }
            None => d,
        }
    }
}

// ============================================================================
// Linear Interpolator
// ============================================================================

/// Linear interpolation over an explicit list of numeric fields
///
/// Two states are equal when every animated field differs by less than
/// `epsilon`. Fields not listed (viewport pixel size, for example) never
/// participate in equality or interpolation.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearInterpolator {
    fields: SmallVec<[FieldSpec; 8]>,
    keys: SmallVec<[FieldKey; 8]>,
    epsilon: f64,
}

impl LinearInterpolator {
    /// Interpolate the given fields with the default epsilon
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        let fields: SmallVec<[FieldSpec; 8]> = fields.into_iter().collect();
        let keys = fields.iter().map(|f| f.key.clone()).collect();
        Self {
            fields,
            keys,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Map viewport camera: longitude, latitude, zoom, pitch and bearing
    ///
    /// Longitude and bearing wrap every 360 degrees: intermediate frames take
    /// the shortest way around, the final frame is the requested value.
    pub fn viewport() -> Self {
        Self::new([
            FieldSpec::periodic(LONGITUDE, FULL_TURN_DEGREES),
            FieldSpec::new(LATITUDE),
            FieldSpec::new(ZOOM),
            FieldSpec::new(PITCH),
            FieldSpec::periodic(BEARING, FULL_TURN_DEGREES),
        ])
    }

    /// Set the equality tolerance (builder pattern)
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check the epsilon and every field period
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(TransitionError::InvalidEpsilon(self.epsilon));
        }
        for field in &self.fields {
            if let Some(period) = field.period {
                if !period.is_finite() || period <= 0.0 {
                    return Err(TransitionError::InvalidPeriod {
                        field: field.key.to_string(),
                        period,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for LinearInterpolator {
    fn default() -> Self {
        Self::viewport()
    }
}

fn require(state: &ViewState, key: &FieldKey) -> Result<f64> {
    state.get(key).ok_or_else(|| TransitionError::MissingField {
        field: key.to_string(),
    })
}

impl TransitionInterpolator for LinearInterpolator {
    fn animated_fields(&self) -> &[FieldKey] {
        &self.keys
    }

    fn interpolate(&self, from: &ViewState, to: &ViewState, progress: f64) -> Result<ViewState> {
        let mut state = ViewState::new();
        for field in &self.fields {
            let a = require(from, &field.key)?;
            let b = require(to, &field.key)?;
            // Exact endpoints, no rounding drift at 0 and 1
            let value = if progress <= 0.0 {
                a
            } else if progress >= 1.0 {
                b
            } else {
                a + field.delta(a, b) * progress
            };
            state.set(field.key.clone(), value);
        }
        Ok(state)
    }

    fn are_props_equal(&self, a: &ViewState, b: &ViewState) -> bool {
        self.fields.iter().all(|field| {
            match (a.get(&field.key), b.get(&field.key)) {
                (Some(x), Some(y)) => field.delta(x, y).abs() < self.epsilon || x == y,
                (None, None) => true,
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::WIDTH;

    fn sf() -> ViewState {
        ViewState::viewport(-122.45, 37.78, 12.0, 0.0, 0.0)
    }

    fn boston() -> ViewState {
        ViewState::viewport(-70.9, 41.0, 12.0, 60.0, 0.0)
    }

    #[test]
    fn test_boundaries() {
        let interp = LinearInterpolator::viewport();
        let from = sf();
        let to = boston();

        let start = interp.interpolate(&from, &to, 0.0).unwrap();
        let end = interp.interpolate(&from, &to, 1.0).unwrap();
        assert!(interp.are_props_equal(&start, &from));
        assert!(interp.are_props_equal(&end, &to));
    }

    #[test]
    fn test_midpoint() {
        let interp = LinearInterpolator::viewport();
        let mid = interp.interpolate(&sf(), &boston(), 0.5).unwrap();

        assert!((mid.get(LONGITUDE).unwrap() - (-96.675)).abs() < 1e-9);
        assert!((mid.get(LATITUDE).unwrap() - 39.39).abs() < 1e-9);
        assert!((mid.get(PITCH).unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_ignores_unanimated_fields() {
        let interp = LinearInterpolator::viewport();
        let a = sf().with_size(100.0, 100.0);
        let b = sf().with_size(200.0, 100.0);
        assert!(interp.are_props_equal(&a, &b));
        assert!(!interp.animated_fields().iter().any(|k| k == WIDTH));
    }

    #[test]
    fn test_equality_absorbs_noise_within_epsilon() {
        let interp = LinearInterpolator::viewport();
        let noisy = sf().with(ZOOM, 12.0 + 1e-9);
        assert!(interp.are_props_equal(&sf(), &noisy));

        let moved = sf().with(ZOOM, 12.001);
        assert!(!interp.are_props_equal(&sf(), &moved));

        let coarse = LinearInterpolator::viewport().with_epsilon(0.01);
        assert!(coarse.are_props_equal(&sf(), &moved));
    }

    #[test]
    fn test_periodic_equality_and_shortest_path() {
        let interp = LinearInterpolator::viewport();
        let a = sf().with(BEARING, 350.0);
        let b = sf().with(BEARING, -10.0);
        assert!(interp.are_props_equal(&a, &b));

        let target = sf().with(BEARING, 10.0);
        let (start, end) = interp.initialize_props(&a, &target);
        assert_eq!(start.get(BEARING), Some(350.0));
        // targets are kept as requested, the short way is taken while blending
        assert_eq!(end.get(BEARING), Some(10.0));

        let mid = interp.interpolate(&start, &end, 0.5).unwrap();
        assert!((mid.get(BEARING).unwrap() - 360.0).abs() < 1e-9);
        let last = interp.interpolate(&start, &end, 1.0).unwrap();
        assert_eq!(last.get(BEARING), Some(10.0));
    }

    #[test]
    fn test_longitude_crosses_antimeridian() {
        let interp = LinearInterpolator::viewport();
        let from = sf().with(LONGITUDE, 170.0);
        let to = sf().with(LONGITUDE, -170.0);

        let quarter = interp.interpolate(&from, &to, 0.25).unwrap();
        assert!((quarter.get(LONGITUDE).unwrap() - 175.0).abs() < 1e-9);
        let end = interp.interpolate(&from, &to, 1.0).unwrap();
        assert_eq!(end.get(LONGITUDE), Some(-170.0));
    }

    #[test]
    fn test_initialize_props_drops_unanimated_fields() {
        let interp = LinearInterpolator::viewport();
        let (start, end) = interp.initialize_props(&sf().with_size(1.0, 1.0), &boston());
        assert!(!start.contains(WIDTH));
        assert_eq!(start.len(), 5);
        assert_eq!(end.len(), 5);
    }

    #[test]
    fn test_missing_field() {
        let interp = LinearInterpolator::viewport();
        let partial = ViewState::new().with(ZOOM, 3.0);

        assert!(!interp.can_transition(&partial, &sf()));
        assert!(interp.can_transition(&boston(), &sf()));

        let err = interp.interpolate(&partial, &sf(), 0.5).unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingField {
                field: LONGITUDE.to_string()
            }
        );
    }

    #[test]
    fn test_validate() {
        assert!(LinearInterpolator::viewport().validate().is_ok());
        assert!(matches!(
            LinearInterpolator::viewport().with_epsilon(-1.0).validate(),
            Err(TransitionError::InvalidEpsilon(_))
        ));
        let bad = LinearInterpolator::new([FieldSpec::periodic("heading", 0.0)]);
        assert!(matches!(
            bad.validate(),
            Err(TransitionError::InvalidPeriod { .. })
        ));
    }
}
