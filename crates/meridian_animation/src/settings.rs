//! Transition settings
//!
//! Serializable form of a transition configuration, for loading from TOML
//! or JSON alongside the rest of an application's configuration:
//!
//! ```toml
//! duration_ms = 300
//! easing = "ease-in-out-cubic"
//! interruption = "snap-to-end"
//! epsilon = 1e-6
//!
//! [[fields]]
//! key = "zoom"
//!
//! [[fields]]
//! key = "bearing"
//! period = 360
//! ```

use std::sync::Arc;

use meridian_core::ViewState;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Result, TransitionError};
use crate::interpolator::{FieldSpec, LinearInterpolator, DEFAULT_EPSILON};
use crate::props::TransitionProps;
use crate::transition::TransitionInterruption;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Duration in milliseconds, `0` disables animation
    pub duration_ms: f64,
    pub easing: Easing,
    pub interruption: TransitionInterruption,
    /// Equality tolerance of the linear interpolator
    pub epsilon: f64,
    /// Fields animated by the linear interpolator
    pub fields: Vec<FieldSpec>,
}

fn default_fields() -> Vec<FieldSpec> {
    LinearInterpolator::viewport().fields().to_vec()
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration_ms: 0.0,
            easing: Easing::Linear,
            interruption: TransitionInterruption::Break,
            epsilon: DEFAULT_EPSILON,
            fields: default_fields(),
        }
    }
}

impl TransitionSettings {
    /// Check the duration, epsilon and field periods
    pub fn validate(&self) -> Result<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(TransitionError::InvalidDuration(self.duration_ms));
        }
        self.build_interpolator().validate()
    }

    fn build_interpolator(&self) -> LinearInterpolator {
        LinearInterpolator::new(self.fields.iter().cloned()).with_epsilon(self.epsilon)
    }

    /// The validated linear interpolator these settings describe
    pub fn interpolator(&self) -> Result<LinearInterpolator> {
        let interpolator = self.build_interpolator();
        interpolator.validate()?;
        Ok(interpolator)
    }

    /// Transition props for `view_state` with these settings and no callbacks
    ///
    /// An empty field list yields props without an interpolator, which
    /// disables animation.
    pub fn apply(&self, view_state: ViewState) -> Result<TransitionProps> {
        self.validate()?;
        let mut props = TransitionProps::new(view_state)
            .with_duration(self.duration_ms)
            .with_easing(self.easing)
            .with_interruption(self.interruption);
        if !self.fields.is_empty() {
            props = props.with_interpolator(Arc::new(self.build_interpolator()));
        }
        Ok(props)
    }
}
