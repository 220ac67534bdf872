//! The in-flight transition record
//!
//! A [`Transition`] is created by the manager when a qualifying change
//! arrives and dropped when it completes or is interrupted. It is never
//! patched: a new request replaces it wholesale.

use std::fmt;
use std::sync::Arc;

use meridian_core::ViewState;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::interpolator::TransitionInterpolator;
use crate::props::TransitionCallbacks;

/// Identifier of a transition, increasing with every start on a manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    pub(crate) fn first() -> Self {
        TransitionId(1)
    }

    pub(crate) fn next(self) -> Self {
        TransitionId(self.0 + 1)
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happens to an active transition when a new qualifying change arrives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionInterruption {
    /// Start the new transition from the state currently on screen
    #[default]
    Break,
    /// Start the new transition from the interrupted transition's target
    SnapToEnd,
    /// Keep the active transition running and disregard the change
    Ignore,
}

/// An in-flight interpolation from a start view state to a target
#[derive(Clone)]
pub struct Transition {
    pub(crate) id: TransitionId,
    pub(crate) start_props: ViewState,
    pub(crate) end_props: ViewState,
    /// Latched from the first tick when not supplied at start
    pub(crate) start_time: Option<f64>,
    pub(crate) duration: f64,
    pub(crate) interpolator: Arc<dyn TransitionInterpolator>,
    pub(crate) easing: Easing,
    pub(crate) interruption: TransitionInterruption,
    pub(crate) callbacks: TransitionCallbacks,
}

impl Transition {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Animated fields at progress 0
    pub fn start_props(&self) -> &ViewState {
        &self.start_props
    }

    /// Animated fields at progress 1
    pub fn end_props(&self) -> &ViewState {
        &self.end_props
    }

    /// Timestamp of the first tick, `None` until the transition has been ticked
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Duration in milliseconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn interpolator(&self) -> &Arc<dyn TransitionInterpolator> {
        &self.interpolator
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn interruption(&self) -> TransitionInterruption {
        self.interruption
    }

    /// Linear time ratio at `timestamp`, clamped to `[0, 1]`
    pub fn progress_at(&self, timestamp: f64) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((timestamp - start) / self.duration).clamp(0.0, 1.0)
    }

    /// Animated fields at `timestamp`, with easing applied
    pub fn sample(&self, timestamp: f64) -> crate::Result<ViewState> {
        let eased = self.easing.apply(self.progress_at(timestamp));
        self.interpolator
            .interpolate(&self.start_props, &self.end_props, eased)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("start_props", &self.start_props)
            .field("end_props", &self.end_props)
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("interpolator", &self.interpolator)
            .field("easing", &self.easing)
            .field("interruption", &self.interruption)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolator::LinearInterpolator;
    use meridian_core::PITCH;

    fn transition(easing: Easing) -> Transition {
        Transition {
            id: TransitionId::first(),
            start_props: ViewState::viewport(0.0, 0.0, 10.0, 0.0, 0.0),
            end_props: ViewState::viewport(0.0, 0.0, 10.0, 60.0, 0.0),
            start_time: Some(100.0),
            duration: 200.0,
            interpolator: Arc::new(LinearInterpolator::viewport()),
            easing,
            interruption: TransitionInterruption::Break,
            callbacks: TransitionCallbacks::default(),
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let t = transition(Easing::Linear);
        assert_eq!(t.progress_at(50.0), 0.0);
        assert_eq!(t.progress_at(200.0), 0.5);
        assert_eq!(t.progress_at(1000.0), 1.0);
    }

    #[test]
    fn test_progress_before_first_tick() {
        let mut t = transition(Easing::Linear);
        t.start_time = None;
        assert_eq!(t.progress_at(5000.0), 0.0);
    }

    #[test]
    fn test_sample_applies_easing() {
        let linear = transition(Easing::Linear).sample(200.0).unwrap();
        assert!((linear.get(PITCH).unwrap() - 30.0).abs() < 1e-9);

        let eased = transition(Easing::EaseIn).sample(200.0).unwrap();
        assert!((eased.get(PITCH).unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_ids_increase() {
        let a = TransitionId::first();
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.to_raw(), 2);
        assert_eq!(b.to_string(), "#2");
    }
}
