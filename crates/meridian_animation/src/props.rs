//! Transition manager input
//!
//! [`TransitionProps`] bundles the requested view state with its transition
//! configuration and lifecycle callbacks. `TransitionProps::default()` is the
//! defaults table: no animation, linear easing, `Break` interruption and no-op
//! callbacks.

use std::fmt;
use std::sync::Arc;

use meridian_core::ViewState;

use crate::easing::Easing;
use crate::interpolator::TransitionInterpolator;
use crate::transition::{Transition, TransitionInterruption};

/// Payload of `on_view_state_change`
#[derive(Debug, Clone, Copy)]
pub struct ViewStateChangeEvent<'a> {
    /// State to render
    pub view_state: &'a ViewState,
    /// State of the props the manager currently holds
    pub old_view_state: &'a ViewState,
    pub in_transition: bool,
}

/// Callback receiving each interpolated view state
pub type ViewStateChangeCallback = Arc<dyn Fn(&ViewStateChangeEvent<'_>) + Send + Sync>;

/// Callback receiving a transition lifecycle notification
pub type TransitionCallback = Arc<dyn Fn(&Transition) + Send + Sync>;

/// Lifecycle hooks; an absent hook is a no-op
#[derive(Clone, Default)]
pub struct TransitionCallbacks {
    pub on_view_state_change: Option<ViewStateChangeCallback>,
    pub on_transition_start: Option<TransitionCallback>,
    pub on_transition_interrupt: Option<TransitionCallback>,
    pub on_transition_end: Option<TransitionCallback>,
}

impl TransitionCallbacks {
    pub(crate) fn view_state_change(&self, event: &ViewStateChangeEvent<'_>) {
        if let Some(cb) = &self.on_view_state_change {
            cb(event);
        }
    }

    pub(crate) fn transition_start(&self, transition: &Transition) {
        if let Some(cb) = &self.on_transition_start {
            cb(transition);
        }
    }

    pub(crate) fn transition_interrupt(&self, transition: &Transition) {
        if let Some(cb) = &self.on_transition_interrupt {
            cb(transition);
        }
    }

    pub(crate) fn transition_end(&self, transition: &Transition) {
        if let Some(cb) = &self.on_transition_end {
            cb(transition);
        }
    }
}

impl fmt::Debug for TransitionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionCallbacks")
            .field("on_view_state_change", &self.on_view_state_change.is_some())
            .field("on_transition_start", &self.on_transition_start.is_some())
            .field("on_transition_interrupt", &self.on_transition_interrupt.is_some())
            .field("on_transition_end", &self.on_transition_end.is_some())
            .finish()
    }
}

/// A view state change request together with its transition configuration
#[derive(Clone, Debug, Default)]
pub struct TransitionProps {
    pub view_state: ViewState,
    /// Duration in milliseconds, `0` disables animation
    pub transition_duration: f64,
    /// `None` disables animation
    pub transition_interpolator: Option<Arc<dyn TransitionInterpolator>>,
    pub transition_easing: Easing,
    pub transition_interruption: TransitionInterruption,
    pub callbacks: TransitionCallbacks,
}

impl TransitionProps {
    pub fn new(view_state: ViewState) -> Self {
        Self {
            view_state,
            ..Self::default()
        }
    }

    /// Set the duration in milliseconds (builder pattern)
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.transition_duration = duration_ms;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Arc<dyn TransitionInterpolator>) -> Self {
        self.transition_interpolator = Some(interpolator);
        self
    }

    pub fn without_interpolator(mut self) -> Self {
        self.transition_interpolator = None;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.transition_easing = easing;
        self
    }

    pub fn with_interruption(mut self, interruption: TransitionInterruption) -> Self {
        self.transition_interruption = interruption;
        self
    }

    pub fn with_callbacks(mut self, callbacks: TransitionCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Same configuration and callbacks, different view state
    pub fn with_view_state(&self, view_state: ViewState) -> Self {
        Self {
            view_state,
            ..self.clone()
        }
    }

    pub fn on_view_state_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ViewStateChangeEvent<'_>) + Send + Sync + 'static,
    {
        self.callbacks.on_view_state_change = Some(Arc::new(callback));
        self
    }

    pub fn on_transition_start<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        self.callbacks.on_transition_start = Some(Arc::new(callback));
        self
    }

    pub fn on_transition_interrupt<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        self.callbacks.on_transition_interrupt = Some(Arc::new(callback));
        self
    }

    pub fn on_transition_end<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        self.callbacks.on_transition_end = Some(Arc::new(callback));
        self
    }

    /// The interpolator, if these props ask for an animated transition
    ///
    /// A zero, negative or non-finite duration disables animation just like
    /// a missing interpolator does.
    pub fn transition_interpolator_if_enabled(&self) -> Option<&Arc<dyn TransitionInterpolator>> {
        let duration = self.transition_duration;
        if duration.is_finite() && duration > 0.0 {
            self.transition_interpolator.as_ref()
        } else {
            None
        }
    }

    pub fn is_transition_enabled(&self) -> bool {
        self.transition_interpolator_if_enabled().is_some()
    }
}
