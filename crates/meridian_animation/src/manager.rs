//! Transition manager
//!
//! Orchestrates view state transitions for one viewport. The manager is
//! purely reactive: it owns no timers and reads no clock. Callers feed it
//! change requests through [`TransitionManager::process_view_state_change`]
//! and frame timestamps through [`TransitionManager::update_transition`];
//! every observable effect goes out through the lifecycle callbacks on the
//! props.
//!
//! # State machine
//!
//! ```text
//!            accepted change                 accepted change
//!   Idle ─────────────────────▶ Transitioning ◀──────────────┐
//!    ▲                              │  │   (interrupt + start)│
//!    │  tick with t >= 1 (end)      │  └──────────────────────┘
//!    └──────────────────────────────┤
//!    │  non-qualifying change       │
//!    └──────────── (interrupt) ─────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use meridian_animation::{LinearInterpolator, TransitionManager, TransitionProps};
//! use meridian_core::ViewState;
//!
//! let props = TransitionProps::new(ViewState::viewport(-122.45, 37.78, 12.0, 0.0, 0.0))
//!     .with_duration(200.0)
//!     .with_interpolator(Arc::new(LinearInterpolator::viewport()));
//! let mut manager = TransitionManager::new(props.clone());
//!
//! let started = manager.process_view_state_change(
//!     props.with_view_state(ViewState::viewport(-70.9, 41.0, 12.0, 60.0, 0.0)),
//! );
//! assert!(started);
//!
//! manager.update_transition(0.0).unwrap();
//! manager.update_transition(200.0).unwrap();
//! assert!(!manager.is_transitioning());
//! ```

use std::sync::Arc;

use meridian_core::ViewState;
use tracing::{debug, trace};

use crate::error::Result;
use crate::interpolator::TransitionInterpolator;
use crate::props::{TransitionProps, ViewStateChangeEvent};
use crate::transition::{Transition, TransitionId, TransitionInterruption};

/// Drives a single viewport from one view state to the next
#[derive(Debug)]
pub struct TransitionManager {
    props: TransitionProps,
    transition: Option<Transition>,
    /// Last state handed to `on_view_state_change`, only while transitioning
    props_in_transition: Option<ViewState>,
    next_id: TransitionId,
}

impl TransitionManager {
    pub fn new(initial_props: TransitionProps) -> Self {
        Self {
            props: initial_props,
            transition: None,
            props_in_transition: None,
            next_id: TransitionId::first(),
        }
    }

    /// The last accepted props
    pub fn props(&self) -> &TransitionProps {
        &self.props
    }

    /// The active transition, if any
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The visually current view state
    ///
    /// While transitioning this is the last interpolated state, otherwise the
    /// resting view state (the last accepted props, or the final frame of the
    /// transition that just ended).
    pub fn view_state(&self) -> &ViewState {
        self.props_in_transition
            .as_ref()
            .unwrap_or(&self.props.view_state)
    }

    /// Accept a view state change request
    ///
    /// Returns `true` if a new transition was started. The props are always
    /// stored, whether or not a transition starts.
    ///
    /// While a transition is active, a request matching either its target or
    /// the last emitted state is treated as an echo and does not interrupt.
    /// Before the first tick the last emitted state is the start state, so a
    /// request to go back to exactly where the transition began is stored but
    /// leaves the running transition in place.
    pub fn process_view_state_change(&mut self, props: TransitionProps) -> bool {
        self.process(props, None)
    }

    /// Like [`process_view_state_change`](Self::process_view_state_change),
    /// but a transition started by this call begins at `timestamp` instead of
    /// at the next tick.
    pub fn process_view_state_change_at(&mut self, props: TransitionProps, timestamp: f64) -> bool {
        self.process(props, Some(timestamp))
    }

    fn process(&mut self, props: TransitionProps, start_time: Option<f64>) -> bool {
        let rendered = self.start_view_state();
        let previous = std::mem::replace(&mut self.props, props);

        if let Some(active) = &self.transition {
            if active.interruption == TransitionInterruption::Ignore {
                trace!("Transition {}: ignoring change request", active.id);
                return false;
            }
            if self.is_update_due_to_current_transition(&self.props.view_state) {
                return false;
            }
        }

        let Some(interpolator) = self.props.transition_interpolator_if_enabled().cloned() else {
            self.interrupt_active();
            return false;
        };

        if self.transition.is_none()
            && interpolator.are_props_equal(&previous.view_state, &self.props.view_state)
        {
            return false;
        }

        if !interpolator.can_transition(&rendered, &self.props.view_state) {
            debug!("Change request cannot be animated by {:?}", interpolator);
            self.interrupt_active();
            return false;
        }

        self.interrupt_active();
        self.start_transition(rendered, interpolator, start_time);
        true
    }

    /// Where a new transition would start from
    fn start_view_state(&self) -> ViewState {
        match &self.transition {
            Some(active) if active.interruption == TransitionInterruption::SnapToEnd => {
                self.view_state().merged(&active.end_props)
            }
            _ => self.view_state().clone(),
        }
    }

    /// Whether a request only echoes the state the active transition produces
    fn is_update_due_to_current_transition(&self, view_state: &ViewState) -> bool {
        let Some(active) = &self.transition else {
            return false;
        };
        let interpolator = &active.interpolator;
        interpolator.are_props_equal(view_state, &active.end_props)
            || self
                .props_in_transition
                .as_ref()
                .is_some_and(|rendered| interpolator.are_props_equal(view_state, rendered))
    }

    fn interrupt_active(&mut self) {
        if let Some(interrupted) = self.transition.take() {
            self.props_in_transition = None;
            debug!("Transition {} interrupted", interrupted.id);
            interrupted.callbacks.transition_interrupt(&interrupted);
        }
    }

    fn start_transition(
        &mut self,
        rendered: ViewState,
        interpolator: Arc<dyn TransitionInterpolator>,
        start_time: Option<f64>,
    ) {
        let (start_props, end_props) =
            interpolator.initialize_props(&rendered, &self.props.view_state);

        let id = self.next_id;
        self.next_id = id.next();

        self.props_in_transition = Some(rendered.merged(&start_props));
        let transition = &*self.transition.insert(Transition {
            id,
            start_props,
            end_props,
            start_time,
            duration: self.props.transition_duration,
            interpolator,
            easing: self.props.transition_easing,
            interruption: self.props.transition_interruption,
            callbacks: self.props.callbacks.clone(),
        });

        debug!(
            "Transition {} started: {:?} -> {:?} over {}ms",
            id, transition.start_props, transition.end_props, transition.duration
        );
        transition.callbacks.transition_start(transition);
    }

    /// Advance the active transition to `timestamp`
    ///
    /// Emits `on_view_state_change` on every call while a transition is
    /// active, and `on_transition_end` once progress reaches 1. Returns
    /// whether a transition is still active afterwards.
    ///
    /// Interpolation errors are returned unchanged and leave the transition
    /// in place.
    pub fn update_transition(&mut self, timestamp: f64) -> Result<bool> {
        let Some(active) = self.transition.as_mut() else {
            return Ok(false);
        };

        active.start_time.get_or_insert(timestamp);
        let progress = active.progress_at(timestamp);
        let animated = active.sample(timestamp)?;
        trace!("Transition {} at t={:.3}", active.id, progress);

        let view_state = self.props.view_state.merged(&animated);
        self.props.callbacks.view_state_change(&ViewStateChangeEvent {
            view_state: &view_state,
            old_view_state: &self.props.view_state,
            in_transition: true,
        });
        if progress < 1.0 {
            self.props_in_transition = Some(view_state);
            return Ok(true);
        }

        // The final frame becomes the resting state
        self.props_in_transition = None;
        self.props.view_state = view_state;
        if let Some(finished) = self.transition.take() {
            debug!("Transition {} ended", finished.id);
            finished.callbacks.transition_end(&finished);
        }
        Ok(false)
    }
}
