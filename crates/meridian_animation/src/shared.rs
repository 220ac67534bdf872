//! Thread-safe transition manager handle
//!
//! The manager itself needs `&mut` access for every mutation. When input
//! events and frame ticks arrive on different threads, share it through a
//! [`SharedTransitionManager`], which serializes both entry points behind a
//! single lock.
//!
//! Callbacks run while the lock is held. A callback must not call back into
//! the same handle or it will deadlock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use meridian_core::ViewState;

use crate::error::Result;
use crate::manager::TransitionManager;
use crate::props::TransitionProps;

/// Cloneable handle to one [`TransitionManager`]
///
/// Clones refer to the same manager.
#[derive(Clone, Debug)]
pub struct SharedTransitionManager {
    inner: Arc<Mutex<TransitionManager>>,
}

impl SharedTransitionManager {
    pub fn new(initial_props: TransitionProps) -> Self {
        Self::from_manager(TransitionManager::new(initial_props))
    }

    pub fn from_manager(manager: TransitionManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // A callback that panicked leaves the manager in a consistent state, so
    // poisoning is not treated as fatal.
    fn lock(&self) -> MutexGuard<'_, TransitionManager> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`TransitionManager::process_view_state_change`]
    pub fn process_view_state_change(&self, props: TransitionProps) -> bool {
        self.lock().process_view_state_change(props)
    }

    /// See [`TransitionManager::process_view_state_change_at`]
    pub fn process_view_state_change_at(&self, props: TransitionProps, timestamp: f64) -> bool {
        self.lock().process_view_state_change_at(props, timestamp)
    }

    /// See [`TransitionManager::update_transition`]
    pub fn update_transition(&self, timestamp: f64) -> Result<bool> {
        self.lock().update_transition(timestamp)
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock().is_transitioning()
    }

    /// Snapshot of the visually current view state
    pub fn view_state(&self) -> ViewState {
        self.lock().view_state().clone()
    }

    /// Run `f` with exclusive access to the manager
    pub fn with<R>(&self, f: impl FnOnce(&mut TransitionManager) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolator::LinearInterpolator;
    use meridian_core::PITCH;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn props(view_state: ViewState) -> TransitionProps {
        TransitionProps::new(view_state)
            .with_duration(100.0)
            .with_interpolator(Arc::new(LinearInterpolator::viewport()))
    }

    #[test]
    fn test_clones_share_one_manager() {
        let a = SharedTransitionManager::new(props(ViewState::viewport(0.0, 0.0, 1.0, 0.0, 0.0)));
        let b = a.clone();

        assert!(a.process_view_state_change(props(ViewState::viewport(0.0, 0.0, 1.0, 45.0, 0.0))));
        assert!(b.is_transitioning());

        b.update_transition(0.0).unwrap();
        b.update_transition(100.0).unwrap();
        assert!(!a.is_transitioning());
        assert_eq!(a.view_state().get(PITCH), Some(45.0));
    }

    #[test]
    fn test_ticks_and_requests_from_different_threads() {
        let ends = Arc::new(AtomicUsize::new(0));
        let counter = ends.clone();
        let initial = props(ViewState::viewport(0.0, 0.0, 1.0, 0.0, 0.0)).on_transition_end(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        let shared = SharedTransitionManager::new(initial.clone());

        let requester = {
            let shared = shared.clone();
            let initial = initial.clone();
            thread::spawn(move || {
                shared.process_view_state_change(
                    initial.with_view_state(ViewState::viewport(10.0, 5.0, 3.0, 30.0, 0.0)),
                )
            })
        };
        assert!(requester.join().unwrap());

        let ticker = {
            let shared = shared.clone();
            thread::spawn(move || {
                for frame in 0..=10 {
                    shared.update_transition(frame as f64 * 16.0).unwrap();
                }
            })
        };
        ticker.join().unwrap();

        assert_eq!(ends.load(Ordering::SeqCst), 1);
        shared.with(|manager| assert!(manager.transition().is_none()));
    }
}
