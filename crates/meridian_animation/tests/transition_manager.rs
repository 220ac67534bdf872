//! Transition manager scenarios against map viewport props

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use meridian_animation::{
    LinearInterpolator, TransitionInterpolator, TransitionManager, TransitionProps,
};
use meridian_core::{ViewState, WIDTH, ZOOM};

fn default_props(view_state: ViewState) -> TransitionProps {
    TransitionProps::new(view_state).with_interpolator(Arc::new(LinearInterpolator::viewport()))
}

fn viewport(longitude: f64, latitude: f64, pitch: f64) -> ViewState {
    ViewState::viewport(longitude, latitude, 12.0, pitch, 0.0).with_size(100.0, 100.0)
}

#[test]
fn test_no_transitionable_viewport_change() {
    let initial = default_props(viewport(-122.45, 37.78, 0.0)).with_duration(200.0);
    let mut manager = TransitionManager::new(initial);

    let inputs = [
        // no change
        default_props(viewport(-122.45, 37.78, 0.0)).with_duration(200.0),
        // only the pixel size changed
        default_props(viewport(-122.45, 37.78, 0.0).with(WIDTH, 200.0)).with_duration(200.0),
        // no duration
        default_props(viewport(-70.9, 41.0, 60.0)),
        // no interpolator
        default_props(viewport(-70.9, 41.0, 60.0))
            .with_duration(200.0)
            .without_interpolator(),
    ];

    for (i, props) in inputs.into_iter().enumerate() {
        assert!(
            !manager.process_view_state_change(props),
            "input {} should not start a transition",
            i
        );
        assert!(!manager.is_transitioning());
    }
}

#[derive(Default)]
struct Recorder {
    start: AtomicUsize,
    interrupt: AtomicUsize,
    end: AtomicUsize,
    updates: Mutex<Vec<ViewState>>,
    ended_at: Mutex<Option<ViewState>>,
}

fn recorded(props: TransitionProps, recorder: &Arc<Recorder>) -> TransitionProps {
    let (s, i, e, u) = (
        recorder.clone(),
        recorder.clone(),
        recorder.clone(),
        recorder.clone(),
    );
    props
        .on_transition_start(move |_| {
            s.start.fetch_add(1, Ordering::SeqCst);
        })
        .on_transition_interrupt(move |_| {
            i.interrupt.fetch_add(1, Ordering::SeqCst);
        })
        .on_transition_end(move |transition| {
            e.end.fetch_add(1, Ordering::SeqCst);
            *e.ended_at.lock().unwrap() = Some(transition.end_props().clone());
        })
        .on_view_state_change(move |event| {
            assert!(event.in_transition);
            u.updates.lock().unwrap().push(event.view_state.clone());
        })
}

#[test]
fn test_interrupted_transition_callbacks() {
    let recorder = Arc::new(Recorder::default());
    let initial = recorded(
        default_props(viewport(-70.9, 41.0, 60.0)).with_duration(200.0),
        &recorder,
    );
    let mut manager = TransitionManager::new(initial.clone());

    let first = initial.with_view_state(viewport(-122.45, 37.78, 0.0));
    let second = initial.with_view_state(viewport(-122.45, 37.78, 0.0).with(ZOOM, 14.0));
    assert!(manager.process_view_state_change(first));
    assert!(manager.process_view_state_change(second.clone()));

    for timestamp in [200.0, 400.0, 600.0, 800.0] {
        manager.update_transition(timestamp).unwrap();
        // feeding the rendered state back in, as a host application would,
        // must not interrupt the transition
        let rendered = manager.view_state().clone();
        manager.process_view_state_change(second.with_view_state(rendered));
    }

    assert_eq!(recorder.start.load(Ordering::SeqCst), 2);
    assert_eq!(recorder.interrupt.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.end.load(Ordering::SeqCst), 1);

    let updates = recorder.updates.lock().unwrap();
    assert_eq!(updates.len(), 2);

    let interp = LinearInterpolator::viewport();
    let ended_at = recorder.ended_at.lock().unwrap().clone().unwrap();
    assert!(interp.are_props_equal(updates.last().unwrap(), &ended_at));
    assert!(interp.are_props_equal(&ended_at, &second.view_state));
    // consecutive emitted states differ
    assert!(!interp.are_props_equal(&updates[0], &updates[1]));
}

#[test]
fn test_one_interrupt_per_discarded_transition() {
    let recorder = Arc::new(Recorder::default());
    let initial = recorded(
        default_props(viewport(0.0, 0.0, 0.0)).with_duration(500.0),
        &recorder,
    );
    let mut manager = TransitionManager::new(initial.clone());

    let mut clock = 0.0;
    for step in 1..=6 {
        let target = initial.with_view_state(viewport(step as f64, step as f64 * 0.5, 10.0));
        assert!(manager.process_view_state_change(target));
        manager.update_transition(clock).unwrap();
        clock += 16.0;
        assert!(manager.transition().is_some());
    }

    assert_eq!(recorder.start.load(Ordering::SeqCst), 6);
    assert_eq!(recorder.interrupt.load(Ordering::SeqCst), 5);
    assert_eq!(manager.transition().unwrap().id().to_raw(), 6);

    while manager.update_transition(clock).unwrap() {
        clock += 16.0;
    }
    assert_eq!(recorder.end.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.interrupt.load(Ordering::SeqCst), 5);
}

#[test]
fn test_completion_fires_once_per_tick_and_ends_once() {
    let recorder = Arc::new(Recorder::default());
    let initial = recorded(
        default_props(viewport(0.0, 0.0, 0.0)).with_duration(100.0),
        &recorder,
    );
    let mut manager = TransitionManager::new(initial.clone());
    manager.process_view_state_change_at(initial.with_view_state(viewport(5.0, 5.0, 45.0)), 0.0);

    let ticks: Vec<f64> = (0..=10).map(|i| i as f64 * 10.0).collect();
    for (i, &timestamp) in ticks.iter().enumerate() {
        let active = manager.update_transition(timestamp).unwrap();
        assert_eq!(active, i < ticks.len() - 1);
    }

    assert_eq!(recorder.updates.lock().unwrap().len(), ticks.len());
    assert_eq!(recorder.end.load(Ordering::SeqCst), 1);
}
