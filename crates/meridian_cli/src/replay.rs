//! Scenario replay against a synthetic frame clock

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use meridian_animation::{TransitionId, TransitionManager, TransitionProps};
use meridian_core::ViewState;
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{Scenario, MAX_FRAMES};

/// A view state emitted by the manager on one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub frame: u64,
    pub timestamp: f64,
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Start,
    Interrupt,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub kind: LifecycleKind,
    pub transition: TransitionId,
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub frames: Vec<Frame>,
    pub lifecycle: Vec<Lifecycle>,
    pub final_state: ViewState,
}

impl ReplayReport {
    pub fn count(&self, kind: LifecycleKind) -> usize {
        self.lifecycle.iter().filter(|e| e.kind == kind).count()
    }
}

fn with_lifecycle_log(props: TransitionProps, log: &Arc<Mutex<Vec<Lifecycle>>>) -> TransitionProps {
    let record = |kind: LifecycleKind| {
        let log = Arc::clone(log);
        move |transition: &meridian_animation::Transition| {
            info!("{:?} transition {}", kind, transition.id());
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Lifecycle {
                    kind,
                    transition: transition.id(),
                });
        }
    };
    props
        .on_transition_start(record(LifecycleKind::Start))
        .on_transition_interrupt(record(LifecycleKind::Interrupt))
        .on_transition_end(record(LifecycleKind::End))
}

/// Run a scenario to completion
pub fn replay(scenario: &Scenario) -> Result<ReplayReport> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let base = with_lifecycle_log(scenario.transition.apply(scenario.initial.clone())?, &log);
    let mut manager = TransitionManager::new(base.clone());

    let mut report = ReplayReport::default();
    let mut requests = scenario.requests.iter().peekable();
    let limit = scenario.frames.unwrap_or(MAX_FRAMES);

    for frame in 0..limit {
        let timestamp = frame as f64 * scenario.frame_ms;

        while let Some(request) = requests.next_if(|r| r.frame <= frame) {
            let view_state = manager.props().view_state.merged(&request.view_state);
            let mut props = base.with_view_state(view_state);
            if let Some(duration) = request.duration_ms {
                props = props.with_duration(duration);
            }
            let started = manager.process_view_state_change(props);
            debug!("frame {}: request {:?} -> started={}", frame, request.view_state, started);
        }

        let was_transitioning = manager.is_transitioning();
        manager.update_transition(timestamp)?;
        if was_transitioning {
            report.frames.push(Frame {
                frame,
                timestamp,
                view_state: manager.view_state().clone(),
            });
        }

        if scenario.frames.is_none() && requests.peek().is_none() && !manager.is_transitioning() {
            break;
        }
    }

    report.final_state = manager.view_state().clone();
    report.lifecycle = std::mem::take(&mut *log.lock().unwrap_or_else(PoisonError::into_inner));
    Ok(report)
}
