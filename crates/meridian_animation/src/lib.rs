//! Meridian Animation System
//!
//! Smooth, interruptible transitions between viewport view states.
//!
//! # Features
//!
//! - **Transition Manager**: start/interrupt/end state machine driven by
//!   externally supplied frame timestamps
//! - **Pluggable Interpolators**: strategy trait with a linear default that
//!   takes the shortest path for angular fields
//! - **Easing**: built-in curves, cubic beziers and custom functions
//! - **Interruption Modes**: break, snap to end, or ignore new requests
//! - **Shared Manager**: lock-serialized handle for multi-threaded hosts
//! - **Settings**: serde-loadable transition configuration

pub mod easing;
pub mod error;
pub mod interpolator;
pub mod manager;
pub mod props;
pub mod settings;
pub mod shared;
pub mod transition;

pub use easing::Easing;
pub use error::{Result, TransitionError};
pub use interpolator::{
    FieldSpec, LinearInterpolator, TransitionInterpolator, DEFAULT_EPSILON, FULL_TURN_DEGREES,
};
pub use manager::TransitionManager;
pub use props::{
    TransitionCallback, TransitionCallbacks, TransitionProps, ViewStateChangeCallback,
    ViewStateChangeEvent,
};
pub use settings::TransitionSettings;
pub use shared::SharedTransitionManager;
pub use transition::{Transition, TransitionId, TransitionInterruption};
