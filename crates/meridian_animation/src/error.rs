//! Error types for meridian_animation

use thiserror::Error;

/// Errors raised by interpolators and transition settings
///
/// A zero duration or a missing interpolator is not an error: the manager
/// simply does not start a transition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// An animated field is absent from one of the transition endpoints
    #[error("view state is missing animated field `{field}`")]
    MissingField { field: String },

    /// Transition duration is negative or not finite
    #[error("invalid transition duration: {0}ms")]
    InvalidDuration(f64),

    /// Equality tolerance is negative or not finite
    #[error("invalid equality epsilon: {0}")]
    InvalidEpsilon(f64),

    /// Wraparound period of a field is not a positive finite number
    #[error("invalid period {period} for field `{field}`")]
    InvalidPeriod { field: String, period: f64 },
}

/// Result type for meridian_animation operations
pub type Result<T> = std::result::Result<T, TransitionError>;
