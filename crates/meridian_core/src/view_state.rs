//! View state snapshots
//!
//! A [`ViewState`] is the externally visible camera/viewport configuration at
//! one instant: a set of named numeric fields such as longitude, zoom or
//! bearing. Field order is preserved so snapshots print and serialize the
//! same way they were built.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of a view state field
pub type FieldKey = Cow<'static, str>;

// ============================================================================
// Standard Fields
// ============================================================================

pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
pub const ZOOM: &str = "zoom";
pub const PITCH: &str = "pitch";
pub const BEARING: &str = "bearing";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";

// ============================================================================
// ViewState
// ============================================================================

/// A snapshot of camera/viewport parameters
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewState {
    fields: IndexMap<FieldKey, f64>,
}

impl ViewState {
    /// Create an empty view state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map viewport state from its camera fields
    pub fn viewport(longitude: f64, latitude: f64, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self::new()
            .with(LONGITUDE, longitude)
            .with(LATITUDE, latitude)
            .with(ZOOM, zoom)
            .with(PITCH, pitch)
            .with(BEARING, bearing)
    }

    /// Set a field (builder pattern)
    pub fn with(mut self, key: impl Into<FieldKey>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set the pixel size of the viewport (builder pattern)
    pub fn with_size(self, width: f64, height: f64) -> Self {
        self.with(WIDTH, width).with(HEIGHT, height)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, key: impl Into<FieldKey>, value: f64) {
        self.fields.insert(key.into(), value);
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<f64> {
        self.fields.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (&**k, *v))
    }

    /// Sub-state restricted to the given keys
    ///
    /// Keys missing from this state are skipped rather than defaulted.
    pub fn pick<K>(&self, keys: impl IntoIterator<Item = K>) -> ViewState
    where
        K: AsRef<str>,
    {
        let mut picked = ViewState::new();
        for key in keys {
            if let Some((k, v)) = self.fields.get_key_value(key.as_ref()) {
                picked.fields.insert(k.clone(), *v);
            }
        }
        picked
    }

    /// Copy of this state with every field of `overlay` written over it
    pub fn merged(&self, overlay: &ViewState) -> ViewState {
        let mut merged = self.clone();
        for (k, v) in &overlay.fields {
            merged.fields.insert(k.clone(), *v);
        }
        merged
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<FieldKey>> FromIterator<(K, f64)> for ViewState {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut state = ViewState::new();
        for (k, v) in iter {
            state.set(k, v);
        }
        state
    }
}
