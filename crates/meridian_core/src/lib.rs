//! Meridian Core
//!
//! Foundational types shared by the Meridian viewport crates:
//!
//! - **View State**: ordered snapshots of named camera/viewport fields
//! - **Standard Fields**: well-known keys for map viewports (longitude,
//!   latitude, zoom, pitch, bearing, width, height)
//!
//! # Example
//!
//! ```rust
//! use meridian_core::{ViewState, ZOOM};
//!
//! let state = ViewState::viewport(-122.45, 37.78, 12.0, 0.0, 0.0).with_size(800.0, 600.0);
//! assert_eq!(state.get(ZOOM), Some(12.0));
//! ```

pub mod view_state;

pub use view_state::{FieldKey, ViewState, BEARING, HEIGHT, LATITUDE, LONGITUDE, PITCH, WIDTH, ZOOM};
