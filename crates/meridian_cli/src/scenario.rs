//! Scenario files
//!
//! A scenario describes a replay: transition settings, the initial view
//! state, a synthetic frame clock and the change requests to feed in.
//!
//! ```toml
//! frame_ms = 16.0
//!
//! [transition]
//! duration_ms = 200
//! easing = "ease-in-out"
//!
//! [initial]
//! longitude = -122.45
//! latitude = 37.78
//! zoom = 12
//! pitch = 0
//! bearing = 0
//!
//! [[request]]
//! frame = 0
//! view_state = { longitude = -70.9, latitude = 41.0, pitch = 60 }
//! ```

use anyhow::{Context, Result};
use meridian_animation::TransitionSettings;
use meridian_core::ViewState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A replayable sequence of view state change requests
#[derive(Debug, Deserialize, Serialize)]
pub struct Scenario {
    /// Interval between synthetic frame ticks, in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Stop after this many frames; by default the replay runs until the
    /// last request has been issued and no transition is active
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default)]
    pub transition: TransitionSettings,
    pub initial: ViewState,
    #[serde(default, rename = "request")]
    pub requests: Vec<Request>,
}

/// A change request issued at a given frame
#[derive(Debug, Deserialize, Serialize)]
pub struct Request {
    pub frame: u64,
    /// Fields written over the resting view state
    pub view_state: ViewState,
    /// Per-request override of the transition duration
    #[serde(default)]
    pub duration_ms: Option<f64>,
}

fn default_frame_ms() -> f64 {
    1000.0 / 60.0
}

/// Upper bound on replay length when `frames` is not set
pub const MAX_FRAMES: u64 = 100_000;

impl Scenario {
    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let scenario = Self::parse(&content)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut scenario: Scenario = toml::from_str(content).context("Invalid scenario TOML")?;
        scenario.validate()?;
        scenario.requests.sort_by_key(|r| r.frame);
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            anyhow::bail!("frame_ms must be a positive number, got {}", self.frame_ms);
        }
        self.transition
            .validate()
            .context("Invalid [transition] settings")?;
        for request in &self.requests {
            if let Some(duration) = request.duration_ms {
                if !duration.is_finite() || duration < 0.0 {
                    anyhow::bail!(
                        "Request at frame {} has invalid duration_ms {}",
                        request.frame,
                        duration
                    );
                }
            }
        }
        Ok(())
    }

    /// Frame of the last request, 0 without requests
    pub fn last_request_frame(&self) -> u64 {
        self.requests.last().map_or(0, |r| r.frame)
    }
}
