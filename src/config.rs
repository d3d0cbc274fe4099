//! Placement Configuration
//!
//! Tunable parameters for the placement controller, loadable from JSON.
//! Every field has a default so partial config files work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Horizontal grid cell size in world units
    pub grid_cell_size: f32,
    /// Maximum raycast distance when resolving the aim point
    pub max_interaction_distance: f32,
    /// Spring stiffness pulling the preview toward its target
    pub spring_stiffness: f32,
    /// Per-frame velocity retention factor, in (0, 1)
    pub spring_damping: f32,
    /// Exponential smoothing rate for visual rotation
    pub rotation_smoothing_rate: f32,
    /// Minimum upward normal component for a surface to count as ground
    pub ground_normal_threshold: f32,
    /// Horizontal shake amplitude while holding confirm on a blocked spot
    pub invalid_shake_amplitude: f32,
    /// Upward velocity impulse applied on a rejected confirm
    pub bounce_impulse: f32,
    /// When no surface is hit, fall back to intersecting the y=0 plane
    pub fallback_to_ground_plane: bool,
    /// Snap the preview target to the grid
    pub snap_enabled: bool,
    /// Distance in front of the actor the preview parks at when the aim
    /// point cannot be resolved
    pub invalid_target_distance: f32,
    /// Duration of feedback color transitions, in seconds
    pub feedback_transition_secs: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: 1.0,
            max_interaction_distance: 50.0,
            spring_stiffness: 10.0,
            spring_damping: 0.75,
            rotation_smoothing_rate: 15.0,
            ground_normal_threshold: 0.9,
            invalid_shake_amplitude: 0.2,
            bounce_impulse: 5.0,
            fallback_to_ground_plane: false,
            snap_enabled: true,
            invalid_target_distance: 4.0,
            feedback_transition_secs: 0.2,
        }
    }
}

impl PlacementConfig {
    /// Load a config from a JSON file. Missing fields fall back to
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize placement config")
    }
}
