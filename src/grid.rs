//! Grid Snapping Module
//!
//! Horizontal grid alignment for placement targets. Only X and Z snap to the
//! grid; Y is derived from surface height by the placement controller and
//! passes through unmodified.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Grid configuration for placement snapping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Snap granularity for the horizontal axes
    pub cell_size: f32,
    /// Grid snapping on/off
    pub snap_enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            snap_enabled: true,
        }
    }
}

impl GridConfig {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            snap_enabled: true,
        }
    }

    /// Snap a position's X and Z to the nearest grid line if snapping is
    /// enabled. Y is preserved.
    ///
    /// Values exactly halfway between two grid lines round away from zero
    /// (`f32::round` semantics), so the result is deterministic.
    pub fn snap(&self, pos: Vec3) -> Vec3 {
        if !self.snap_enabled {
            return pos;
        }
        snap_to_grid(pos, self.cell_size)
    }
}

/// Standalone snap for callers without a [`GridConfig`].
///
/// Each horizontal component is rounded to the nearest multiple of
/// `cell_size`; Y is untouched.
pub fn snap_to_grid(pos: Vec3, cell_size: f32) -> Vec3 {
    Vec3::new(
        (pos.x / cell_size).round() * cell_size,
        pos.y,
        (pos.z / cell_size).round() * cell_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_basic() {
        let config = GridConfig::default();
        let snapped = config.snap(Vec3::new(1.3, 5.0, 2.7));
        assert_eq!(snapped.x, 1.0);
        assert_eq!(snapped.y, 5.0); // Y unchanged
        assert_eq!(snapped.z, 3.0);
    }

    #[test]
    fn test_snap_idempotent() {
        let config = GridConfig::new(0.5);
        for p in [
            Vec3::new(1.3, 2.0, -0.7),
            Vec3::new(-3.14, 0.0, 9.99),
            Vec3::new(0.25, -1.0, -0.25),
        ] {
            let once = config.snap(p);
            let twice = config.snap(once);
            assert_eq!(once, twice, "snap must be idempotent for {:?}", p);
        }
    }

    #[test]
    fn test_snap_produces_exact_multiples() {
        let config = GridConfig::new(2.0);
        let snapped = config.snap(Vec3::new(7.3, 1.0, -4.9));
        assert_eq!(snapped.x % 2.0, 0.0);
        assert_eq!(snapped.z % 2.0, 0.0);
    }

    #[test]
    fn test_snap_half_rounds_away_from_zero() {
        let snapped = snap_to_grid(Vec3::new(0.5, 0.0, -0.5), 1.0);
        assert_eq!(snapped.x, 1.0);
        assert_eq!(snapped.z, -1.0);
    }

    #[test]
    fn test_snap_disabled() {
        let mut config = GridConfig::default();
        config.snap_enabled = false;
        let pos = Vec3::new(1.3, 5.0, 2.7);
        assert_eq!(config.snap(pos), pos);
    }
}
