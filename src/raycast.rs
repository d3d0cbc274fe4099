//! Pointer Raycasting
//!
//! Converts a screen-space pointer position into a world ray and resolves it
//! against the scene into a placement target. A miss can optionally fall
//! back to the `y = 0` ground plane so the preview keeps tracking the
//! pointer even over empty space.

use glam::Vec3;

use crate::scene::{ObjectId, SpatialQuery};

/// Camera description sufficient to build pointer rays.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub position: Vec3,
    /// Normalized look direction
    pub forward: Vec3,
    /// Normalized right vector
    pub right: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
}

impl Viewpoint {
    /// Build a viewpoint looking from `position` toward `target`.
    ///
    /// When looking straight up or down the world X axis stands in as the
    /// right vector.
    pub fn looking_at(position: Vec3, target: Vec3, fov: f32, aspect: f32) -> Self {
        let forward = (target - position).normalize_or_zero();
        let right = if forward.y.abs() > 0.99 {
            Vec3::X
        } else {
            forward.cross(Vec3::Y).normalize()
        };
        Self {
            position,
            forward,
            right,
            fov,
            aspect,
        }
    }

    /// World ray through a normalized screen position.
    ///
    /// `uv` is in `[0, 1]` on both axes with `(0, 0)` at the bottom-left.
    /// Returns `(origin, direction)` with a normalized direction.
    pub fn screen_to_ray(&self, uv: (f32, f32)) -> (Vec3, Vec3) {
        let ndc = (uv.0 * 2.0 - 1.0, uv.1 * 2.0 - 1.0);
        let half_fov_tan = (self.fov * 0.5).tan();
        let up = self.right.cross(self.forward).normalize();

        let direction = (self.forward
            + self.right * ndc.0 * half_fov_tan * self.aspect
            + up * ndc.1 * half_fov_tan)
            .normalize();

        (self.position, direction)
    }

    /// Horizontal look direction, used for the off-target fallback pose.
    pub fn horizontal_forward(&self) -> Vec3 {
        let flat = Vec3::new(self.forward.x, 0.0, self.forward.z);
        let flat = flat.normalize_or_zero();
        if flat == Vec3::ZERO { Vec3::NEG_Z } else { flat }
    }
}

/// Intersect a ray with the horizontal plane `y = plane_y`.
///
/// `None` when the ray is parallel to the plane or the intersection lies
/// behind the origin.
pub fn ray_plane_y(origin: Vec3, direction: Vec3, plane_y: f32) -> Option<Vec3> {
    if direction.y.abs() < 1e-4 {
        return None;
    }
    let t = (plane_y - origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}

/// A resolved placement target under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget {
    pub point: Vec3,
    pub normal: Vec3,
    /// The scene object that was hit; `None` for ground-plane or max-range
    /// fallback points
    pub surface: Option<ObjectId>,
}

/// Resolve a pointer ray into a placement target.
///
/// A scene hit wins. On a miss, behavior depends on
/// `fallback_to_ground_plane`:
/// - `true`: the `y = 0` plane intersection when one exists in front of the
///   viewpoint, otherwise a point at `max_dist` along the ray; both carry an
///   assumed upward normal and no surface reference.
/// - `false`: no target.
pub fn resolve_surface(
    scene: &dyn SpatialQuery,
    origin: Vec3,
    direction: Vec3,
    max_dist: f32,
    exclude: &[ObjectId],
    fallback_to_ground_plane: bool,
) -> Option<ResolvedTarget> {
    if let Some(hit) = scene.raycast(origin, direction, max_dist, exclude) {
        return Some(ResolvedTarget {
            point: hit.point,
            normal: hit.normal,
            surface: Some(hit.object),
        });
    }

    if !fallback_to_ground_plane {
        return None;
    }

    let point = ray_plane_y(origin, direction, 0.0).unwrap_or(origin + direction * max_dist);
    Some(ResolvedTarget {
        point,
        normal: Vec3::Y,
        surface: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StaticScene;

    #[test]
    fn test_center_ray_points_forward() {
        let vp = Viewpoint::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.2, 16.0 / 9.0);
        let (origin, dir) = vp.screen_to_ray((0.5, 0.5));
        assert_eq!(origin, vp.position);
        assert!((dir - vp.forward).length() < 1e-4);
    }

    #[test]
    fn test_rays_are_normalized() {
        let vp = Viewpoint::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, 1.2, 16.0 / 9.0);
        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for v in [0.0, 0.5, 1.0] {
                let (_, dir) = vp.screen_to_ray((u, v));
                assert!((dir.length() - 1.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_ray_plane_parallel_is_none() {
        assert!(ray_plane_y(Vec3::new(0.0, 2.0, 0.0), Vec3::X, 0.0).is_none());
    }

    #[test]
    fn test_ray_plane_behind_is_none() {
        // Looking up from above the plane
        assert!(ray_plane_y(Vec3::new(0.0, 2.0, 0.0), Vec3::Y, 0.0).is_none());
    }

    #[test]
    fn test_ray_plane_hit() {
        let hit = ray_plane_y(
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, -1.0, 1.0).normalize(),
            0.0,
        )
        .unwrap();
        assert!((hit.y).abs() < 1e-4);
        assert!((hit.z - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_resolve_miss_without_fallback() {
        let scene = StaticScene::new();
        let target = resolve_surface(&scene, Vec3::ZERO, Vec3::Z, 50.0, &[], false);
        assert!(target.is_none());
    }

    #[test]
    fn test_resolve_miss_with_ground_fallback() {
        let scene = StaticScene::new();
        let dir = Vec3::new(0.0, -1.0, 1.0).normalize();
        let target =
            resolve_surface(&scene, Vec3::new(0.0, 5.0, 0.0), dir, 50.0, &[], true).unwrap();
        assert!(target.surface.is_none());
        assert_eq!(target.normal, Vec3::Y);
        assert!(target.point.y.abs() < 1e-3);
    }

    #[test]
    fn test_resolve_upward_miss_uses_max_range_point() {
        let scene = StaticScene::new();
        let origin = Vec3::new(0.0, 5.0, 0.0);
        let target = resolve_surface(&scene, origin, Vec3::Y, 50.0, &[], true).unwrap();
        assert!(target.surface.is_none());
        assert_eq!(target.point, origin + Vec3::Y * 50.0);
    }

    #[test]
    fn test_resolve_prefers_scene_hit() {
        let mut scene = StaticScene::new();
        let floor = scene.insert_solid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
        let dir = Vec3::new(0.0, -1.0, 1.0).normalize();
        let target =
            resolve_surface(&scene, Vec3::new(0.0, 5.0, 0.0), dir, 50.0, &[], true).unwrap();
        assert_eq!(target.surface, Some(floor));
        assert_eq!(target.normal, Vec3::Y);
    }
}
