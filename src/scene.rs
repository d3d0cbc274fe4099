//! Scene Backend
//!
//! Spatial query contracts the placement controller consumes, plus
//! [`StaticScene`], an in-process AABB scene good enough for headless hosts
//! and tests. Ray intersection uses the slab method; overlap is plain AABB
//! against AABB. Every query takes an exclusion set so the preview object
//! and the controlling actor never collide with themselves.

use std::collections::HashMap;

use glam::Vec3;

use crate::catalog::ObjectTemplate;

/// Stable handle to a scene object.
pub type ObjectId = u32;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap test; touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Information about a ray-scene intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space position where the ray hit
    pub point: Vec3,
    /// Outward surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// The object that was hit
    pub object: ObjectId,
    /// Distance from ray origin to hit point
    pub distance: f32,
}

/// Ray and volume queries against the scene.
///
/// Implemented by whatever spatial backend the host wires in; calls are
/// synchronous and complete within the frame step.
pub trait SpatialQuery {
    /// Closest solid hit along the ray, skipping `exclude`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_dist: f32,
        exclude: &[ObjectId],
    ) -> Option<SurfaceHit>;

    /// All solid objects overlapping `bounds`, skipping `exclude`.
    fn overlap_volume(&self, bounds: &Aabb, exclude: &[ObjectId]) -> Vec<ObjectId>;
}

/// Mutations the placement controller needs on top of [`SpatialQuery`]:
/// spawning previews and committed objects, tearing them down, and applying
/// the smoothed pose each frame.
pub trait SceneBackend: SpatialQuery {
    /// Instantiate `template` at a pose. Non-solid objects (ghost previews)
    /// are invisible to all queries.
    fn spawn(&mut self, template: &ObjectTemplate, position: Vec3, yaw_deg: f32, solid: bool)
    -> ObjectId;

    /// Spawn a non-solid decoration (the placement grid overlay).
    fn spawn_overlay(&mut self, center: Vec3, half_extents: Vec3) -> ObjectId;

    /// Remove an object. Removing an unknown id is a no-op.
    fn despawn(&mut self, id: ObjectId);

    /// Move/rotate an object. Unknown ids are ignored.
    fn set_pose(&mut self, id: ObjectId, position: Vec3, yaw_deg: f32);

    /// Current bounds of an object, if it exists.
    fn object_aabb(&self, id: ObjectId) -> Option<Aabb>;

    /// View this backend as its query half for read-only callers.
    fn as_spatial(&self) -> &dyn SpatialQuery;
}

/// One object in a [`StaticScene`].
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Identifier of the catalog template this was cloned from; empty for
    /// decorations.
    pub template_id: String,
    pub position: Vec3,
    /// Yaw around +Y in degrees
    pub yaw_deg: f32,
    /// Unrotated half extents
    pub half_extents: Vec3,
    /// Solid objects participate in raycast and overlap queries
    pub solid: bool,
}

impl SceneObject {
    /// World-space bounds. Yaw is folded into the box by swapping the
    /// horizontal extents past 45 degrees; an AABB approximation, the same
    /// trade the collision layer makes for oriented shapes.
    pub fn aabb(&self) -> Aabb {
        let yaw = self.yaw_deg.rem_euclid(180.0);
        let he = if (45.0..135.0).contains(&yaw) {
            Vec3::new(self.half_extents.z, self.half_extents.y, self.half_extents.x)
        } else {
            self.half_extents
        };
        Aabb::from_center_half_extents(self.position, he)
    }
}

/// Sparse in-memory scene of AABB objects.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    objects: HashMap<ObjectId, SceneObject>,
    next_id: ObjectId,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bare solid box (terrain, walls, existing props).
    pub fn insert_solid(&mut self, position: Vec3, half_extents: Vec3) -> ObjectId {
        self.insert(SceneObject {
            id: 0,
            template_id: String::new(),
            position,
            yaw_deg: 0.0,
            half_extents,
            solid: true,
        })
    }

    fn insert(&mut self, mut object: SceneObject) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        object.id = id;
        self.objects.insert(id, object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }
}

impl SpatialQuery for StaticScene {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_dist: f32,
        exclude: &[ObjectId],
    ) -> Option<SurfaceHit> {
        let mut closest: Option<SurfaceHit> = None;
        let mut closest_dist = max_dist;

        for object in self.objects.values() {
            if !object.solid || exclude.contains(&object.id) {
                continue;
            }
            let aabb = object.aabb();
            if let Some(t) = ray_aabb_intersect(origin, direction, &aabb) {
                if t >= 0.0 && t < closest_dist {
                    let point = origin + direction * t;
                    closest = Some(SurfaceHit {
                        point,
                        normal: aabb_surface_normal(point, &aabb),
                        object: object.id,
                        distance: t,
                    });
                    closest_dist = t;
                }
            }
        }

        closest
    }

    fn overlap_volume(&self, bounds: &Aabb, exclude: &[ObjectId]) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.solid && !exclude.contains(&o.id) && o.aabb().overlaps(bounds))
            .map(|o| o.id)
            .collect()
    }
}

impl SceneBackend for StaticScene {
    fn spawn(
        &mut self,
        template: &ObjectTemplate,
        position: Vec3,
        yaw_deg: f32,
        solid: bool,
    ) -> ObjectId {
        self.insert(SceneObject {
            id: 0,
            template_id: template.id.clone(),
            position,
            yaw_deg,
            half_extents: template.half_extents,
            solid,
        })
    }

    fn spawn_overlay(&mut self, center: Vec3, half_extents: Vec3) -> ObjectId {
        self.insert(SceneObject {
            id: 0,
            template_id: String::new(),
            position: center,
            yaw_deg: 0.0,
            half_extents,
            solid: false,
        })
    }

    fn despawn(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }

    fn set_pose(&mut self, id: ObjectId, position: Vec3, yaw_deg: f32) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.position = position;
            object.yaw_deg = yaw_deg;
        }
    }

    fn object_aabb(&self, id: ObjectId) -> Option<Aabb> {
        self.objects.get(&id).map(|o| o.aabb())
    }

    fn as_spatial(&self) -> &dyn SpatialQuery {
        self
    }
}

/// Ray-AABB intersection using the slab method.
///
/// Returns the distance along the ray to the nearest intersection, or the
/// exit distance when the ray starts inside the box. `None` when the box is
/// missed or entirely behind the origin.
pub fn ray_aabb_intersect(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<f32> {
    // Near-zero direction components get a huge signed inverse instead of
    // dividing by zero
    let inv = Vec3::new(
        if direction.x.abs() > 1e-10 { 1.0 / direction.x } else { f32::MAX * direction.x.signum() },
        if direction.y.abs() > 1e-10 { 1.0 / direction.y } else { f32::MAX * direction.y.signum() },
        if direction.z.abs() > 1e-10 { 1.0 / direction.z } else { f32::MAX * direction.z.signum() },
    );

    let t1 = (aabb.min.x - origin.x) * inv.x;
    let t2 = (aabb.max.x - origin.x) * inv.x;
    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb.min.y - origin.y) * inv.y;
    let t4 = (aabb.max.y - origin.y) * inv.y;
    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb.min.z - origin.z) * inv.z;
    let t6 = (aabb.max.z - origin.z) * inv.z;
    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb: &Aabb) -> Vec3 {
    let half = aabb.half_extents();
    let local = point - aabb.center();
    let normalized = Vec3::new(local.x / half.x, local.y / half.y, local.z / half.z);
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.x && abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObjectTemplate;

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, &aabb);
        assert!((t.unwrap() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, &aabb);
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, &aabb);
        assert!(t.is_none());
    }

    #[test]
    fn test_surface_normal_top_face() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(aabb_surface_normal(Vec3::new(0.2, 1.0, -0.3), &aabb), Vec3::Y);
    }

    #[test]
    fn test_raycast_skips_excluded_and_ghosts() {
        let mut scene = StaticScene::new();
        let wall = scene.insert_solid(Vec3::new(0.0, 0.0, 2.0), Vec3::splat(0.5));
        let ghost = scene.spawn(
            &ObjectTemplate::new("crate", Vec3::splat(0.5)),
            Vec3::new(0.0, 0.0, 1.0),
            0.0,
            false,
        );

        // Ghost sits in front of the wall but is non-solid
        let hit = scene.raycast(Vec3::ZERO, Vec3::Z, 10.0, &[]).unwrap();
        assert_eq!(hit.object, wall);
        assert!(hit.point.z > 1.0);
        let _ = ghost;

        // Excluding the wall leaves nothing to hit
        assert!(scene.raycast(Vec3::ZERO, Vec3::Z, 10.0, &[wall]).is_none());
    }

    #[test]
    fn test_overlap_volume_respects_exclusions() {
        let mut scene = StaticScene::new();
        let a = scene.insert_solid(Vec3::ZERO, Vec3::splat(0.5));
        let b = scene.insert_solid(Vec3::new(0.4, 0.0, 0.0), Vec3::splat(0.5));

        let probe = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let mut hits = scene.overlap_volume(&probe, &[]);
        hits.sort_unstable();
        assert_eq!(hits, vec![a, b]);

        assert_eq!(scene.overlap_volume(&probe, &[a]), vec![b]);
    }

    #[test]
    fn test_yawed_object_swaps_horizontal_extents() {
        let object = SceneObject {
            id: 0,
            template_id: String::new(),
            position: Vec3::ZERO,
            yaw_deg: 90.0,
            half_extents: Vec3::new(2.0, 1.0, 0.5),
            solid: true,
        };
        let he = object.aabb().half_extents();
        assert_eq!(he, Vec3::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn test_despawn_unknown_id_is_noop() {
        let mut scene = StaticScene::new();
        scene.despawn(1234);
        assert!(scene.is_empty());
    }
}
