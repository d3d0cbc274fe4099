//! Placement Controller
//!
//! The top-level state machine coordinating one placement session per
//! frame: pointer to surface, surface to snapped target, target to
//! spring-smoothed visual pose, visual pose to placeability and feedback
//! color. Input edges (activate, rotate, confirm, cancel) arrive between
//! frames and only ever touch session state while it is consistent.

use glam::Vec3;

use crate::catalog::{ObjectTemplate, TemplateCatalog};
use crate::config::PlacementConfig;
use crate::grid::GridConfig;
use crate::input::{PlacementAction, PlacementInput};
use crate::raycast::{Viewpoint, resolve_surface};
use crate::scene::{Aabb, ObjectId, SceneBackend};
use crate::spring::Spring;
use crate::validator::{
    EffectHandle, FeedbackRenderer, PlacementFeedback, is_qualifying_surface, validate,
};

/// Per-frame external inputs to [`PlacementController::update`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Seconds since the previous update
    pub dt: f32,
    /// Normalized pointer position, `None` when no aim point exists
    pub pointer_uv: Option<(f32, f32)>,
    /// Whether the confirm input is currently held (level, not edge)
    pub confirm_held: bool,
    /// World position of the controlling actor
    pub actor_position: Vec3,
    /// Scene id of the actor's body, excluded from spatial queries
    pub actor_id: Option<ObjectId>,
}

/// Transient state of one active preview.
struct PlacementSession {
    active: bool,
    preview: Option<ObjectId>,
    grid_overlay: Option<ObjectId>,
    template: Option<ObjectTemplate>,
    /// Committed yaw in degrees, unbounded; wraps only for display
    current_rotation_deg: f32,
    target_position: Vec3,
    visual_position: Vec3,
    spring: Spring,
    can_place: bool,
    /// Set when the last confirm was rejected; drives the shake cue while
    /// confirm stays held
    last_confirm_blocked: bool,
    feedback: Option<PlacementFeedback>,
    active_effect: Option<EffectHandle>,
}

impl PlacementSession {
    fn new() -> Self {
        Self {
            active: false,
            preview: None,
            grid_overlay: None,
            template: None,
            current_rotation_deg: 0.0,
            target_position: Vec3::ZERO,
            visual_position: Vec3::ZERO,
            spring: Spring::new(0x9e37_79b9),
            can_place: false,
            last_confirm_blocked: false,
            feedback: None,
            active_effect: None,
        }
    }
}

/// Owns the session and the placement rules.
///
/// Explicitly constructed and owned by the host application; the host calls
/// [`update`](Self::update) once per frame and forwards input edges to the
/// edge handlers (or uses [`handle_actions`](Self::handle_actions) to do
/// both from a [`PlacementInput`]).
pub struct PlacementController {
    pub config: PlacementConfig,
    grid: GridConfig,
    catalog: TemplateCatalog,
    session: PlacementSession,
}

impl PlacementController {
    pub fn new(config: PlacementConfig, catalog: TemplateCatalog) -> Self {
        let grid = GridConfig {
            cell_size: config.grid_cell_size,
            snap_enabled: config.snap_enabled,
        };
        Self {
            config,
            grid,
            catalog,
            session: PlacementSession::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn preview_id(&self) -> Option<ObjectId> {
        self.session.preview
    }

    pub fn can_place(&self) -> bool {
        self.session.can_place
    }

    pub fn feedback(&self) -> Option<PlacementFeedback> {
        self.session.feedback
    }

    pub fn visual_position(&self) -> Vec3 {
        self.session.visual_position
    }

    pub fn target_position(&self) -> Vec3 {
        self.session.target_position
    }

    /// Committed yaw wrapped into `[0, 360)` for UI display.
    pub fn display_rotation_deg(&self) -> f32 {
        self.session.current_rotation_deg.rem_euclid(360.0)
    }

    /// Begin previewing `template_id`, spawning the ghost at `origin`.
    ///
    /// No-op (with a diagnostic log) when already active or the template is
    /// unknown. Returns whether a session started.
    pub fn activate(
        &mut self,
        template_id: &str,
        origin: Vec3,
        scene: &mut dyn SceneBackend,
    ) -> bool {
        if self.session.active {
            log::warn!("placement already active, ignoring activate({template_id})");
            return false;
        }
        let Some(template) = self.catalog.resolve(template_id).cloned() else {
            log::warn!("unknown placement template {template_id:?}");
            return false;
        };

        let start = origin + Vec3::new(0.0, template.height() * 0.5, 0.0);
        let preview = scene.spawn(&template, start, 0.0, false);
        let overlay_half = Vec3::new(
            self.grid.cell_size * 3.0,
            0.01,
            self.grid.cell_size * 3.0,
        );
        let overlay = scene.spawn_overlay(origin, overlay_half);

        self.session.spring.reset();
        self.session.current_rotation_deg = 0.0;
        self.session.target_position = start;
        self.session.visual_position = start;
        self.session.can_place = false;
        self.session.last_confirm_blocked = false;
        self.session.feedback = None;
        self.session.active_effect = None;
        self.session.template = Some(template);
        self.session.preview = Some(preview);
        self.session.grid_overlay = Some(overlay);
        self.session.active = true;
        log::debug!("placement session started for {template_id}");
        true
    }

    /// Tear down the preview and return to the inactive state.
    ///
    /// Idempotent; safe to call when never activated and from external
    /// lifecycle events such as a respawn.
    pub fn deactivate(
        &mut self,
        scene: &mut dyn SceneBackend,
        feedback: &mut dyn FeedbackRenderer,
    ) {
        if let Some(handle) = self.session.active_effect.take() {
            feedback.cancel_effect(handle);
        }
        if let Some(preview) = self.session.preview.take() {
            scene.despawn(preview);
        }
        if let Some(overlay) = self.session.grid_overlay.take() {
            scene.despawn(overlay);
        }
        self.session.template = None;
        self.session.feedback = None;
        self.session.can_place = false;
        self.session.last_confirm_blocked = false;
        self.session.active = false;
    }

    /// Abort the session; equivalent to [`deactivate`](Self::deactivate).
    pub fn cancel(&mut self, scene: &mut dyn SceneBackend, feedback: &mut dyn FeedbackRenderer) {
        self.deactivate(scene, feedback);
    }

    /// Rotate the committed yaw by +90 degrees. Call on the rising edge
    /// only.
    pub fn rotate_cw(&mut self) {
        if self.session.active {
            self.session.current_rotation_deg += 90.0;
        }
    }

    /// Rotate the committed yaw by -90 degrees. Call on the rising edge
    /// only.
    pub fn rotate_ccw(&mut self) {
        if self.session.active {
            self.session.current_rotation_deg -= 90.0;
        }
    }

    /// Commit the placement at the preview's current visual pose.
    ///
    /// Spawns a fresh, solid clone of the template; the ghost preview is
    /// never promoted since it carries placeholder collision properties.
    /// The session stays active so another instance can be placed.
    ///
    /// On a blocked attempt, applies the upward bounce impulse instead and
    /// arms the shake cue.
    pub fn confirm(&mut self, scene: &mut dyn SceneBackend) -> Option<ObjectId> {
        if !self.session.active {
            return None;
        }
        if !self.session.can_place {
            self.session.spring.bounce(self.config.bounce_impulse);
            self.session.last_confirm_blocked = true;
            return None;
        }

        let template = self.session.template.as_ref()?;
        let placed = scene.spawn(
            template,
            self.session.visual_position,
            self.session.spring.visual_rotation_deg,
            true,
        );
        self.session.last_confirm_blocked = false;
        log::debug!("placed {} as object {placed}", template.id);
        Some(placed)
    }

    /// Advance the session one frame.
    ///
    /// Order matters: resolve the aim point, derive the target pose, step
    /// the spring, apply the visual pose to the preview, then validate at
    /// the visual pose so the feedback color matches what the player sees.
    pub fn update(
        &mut self,
        frame: FrameInput,
        viewpoint: &Viewpoint,
        scene: &mut dyn SceneBackend,
        feedback: &mut dyn FeedbackRenderer,
    ) {
        if !self.session.active {
            return;
        }
        let Some(template) = self.session.template.clone() else {
            return;
        };
        let half_height = template.height() * 0.5;

        let mut exclude: Vec<ObjectId> = Vec::with_capacity(3);
        if let Some(preview) = self.session.preview {
            exclude.push(preview);
        }
        if let Some(overlay) = self.session.grid_overlay {
            exclude.push(overlay);
        }
        if let Some(actor) = frame.actor_id {
            exclude.push(actor);
        }

        let resolved = frame.pointer_uv.and_then(|uv| {
            let (origin, direction) = viewpoint.screen_to_ray(uv);
            resolve_surface(
                scene.as_spatial(),
                origin,
                direction,
                self.config.max_interaction_distance,
                &exclude,
                self.config.fallback_to_ground_plane,
            )
        });

        let in_range = resolved.is_some_and(|t| {
            frame.actor_position.distance(t.point) <= self.config.max_interaction_distance
        });
        let qualifying = resolved
            .is_some_and(|t| is_qualifying_surface(t.normal, self.config.ground_normal_threshold));

        let on_ground;
        if let (Some(target), true, true) = (resolved, in_range, qualifying) {
            let snapped = self.grid.snap(target.point);
            self.session.target_position = snapped + target.normal * half_height;
            on_ground = target.surface.is_some();
        } else {
            // Park the preview in front of the actor so feedback stays
            // visible even with nothing under the pointer.
            self.session.target_position = frame.actor_position
                + viewpoint.horizontal_forward() * self.config.invalid_target_distance;
            on_ground = false;
        }

        let shake = if self.session.last_confirm_blocked && frame.confirm_held {
            self.session
                .spring
                .shake_offset(self.config.invalid_shake_amplitude)
        } else {
            Vec3::ZERO
        };

        self.session.visual_position = self.session.spring.step_position(
            self.session.visual_position,
            self.session.target_position,
            frame.dt,
            self.config.spring_stiffness,
            self.config.spring_damping,
            shake,
        );
        let visual_yaw = self.session.spring.step_rotation(
            self.session.current_rotation_deg,
            frame.dt,
            self.config.rotation_smoothing_rate,
        );

        if let Some(preview) = self.session.preview {
            scene.set_pose(preview, self.session.visual_position, visual_yaw);
        }
        if let Some(overlay) = self.session.grid_overlay {
            let foot = self.session.target_position - Vec3::new(0.0, half_height, 0.0);
            scene.set_pose(overlay, foot, 0.0);
        }

        let bounds = self
            .session
            .preview
            .and_then(|id| scene.object_aabb(id))
            .unwrap_or_else(|| {
                Aabb::from_center_half_extents(
                    self.session.visual_position,
                    template.half_extents,
                )
            });
        let (can_place, state) = validate(scene.as_spatial(), &bounds, &exclude, on_ground);
        self.session.can_place = can_place;

        if self.session.feedback != Some(state) {
            if let Some(handle) = self.session.active_effect.take() {
                feedback.cancel_effect(handle);
            }
            if let Some(preview) = self.session.preview {
                let handle =
                    feedback.set_color(preview, state, self.config.feedback_transition_secs);
                self.session.active_effect = Some(handle);
            }
            self.session.feedback = Some(state);
        }
    }

    /// Drive the edge handlers and the frame update from a
    /// [`PlacementInput`]. Returns the committed object id when a confirm
    /// edge lands on a placeable frame.
    pub fn handle_actions(
        &mut self,
        input: &PlacementInput,
        template_id: &str,
        frame: FrameInput,
        viewpoint: &Viewpoint,
        scene: &mut dyn SceneBackend,
        feedback: &mut dyn FeedbackRenderer,
    ) -> Option<ObjectId> {
        if input.just_pressed(PlacementAction::Activate) {
            self.activate(template_id, frame.actor_position, scene);
        }
        if input.just_pressed(PlacementAction::Cancel) {
            self.cancel(scene, feedback);
        }
        if input.just_pressed(PlacementAction::RotateCw) {
            self.rotate_cw();
        }
        if input.just_pressed(PlacementAction::RotateCcw) {
            self.rotate_ccw();
        }

        self.update(frame, viewpoint, scene, feedback);

        if input.just_pressed(PlacementAction::Confirm) {
            self.confirm(scene)
        } else {
            None
        }
    }
}
