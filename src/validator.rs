//! Placement Validation
//!
//! Combines the volume-overlap test with the qualifying-surface result into
//! the per-frame placeability decision and a tri-state feedback color. The
//! color is purely cosmetic and dispatched fire-and-forget through
//! [`FeedbackRenderer`]; the controller never waits on an effect.

use crate::scene::{Aabb, ObjectId, SpatialQuery};

/// Tri-state visual feedback for the preview object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementFeedback {
    /// Placeable: unobstructed and on a qualifying surface (green)
    Valid,
    /// Unobstructed but not on a qualifying surface (yellow)
    NotGrounded,
    /// Overlapping something, regardless of ground state (red)
    Blocked,
}

impl PlacementFeedback {
    /// RGBA color for this state.
    pub fn color(&self) -> [f32; 4] {
        match self {
            PlacementFeedback::Valid => [0.3, 0.9, 0.4, 0.6],
            PlacementFeedback::NotGrounded => [0.9, 0.85, 0.2, 0.6],
            PlacementFeedback::Blocked => [0.9, 0.25, 0.2, 0.6],
        }
    }
}

/// True when `normal` is close enough to vertical to count as a floor.
///
/// `threshold` is the minimum Y component (a cosine); the default 0.9
/// rejects surfaces tilted more than ~25.8 degrees from horizontal.
pub fn is_qualifying_surface(normal: glam::Vec3, threshold: f32) -> bool {
    normal.y > threshold
}

/// Decide placeability for the preview's current (visual) bounds.
///
/// `can_place` requires an empty overlap set AND a qualifying surface.
/// Feedback classifies further: any overlap is `Blocked` even when
/// ungrounded, so the player always sees the harder problem first.
pub fn validate(
    scene: &dyn SpatialQuery,
    bounds: &Aabb,
    exclude: &[ObjectId],
    on_ground: bool,
) -> (bool, PlacementFeedback) {
    let overlaps = scene.overlap_volume(bounds, exclude);
    let unobstructed = overlaps.is_empty();
    let can_place = unobstructed && on_ground;

    let feedback = if can_place {
        PlacementFeedback::Valid
    } else if unobstructed {
        PlacementFeedback::NotGrounded
    } else {
        PlacementFeedback::Blocked
    };

    (can_place, feedback)
}

/// Handle to a dispatched color transition, so a superseded effect can be
/// cancelled.
pub type EffectHandle = u64;

/// Cosmetic rendering collaborator.
///
/// `set_color` starts a time-boxed color transition on every visible
/// surface of the object and returns immediately; the core never depends on
/// completion.
pub trait FeedbackRenderer {
    fn set_color(
        &mut self,
        object: ObjectId,
        feedback: PlacementFeedback,
        transition_secs: f32,
    ) -> EffectHandle;

    /// Cancel an in-flight transition. Unknown handles are ignored.
    fn cancel_effect(&mut self, handle: EffectHandle);
}

/// No-op renderer for headless hosts.
#[derive(Debug, Default)]
pub struct NullFeedbackRenderer;

impl FeedbackRenderer for NullFeedbackRenderer {
    fn set_color(&mut self, _: ObjectId, _: PlacementFeedback, _: f32) -> EffectHandle {
        0
    }

    fn cancel_effect(&mut self, _: EffectHandle) {}
}

/// Renderer that records every call, for tests and debugging overlays.
#[derive(Debug, Default)]
pub struct RecordingFeedbackRenderer {
    pub calls: Vec<(ObjectId, PlacementFeedback, f32)>,
    pub cancelled: Vec<EffectHandle>,
    next_handle: EffectHandle,
}

impl FeedbackRenderer for RecordingFeedbackRenderer {
    fn set_color(
        &mut self,
        object: ObjectId,
        feedback: PlacementFeedback,
        transition_secs: f32,
    ) -> EffectHandle {
        self.calls.push((object, feedback, transition_secs));
        self.next_handle += 1;
        self.next_handle
    }

    fn cancel_effect(&mut self, handle: EffectHandle) {
        self.cancelled.push(handle);
    }
}

/// Pulsing alpha for hosts that animate the ghost preview.
pub fn ghost_pulse_alpha(time: f32) -> f32 {
    0.5 + (time * 4.0).sin() * 0.3
}
