//! Placement Input
//!
//! Edge-triggered action tracking for the placement controller. Physical
//! keys, mouse buttons, and touch-equivalents map onto the same logical
//! actions; `just_pressed` fires once per genuine press regardless of how
//! many "pressed" reports the host delivers, and `end_frame` clears the
//! one-frame edge flags.

use std::collections::HashMap;

/// Logical placement actions, independent of physical bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementAction {
    /// Begin previewing the selected template
    Activate,
    /// Rotate the preview +90 degrees
    RotateCw,
    /// Rotate the preview -90 degrees
    RotateCcw,
    /// Commit the placement (or bounce when blocked)
    Confirm,
    /// Abort the session
    Cancel,
}

/// Physical inputs the bindings understand, decoupled from any windowing
/// system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    KeyB,
    KeyR,
    KeyQ,
    Enter,
    Escape,
    MouseLeft,
    MouseRight,
    /// Single-finger tap (maps to confirm on touch devices)
    TouchTap,
    /// Two-finger tap (maps to cancel on touch devices)
    TouchTwoFingerTap,
}

/// State of one logical action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

/// Which pointing modality is currently driving the aim point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    Mouse,
    Touch,
}

/// Tracks the pointer position per modality.
///
/// Positions are normalized UV in `[0, 1]` with `(0, 0)` at the
/// bottom-left, matching the ray construction in [`crate::raycast`].
#[derive(Debug, Clone, Copy)]
pub struct PointerTracker {
    pub mode: PointerMode,
    mouse_uv: Option<(f32, f32)>,
    touch_uv: Option<(f32, f32)>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self {
            mode: PointerMode::Mouse,
            mouse_uv: None,
            touch_uv: None,
        }
    }
}

impl PointerTracker {
    pub fn set_mouse(&mut self, uv: (f32, f32)) {
        self.mouse_uv = Some(uv);
    }

    pub fn clear_mouse(&mut self) {
        self.mouse_uv = None;
    }

    /// Update the active touch point; `None` when the finger lifts.
    pub fn set_touch(&mut self, uv: Option<(f32, f32)>) {
        self.touch_uv = uv;
    }

    /// The screen position to aim with.
    ///
    /// Mouse mode reports the cursor when one is known. Touch mode reports
    /// the active touch point, or the viewport center when no touch is down
    /// (touch-only devices still need a stand-in aim point between taps).
    pub fn aim_point(&self) -> Option<(f32, f32)> {
        match self.mode {
            PointerMode::Mouse => self.mouse_uv,
            PointerMode::Touch => Some(self.touch_uv.unwrap_or((0.5, 0.5))),
        }
    }
}

/// Aggregated placement input: action edges plus the pointer.
pub struct PlacementInput {
    actions: HashMap<PlacementAction, ActionState>,
    bindings: HashMap<InputKey, Vec<PlacementAction>>,
    pub pointer: PointerTracker,
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementInput {
    /// Default bindings: B activates, R / Q rotate, left click / Enter /
    /// tap confirm, right click / Escape / two-finger tap cancel.
    pub fn new() -> Self {
        let mut input = Self {
            actions: HashMap::new(),
            bindings: HashMap::new(),
            pointer: PointerTracker::default(),
        };
        input.bind(InputKey::KeyB, PlacementAction::Activate);
        input.bind(InputKey::KeyR, PlacementAction::RotateCw);
        input.bind(InputKey::KeyQ, PlacementAction::RotateCcw);
        input.bind(InputKey::MouseLeft, PlacementAction::Confirm);
        input.bind(InputKey::Enter, PlacementAction::Confirm);
        input.bind(InputKey::TouchTap, PlacementAction::Confirm);
        input.bind(InputKey::MouseRight, PlacementAction::Cancel);
        input.bind(InputKey::Escape, PlacementAction::Cancel);
        input.bind(InputKey::TouchTwoFingerTap, PlacementAction::Cancel);
        input
    }

    /// Bind a physical input to an action. One key may drive several
    /// actions and one action may have several keys.
    pub fn bind(&mut self, key: InputKey, action: PlacementAction) {
        self.bindings.entry(key).or_default().push(action);
    }

    /// Remove a specific key-action binding.
    pub fn unbind(&mut self, key: InputKey, action: PlacementAction) {
        if let Some(actions) = self.bindings.get_mut(&key) {
            actions.retain(|a| *a != action);
        }
    }

    /// Handle a press/release report from the host.
    ///
    /// Duplicate "pressed" reports without an intervening release do not
    /// re-trigger `just_pressed`.
    pub fn handle_key(&mut self, key: InputKey, pressed: bool) {
        if let Some(actions) = self.bindings.get(&key).cloned() {
            for action in actions {
                let state = self.actions.entry(action).or_default();
                state.just_pressed = pressed && !state.pressed;
                state.just_released = !pressed && state.pressed;
                state.pressed = pressed;
            }
        }
    }

    /// Clear the one-frame edge flags; call once at the end of each frame.
    pub fn end_frame(&mut self) {
        for state in self.actions.values_mut() {
            state.just_pressed = false;
            state.just_released = false;
        }
    }

    pub fn pressed(&self, action: PlacementAction) -> bool {
        self.actions.get(&action).is_some_and(|s| s.pressed)
    }

    pub fn just_pressed(&self, action: PlacementAction) -> bool {
        self.actions.get(&action).is_some_and(|s| s.just_pressed)
    }

    pub fn just_released(&self, action: PlacementAction) -> bool {
        self.actions.get(&action).is_some_and(|s| s.just_released)
    }
}
