//! Preview Motion Smoothing
//!
//! Spring-damped smoothing of the preview pose. Position uses a
//! momentum-carrying damped spring (semi-implicit Euler, tuned constants,
//! deliberately allowed to overshoot); yaw uses exponential interpolation
//! toward the committed rotation, which never overshoots. The same state
//! also produces the invalid-placement shake jitter and the blocked-confirm
//! bounce impulse.

use glam::Vec3;

/// Tiny xorshift32 generator for the shake jitter.
///
/// Seed-deterministic, so shake sequences replay identically; no external
/// RNG crate is worth carrying for one cosmetic offset per frame.
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Seed 0 is invalid for xorshift and gets bumped to 1.
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform `f32` in `[0, 1]`.
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    /// Uniform `f32` in `[min, max]`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Spring state for one preview session.
///
/// Velocity and visual rotation persist across frames while a session is
/// active and are reset to zero whenever a new session starts.
pub struct Spring {
    /// Spring momentum (world units per frame step)
    pub velocity: Vec3,
    /// Smoothed yaw applied to the preview, in degrees
    pub visual_rotation_deg: f32,
    rng: SimpleRng,
}

impl Spring {
    pub fn new(seed: u32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            visual_rotation_deg: 0.0,
            rng: SimpleRng::new(seed),
        }
    }

    /// Zero the motion state for a fresh session.
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.visual_rotation_deg = 0.0;
    }

    /// Advance the position spring one frame.
    ///
    /// `velocity = velocity * damping + (target - current) * stiffness * dt`,
    /// then the new velocity plus `shake` is added to the position. `shake`
    /// is a per-frame offset, not an accumulating one, so it feeds into the
    /// returned position but never into the stored velocity.
    ///
    /// `dt <= 0` leaves velocity untouched and returns `current + shake`.
    pub fn step_position(
        &mut self,
        current: Vec3,
        target: Vec3,
        dt: f32,
        stiffness: f32,
        damping: f32,
        shake: Vec3,
    ) -> Vec3 {
        if dt <= 0.0 {
            return current + shake;
        }
        let force = (target - current) * stiffness;
        self.velocity = self.velocity * damping + force * dt;
        current + self.velocity + shake
    }

    /// Advance the yaw smoothing one frame and return the new visual yaw.
    ///
    /// Exponential interpolation toward `target_deg` with factor
    /// `clamp(dt * rate, 0, 1)`; the visual yaw approaches the target
    /// monotonically and cannot overshoot.
    pub fn step_rotation(&mut self, target_deg: f32, dt: f32, rate: f32) -> f32 {
        let t = (dt * rate).clamp(0.0, 1.0);
        self.visual_rotation_deg += (target_deg - self.visual_rotation_deg) * t;
        self.visual_rotation_deg
    }

    /// Fresh horizontal jitter in `[-amplitude, +amplitude]` per axis.
    ///
    /// Recomputed every call; callers must apply it as this frame's offset,
    /// never add it to persistent state.
    pub fn shake_offset(&mut self, amplitude: f32) -> Vec3 {
        Vec3::new(
            self.rng.range(-amplitude, amplitude),
            0.0,
            self.rng.range(-amplitude, amplitude),
        )
    }

    /// One-shot upward impulse, the "bounce" cue on a blocked confirm.
    pub fn bounce(&mut self, impulse: f32) {
        self.velocity.y += impulse;
    }
}
