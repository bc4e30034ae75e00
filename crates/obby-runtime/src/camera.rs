use obby_core::geom::{Rect, Vec2, lerp};
use rand::Rng;

/// Smoothed follow camera with a decaying shake level. Consumes the player
/// rect read-only; nothing here feeds back into the simulation.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    shake: f32,
}

impl Camera {
    /// Ease toward centering `target` in the `view`-sized viewport, clamped
    /// to the level bounds, and decay the shake level.
    pub fn update(&mut self, dt: f32, target: &Rect, bounds: &Rect, view: Vec2) {
        let tx = target.x + target.w / 2.0 - view.x / 2.0;
        let ty = target.y + target.h / 2.0 - view.y / 2.0;
        // Frame-rate independent smoothing: the remaining distance shrinks
        // by a fixed factor per second.
        let k = 1.0 - 0.0001f32.powf(dt);
        self.x = lerp(self.x, tx, k);
        self.y = lerp(self.y, ty, k);
        self.x = self
            .x
            .clamp(bounds.x, (bounds.x + bounds.w - view.x).max(bounds.x));
        self.y = self
            .y
            .clamp(bounds.y, (bounds.y + bounds.h - view.y).max(bounds.y));

        self.shake = (self.shake - dt * 3.2).max(0.0);
    }

    /// Raise the shake level, keeping the stronger of current and `amount`.
    pub fn add_shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }

    pub fn shake(&self) -> f32 {
        self.shake
    }

    /// Render-time jitter for the current shake level. Randomness lives
    /// here, outside the deterministic simulation state.
    pub fn shake_offset<R: Rng>(&self, rng: &mut R) -> Vec2 {
        if self.shake <= 0.0 {
            return Vec2::ZERO;
        }
        let mag = self.shake * self.shake * 10.0;
        Vec2::new(
            (rng.random::<f32>() - 0.5) * mag,
            (rng.random::<f32>() - 0.5) * mag,
        )
    }
}
