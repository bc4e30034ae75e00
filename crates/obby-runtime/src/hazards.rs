use obby_core::geom::{Capsule, Rect, Vec2};

/// A static hazard strip. `teeth` is how many triangles the renderer draws;
/// collision uses only the rect.
#[derive(Debug, Clone)]
pub struct Spike {
    pub rect: Rect,
    pub teeth: u32,
}

impl Spike {
    /// `teeth` defaults to roughly one tooth per 26 units of width.
    pub fn new(rect: Rect, teeth: Option<u32>) -> Self {
        let teeth = teeth.unwrap_or_else(|| ((rect.w / 26.0).floor() as u32).max(1));
        Self { rect, teeth }
    }
}

/// A rotating capsule hazard: a bar of `length` and `thickness` spinning
/// about `center` at `speed` rad/s. The angle accumulates unbounded.
#[derive(Debug, Clone)]
pub struct Rotator {
    pub center: Vec2,
    pub length: f32,
    pub thickness: f32,
    pub speed: f32,
    pub angle: f32,
}

impl Rotator {
    pub fn update(&mut self, dt: f32) {
        self.angle += self.speed * dt;
    }

    /// The current hit volume: the bar's center segment thickened by half
    /// the bar thickness.
    pub fn capsule(&self) -> Capsule {
        let half = self.length / 2.0;
        let (sa, ca) = self.angle.sin_cos();
        Capsule {
            a: Vec2::new(self.center.x - ca * half, self.center.y - sa * half),
            b: Vec2::new(self.center.x + ca * half, self.center.y + sa * half),
            r: self.thickness / 2.0,
        }
    }

    pub fn hits_rect(&self, rect: &Rect) -> bool {
        self.capsule().hits_rect(rect)
    }
}
