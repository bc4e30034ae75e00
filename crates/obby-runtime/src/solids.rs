use obby_core::geom::{Rect, Vec2, lerp};

/// Motion behavior of a platform. A closed set dispatched by match; no
/// runtime feature detection.
#[derive(Debug, Clone)]
pub enum Motion {
    Fixed,
    /// Ping-pong interpolation between two endpoints. `t` is the normalized
    /// phase; `dir` flips exactly at `t = 0` and `t = 1`.
    Path {
        from: Vec2,
        to: Vec2,
        speed: f32,
        t: f32,
        dir: f32,
    },
}

/// A solid the player can stand on. Every platform exposes a per-frame
/// positional delta (zero for fixed ones) used to carry its rider.
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    prev: Vec2,
    motion: Motion,
}

impl Platform {
    pub fn fixed(rect: Rect) -> Self {
        Self {
            prev: Vec2::new(rect.x, rect.y),
            rect,
            motion: Motion::Fixed,
        }
    }

    /// A platform oscillating between its initial position and `to` at
    /// `speed` units/s along the path.
    pub fn moving(rect: Rect, to: Vec2, speed: f32) -> Self {
        Self {
            prev: Vec2::new(rect.x, rect.y),
            motion: Motion::Path {
                from: Vec2::new(rect.x, rect.y),
                to,
                speed,
                t: 0.0,
                dir: 1.0,
            },
            rect,
        }
    }

    /// Snapshot the current position so `delta` reports this frame's motion.
    pub fn pre_update(&mut self) {
        self.prev = Vec2::new(self.rect.x, self.rect.y);
    }

    pub fn update(&mut self, dt: f32) {
        if let Motion::Path {
            from,
            to,
            speed,
            t,
            dir,
        } = &mut self.motion
        {
            let dx = to.x - from.x;
            let dy = to.y - from.y;
            let dist = dx.hypot(dy);
            let dist = if dist > 0.0 { dist } else { 1.0 };
            *t += *speed / dist * dt * *dir;
            if *t >= 1.0 {
                *t = 1.0;
                *dir = -1.0;
            } else if *t <= 0.0 {
                *t = 0.0;
                *dir = 1.0;
            }
            self.rect.x = lerp(from.x, to.x, *t);
            self.rect.y = lerp(from.y, to.y, *t);
        }
    }

    /// Position change since `pre_update`.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.rect.x - self.prev.x, self.rect.y - self.prev.y)
    }

    /// Normalized path phase; 0 for fixed platforms.
    pub fn phase(&self) -> f32 {
        match &self.motion {
            Motion::Fixed => 0.0,
            Motion::Path { t, .. } => *t,
        }
    }
}

/// Collapse lifecycle of a timed falling block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallState {
    Idle,
    Armed,
    Falling,
    Gone,
}

/// A block that holds briefly after being stood on, then free-falls out of
/// the level and stops being solid.
#[derive(Debug, Clone)]
pub struct FallingBlock {
    pub rect: Rect,
    home: Vec2,
    delay: f32,
    state: FallState,
    timer: f32,
    vy: f32,
    prev: Vec2,
}

impl FallingBlock {
    pub fn new(rect: Rect, delay: f32) -> Self {
        Self {
            prev: Vec2::new(rect.x, rect.y),
            home: Vec2::new(rect.x, rect.y),
            rect,
            delay,
            state: FallState::Idle,
            timer: 0.0,
            vy: 0.0,
        }
    }

    /// Restore the idle state at the home position. Runs at level start and
    /// on every player death so no attempt begins with a used-up block.
    pub fn reset(&mut self) {
        self.rect.x = self.home.x;
        self.rect.y = self.home.y;
        self.prev = self.home;
        self.state = FallState::Idle;
        self.timer = 0.0;
        self.vy = 0.0;
    }

    /// Begin the collapse countdown. Only an idle block arms.
    pub fn arm(&mut self) {
        if self.state == FallState::Idle {
            self.state = FallState::Armed;
            self.timer = self.delay;
        }
    }

    pub fn pre_update(&mut self) {
        self.prev = Vec2::new(self.rect.x, self.rect.y);
    }

    pub fn update(&mut self, dt: f32, gravity: f32, despawn_depth: f32) {
        if self.state == FallState::Armed {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.state = FallState::Falling;
                self.vy = 0.0;
            }
        }
        if self.state == FallState::Falling {
            self.vy += gravity * dt;
            self.rect.y += self.vy * dt;
            if self.rect.y > self.home.y + despawn_depth {
                self.state = FallState::Gone;
            }
        }
    }

    /// Whether the block still belongs in the level's solid set.
    pub fn is_solid(&self) -> bool {
        self.state != FallState::Gone
    }

    pub fn state(&self) -> FallState {
        self.state
    }

    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.rect.x - self.prev.x, self.rect.y - self.prev.y)
    }
}
