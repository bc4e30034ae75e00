use obby_core::geom::{Rect, Vec2, rects_overlap};
use obby_core::input::{Action, InputState};

use crate::config::PhysicsConfig;
use crate::level::{Level, SolidHandle};

/// Snap gap left between the player and a resolved solid.
const SKIN: f32 = 0.0001;

/// The kinematic player actor. There is no named state machine; behavior
/// is carried by the grounded flag and the coyote/jump-buffer timers.
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
    coyote: f32,
    jump_buf: f32,
    /// The solid currently under the player. A non-owning handle, valid for
    /// the current tick; the run controller reads the rider's delta through
    /// it. Cleared on jump and recomputed by every vertical resolution pass.
    pub standing_on: Option<SolidHandle>,
    /// Facing sign: +1 right, -1 left. A render hint only.
    pub facing: i8,
}

impl Player {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: cfg.player_w,
            h: cfg.player_h,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            coyote: 0.0,
            jump_buf: 0.0,
            standing_on: None,
            facing: 1,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Reposition with all transient state cleared. Used for every spawn
    /// and respawn.
    pub fn spawn_at(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = false;
        self.coyote = 0.0;
        self.jump_buf = 0.0;
        self.standing_on = None;
    }

    /// Advance one tick: horizontal acceleration/friction, jump buffering
    /// and coyote time, jump cut, gravity, then axis-separated collision
    /// against the level's current solid set.
    pub fn update(&mut self, dt: f32, input: &InputState, level: &mut Level, cfg: &PhysicsConfig) {
        let want_left = input.is_down(Action::Left);
        let want_right = input.is_down(Action::Right);
        if want_left {
            self.facing = -1;
        }
        if want_right {
            self.facing = 1;
        }

        let accel = if self.grounded {
            cfg.ground_accel
        } else {
            cfg.air_accel
        };
        if want_left && !want_right {
            self.vx -= accel * dt;
        }
        if want_right && !want_left {
            self.vx += accel * dt;
        }
        if !want_left && !want_right {
            // Friction decays toward zero without crossing it.
            self.vx = self.vx.signum() * (self.vx.abs() - cfg.friction * dt).max(0.0);
        }
        self.vx = self.vx.clamp(-cfg.move_speed, cfg.move_speed);

        if input.was_pressed(Action::Jump) {
            self.jump_buf = cfg.jump_buffer;
        } else {
            self.jump_buf = (self.jump_buf - dt).max(0.0);
        }

        self.coyote = if self.grounded {
            cfg.coyote_time
        } else {
            (self.coyote - dt).max(0.0)
        };

        // A buffered press fires as soon as coyote time still allows it,
        // consuming both windows.
        if self.jump_buf > 0.0 && self.coyote > 0.0 {
            self.jump_buf = 0.0;
            self.coyote = 0.0;
            self.vy = -cfg.jump_vel;
            self.grounded = false;
            self.standing_on = None;
        }

        // Early release shortens the arc. Only an upward arc is cut.
        if input.was_released(Action::Jump) && self.vy < 0.0 {
            self.vy *= cfg.jump_cut;
        }

        self.vy = (self.vy + cfg.gravity * dt).min(cfg.max_fall);

        self.move_and_collide(dt, level);
    }

    /// Axis-separated discrete resolution: apply horizontal displacement
    /// and settle every overlap, then the same vertically. Ties between
    /// overlapping solids break by iteration order. There is no sweep, so
    /// speed large relative to solid thickness and frame time can tunnel.
    fn move_and_collide(&mut self, dt: f32, level: &mut Level) {
        let solids = level.solids();

        self.x += self.vx * dt;
        for &solid in &solids {
            let r = level.solid_rect(solid);
            if !rects_overlap(&self.rect(), &r) {
                continue;
            }
            if self.vx > 0.0 {
                self.x = r.x - self.w - SKIN;
            } else if self.vx < 0.0 {
                self.x = r.x + r.w + SKIN;
            }
            self.vx = 0.0;
        }

        self.y += self.vy * dt;
        self.grounded = false;
        self.standing_on = None;
        for &solid in &solids {
            let r = level.solid_rect(solid);
            if !rects_overlap(&self.rect(), &r) {
                continue;
            }
            if self.vy > 0.0 {
                // Landed on top.
                self.y = r.y - self.h - SKIN;
                self.vy = 0.0;
                self.grounded = true;
                self.standing_on = Some(solid);
                level.notify_stood_on(solid);
            } else if self.vy < 0.0 {
                // Bumped a ceiling.
                self.y = r.y + r.h + SKIN;
                self.vy = 0.0;
            }
        }
    }
}
