pub mod camera;
pub mod config;
pub mod hazards;
pub mod level;
pub mod player;
pub mod solids;

use std::fmt;

use obby_core::geom::{Vec2, rects_overlap};
use obby_core::input::{Action, InputState};
use obby_core::progress::Progress;
use obby_core::time::Stopwatch;

use camera::Camera;
use config::RuntimeConfig;
use level::{Level, LevelDef};
use player::Player;

/// Top-level run phases. `Playing` is the only phase that consumes
/// gameplay ticks; both terminal outcomes are re-enterable through
/// `retry`/`next_level`/`to_level_select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    LevelSelect,
    Playing,
    Complete,
    GameOver,
}

/// Why the player died. The display strings are advisory in-run feedback,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathReason {
    OutOfBounds,
    Spikes,
    Rotator,
    Manual,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutOfBounds => "Fell!",
            Self::Spikes => "Ouch! Spikes.",
            Self::Rotator => "Smacked!",
            Self::Manual => "Respawned.",
        };
        f.write_str(text)
    }
}

/// Events emitted by a gameplay tick, consumed by the rendering and
/// persistence collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    CheckpointReached {
        index: usize,
    },
    Died {
        reason: DeathReason,
        lives_left: u32,
    },
    GameOver,
    LevelComplete {
        level_id: u32,
        time: f32,
        new_best: bool,
    },
    LevelUnlocked {
        unlocked: usize,
    },
}

/// The run controller: owns the level set, the player, and all
/// lives/checkpoint/respawn/timing/progression state, and is the sole
/// mutator of it. One `tick` per rendered frame.
pub struct Run {
    config: RuntimeConfig,
    levels: Vec<Level>,
    phase: Phase,
    active: usize,
    player: Player,
    camera: Camera,
    view: Vec2,
    lives: u32,
    checkpoint: Option<usize>,
    respawn: Vec2,
    clock: Stopwatch,
    progress: Progress,
}

impl Run {
    /// Build a run from authored level definitions and previously persisted
    /// progress (pass `Progress::default()` when none exists).
    pub fn new(config: RuntimeConfig, defs: &[LevelDef], progress: Progress) -> Self {
        let player = Player::new(&config.physics);
        let lives = config.rules.default_lives;
        Self {
            levels: defs.iter().map(Level::from_def).collect(),
            phase: Phase::Menu,
            active: 0,
            player,
            camera: Camera::default(),
            view: Vec2::new(800.0, 600.0),
            lives,
            checkpoint: None,
            respawn: Vec2::ZERO,
            clock: Stopwatch::default(),
            progress,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Highest checkpoint reached this attempt, None before the first.
    pub fn checkpoint_index(&self) -> Option<usize> {
        self.checkpoint
    }

    pub fn respawn_point(&self) -> Vec2 {
        self.respawn
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.active]
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Whether the 0-based level `index` is currently playable.
    pub fn is_unlocked(&self, index: usize) -> bool {
        index + 1 <= self.progress.unlocked()
    }

    /// Viewport used for camera framing.
    pub fn set_view(&mut self, w: f32, h: f32) {
        self.view = Vec2::new(w, h);
    }

    /// Start an attempt at level `index` (clamped into range): level
    /// dynamics reset, lives refilled, checkpoint progress cleared, player
    /// spawned at the level start, clock restarted.
    pub fn start_level(&mut self, index: usize) {
        if self.levels.is_empty() {
            return;
        }
        self.active = index.min(self.levels.len() - 1);
        let level = &mut self.levels[self.active];
        level.reset_dynamics();
        self.lives = self.config.rules.default_lives;
        self.checkpoint = None;
        self.respawn = level.start;
        self.player.spawn_at(self.respawn);
        self.clock.restart();
        self.phase = Phase::Playing;
        tracing::info!(level = %level.name, "level started");
    }

    /// Restart the active level from scratch.
    pub fn retry(&mut self) {
        self.start_level(self.active);
    }

    /// Advance to the next level when it exists and is unlocked; otherwise
    /// fall back to level select.
    pub fn next_level(&mut self) {
        let next = self.active + 1;
        if next < self.levels.len() && self.is_unlocked(next) {
            self.start_level(next);
        } else {
            self.to_level_select();
        }
    }

    pub fn to_menu(&mut self) {
        self.clock.stop();
        self.phase = Phase::Menu;
    }

    pub fn to_level_select(&mut self) {
        self.clock.stop();
        self.phase = Phase::LevelSelect;
    }

    /// Wipe best times and relock everything past the first level.
    pub fn reset_progress(&mut self) {
        self.progress.reset();
    }

    /// Advance one frame. `dt` is clamped to the configured per-frame
    /// maximum before any integration. Outside `Playing` this is a no-op.
    ///
    /// The per-tick order: level entities move, the rider carry applies,
    /// then either a manual respawn or the player step followed by the
    /// mutually exclusive checks — out-of-bounds, spikes, rotators,
    /// checkpoint, goal. The first satisfied check ends the tick.
    pub fn tick(&mut self, dt: f32, input: &InputState) -> Vec<RunEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Playing || self.levels.is_empty() {
            return events;
        }
        let dt = dt.clamp(0.0, self.config.rules.max_frame_dt);

        self.clock.tick(dt);

        {
            let level = &mut self.levels[self.active];
            level.pre_update();
            level.update(
                dt,
                self.config.physics.gravity,
                self.config.rules.fall_despawn_depth,
            );

            // Carry the rider by this frame's platform motion, before the
            // player's own kinematics step.
            if let Some(handle) = self.player.standing_on {
                match level.solid_delta(handle) {
                    Some(delta) => {
                        self.player.x += delta.x;
                        self.player.y += delta.y;
                    },
                    None => self.player.standing_on = None,
                }
            }
        }

        if input.was_pressed(Action::Respawn) {
            self.kill_player(DeathReason::Manual, &mut events);
            return events;
        }

        self.player
            .update(dt, input, &mut self.levels[self.active], &self.config.physics);

        let bounds = self.levels[self.active].bounds;
        let oob_bottom = self.config.rules.oob_bottom_margin;
        let oob_side = self.config.rules.oob_side_margin;
        let spike_margin = self.config.rules.spike_margin;
        let rotator_margin = self.config.rules.rotator_margin;
        let pr = self.player.rect();

        // (a) Out of bounds: fell below, or strayed past either side.
        let out_bottom = self.player.y > bounds.y + bounds.h + oob_bottom;
        let out_sides = self.player.x < bounds.x - oob_side
            || self.player.x > bounds.x + bounds.w + oob_side;
        if out_bottom || out_sides {
            self.kill_player(DeathReason::OutOfBounds, &mut events);
            return events;
        }

        // (b) Spikes, tested against a shrunk hazard box.
        if self.levels[self.active]
            .spikes()
            .iter()
            .any(|s| rects_overlap(&pr, &s.rect.expanded(-spike_margin)))
        {
            self.kill_player(DeathReason::Spikes, &mut events);
            return events;
        }

        // (c) Rotators, tested against a shrunk player box.
        let shrunk_player = pr.expanded(-rotator_margin);
        if self.levels[self.active]
            .rotators()
            .iter()
            .any(|r| r.hits_rect(&shrunk_player))
        {
            self.kill_player(DeathReason::Rotator, &mut events);
            return events;
        }

        // (d) First unreached checkpoint, else (e) goal.
        let checkpoint_hit = self.levels[self.active]
            .checkpoints()
            .iter()
            .position(|c| !c.reached && rects_overlap(&pr, &c.trigger_rect()));
        if let Some(index) = checkpoint_hit {
            if let Some(spawn) = self.levels[self.active].mark_checkpoint_reached(index) {
                self.checkpoint = Some(index);
                self.respawn = spawn;
                self.camera.add_shake(0.28);
                events.push(RunEvent::CheckpointReached { index });
            }
        } else if rects_overlap(&pr, &self.levels[self.active].goal) {
            self.complete_level(&mut events);
            return events;
        }

        let target = self.player.rect();
        self.camera.update(dt, &target, &bounds, self.view);
        events
    }

    fn kill_player(&mut self, reason: DeathReason, events: &mut Vec<RunEvent>) {
        self.lives = self.lives.saturating_sub(1);
        self.camera.add_shake(0.45);

        if self.lives == 0 {
            self.clock.stop();
            self.phase = Phase::GameOver;
            let level = &self.levels[self.active];
            tracing::info!(level = %level.name, "out of lives");
            events.push(RunEvent::GameOver);
            return;
        }

        // Fairness: the next attempt never inherits an armed or falling
        // block.
        self.levels[self.active].reset_falling();
        self.player.spawn_at(self.respawn);
        events.push(RunEvent::Died {
            reason,
            lives_left: self.lives,
        });
    }

    fn complete_level(&mut self, events: &mut Vec<RunEvent>) {
        self.clock.stop();
        self.phase = Phase::Complete;

        let time = self.clock.elapsed();
        let level_id = self.levels[self.active].id;
        let new_best = self.progress.record_time(&level_id.to_string(), time);
        events.push(RunEvent::LevelComplete {
            level_id,
            time,
            new_best,
        });

        let target = (self.active + 2).min(self.levels.len());
        if self.progress.unlock_through(target) {
            events.push(RunEvent::LevelUnlocked { unlocked: target });
        }
        let level = &self.levels[self.active];
        tracing::info!(level = %level.name, time, new_best, "level complete");
    }
}
