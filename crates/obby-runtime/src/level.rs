use serde::{Deserialize, Serialize};

use obby_core::geom::{Rect, Vec2};

use crate::hazards::{Rotator, Spike};
use crate::solids::{FallingBlock, Platform};

fn default_checkpoint_w() -> f32 {
    44.0
}

fn default_checkpoint_h() -> f32 {
    80.0
}

fn default_fall_delay() -> f32 {
    0.22
}

/// Authored checkpoint. `x`/`y` anchor the base of the trigger; the trigger
/// rect extends upward from there. The spawn point may be given explicitly
/// or derived (slightly inside and above the trigger base).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDef {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_checkpoint_w")]
    pub w: f32,
    #[serde(default = "default_checkpoint_h")]
    pub h: f32,
    pub spawn_x: Option<f32>,
    pub spawn_y: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatformDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingBlockDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default = "default_fall_delay")]
    pub delay: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpikeDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub teeth: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotatorDef {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub thickness: f32,
    pub speed: f32,
    #[serde(default)]
    pub angle: f32,
}

/// One authored level, as supplied by the content collaborator. Treated as
/// opaque authored data; no validation beyond defensive clamping of the
/// indices that consume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub id: u32,
    pub name: String,
    pub bounds: Rect,
    pub start: Vec2,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub moving: Vec<MovingPlatformDef>,
    #[serde(default)]
    pub falling: Vec<FallingBlockDef>,
    #[serde(default)]
    pub spikes: Vec<SpikeDef>,
    #[serde(default)]
    pub rotators: Vec<RotatorDef>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
    pub goal: Rect,
}

/// A TOML document holding an ordered set of levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPack {
    #[serde(default)]
    pub levels: Vec<LevelDef>,
}

/// Failure to obtain a usable level pack. Fatal at startup by contract;
/// every other input problem in the runtime degrades instead.
#[derive(Debug)]
pub enum PackError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Empty,
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read level pack: {e}"),
            Self::Parse(e) => write!(f, "failed to parse level pack: {e}"),
            Self::Empty => write!(f, "level pack contains no levels"),
        }
    }
}

impl std::error::Error for PackError {}

impl LevelPack {
    pub fn load(path: &str) -> Result<Self, PackError> {
        let raw = std::fs::read_to_string(path).map_err(PackError::Io)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, PackError> {
        let pack: LevelPack = toml::from_str(raw).map_err(PackError::Parse)?;
        if pack.levels.is_empty() {
            return Err(PackError::Empty);
        }
        Ok(pack)
    }
}

/// A progress marker. `reached` latches true for the rest of the attempt;
/// only a level (re)start clears it.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    /// Respawn point granted by this checkpoint — distinct from the trigger
    /// position.
    pub spawn: Vec2,
    pub reached: bool,
}

impl Checkpoint {
    pub fn trigger_rect(&self) -> Rect {
        Rect::new(self.x, self.y - self.h, self.w, self.h)
    }
}

/// Handle into a level's current solid set. Valid for the current tick
/// only; platforms sort before falling blocks, authored order within each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidHandle {
    Platform(usize),
    Falling(usize),
}

/// Aggregated level geometry plus the resettable dynamic state of its
/// falling blocks and checkpoints.
#[derive(Debug, Clone)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub bounds: Rect,
    pub start: Vec2,
    pub goal: Rect,
    platforms: Vec<Platform>,
    falling: Vec<FallingBlock>,
    spikes: Vec<Spike>,
    rotators: Vec<Rotator>,
    checkpoints: Vec<Checkpoint>,
}

impl Level {
    pub fn from_def(def: &LevelDef) -> Self {
        let mut platforms: Vec<Platform> = def
            .platforms
            .iter()
            .map(|p| Platform::fixed(Rect::new(p.x, p.y, p.w, p.h)))
            .collect();
        platforms.extend(def.moving.iter().map(|m| {
            Platform::moving(
                Rect::new(m.x, m.y, m.w, m.h),
                Vec2::new(m.to_x, m.to_y),
                m.speed,
            )
        }));

        Self {
            id: def.id,
            name: def.name.clone(),
            bounds: def.bounds,
            start: def.start,
            goal: def.goal,
            platforms,
            falling: def
                .falling
                .iter()
                .map(|b| FallingBlock::new(Rect::new(b.x, b.y, b.w, b.h), b.delay))
                .collect(),
            spikes: def
                .spikes
                .iter()
                .map(|s| Spike::new(Rect::new(s.x, s.y, s.w, s.h), s.teeth))
                .collect(),
            rotators: def
                .rotators
                .iter()
                .map(|r| Rotator {
                    center: Vec2::new(r.x, r.y),
                    length: r.length,
                    thickness: r.thickness,
                    speed: r.speed,
                    angle: r.angle,
                })
                .collect(),
            checkpoints: def
                .checkpoints
                .iter()
                .map(|c| Checkpoint {
                    x: c.x,
                    y: c.y,
                    w: c.w,
                    h: c.h,
                    spawn: Vec2::new(
                        c.spawn_x.unwrap_or(c.x + 6.0),
                        c.spawn_y.unwrap_or(c.y - 40.0),
                    ),
                    reached: false,
                })
                .collect(),
        }
    }

    /// Restore every per-attempt dynamic: falling blocks idle at home,
    /// checkpoints unreached.
    pub fn reset_dynamics(&mut self) {
        self.reset_falling();
        for checkpoint in &mut self.checkpoints {
            checkpoint.reached = false;
        }
    }

    /// Falling blocks only. Runs on every player death so a death never
    /// leaves the level in a used-up state for the next attempt.
    pub fn reset_falling(&mut self) {
        for block in &mut self.falling {
            block.reset();
        }
    }

    /// Snapshot previous positions of all movable entities, so this tick's
    /// deltas are measured from here.
    pub fn pre_update(&mut self) {
        for platform in &mut self.platforms {
            platform.pre_update();
        }
        for block in &mut self.falling {
            block.pre_update();
        }
    }

    /// Advance platforms, falling blocks, and rotators by `dt`.
    pub fn update(&mut self, dt: f32, gravity: f32, despawn_depth: f32) {
        for platform in &mut self.platforms {
            platform.update(dt);
        }
        for block in &mut self.falling {
            block.update(dt, gravity, despawn_depth);
        }
        for rotator in &mut self.rotators {
            rotator.update(dt);
        }
    }

    /// The current solid set in resolution order: platforms in authored
    /// order, then falling blocks that are still solid. Collision
    /// resolution is order-dependent, so this order is part of the
    /// simulation contract.
    pub fn solids(&self) -> Vec<SolidHandle> {
        let mut out = Vec::with_capacity(self.platforms.len() + self.falling.len());
        out.extend((0..self.platforms.len()).map(SolidHandle::Platform));
        out.extend(
            self.falling
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_solid())
                .map(|(i, _)| SolidHandle::Falling(i)),
        );
        out
    }

    pub fn solid_rect(&self, handle: SolidHandle) -> Rect {
        match handle {
            SolidHandle::Platform(i) => self.platforms[i].rect,
            SolidHandle::Falling(i) => self.falling[i].rect,
        }
    }

    /// Per-frame motion of a solid, or None once the handle no longer
    /// refers to something solid.
    pub fn solid_delta(&self, handle: SolidHandle) -> Option<Vec2> {
        match handle {
            SolidHandle::Platform(i) => self.platforms.get(i).map(Platform::delta),
            SolidHandle::Falling(i) => self
                .falling
                .get(i)
                .filter(|b| b.is_solid())
                .map(FallingBlock::delta),
        }
    }

    /// Landing notification from the collision resolver. Arms falling
    /// blocks; a no-op for everything else.
    pub fn notify_stood_on(&mut self, handle: SolidHandle) {
        if let SolidHandle::Falling(i) = handle
            && let Some(block) = self.falling.get_mut(i)
        {
            block.arm();
        }
    }

    /// Latch a checkpoint as reached; returns its spawn point.
    pub fn mark_checkpoint_reached(&mut self, index: usize) -> Option<Vec2> {
        let checkpoint = self.checkpoints.get_mut(index)?;
        checkpoint.reached = true;
        Some(checkpoint.spawn)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn falling(&self) -> &[FallingBlock] {
        &self.falling
    }

    pub fn spikes(&self) -> &[Spike] {
        &self.spikes
    }

    pub fn rotators(&self) -> &[Rotator] {
        &self.rotators
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solids::FallState;

    fn small_def() -> LevelDef {
        LevelDef {
            id: 1,
            name: "Test".to_string(),
            bounds: Rect::new(0.0, 0.0, 1000.0, 800.0),
            start: Vec2::new(80.0, 600.0),
            platforms: vec![PlatformDef {
                x: 0.0,
                y: 700.0,
                w: 900.0,
                h: 100.0,
            }],
            moving: vec![MovingPlatformDef {
                x: 400.0,
                y: 500.0,
                w: 100.0,
                h: 16.0,
                to_x: 600.0,
                to_y: 500.0,
                speed: 100.0,
            }],
            falling: vec![FallingBlockDef {
                x: 700.0,
                y: 520.0,
                w: 90.0,
                h: 16.0,
                delay: 0.2,
            }],
            spikes: vec![SpikeDef {
                x: 300.0,
                y: 674.0,
                w: 80.0,
                h: 26.0,
                teeth: None,
            }],
            rotators: vec![RotatorDef {
                x: 500.0,
                y: 300.0,
                length: 160.0,
                thickness: 16.0,
                speed: 2.2,
                angle: 0.0,
            }],
            checkpoints: vec![CheckpointDef {
                x: 500.0,
                y: 700.0,
                w: default_checkpoint_w(),
                h: default_checkpoint_h(),
                spawn_x: None,
                spawn_y: None,
            }],
            goal: Rect::new(900.0, 560.0, 90.0, 140.0),
        }
    }

    #[test]
    fn solids_order_platforms_before_falling() {
        let level = Level::from_def(&small_def());
        let solids = level.solids();
        assert_eq!(
            solids,
            vec![
                SolidHandle::Platform(0),
                SolidHandle::Platform(1),
                SolidHandle::Falling(0),
            ]
        );
    }

    #[test]
    fn gone_blocks_leave_the_solid_set() {
        let mut level = Level::from_def(&small_def());
        level.notify_stood_on(SolidHandle::Falling(0));
        for _ in 0..600 {
            level.pre_update();
            level.update(0.05, 1900.0, 4000.0);
        }
        assert_eq!(level.falling()[0].state(), FallState::Gone);
        assert_eq!(
            level.solids(),
            vec![SolidHandle::Platform(0), SolidHandle::Platform(1)]
        );
        assert_eq!(level.solid_delta(SolidHandle::Falling(0)), None);
    }

    #[test]
    fn reset_dynamics_restores_blocks_and_checkpoints() {
        let mut level = Level::from_def(&small_def());
        level.notify_stood_on(SolidHandle::Falling(0));
        level.mark_checkpoint_reached(0);
        for _ in 0..20 {
            level.pre_update();
            level.update(0.05, 1900.0, 4000.0);
        }

        level.reset_dynamics();
        assert_eq!(level.falling()[0].state(), FallState::Idle);
        assert!(!level.checkpoints()[0].reached);
    }

    #[test]
    fn death_reset_leaves_checkpoints_alone() {
        let mut level = Level::from_def(&small_def());
        level.mark_checkpoint_reached(0);
        level.notify_stood_on(SolidHandle::Falling(0));

        level.reset_falling();
        assert_eq!(level.falling()[0].state(), FallState::Idle);
        assert!(
            level.checkpoints()[0].reached,
            "death must not clear checkpoint progress"
        );
    }

    #[test]
    fn derived_checkpoint_spawn_sits_above_trigger_base() {
        let level = Level::from_def(&small_def());
        assert_eq!(level.checkpoints()[0].spawn, Vec2::new(506.0, 660.0));
    }

    #[test]
    fn checkpoint_trigger_extends_upward_from_base() {
        let level = Level::from_def(&small_def());
        assert_eq!(
            level.checkpoints()[0].trigger_rect(),
            Rect::new(500.0, 620.0, 44.0, 80.0)
        );
    }

    #[test]
    fn stale_platform_handle_is_still_reported() {
        let level = Level::from_def(&small_def());
        assert_eq!(level.solid_delta(SolidHandle::Platform(0)), Some(Vec2::ZERO));
        assert_eq!(level.solid_delta(SolidHandle::Platform(99)), None);
    }

    #[test]
    fn pack_parse_applies_authoring_defaults() {
        let pack = LevelPack::parse(
            r#"
            [[levels]]
            id = 1
            name = "Warmup"
            bounds = { x = 0.0, y = 0.0, w = 2600.0, h = 900.0 }
            start = { x = 80.0, y = 690.0 }
            goal = { x = 2480.0, y = 620.0, w = 90.0, h = 140.0 }

            [[levels.platforms]]
            x = 0.0
            y = 760.0
            w = 900.0
            h = 140.0

            [[levels.falling]]
            x = 2100.0
            y = 620.0
            w = 90.0
            h = 16.0

            [[levels.checkpoints]]
            x = 840.0
            y = 760.0
            "#,
        )
        .expect("pack must parse");

        let def = &pack.levels[0];
        assert_eq!(def.falling[0].delay, 0.22);
        assert_eq!(def.checkpoints[0].w, 44.0);
        assert_eq!(def.checkpoints[0].h, 80.0);
        assert_eq!(def.checkpoints[0].spawn_x, None);
        assert!(def.moving.is_empty());
    }

    #[test]
    fn empty_pack_is_an_error() {
        match LevelPack::parse("levels = []") {
            Err(PackError::Empty) => {},
            other => panic!("expected PackError::Empty, got {other:?}"),
        }
    }

    #[test]
    fn malformed_pack_is_a_parse_error() {
        assert!(matches!(
            LevelPack::parse("this is not toml at all ["),
            Err(PackError::Parse(_))
        ));
    }
}
