use serde::{Deserialize, Serialize};

/// Player kinematics tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration (units/s^2, downward).
    pub gravity: f32,
    /// Terminal fall speed (units/s).
    pub max_fall: f32,
    /// Maximum horizontal speed (units/s).
    pub move_speed: f32,
    /// Horizontal acceleration while grounded.
    pub ground_accel: f32,
    /// Horizontal acceleration while airborne.
    pub air_accel: f32,
    /// Deceleration toward zero when no direction is held.
    pub friction: f32,
    /// Initial upward jump speed.
    pub jump_vel: f32,
    /// Multiplier applied to upward velocity when jump is released early.
    pub jump_cut: f32,
    /// Grace window after leaving ground during which a jump still fires (s).
    pub coyote_time: f32,
    /// Window during which an early jump press is remembered (s).
    pub jump_buffer: f32,
    /// Player AABB width.
    pub player_w: f32,
    /// Player AABB height.
    pub player_h: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1900.0,
            max_fall: 1200.0,
            move_speed: 330.0,
            ground_accel: 2600.0,
            air_accel: 1500.0,
            friction: 2000.0,
            jump_vel: 720.0,
            jump_cut: 0.52,
            coyote_time: 0.09,
            jump_buffer: 0.12,
            player_w: 34.0,
            player_h: 46.0,
        }
    }
}

/// Run rules and contact-tolerance margins. Tunable values, not
/// load-bearing invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Lives granted at the start of every attempt.
    pub default_lives: u32,
    /// Per-frame delta cap (s). The sole defense against large-step
    /// integration error during stalls; no sub-stepping is performed.
    pub max_frame_dt: f32,
    /// Distance below the level bounds that counts as falling out.
    pub oob_bottom_margin: f32,
    /// Distance past either side of the level bounds that counts as out.
    pub oob_side_margin: f32,
    /// Spike rects shrink by this much before the contact test.
    pub spike_margin: f32,
    /// The player rect shrinks by this much before rotator contact tests.
    pub rotator_margin: f32,
    /// Depth below its home position at which a falling block despawns.
    pub fall_despawn_depth: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_lives: 5,
            max_frame_dt: 1.0 / 20.0,
            oob_bottom_margin: 600.0,
            oob_side_margin: 200.0,
            spike_margin: 4.0,
            rotator_margin: 3.0,
            fall_despawn_depth: 4000.0,
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub physics: PhysicsConfig,
    pub rules: RulesConfig,
}

impl RuntimeConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("OBBY_CONFIG").unwrap_or_else(|_| "config/obby.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<RuntimeConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    RuntimeConfig::default()
                },
            },
            Err(_) => RuntimeConfig::default(),
        }
    }
}
