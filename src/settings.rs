//! Engine configuration
//!
//! Every tunable the simulation reads. Loaded from JSON; missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Playfield ===
    /// Total width including the control panel
    pub width: f32,
    pub height: f32,
    /// Width of the panel strip on the left; balls never enter it
    pub panel_width: f32,

    // === Physics (per tick) ===
    pub gravity: f32,
    pub damping: f32,
    pub ball_radius: f32,
    pub peg_radius: f32,

    // === Board ===
    pub min_rows: u32,
    pub max_rows: u32,
    pub default_rows: u32,

    // === Slots ===
    pub slot_height: f32,
    pub slot_gap: f32,
    pub slot_margin: f32,
    /// Payout per slot, left to right
    pub multipliers: Vec<f64>,

    // === Round ===
    pub min_balls: u32,
    pub max_balls: u32,
    pub default_balls: u32,
    pub starting_bankroll: u64,
    pub default_stake: u64,
    pub spawn_interval_ms: u64,
    pub spawn_height_ratio: f32,
    pub spawn_jitter: i32,
    pub spawn_max_vx: f32,

    // === Loop ===
    pub tick_hz: u32,
    /// Seed for spawn jitter and initial horizontal speed
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            panel_width: PANEL_WIDTH,

            gravity: GRAVITY,
            damping: DAMPING,
            ball_radius: BALL_RADIUS,
            peg_radius: PEG_RADIUS,

            min_rows: MIN_ROWS,
            max_rows: MAX_ROWS,
            default_rows: DEFAULT_ROWS,

            slot_height: SLOT_HEIGHT,
            slot_gap: SLOT_GAP,
            slot_margin: SLOT_MARGIN,
            multipliers: SLOT_MULTIPLIERS.to_vec(),

            min_balls: MIN_BALLS,
            max_balls: MAX_BALLS,
            default_balls: DEFAULT_BALLS,
            starting_bankroll: START_BANKROLL,
            default_stake: DEFAULT_STAKE,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_height_ratio: SPAWN_HEIGHT_RATIO,
            spawn_jitter: SPAWN_JITTER,
            spawn_max_vx: SPAWN_MAX_VX,

            tick_hz: TICK_HZ,
            seed: 0x5EED,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        let finite = [
            ("width", self.width),
            ("height", self.height),
            ("panel_width", self.panel_width),
            ("gravity", self.gravity),
            ("ball_radius", self.ball_radius),
            ("peg_radius", self.peg_radius),
            ("slot_height", self.slot_height),
            ("slot_gap", self.slot_gap),
            ("slot_margin", self.slot_margin),
            ("spawn_height_ratio", self.spawn_height_ratio),
            ("spawn_max_vx", self.spawn_max_vx),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be finite (got {value})"));
        }

        if self.width <= self.panel_width || self.height <= 0.0 || self.panel_width < 0.0 {
            return invalid(format!(
                "playfield {}x{} with panel {} leaves no room to play",
                self.width, self.height, self.panel_width
            ));
        }
        if self.ball_radius <= 0.0 || self.peg_radius <= 0.0 {
            return invalid("ball and peg radius must be positive".into());
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid(format!("damping {} outside (0, 1]", self.damping));
        }
        if self.min_rows == 0 || self.min_rows > self.max_rows {
            return invalid(format!("row bounds {}..={}", self.min_rows, self.max_rows));
        }
        if self.min_balls == 0 || self.min_balls > self.max_balls {
            return invalid(format!("ball bounds {}..={}", self.min_balls, self.max_balls));
        }
        if self.tick_hz == 0 {
            return invalid("tick_hz must be positive".into());
        }
        if self.slot_height <= 0.0 || self.slot_margin < 0.0 {
            return invalid("slot height must be positive and margin non-negative".into());
        }
        if !(0.0..=1.0).contains(&self.spawn_height_ratio) {
            return invalid(format!(
                "spawn_height_ratio {} outside [0, 1]",
                self.spawn_height_ratio
            ));
        }
        if self.spawn_jitter < 0 || self.spawn_jitter as f32 > self.game_width() / 2.0 {
            return invalid(format!(
                "spawn_jitter {} outside [0, {}]",
                self.spawn_jitter,
                self.game_width() / 2.0
            ));
        }
        if self.spawn_max_vx < 0.0 {
            return invalid(format!("spawn_max_vx {} is negative", self.spawn_max_vx));
        }
        if self.multipliers.is_empty() {
            return invalid("at least one slot multiplier is required".into());
        }
        if self.multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return invalid("slot multipliers must be finite and non-negative".into());
        }
        if !self.multipliers.iter().eq(self.multipliers.iter().rev()) {
            return invalid(format!("multipliers {:?} are not mirrored", self.multipliers));
        }
        Ok(())
    }

    /// Width of the area balls move in
    #[inline]
    pub fn game_width(&self) -> f32 {
        self.width - self.panel_width
    }

    /// Horizontal centre of the playfield (whole pixels)
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.panel_width + (self.game_width() / 2.0).floor()
    }

    pub fn clamp_rows(&self, rows: u32) -> u32 {
        rows.max(self.min_rows).min(self.max_rows)
    }

    pub fn clamp_balls(&self, balls: u32) -> u32 {
        balls.max(self.min_balls).min(self.max_balls)
    }

    /// Interval between ticks of the driving loop (ms)
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_hz as f64
    }
}
