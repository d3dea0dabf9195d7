//! Plinko - falling-ball physics and payout engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, slots, balls, collisions, rounds)
//! - `settings`: Data-driven tunables loaded from JSON
//! - `error`: Recoverable failures surfaced at the command boundary

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RoundError};
pub use settings::Config;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default tuning constants (tick-rate relative, not time relative)
pub mod consts {
    /// Playfield dimensions, including the control panel on the left
    pub const WIDTH: f32 = 1400.0;
    pub const HEIGHT: f32 = 900.0;
    pub const PANEL_WIDTH: f32 = 300.0;

    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.02;
    /// Velocity scale applied on every bounce
    pub const DAMPING: f32 = 0.8;

    pub const BALL_RADIUS: f32 = 8.0;
    pub const PEG_RADIUS: f32 = 7.0;

    /// Gap between peg edges (added to the peg diameter)
    pub const PEG_ROW_GAP: f32 = 30.0;
    pub const PEG_COL_GAP: f32 = 45.0;
    /// First peg row as a fraction of field height
    pub const BOARD_TOP_RATIO: f32 = 0.2;

    pub const SLOT_HEIGHT: f32 = 40.0;
    /// Distance from the last peg row to the top of the slot row
    pub const SLOT_GAP: f32 = 30.0;
    pub const SLOT_MARGIN: f32 = 2.0;
    pub const SLOT_MULTIPLIERS: [f64; 11] = [0.2, 0.3, 0.4, 0.7, 2.0, 5.0, 2.0, 0.7, 0.4, 0.3, 0.2];

    pub const MIN_BALLS: u32 = 1;
    pub const MAX_BALLS: u32 = 50;
    pub const MIN_ROWS: u32 = 1;
    pub const MAX_ROWS: u32 = 15;

    pub const START_BANKROLL: u64 = 50_000;
    pub const DEFAULT_STAKE: u64 = 1_000;
    pub const DEFAULT_BALLS: u32 = 10;
    pub const DEFAULT_ROWS: u32 = 15;

    /// Delay between consecutive ball drops (ms)
    pub const SPAWN_INTERVAL_MS: u64 = 500;
    /// Drop height as a fraction of field height
    pub const SPAWN_HEIGHT_RATIO: f32 = 0.14;
    /// Integer horizontal jitter around the drop point (± pixels)
    pub const SPAWN_JITTER: i32 = 2;
    /// Maximum magnitude of the initial horizontal speed
    pub const SPAWN_MAX_VX: f32 = 1.0;

    /// Fixed simulation rate of the driving loop
    pub const TICK_HZ: u32 = 144;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Unit vector from `from` toward `to`, or None when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}
