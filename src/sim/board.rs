//! Peg board generation
//!
//! Row `i` holds `i + 3` pegs centred on the playfield. Odd rows shift right
//! by half a column so balls zig-zag down the triangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_TOP_RATIO, PEG_COL_GAP, PEG_ROW_GAP};
use crate::settings::Config;

/// A static circular peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

/// Distance between consecutive peg rows (centre to centre)
#[inline]
pub fn row_spacing(peg_radius: f32) -> f32 {
    peg_radius * 2.0 + PEG_ROW_GAP
}

/// Distance between neighbouring pegs in a row
#[inline]
pub fn col_spacing(peg_radius: f32) -> f32 {
    peg_radius * 2.0 + PEG_COL_GAP
}

/// Y coordinate of the first peg row
#[inline]
pub fn board_top(config: &Config) -> f32 {
    config.height * BOARD_TOP_RATIO
}

/// Y coordinate of row `row` (0-based)
#[inline]
pub fn row_y(config: &Config, row: u32) -> f32 {
    board_top(config) + row as f32 * row_spacing(config.peg_radius)
}

/// Build the peg lattice for `rows` rows (clamped to the configured bounds)
pub fn generate_board(rows: u32, config: &Config) -> Vec<Obstacle> {
    let rows = config.clamp_rows(rows);
    let radius = config.peg_radius;
    let h_spacing = col_spacing(radius);
    let center_x = config.center_x();

    let mut obstacles = Vec::with_capacity((0..rows).map(|r| r as usize + 3).sum());
    for row in 0..rows {
        let cols = row + 3;
        let mut start_x = center_x - (cols / 2) as f32 * h_spacing;
        if row % 2 == 1 {
            start_x += h_spacing / 2.0;
        }
        let y = row_y(config, row);

        for col in 0..cols {
            obstacles.push(Obstacle {
                center: Vec2::new(start_x + col as f32 * h_spacing, y),
                radius,
            });
        }
    }

    obstacles
}
