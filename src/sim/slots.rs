//! Scoring slot row beneath the board

use serde::{Deserialize, Serialize};

use super::board::row_y;
use crate::Rect;
use crate::settings::Config;

/// A scoring zone bound to a payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub rect: Rect,
    pub multiplier: f64,
}

/// Build one slot per configured multiplier, left to right, just below the
/// lowest peg row for `rows`
pub fn generate_slots(rows: u32, config: &Config) -> Vec<Slot> {
    let rows = config.clamp_rows(rows);
    let count = config.multipliers.len();
    if count == 0 {
        return Vec::new();
    }

    let margin = config.slot_margin;
    let width = ((config.game_width() - (count - 1) as f32 * margin) / count as f32).floor();
    let y = row_y(config, rows.saturating_sub(1)) + config.slot_gap;

    config
        .multipliers
        .iter()
        .enumerate()
        .map(|(i, &multiplier)| Slot {
            rect: Rect::new(
                config.panel_width + i as f32 * (width + margin),
                y,
                width,
                config.slot_height,
            ),
            multiplier,
        })
        .collect()
}
