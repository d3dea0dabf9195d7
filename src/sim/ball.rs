//! Ball entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// A falling ball carrying its share of the round's stake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Stake share, kept fractional until payout
    pub wager: f64,
    /// Set once the ball has paid out; never cleared
    pub settled: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, wager: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            wager,
            settled: false,
        }
    }

    /// Axis-aligned bounding box used for slot entry
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Pay out against `multiplier` and retire the ball.
    ///
    /// Returns None if the ball already settled.
    pub fn settle(&mut self, multiplier: f64) -> Option<u64> {
        if self.settled {
            return None;
        }
        self.settled = true;
        Some(payout(self.wager, multiplier))
    }
}

/// Credit for one ball, rounded to whole currency
#[inline]
pub fn payout(wager: f64, multiplier: f64) -> u64 {
    (wager * multiplier).round().max(0.0) as u64
}
