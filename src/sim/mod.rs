//! Deterministic simulation module
//!
//! All round logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (constants are per tick)
//! - Seeded RNG only
//! - Stable iteration order (balls by drop order, pegs and slots by generation order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod board;
pub mod collision;
pub mod slots;
pub mod state;
pub mod tick;

pub use ball::{Ball, payout};
pub use board::{Obstacle, generate_board};
pub use collision::{Contact, Walls, ball_obstacle_contact, reflect_velocity};
pub use slots::{Slot, generate_slots};
pub use state::{BetAction, FrameSnapshot, RoundEvent, RoundPhase, RoundState, RoundSummary};
pub use tick::{Settlement, step_ball, step_balls, tick};
