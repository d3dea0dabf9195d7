//! Round state and commands
//!
//! Everything the simulation mutates lives in [`RoundState`]. The board and
//! slot row are immutable snapshots that are only replaced while idle or on
//! reset.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::board::{Obstacle, generate_board};
use super::slots::{Slot, generate_slots};
use crate::error::RoundError;
use crate::settings::Config;

/// Round controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round in progress
    #[default]
    Idle,
    /// Balls are waiting to drop or still falling
    Running,
}

/// Quick stake adjustments offered next to the stake input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetAction {
    /// Stake the whole bankroll
    AllIn,
    /// Halve the stake, never below 1
    Half,
    /// Double the stake if the bankroll covers it
    Double,
}

/// Totals for a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub stake: u64,
    pub balls: u32,
    pub payout: u64,
}

impl RoundSummary {
    /// Payout minus stake
    pub fn net(&self) -> i64 {
        let net = i128::from(self.payout) - i128::from(self.stake);
        net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    BallSpawned {
        id: u32,
    },
    BallSettled {
        id: u32,
        slot: usize,
        multiplier: f64,
        payout: u64,
    },
    RoundFinished(RoundSummary),
}

/// Read-only view for drawing a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub obstacles: Vec<Obstacle>,
    pub slots: Vec<Slot>,
    pub balls: Vec<Ball>,
    pub bankroll: u64,
    pub stake: u64,
    pub ball_count: u32,
    pub row_count: u32,
    pub round_active: bool,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct RoundState {
    pub(super) config: Config,
    pub(super) rng: Pcg32,
    pub(super) phase: RoundPhase,
    pub(super) bankroll: u64,
    pub(super) current_stake: u64,
    pub(super) ball_count: u32,
    pub(super) row_count: u32,
    pub(super) obstacles: Vec<Obstacle>,
    pub(super) slots: Vec<Slot>,
    /// Balls waiting to drop, in drop order
    pub(super) pending: VecDeque<Ball>,
    /// Balls in flight
    pub(super) active: Vec<Ball>,
    /// Earliest time the next pending ball may drop (None = on the next tick)
    pub(super) next_spawn_ms: Option<u64>,
    /// Stake and payout of the round in progress
    pub(super) round: RoundSummary,
    pub(super) last_round: Option<RoundSummary>,
    next_id: u32,
}

impl RoundState {
    /// Create an idle state with the configured defaults
    pub fn new(config: Config) -> Self {
        let row_count = config.clamp_rows(config.default_rows);
        let ball_count = config.clamp_balls(config.default_balls);
        let obstacles = generate_board(row_count, &config);
        let slots = generate_slots(row_count, &config);

        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            phase: RoundPhase::Idle,
            bankroll: config.starting_bankroll,
            current_stake: config.default_stake,
            ball_count,
            row_count,
            obstacles,
            slots,
            pending: VecDeque::new(),
            active: Vec::new(),
            next_spawn_ms: None,
            round: RoundSummary {
                stake: 0,
                balls: 0,
                payout: 0,
            },
            last_round: None,
            next_id: 1,
            config,
        }
    }

    // === Queries ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_round_active(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn bankroll(&self) -> u64 {
        self.bankroll
    }

    pub fn current_stake(&self) -> u64 {
        self.current_stake
    }

    pub fn ball_count(&self) -> u32 {
        self.ball_count
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn active_balls(&self) -> &[Ball] {
        &self.active
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn last_round(&self) -> Option<RoundSummary> {
        self.last_round
    }

    /// Copy of everything a renderer needs for one frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            obstacles: self.obstacles.clone(),
            slots: self.slots.clone(),
            balls: self.active.clone(),
            bankroll: self.bankroll,
            stake: self.current_stake,
            ball_count: self.ball_count,
            row_count: self.row_count,
            round_active: self.is_round_active(),
        }
    }

    // === Commands ===

    /// Set the stake for the next round. Checked against the bankroll at start.
    pub fn set_stake(&mut self, amount: u64) {
        self.current_stake = amount;
    }

    /// Apply a quick stake adjustment; no-op when its precondition fails
    pub fn adjust_stake(&mut self, action: BetAction) {
        match action {
            BetAction::AllIn => {
                if self.bankroll > 0 {
                    self.current_stake = self.bankroll;
                }
            }
            BetAction::Half => {
                if self.current_stake > 1 {
                    self.current_stake = (self.current_stake / 2).max(1);
                }
            }
            BetAction::Double => {
                match self.current_stake.checked_mul(2) {
                    Some(doubled) if doubled <= self.bankroll => self.current_stake = doubled,
                    _ => {}
                }
            }
        }
    }

    /// Set the ball count for the next round, clamped to bounds
    pub fn set_ball_count(&mut self, count: u32) -> u32 {
        self.ball_count = self.config.clamp_balls(count);
        self.ball_count
    }

    pub fn increment_balls(&mut self) -> u32 {
        self.set_ball_count(self.ball_count.saturating_add(1))
    }

    pub fn decrement_balls(&mut self) -> u32 {
        self.set_ball_count(self.ball_count.saturating_sub(1))
    }

    /// Change the row count and rebuild the board and slots.
    ///
    /// Refused while a round is running so geometry never changes under
    /// moving balls.
    pub fn set_row_count(&mut self, rows: u32) -> Result<u32, RoundError> {
        if self.is_round_active() {
            return Err(RoundError::InvalidOperation(
                "cannot change rows while a round is running",
            ));
        }
        let rows = self.config.clamp_rows(rows);
        if rows != self.row_count {
            self.row_count = rows;
            self.rebuild_board();
        }
        Ok(rows)
    }

    pub fn increment_rows(&mut self) -> Result<u32, RoundError> {
        self.set_row_count(self.row_count.saturating_add(1))
    }

    pub fn decrement_rows(&mut self) -> Result<u32, RoundError> {
        self.set_row_count(self.row_count.saturating_sub(1))
    }

    /// Start a round with the current stake and ball count
    pub fn play(&mut self) -> Result<(), RoundError> {
        self.start_round(self.current_stake, self.ball_count)
    }

    /// Debit `stake` and queue `ball_count` balls to drop
    pub fn start_round(&mut self, stake: u64, ball_count: u32) -> Result<(), RoundError> {
        if self.is_round_active() {
            return Err(RoundError::InvalidOperation("a round is already running"));
        }
        if ball_count < self.config.min_balls || ball_count > self.config.max_balls {
            return Err(RoundError::InvalidBallCount {
                requested: ball_count,
                min: self.config.min_balls,
                max: self.config.max_balls,
            });
        }
        if stake > self.bankroll {
            return Err(RoundError::InsufficientFunds {
                stake,
                bankroll: self.bankroll,
            });
        }

        self.bankroll -= stake;
        let wager = stake as f64 / ball_count as f64;

        self.active.clear();
        self.pending.clear();
        for _ in 0..ball_count {
            let ball = self.make_ball(wager);
            self.pending.push_back(ball);
        }

        self.next_spawn_ms = None;
        self.round = RoundSummary {
            stake,
            balls: ball_count,
            payout: 0,
        };
        self.phase = RoundPhase::Running;

        log::info!(
            "Round started: stake={} balls={} wager/ball={:.3} bankroll={}",
            stake,
            ball_count,
            wager,
            self.bankroll
        );
        Ok(())
    }

    /// New game: drop all balls without refund, rebuild geometry, restore bankroll
    pub fn reset(&mut self) {
        let discarded = self.pending.len() + self.active.len();
        self.pending.clear();
        self.active.clear();
        self.next_spawn_ms = None;
        self.phase = RoundPhase::Idle;
        self.bankroll = self.config.starting_bankroll;
        self.rebuild_board();

        log::info!(
            "Reset: bankroll={} ({} balls discarded)",
            self.bankroll,
            discarded
        );
    }

    // === Internals ===

    fn rebuild_board(&mut self) {
        self.obstacles = generate_board(self.row_count, &self.config);
        self.slots = generate_slots(self.row_count, &self.config);
        log::info!(
            "Board rebuilt: rows={} pegs={} slots={}",
            self.row_count,
            self.obstacles.len(),
            self.slots.len()
        );
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Fresh ball at the drop point with jitter and a random sideways speed
    fn make_ball(&mut self, wager: f64) -> Ball {
        let id = self.next_entity_id();
        let jitter = i64::from(self.config.spawn_jitter.unsigned_abs());
        let dx = if jitter > 0 {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0
        };
        let max_vx = self.config.spawn_max_vx.abs();
        let vx = if max_vx.is_finite() && max_vx > 0.0 {
            self.rng.random_range(-max_vx..max_vx)
        } else {
            0.0
        };

        let pos = Vec2::new(
            self.config.center_x() + dx as f32,
            self.config.height * self.config.spawn_height_ratio,
        );
        Ball::new(id, pos, Vec2::new(vx, 0.0), self.config.ball_radius, wager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RoundState {
        RoundState::new(Config::default())
    }

    #[test]
    fn test_new_state_defaults() {
        let state = state();
        assert_eq!(state.phase(), RoundPhase::Idle);
        assert_eq!(state.bankroll(), 50_000);
        assert_eq!(state.current_stake(), 1_000);
        assert_eq!(state.ball_count(), 10);
        assert_eq!(state.row_count(), 15);
        assert_eq!(state.slots().len(), 11);
        assert!(!state.obstacles().is_empty());
    }

    #[test]
    fn test_start_round_debits_and_queues() {
        let mut state = state();
        state.start_round(1000, 10).unwrap();
        assert_eq!(state.bankroll(), 49_000);
        assert_eq!(state.pending_count(), 10);
        assert!(state.active_balls().is_empty());
        assert!(state.is_round_active());
        assert!(state.pending.iter().all(|b| b.wager == 100.0 && !b.settled));
    }

    #[test]
    fn test_insufficient_funds() {
        let mut state = state();
        let err = state.start_round(60_000, 10).unwrap_err();
        assert_eq!(
            err,
            RoundError::InsufficientFunds {
                stake: 60_000,
                bankroll: 50_000
            }
        );
        assert_eq!(state.bankroll(), 50_000);
        assert_eq!(state.phase(), RoundPhase::Idle);
        assert_eq!(state.pending_count(), 0);
    }

    #[test]
    fn test_invalid_ball_count() {
        let mut state = state();
        assert!(matches!(
            state.start_round(100, 0),
            Err(RoundError::InvalidBallCount { requested: 0, .. })
        ));
        assert!(matches!(
            state.start_round(100, 51),
            Err(RoundError::InvalidBallCount { requested: 51, .. })
        ));
        assert_eq!(state.bankroll(), 50_000);
    }

    #[test]
    fn test_cannot_start_twice() {
        let mut state = state();
        state.play().unwrap();
        assert!(matches!(
            state.play(),
            Err(RoundError::InvalidOperation(_))
        ));
        assert_eq!(state.bankroll(), 49_000);
    }

    #[test]
    fn test_ball_count_clamps() {
        let mut state = state();
        assert_eq!(state.set_ball_count(0), 1);
        assert_eq!(state.decrement_balls(), 1);
        assert_eq!(state.set_ball_count(500), 50);
        assert_eq!(state.increment_balls(), 50);
    }

    #[test]
    fn test_rows_rebuild_when_idle() {
        let mut state = state();
        assert_eq!(state.set_row_count(3).unwrap(), 3);
        assert_eq!(state.obstacles().len(), 3 + 4 + 5);
        assert_eq!(state.set_row_count(0).unwrap(), 1);
        assert_eq!(state.obstacles().len(), 3);
        assert_eq!(state.increment_rows().unwrap(), 2);
    }

    #[test]
    fn test_rows_locked_while_running() {
        let mut state = state();
        let before = state.obstacles().to_vec();
        state.play().unwrap();
        assert!(matches!(
            state.set_row_count(5),
            Err(RoundError::InvalidOperation(_))
        ));
        assert_eq!(state.row_count(), 15);
        assert_eq!(state.obstacles(), &before[..]);
    }

    #[test]
    fn test_bet_actions() {
        let mut state = state();
        state.adjust_stake(BetAction::AllIn);
        assert_eq!(state.current_stake(), 50_000);
        // Doubling beyond the bankroll is ignored
        state.adjust_stake(BetAction::Double);
        assert_eq!(state.current_stake(), 50_000);
        state.adjust_stake(BetAction::Half);
        assert_eq!(state.current_stake(), 25_000);
        state.adjust_stake(BetAction::Double);
        assert_eq!(state.current_stake(), 50_000);

        state.set_stake(1);
        state.adjust_stake(BetAction::Half);
        assert_eq!(state.current_stake(), 1);
    }

    #[test]
    fn test_reset_discards_round() {
        let mut state = state();
        state.play().unwrap();
        state.reset();
        assert_eq!(state.phase(), RoundPhase::Idle);
        assert_eq!(state.bankroll(), 50_000);
        assert_eq!(state.pending_count(), 0);
        assert!(state.active_balls().is_empty());
    }

    #[test]
    fn test_spawned_balls_near_center() {
        let mut state = state();
        state.start_round(500, 50).unwrap();
        for ball in &state.pending {
            assert!((ball.pos.x - 850.0).abs() <= 2.0);
            assert!((ball.pos.y - 126.0).abs() < 1e-3);
            assert!(ball.vel.x.abs() <= 1.0);
            assert_eq!(ball.vel.y, 0.0);
        }
    }

    #[test]
    fn test_unvalidated_spawn_settings_do_not_panic() {
        let mut state = RoundState::new(Config {
            spawn_jitter: i32::MIN,
            spawn_max_vx: f32::INFINITY,
            ..Config::default()
        });
        state.start_round(100, 5).unwrap();
        for ball in &state.pending {
            assert!(ball.pos.x.is_finite());
            assert_eq!(ball.vel.x, 0.0);
        }
    }

    #[test]
    fn test_net_saturates() {
        let windfall = RoundSummary {
            stake: 0,
            balls: 1,
            payout: u64::MAX,
        };
        assert_eq!(windfall.net(), i64::MAX);
        let wipeout = RoundSummary {
            stake: u64::MAX,
            balls: 1,
            payout: 0,
        };
        assert_eq!(wipeout.net(), i64::MIN);
        let normal = RoundSummary {
            stake: 1000,
            balls: 10,
            payout: 200,
        };
        assert_eq!(normal.net(), -800);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = state();
        let mut b = state();
        a.play().unwrap();
        b.play().unwrap();
        assert_eq!(a.pending, b.pending);
    }
}
