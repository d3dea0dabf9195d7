//! Fixed timestep simulation tick
//!
//! Drops pending balls on schedule, advances every ball in flight against
//! the static board, and credits payouts. Balls never interact with each
//! other, so they are stepped independently in id order.

use super::ball::Ball;
use super::board::Obstacle;
use super::collision::{Contact, Walls, find_slot, resolve_obstacle, resolve_walls};
use super::slots::Slot;
use super::state::{RoundEvent, RoundPhase, RoundState};
use crate::settings::Config;

/// A ball reaching a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub ball_id: u32,
    pub slot: usize,
    pub multiplier: f64,
    pub payout: u64,
}

/// Advance one ball by one tick.
///
/// Order: gravity and motion, pegs (sequentially, in board order), walls,
/// then slot entry. Returns the settlement if the ball scored this tick.
pub fn step_ball(
    ball: &mut Ball,
    obstacles: &[Obstacle],
    slots: &[Slot],
    config: &Config,
) -> Option<Settlement> {
    if ball.settled {
        return None;
    }

    ball.vel.y += config.gravity;
    ball.pos += ball.vel;

    for obstacle in obstacles {
        if resolve_obstacle(ball, obstacle, config.damping) == Contact::Degenerate {
            log::debug!(
                "Ball {} centred on peg at ({}, {}), skipping resolution",
                ball.id,
                obstacle.center.x,
                obstacle.center.y
            );
        }
    }

    let walls = Walls::for_ball(config.panel_width, config.width, config.height, ball.radius);
    resolve_walls(ball, &walls, config.damping);

    let slot = find_slot(ball, slots)?;
    let multiplier = slots[slot].multiplier;
    let payout = ball.settle(multiplier)?;
    Some(Settlement {
        ball_id: ball.id,
        slot,
        multiplier,
        payout,
    })
}

/// Step every ball, then drop the ones that settled.
///
/// Settling only marks the ball; removal happens after the pass so the
/// collection is never mutated while it is being walked.
pub fn step_balls(
    balls: &mut Vec<Ball>,
    obstacles: &[Obstacle],
    slots: &[Slot],
    config: &Config,
) -> Vec<Settlement> {
    let settlements: Vec<Settlement> = balls
        .iter_mut()
        .filter_map(|ball| step_ball(ball, obstacles, slots, config))
        .collect();
    balls.retain(|b| !b.settled);
    settlements
}

/// Advance the round by one tick at wall-clock time `now_ms`
pub fn tick(state: &mut RoundState, now_ms: u64) -> Vec<RoundEvent> {
    let mut events = Vec::new();
    if state.phase != RoundPhase::Running {
        return events;
    }

    // Drop at most one ball per tick
    let due = state.next_spawn_ms.is_none_or(|at| now_ms >= at);
    if due && let Some(ball) = state.pending.pop_front() {
        log::debug!("Ball {} dropped at ({:.1}, {:.1})", ball.id, ball.pos.x, ball.pos.y);
        events.push(RoundEvent::BallSpawned { id: ball.id });
        state.active.push(ball);
        state.next_spawn_ms = Some(now_ms.saturating_add(state.config.spawn_interval_ms));
    }

    let settlements = step_balls(&mut state.active, &state.obstacles, &state.slots, &state.config);
    for s in settlements {
        state.bankroll = state.bankroll.saturating_add(s.payout);
        state.round.payout = state.round.payout.saturating_add(s.payout);
        log::debug!(
            "Ball {} settled in slot {} ({}x) paying {}",
            s.ball_id,
            s.slot,
            s.multiplier,
            s.payout
        );
        events.push(RoundEvent::BallSettled {
            id: s.ball_id,
            slot: s.slot,
            multiplier: s.multiplier,
            payout: s.payout,
        });
    }

    if state.pending.is_empty() && state.active.is_empty() {
        state.phase = RoundPhase::Idle;
        state.next_spawn_ms = None;
        let summary = state.round;
        state.last_round = Some(summary);
        log::info!(
            "Round finished: stake={} payout={} net={} bankroll={}",
            summary.stake,
            summary.payout,
            summary.net(),
            state.bankroll
        );
        events.push(RoundEvent::RoundFinished(summary));
    }

    events
}
