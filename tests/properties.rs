//! Property tests for the simulation engine

use glam::Vec2;
use proptest::prelude::*;

use plinko::Config;
use plinko::sim::collision::resolve_obstacle;
use plinko::sim::{
    Ball, Obstacle, RoundEvent, RoundState, generate_board, generate_slots, payout, step_ball, tick,
};

/// Run a started round until it drains, returning every event
fn run_round(state: &mut RoundState, max_ticks: u64) -> Vec<RoundEvent> {
    let tick_ms = state.config().tick_ms();
    let mut events = Vec::new();
    for n in 0..max_ticks {
        events.extend(tick(state, (n as f64 * tick_ms) as u64));
        if !state.is_round_active() {
            break;
        }
    }
    events
}

proptest! {
    /// Every ball stays inside the playfield after a tick, whatever it hit.
    #[test]
    fn prop_ball_contained(
        x in 300.0f32..1400.0,
        y in 0.0f32..900.0,
        vx in -6.0f32..6.0,
        vy in -6.0f32..6.0,
        rows in 1u32..=15,
    ) {
        let config = Config::default();
        let board = generate_board(rows, &config);
        let slots = generate_slots(rows, &config);
        let mut ball = Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), config.ball_radius, 10.0);

        for _ in 0..20 {
            step_ball(&mut ball, &board, &slots, &config);
            prop_assert!(ball.pos.x >= config.panel_width && ball.pos.x <= config.width);
            prop_assert!(ball.pos.y >= 0.0 && ball.pos.y <= config.height);
            if ball.settled {
                break;
            }
        }
    }

    /// Resolving a peg overlap leaves the ball tangent to it.
    #[test]
    fn prop_peg_resolution_separates(
        angle in 0.0f32..std::f32::consts::TAU,
        depth in 0.01f32..14.9,
        vx in -4.0f32..4.0,
        vy in -4.0f32..4.0,
    ) {
        let peg = Obstacle { center: Vec2::new(700.0, 400.0), radius: 7.0 };
        let reach = 8.0 + peg.radius;
        let offset = Vec2::new(angle.cos(), angle.sin()) * (reach - depth);
        let mut ball = Ball::new(1, peg.center + offset, Vec2::new(vx, vy), 8.0, 1.0);

        resolve_obstacle(&mut ball, &peg, 0.8);
        prop_assert!(ball.pos.distance(peg.center) >= reach - 1e-3);
        // Damped reflection never gains speed
        prop_assert!(ball.vel.length() <= Vec2::new(vx, vy).length() + 1e-4);
    }

    /// Board generation is a pure function of the row count.
    #[test]
    fn prop_board_deterministic(rows in 0u32..40) {
        let config = Config::default();
        prop_assert_eq!(generate_board(rows, &config), generate_board(rows, &config));
    }

    /// The slot row reads the same both ways and peaks in the middle.
    #[test]
    fn prop_slot_multipliers_mirrored(rows in 1u32..=15) {
        let slots = generate_slots(rows, &Config::default());
        let multipliers: Vec<f64> = slots.iter().map(|s| s.multiplier).collect();
        let mirrored: Vec<f64> = multipliers.iter().rev().copied().collect();
        prop_assert_eq!(&multipliers, &mirrored);
        let peak = multipliers.iter().cloned().fold(f64::MIN, f64::max);
        prop_assert_eq!(multipliers[multipliers.len() / 2], peak);
    }

    /// Settling pays exactly once.
    #[test]
    fn prop_settle_once(wager in 0.0f64..10_000.0, multiplier in 0.0f64..10.0) {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::ZERO, 8.0, wager);
        prop_assert_eq!(ball.settle(multiplier), Some(payout(wager, multiplier)));
        prop_assert_eq!(ball.settle(multiplier), None);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Bankroll after a round is start - stake + per-ball rounded payouts.
    #[test]
    fn prop_round_conserves_money(
        seed in any::<u64>(),
        stake in 0u64..=50_000,
        balls in 1u32..=4,
        rows in 1u32..=15,
    ) {
        let config = Config { seed, ..Config::default() };
        let mut state = RoundState::new(config);
        state.set_row_count(rows).unwrap();
        let start = state.bankroll();
        state.start_round(stake, balls).unwrap();

        let events = run_round(&mut state, 400_000);
        prop_assert!(!state.is_round_active());

        let wager = stake as f64 / balls as f64;
        let mut credited = 0u64;
        let mut settled = 0u32;
        for event in &events {
            if let RoundEvent::BallSettled { multiplier, payout: paid, .. } = event {
                prop_assert_eq!(*paid, payout(wager, *multiplier));
                credited += paid;
                settled += 1;
            }
        }
        prop_assert_eq!(settled, balls);
        prop_assert_eq!(state.bankroll(), start - stake + credited);
        prop_assert_eq!(state.last_round().map(|r| r.payout), Some(credited));
    }
}
