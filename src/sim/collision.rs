//! Collision detection and response
//!
//! Pegs are immovable, so a hit mirrors the ball's velocity about the contact
//! normal instead of exchanging momentum. Walls are the axis-aligned version
//! of the same response.

use glam::Vec2;

use super::ball::Ball;
use super::board::Obstacle;
use super::slots::Slot;
use crate::direction_between;

/// Result of a ball/peg overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// No overlap
    Miss,
    /// Overlap with a usable normal
    Hit {
        /// Unit normal from peg centre toward ball centre
        normal: Vec2,
        /// Overlap depth along the normal
        penetration: f32,
    },
    /// Centres coincide; the normal is undefined
    Degenerate,
}

/// Check a ball against one peg
pub fn ball_obstacle_contact(ball_pos: Vec2, ball_radius: f32, obstacle: &Obstacle) -> Contact {
    let reach = ball_radius + obstacle.radius;
    let distance = ball_pos.distance(obstacle.center);
    if distance >= reach {
        return Contact::Miss;
    }

    match direction_between(obstacle.center, ball_pos) {
        Some(normal) => Contact::Hit {
            normal,
            penetration: reach - distance,
        },
        None => Contact::Degenerate,
    }
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push the ball out of a peg and bounce it.
///
/// Returns the contact that was found so callers can log degenerate cases.
pub fn resolve_obstacle(ball: &mut Ball, obstacle: &Obstacle, damping: f32) -> Contact {
    let contact = ball_obstacle_contact(ball.pos, ball.radius, obstacle);
    if let Contact::Hit {
        normal,
        penetration,
    } = contact
    {
        ball.pos += normal * penetration;
        ball.vel = reflect_velocity(ball.vel, normal) * damping;
    }
    contact
}

/// Playfield walls, expressed as limits on the ball centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walls {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Walls {
    /// Limits for a ball of `radius` inside `[panel_width, width] x [0, height]`
    pub fn for_ball(panel_width: f32, width: f32, height: f32, radius: f32) -> Self {
        Self {
            left: panel_width + radius,
            right: width - radius,
            top: radius,
            bottom: height - radius,
        }
    }
}

/// Clamp the ball inside the walls, bouncing the crossed axis.
///
/// Returns true if any wall was hit.
pub fn resolve_walls(ball: &mut Ball, walls: &Walls, damping: f32) -> bool {
    let mut hit = false;

    if ball.pos.x < walls.left {
        ball.pos.x = walls.left;
        ball.vel.x *= -damping;
        hit = true;
    } else if ball.pos.x > walls.right {
        ball.pos.x = walls.right;
        ball.vel.x *= -damping;
        hit = true;
    }

    if ball.pos.y < walls.top {
        ball.pos.y = walls.top;
        ball.vel.y *= -damping;
        hit = true;
    } else if ball.pos.y > walls.bottom {
        ball.pos.y = walls.bottom;
        ball.vel.y *= -damping;
        hit = true;
    }

    hit
}

/// First slot (in generation order) the ball's bounding box overlaps
pub fn find_slot(ball: &Ball, slots: &[Slot]) -> Option<usize> {
    let bounds = ball.bounds();
    slots.iter().position(|slot| slot.rect.overlaps(&bounds))
}
