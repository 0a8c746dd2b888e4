//! Collision detection and response between discs
//!
//! Bodies collide as circles. Response is a perfectly elastic impulse along
//! the line joining the two centers.

use glam::Vec2;
use rand::Rng;

use super::body::Body;

/// Whether two discs overlap (touching edges do not count)
#[inline]
pub fn circles_intersect(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Whether two bodies overlap
#[inline]
pub fn bodies_intersect(a: &Body, b: &Body) -> bool {
    circles_intersect(a.pos, a.radius, b.pos, b.radius)
}

/// Elastic collision between two discs.
///
/// Alters only the velocities of both bodies. Nothing happens unless `b` is
/// moving toward `a` along the collision axis, so pairs that are already
/// separating are left alone. Returns true if an impulse was applied.
///
/// Coincident centers get a random collision axis from `rng`.
pub fn elastic_collision<R: Rng>(a: &mut Body, b: &mut Body, rng: &mut R) -> bool {
    let mut dir = a.pos - b.pos;
    let total_mass = a.mass + b.mass;
    // Center-of-mass velocity
    let s = (a.vel * a.mass + b.vel * b.mass) / total_mass;

    let mut dist_sq = dir.length_squared();
    if dist_sq == 0.0 {
        dir = Vec2::new(
            rng.random_range(0..=11) as f32 - 5.5,
            rng.random_range(0..=11) as f32 - 5.5,
        );
        dist_sq = dir.length_squared();
    }

    // Scalar projections onto dir / |dir|^2
    let b_proj = (b.vel - s).dot(dir) / dist_sq;
    let a_proj = (a.vel - s).dot(dir) / dist_sq;

    if b_proj > 0.0 {
        b.vel -= 2.0 * dir * b_proj;
        a.vel -= 2.0 * dir * a_proj;
        true
    } else {
        false
    }
}
