//! Bodies: the simulated flying objects
//!
//! A [`Body`] carries everything the per-frame step needs: kinematics,
//! combat stats, an optional glide and an optional trail. Kind-specific
//! behavior is selected by [`BodyKind`] rather than by separate types.

use std::collections::VecDeque;

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::consts::*;
use crate::{heading_angle, heading_vector, strafe_vector};

/// Named collections controlling collision checks and layering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Balls,
    Bullets,
    Player,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Balls => "balls",
            Group::Bullets => "bullets",
            Group::Player => "player",
        }
    }
}

/// What a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Keyboard-steered character
    Player,
    /// Heavy bouncing ball
    Ball,
    /// Light, short-lived projectile
    Bullet,
}

impl BodyKind {
    /// Groups a body of this kind joins when spawned without explicit groups
    pub fn default_groups(&self) -> &'static [Group] {
        match self {
            BodyKind::Player => &[Group::Player],
            BodyKind::Ball => &[Group::Balls],
            BodyKind::Bullet => &[Group::Bullets],
        }
    }

    /// Whether spawning this kind also spawns a health bar tracking it
    pub fn has_health_bar(&self) -> bool {
        matches!(self, BodyKind::Player | BodyKind::Ball)
    }
}

/// An in-progress timed glide toward a target point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glide {
    pub target: Vec2,
    /// Seconds left until arrival (goes negative while settling on the target)
    pub remaining: f32,
    /// Orientation to snap to on arrival
    pub end_angle: Option<f32>,
}

/// Bounded history of recent positions (oldest first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn push(&mut self, pos: Vec2) {
        self.points.push_back(pos);
        while self.points.len() > TRAIL_LENGTH {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    /// Hitpoints dropped below 1
    Dead,
    /// Lifetime ran out
    Expired,
}

/// Creation parameters for a body.
///
/// [`BodyParams::for_kind`] fills in the kind's defaults; callers override
/// what they need before handing it to `World::spawn`.
#[derive(Debug, Clone)]
pub struct BodyParams {
    pub kind: BodyKind,
    pub pos: Vec2,
    /// `None` picks the kind's default (random for balls, still otherwise)
    pub vel: Option<Vec2>,
    pub radius: f32,
    /// Half of the visual width/height; derived from the radius when `None`
    pub half_extent: Option<Vec2>,
    pub friction: f32,
    pub mass: f32,
    pub speed: f32,
    pub hitpoints: f32,
    pub damage: f32,
    /// `None` picks a random color
    pub color: Option<[u8; 3]>,
    pub layer: u8,
    pub sprite: Option<usize>,
    pub owner: Option<u32>,
    pub trail: bool,
    /// Explicit group membership; `None` uses the kind's default groups
    pub groups: Option<Vec<Group>>,
}

impl BodyParams {
    pub fn for_kind(kind: BodyKind) -> Self {
        let mut params = Self {
            kind,
            pos: Vec2::new(BODY_X, BODY_Y),
            vel: None,
            radius: BODY_RADIUS,
            half_extent: None,
            friction: 1.0,
            mass: BODY_MASS,
            speed: BODY_SPEED,
            hitpoints: BODY_HITPOINTS,
            damage: BODY_DAMAGE,
            color: None,
            layer: BODY_LAYER,
            sprite: None,
            owner: None,
            trail: false,
            groups: None,
        };
        match kind {
            BodyKind::Ball => {
                params.mass = BALL_MASS;
            }
            BodyKind::Bullet => {
                params.mass = BULLET_MASS;
                params.radius = BULLET_RADIUS;
            }
            BodyKind::Player => {
                params.friction = PLAYER_FRICTION;
                params.hitpoints = PLAYER_HITPOINTS;
                params.mass = PLAYER_MASS;
                params.damage = PLAYER_DAMAGE;
                params.radius = PLAYER_RADIUS;
                params.half_extent = Some(Vec2::new(
                    PLAYER_SPRITE_SIZE.0 / 2.0,
                    PLAYER_SPRITE_SIZE.1 / 2.0,
                ));
                params.layer = PLAYER_LAYER;
                params.sprite = Some(0);
            }
        }
        params
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Some(Vec2::new(vx, vy));
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_owner(mut self, owner: u32) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_trail(mut self) -> Self {
        self.trail = true;
        self
    }
}

/// A simulated flying object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub groups: Vec<Group>,

    pub pos: Vec2,
    pub vel: Vec2,
    /// Thrust direction for this frame, scaled by `speed` on integration
    pub acc: Vec2,
    pub radius: f32,
    /// Half width/height used for border reflection
    pub half_extent: Vec2,
    /// Per-frame velocity multiplier; 1.0 means no friction
    pub friction: f32,
    pub speed: f32,
    /// Speed restored when a glide ends or is interrupted
    pub base_speed: f32,
    /// Degrees per turn command
    pub turn_speed: f32,
    /// Orientation in degrees
    pub angle: f32,

    pub mass: f32,
    pub hitpoints: f32,
    pub hitpoints_full: f32,
    pub damage: f32,

    pub color: [u8; 3],
    pub layer: u8,
    /// Image index for sprite-drawn bodies
    pub sprite: Option<usize>,
    /// Id of the body that fired this one (never an ownership edge)
    pub owner: Option<u32>,
    /// Seconds left before self-destruction
    pub lifetime: Option<f32>,

    pub glide: Option<Glide>,
    pub trail: Option<Trail>,
}

impl Body {
    /// Build a body from resolved parameters. `vel` and `color` must already be chosen.
    ///
    /// Radius, mass and friction must be positive; anything else falls back to
    /// the kind's default.
    pub fn new(id: u32, params: BodyParams, vel: Vec2, color: [u8; 3]) -> Self {
        let defaults = BodyParams::for_kind(params.kind);
        let radius = positive_or(params.radius, defaults.radius, "radius");
        let mass = positive_or(params.mass, defaults.mass, "mass");
        let friction = positive_or(params.friction, defaults.friction, "friction");
        let half_extent = params.half_extent.unwrap_or(Vec2::splat(radius));
        let groups = params
            .groups
            .unwrap_or_else(|| params.kind.default_groups().to_vec());
        let lifetime = match params.kind {
            BodyKind::Bullet => Some(BULLET_LIFETIME),
            _ => None,
        };
        Self {
            id,
            kind: params.kind,
            groups,
            pos: params.pos,
            vel,
            acc: Vec2::ZERO,
            radius,
            half_extent,
            friction,
            speed: params.speed,
            base_speed: params.speed,
            turn_speed: TURN_SPEED,
            angle: 0.0,
            mass,
            hitpoints: params.hitpoints,
            hitpoints_full: params.hitpoints,
            damage: params.damage,
            color,
            layer: params.layer,
            sprite: params.sprite,
            owner: params.owner,
            lifetime,
            glide: None,
            trail: params.trail.then(Trail::new),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hitpoints >= 1.0
    }

    pub fn in_group(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }

    /// Fraction of full hitpoints left, clamped to [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.hitpoints_full <= 0.0 {
            return 0.0;
        }
        (self.hitpoints / self.hitpoints_full).clamp(0.0, 1.0)
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hitpoints -= amount;
    }

    pub fn forward(&mut self) {
        self.acc = heading_vector(self.angle);
    }

    pub fn backward(&mut self) {
        self.acc = -heading_vector(self.angle);
    }

    pub fn strafe_right(&mut self) {
        self.acc = strafe_vector(self.angle);
    }

    pub fn strafe_left(&mut self) {
        self.acc = -strafe_vector(self.angle);
    }

    pub fn turn_left(&mut self) {
        self.angle += self.turn_speed;
    }

    pub fn turn_right(&mut self) {
        self.angle -= self.turn_speed;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Rotate to face the direction of movement
    pub fn turn_to_heading(&mut self) {
        if self.vel != Vec2::ZERO {
            self.angle = heading_angle(self.vel);
        }
    }

    /// Abort any glide in progress and restore the normal speed
    pub fn cancel_glide(&mut self) {
        self.glide = None;
        self.speed = self.base_speed;
    }

    /// Advance by `dt` seconds inside `arena`
    pub fn integrate(&mut self, dt: f32, arena: &Arena) -> StepOutcome {
        if !self.is_alive() {
            return StepOutcome::Dead;
        }

        // Thrust is a per-frame impulse, not scaled by dt
        self.vel += self.acc * self.speed;
        // Zero components stay exactly zero
        if self.vel.x != 0.0 {
            self.vel.x *= self.friction;
        }
        if self.vel.y != 0.0 {
            self.vel.y *= self.friction;
        }
        self.pos += self.vel * dt;

        if let Some(glide) = self.glide.as_mut() {
            glide.remaining -= dt;
            if glide.remaining <= GLIDE_ARRIVAL_TOLERANCE {
                // Hold on the target until the glide settles
                self.pos = glide.target;
                self.vel = Vec2::ZERO;
            }
            if glide.remaining <= GLIDE_SNAP_SLACK {
                let end_angle = glide.end_angle;
                self.glide = None;
                self.speed = self.base_speed;
                if let Some(angle) = end_angle {
                    self.angle = angle;
                }
            }
        }

        self.reflect_from_borders(arena);

        if self.kind == BodyKind::Bullet {
            self.turn_to_heading();
        }

        if let Some(trail) = self.trail.as_mut() {
            trail.push(self.pos);
        }

        if self.age(dt) {
            return StepOutcome::Expired;
        }
        StepOutcome::Alive
    }

    /// Count down the lifetime, if any. Returns true once it has run out.
    pub fn age(&mut self, dt: f32) -> bool {
        match self.lifetime.as_mut() {
            Some(lifetime) => {
                *lifetime -= dt;
                *lifetime < 0.0
            }
            None => false,
        }
    }

    fn reflect_from_borders(&mut self, arena: &Arena) {
        let half = self.half_extent;
        if self.pos.x - half.x < 0.0 {
            self.pos.x = half.x;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - half.y < 0.0 {
            self.pos.y = half.y;
            self.vel.y = -self.vel.y;
        }
        if self.pos.x + half.x > arena.width {
            self.pos.x = arena.width - half.x;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y + half.y > arena.height {
            self.pos.y = arena.height - half.y;
            self.vel.y = -self.vel.y;
        }
    }
}

fn positive_or(value: f32, fallback: f32, what: &str) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        warn!("{what} must be positive, got {value}; using {fallback}");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(640.0, 400.0)
    }

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        let params = BodyParams::for_kind(BodyKind::Ball)
            .at(x, y)
            .with_radius(10.0);
        Body::new(1, params, Vec2::new(vx, vy), [255, 0, 0])
    }

    #[test]
    fn test_integrate_moves_by_velocity() {
        let mut body = ball_at(100.0, 100.0, 30.0, -10.0);
        assert_eq!(body.integrate(0.5, &arena()), StepOutcome::Alive);
        assert!((body.pos - Vec2::new(115.0, 95.0)).length() < 1e-4);
    }

    #[test]
    fn test_friction_skips_zero_axis() {
        let mut body = ball_at(100.0, 100.0, 10.0, 0.0);
        body.friction = 0.5;
        body.integrate(0.1, &arena());
        assert_eq!(body.vel, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_thrust_scaled_by_speed_not_dt() {
        let mut body = ball_at(300.0, 200.0, 0.0, 0.0);
        body.speed = 20.0;
        body.forward();
        body.integrate(0.01, &arena());
        assert!((body.vel - Vec2::new(0.0, -20.0)).length() < 1e-4);
    }

    #[test]
    fn test_dead_body_does_not_move() {
        let mut body = ball_at(100.0, 100.0, 30.0, 0.0);
        body.hitpoints = 0.5;
        assert_eq!(body.integrate(1.0, &arena()), StepOutcome::Dead);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_border_reflection_left_and_bottom() {
        let mut body = ball_at(12.0, 385.0, -100.0, 100.0);
        body.integrate(0.1, &arena());
        assert_eq!(body.pos, Vec2::new(10.0, 390.0));
        assert_eq!(body.vel, Vec2::new(100.0, -100.0));
    }

    #[test]
    fn test_bullet_expires_after_lifetime() {
        let params = BodyParams::for_kind(BodyKind::Bullet);
        let mut bullet = Body::new(2, params, Vec2::ZERO, [0, 0, 255]);
        assert!(!bullet.age(BULLET_LIFETIME - 0.1));
        assert!(bullet.age(0.2));
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = Trail::new();
        for i in 0..(TRAIL_LENGTH * 3) {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_LENGTH);
        // Oldest entries were evicted first
        let first = trail.iter().next().copied();
        assert_eq!(first, Some(Vec2::new((TRAIL_LENGTH * 2) as f32, 0.0)));
    }

    #[test]
    fn test_player_defaults() {
        let params = BodyParams::for_kind(BodyKind::Player);
        let player = Body::new(3, params, Vec2::ZERO, [0, 0, 0]);
        assert_eq!(player.mass, PLAYER_MASS);
        assert_eq!(player.hitpoints, PLAYER_HITPOINTS);
        assert_eq!(player.half_extent, Vec2::new(16.0, 18.0));
        assert!(player.in_group(Group::Player));
        assert!(!player.in_group(Group::Balls));
    }

    #[test]
    fn test_turn_to_heading_faces_velocity() {
        let mut body = ball_at(100.0, 100.0, -10.0, 0.0);
        body.turn_to_heading();
        assert!((body.angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_bullet_faces_velocity() {
        let params = BodyParams::for_kind(BodyKind::Bullet).at(100.0, 100.0);
        let mut bullet = Body::new(2, params, Vec2::new(200.0, 0.0), [0, 0, 255]);
        for _ in 0..3 {
            bullet.integrate(1.0 / 30.0, &arena());
        }
        assert!((bullet.angle + 90.0).abs() < 1e-3);

        // Bouncing off the right wall turns it around
        bullet.pos.x = 630.0;
        bullet.integrate(1.0 / 30.0, &arena());
        assert!((bullet.angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_balls_keep_their_angle() {
        let mut body = ball_at(100.0, 100.0, 50.0, 0.0);
        body.integrate(1.0 / 30.0, &arena());
        assert_eq!(body.angle, 0.0);
    }

    #[test]
    fn test_non_positive_params_fall_back_to_defaults() {
        let mut params = BodyParams::for_kind(BodyKind::Ball).at(100.0, 100.0);
        params.mass = 0.0;
        params.radius = -4.0;
        params.friction = f32::NAN;
        let body = Body::new(1, params, Vec2::ZERO, [0, 0, 0]);
        assert_eq!(body.mass, BALL_MASS);
        assert_eq!(body.radius, BODY_RADIUS);
        assert_eq!(body.half_extent, Vec2::splat(BODY_RADIUS));
        assert_eq!(body.friction, 1.0);
    }
}
