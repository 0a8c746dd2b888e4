//! Per-frame collision pair discovery and resolution
//!
//! Each [`Pairing`] names two groups and what happens when their members
//! touch. Pairings are processed in a fixed order; within a pairing the
//! intersecting pairs are found up front and then resolved one by one,
//! skipping any body destroyed earlier in the frame.

use log::trace;

use super::body::Group;
use super::collision::{bodies_intersect, elastic_collision};
use super::world::{DestroyReason, SimEvent, World, pair_mut};

/// Collision rules between two groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub first: Group,
    pub second: Group,
    /// First body loses hitpoints equal to the second's damage
    pub first_takes_damage: bool,
    /// Second body loses hitpoints equal to the first's damage
    pub second_takes_damage: bool,
    /// Skip pairs where the second body was fired by the first
    pub owner_immune: bool,
    /// Destroy the second body once resolved
    pub consume_second: bool,
}

impl Pairing {
    const fn plain(first: Group, second: Group) -> Self {
        Self {
            first,
            second,
            first_takes_damage: false,
            second_takes_damage: false,
            owner_immune: false,
            consume_second: false,
        }
    }

    pub fn same_group(&self) -> bool {
        self.first == self.second
    }
}

/// Pairings checked every frame, in order
pub const PAIRINGS: [Pairing; 5] = [
    Pairing {
        first_takes_damage: true,
        ..Pairing::plain(Group::Balls, Group::Bullets)
    },
    Pairing::plain(Group::Balls, Group::Balls),
    Pairing::plain(Group::Bullets, Group::Bullets),
    Pairing {
        first_takes_damage: true,
        second_takes_damage: true,
        ..Pairing::plain(Group::Player, Group::Balls)
    },
    Pairing {
        first_takes_damage: true,
        owner_immune: true,
        consume_second: true,
        ..Pairing::plain(Group::Player, Group::Bullets)
    },
];

/// Intersecting (first, second) id pairs for one pairing.
///
/// Within a single group each unordered pair appears once, with the larger
/// id first. A body is never paired with itself.
pub fn intersecting_pairs(world: &World, pairing: &Pairing) -> Vec<(u32, u32)> {
    let firsts = world.members(pairing.first);
    let seconds = world.members(pairing.second);
    let mut pairs = Vec::new();
    for &a in &firsts {
        let Some(body_a) = world.lookup(a) else {
            continue;
        };
        for &b in &seconds {
            if a == b || (pairing.same_group() && a <= b) {
                continue;
            }
            let Some(body_b) = world.lookup(b) else {
                continue;
            };
            if bodies_intersect(body_a, body_b) {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

impl World {
    /// Find and resolve every colliding pair for this frame
    pub fn resolve_collisions(&mut self) {
        for pairing in &PAIRINGS {
            let pairs = intersecting_pairs(self, pairing);
            for (a, b) in pairs {
                self.resolve_pair(pairing, a, b);
            }
        }
    }

    fn resolve_pair(&mut self, pairing: &Pairing, a: u32, b: u32) {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return;
        };
        let Some((first, second)) = pair_mut(&mut self.bodies, ia, ib) else {
            return;
        };
        if pairing.owner_immune && second.owner == Some(first.id) {
            return;
        }

        elastic_collision(first, second, &mut self.rng);
        if pairing.first_takes_damage {
            first.take_damage(second.damage);
        }
        if pairing.second_takes_damage {
            second.take_damage(first.damage);
        }
        // A collision invalidates any planned trajectory
        first.cancel_glide();
        second.cancel_glide();

        trace!(
            "collision {} #{} x {} #{}",
            pairing.first.as_str(),
            a,
            pairing.second.as_str(),
            b
        );
        self.record(SimEvent::Collision {
            first: a,
            second: b,
        });
        if pairing.consume_second {
            self.destroy(b, DestroyReason::Consumed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, BodyParams};

    fn world() -> World {
        World::with_size(640, 400, 50, 7)
    }

    fn ball(world: &mut World, x: f32, y: f32, vx: f32, vy: f32) -> u32 {
        world.spawn(
            BodyParams::for_kind(BodyKind::Ball)
                .at(x, y)
                .with_radius(10.0)
                .with_velocity(vx, vy),
        )
    }

    fn bullet(world: &mut World, x: f32, y: f32, vx: f32, vy: f32) -> u32 {
        world.spawn(
            BodyParams::for_kind(BodyKind::Bullet)
                .at(x, y)
                .with_velocity(vx, vy),
        )
    }

    #[test]
    fn test_same_group_pairs_once_larger_id_first() {
        let mut world = world();
        let a = ball(&mut world, 100.0, 100.0, 0.0, 0.0);
        let b = ball(&mut world, 110.0, 100.0, 0.0, 0.0);
        let c = ball(&mut world, 105.0, 108.0, 0.0, 0.0);
        let pairs = intersecting_pairs(&world, &PAIRINGS[1]);
        assert_eq!(pairs, vec![(b, a), (c, a), (c, b)]);
    }

    #[test]
    fn test_cross_group_pairs() {
        let mut world = world();
        let ball = ball(&mut world, 100.0, 100.0, 0.0, 0.0);
        let near = bullet(&mut world, 112.0, 100.0, 0.0, 0.0);
        let _far = bullet(&mut world, 300.0, 300.0, 0.0, 0.0);
        let pairs = intersecting_pairs(&world, &PAIRINGS[0]);
        assert_eq!(pairs, vec![(ball, near)]);
    }

    #[test]
    fn test_ball_takes_bullet_damage() {
        let mut world = world();
        let ball = ball(&mut world, 100.0, 100.0, 0.0, 0.0);
        let bullet = bullet(&mut world, 112.0, 100.0, -50.0, 0.0);
        world.resolve_collisions();
        let hp = world.lookup(ball).unwrap().hitpoints;
        assert_eq!(hp, crate::consts::BODY_HITPOINTS - crate::consts::BODY_DAMAGE);
        // Bullet bounced back
        assert!(world.lookup(bullet).unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_player_and_ball_damage_each_other() {
        let mut world = world();
        let player = world.spawn_player(BodyParams::for_kind(BodyKind::Player).at(300.0, 200.0));
        let ball = ball(&mut world, 320.0, 200.0, -10.0, 0.0);
        world.resolve_collisions();
        let player_hp = world.lookup(player).unwrap().hitpoints;
        let ball_hp = world.lookup(ball).unwrap().hitpoints;
        assert_eq!(player_hp, crate::consts::PLAYER_HITPOINTS - crate::consts::BODY_DAMAGE);
        assert_eq!(ball_hp, crate::consts::BODY_HITPOINTS - crate::consts::PLAYER_DAMAGE);
    }

    #[test]
    fn test_own_bullet_is_ignored() {
        let mut world = world();
        let player = world.spawn_player(BodyParams::for_kind(BodyKind::Player).at(300.0, 200.0));
        let shot = world.fire(player).unwrap();
        world.resolve_collisions();
        assert!(world.contains(shot));
        let body = world.lookup(player).unwrap();
        assert_eq!(body.hitpoints, crate::consts::PLAYER_HITPOINTS);
    }

    #[test]
    fn test_foreign_bullet_hits_and_is_consumed() {
        let mut world = world();
        let player = world.spawn_player(BodyParams::for_kind(BodyKind::Player).at(300.0, 200.0));
        let shot = bullet(&mut world, 310.0, 200.0, -100.0, 0.0);
        world.resolve_collisions();
        assert!(!world.contains(shot));
        let body = world.lookup(player).unwrap();
        assert_eq!(body.hitpoints, crate::consts::PLAYER_HITPOINTS - crate::consts::BODY_DAMAGE);
    }

    #[test]
    fn test_consumed_bullet_not_revisited() {
        let mut world = world();
        let player = world.spawn_player(BodyParams::for_kind(BodyKind::Player).at(300.0, 200.0));
        // A second player-group body overlapping the same bullet
        let other = world.spawn(BodyParams::for_kind(BodyKind::Player).at(305.0, 200.0));
        let shot = bullet(&mut world, 302.0, 200.0, -100.0, 0.0);
        world.resolve_collisions();
        assert!(!world.contains(shot));
        let hits = [player, other]
            .iter()
            .filter(|id| {
                world.lookup(**id).unwrap().hitpoints < crate::consts::PLAYER_HITPOINTS
            })
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_collision_cancels_glide() {
        let mut world = world();
        let a = ball(&mut world, 100.0, 100.0, 0.0, 0.0);
        let b = ball(&mut world, 110.0, 100.0, -5.0, 0.0);
        {
            let body = world.lookup_mut(a).unwrap();
            crate::sim::glide::begin_glide(
                body,
                glam::Vec2::new(500.0, 300.0),
                false,
                None,
                Some(3.0),
            );
        }
        world.resolve_collisions();
        let body = world.lookup(a).unwrap();
        assert!(body.glide.is_none());
        assert_eq!(body.speed, body.base_speed);
        assert!(world.contains(b));
    }
}
