//! World state: the entity registry and everything a frame mutates
//!
//! Bodies live in a Vec kept sorted by id. Ids increase monotonically and are
//! never reused, so pushing a freshly spawned body keeps the order and
//! lookups are a binary search.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::arena::{Arena, Grid};
use super::body::{Body, BodyKind, BodyParams, Group};
use super::health_bar::HealthBar;
use crate::consts::*;
use crate::heading_vector;

/// Why an entity left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DestroyReason {
    /// Hitpoints dropped below 1
    Killed,
    /// Lifetime ran out
    Expired,
    /// Bullet consumed on hitting a player
    Consumed,
    /// Health bar whose owner no longer exists
    Orphaned,
    /// Removed by the host
    Removed,
}

/// Things that happened during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    Spawned { id: u32, kind: BodyKind },
    HealthBarSpawned { id: u32, owner: u32 },
    Collision { first: u32, second: u32 },
    Destroyed { id: u32, reason: DestroyReason },
}

/// Serializable view of the world for debugging dumps
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub seed: u64,
    pub frame: u64,
    pub time: f32,
    pub player: Option<u32>,
    pub bodies: Vec<Body>,
    pub health_bars: Vec<HealthBar>,
}

/// All simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Id of the keyboard-controlled body, if any
    pub player: Option<u32>,
    /// Simulated seconds so far
    pub time: f32,
    /// Frames stepped so far
    pub frame: u64,
    pub(crate) rng: Pcg32,
    /// Sorted by id
    pub(crate) bodies: Vec<Body>,
    pub(crate) groups: BTreeMap<Group, BTreeSet<u32>>,
    /// Sorted by id
    pub(crate) health_bars: Vec<HealthBar>,
    events: Vec<SimEvent>,
    next_id: u32,
}

impl World {
    pub fn new(arena: Arena, grid: Grid, seed: u64) -> Self {
        Self {
            arena,
            grid,
            seed,
            player: None,
            time: 0.0,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            bodies: Vec::new(),
            groups: BTreeMap::new(),
            health_bars: Vec::new(),
            events: Vec::new(),
            next_id: 0,
        }
    }

    /// World sized like a window of `width` x `height` with `cell`-pixel tiles
    pub fn with_size(width: u32, height: u32, cell: u32, seed: u64) -> Self {
        Self::new(
            Arena::new(width as f32, height as f32),
            Grid::new(width, height, cell),
            seed,
        )
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a body and register it under its groups. Returns its id.
    pub fn spawn(&mut self, params: BodyParams) -> u32 {
        let vel = match (params.vel, params.kind) {
            (Some(vel), _) => vel,
            (None, BodyKind::Ball) => Vec2::new(
                self.rng.random::<f32>() * 2.0 * BALL_MAX_START_SPEED - BALL_MAX_START_SPEED,
                self.rng.random::<f32>() * 2.0 * BALL_MAX_START_SPEED - BALL_MAX_START_SPEED,
            ),
            (None, _) => Vec2::ZERO,
        };
        let color = params
            .color
            .unwrap_or_else(|| [self.rng.random(), self.rng.random(), self.rng.random()]);

        let id = self.next_entity_id();
        let body = Body::new(id, params, vel, color);
        for group in &body.groups {
            self.groups.entry(*group).or_default().insert(id);
        }
        debug!(
            "spawned {:?} #{} at ({:.1}, {:.1})",
            body.kind, id, body.pos.x, body.pos.y
        );
        self.events.push(SimEvent::Spawned {
            id,
            kind: body.kind,
        });

        let bar = body.kind.has_health_bar().then(|| {
            let bar_id = self.next_entity_id();
            HealthBar::new(bar_id, &body)
        });
        self.bodies.push(body);
        if let Some(bar) = bar {
            self.events.push(SimEvent::HealthBarSpawned {
                id: bar.id,
                owner: id,
            });
            self.health_bars.push(bar);
        }
        id
    }

    /// Spawn the controllable player and remember it as such
    pub fn spawn_player(&mut self, params: BodyParams) -> u32 {
        let id = self.spawn(params);
        self.player = Some(id);
        id
    }

    /// Spawn a ball at a random x along the default row
    pub fn spawn_random_ball(&mut self) -> u32 {
        let max_x = (self.arena.width - 100.0).max(0.0) as u32;
        let x = self.rng.random_range(0..=max_x) as f32;
        let params = BodyParams::for_kind(BodyKind::Ball).at(x, BODY_Y);
        self.spawn(params)
    }

    /// Spawn a stray red bullet from the top-left corner
    pub fn spawn_stray_bullet(&mut self) -> u32 {
        let params = BodyParams::for_kind(BodyKind::Bullet)
            .at(0.0, 0.0)
            .with_velocity(200.0, 200.0)
            .with_color([255, 0, 0]);
        self.spawn(params)
    }

    /// Fire a bullet forward from `shooter`. The shooter is immune to it.
    pub fn fire(&mut self, shooter: u32) -> Option<u32> {
        let body = self.lookup(shooter)?;
        let vel = heading_vector(body.angle) * BULLET_FIRE_SPEED;
        let params = BodyParams::for_kind(BodyKind::Bullet)
            .at(body.pos.x, body.pos.y)
            .with_velocity(vel.x, vel.y)
            .with_owner(shooter)
            .with_color([0, 0, 255]);
        Some(self.spawn(params))
    }

    /// Starting scene: two trailed balls and a trailed player
    pub fn populate_demo_scene(&mut self) {
        self.spawn(
            BodyParams::for_kind(BodyKind::Ball)
                .at(100.0, 100.0)
                .with_radius(10.0)
                .with_trail(),
        );
        self.spawn(
            BodyParams::for_kind(BodyKind::Ball)
                .at(200.0, 100.0)
                .with_radius(20.0)
                .with_trail(),
        );
        self.spawn_player(
            BodyParams::for_kind(BodyKind::Player)
                .at(400.0, 200.0)
                .with_velocity(0.0, 0.0)
                .with_trail(),
        );
    }

    /// Remove a body from the registry and every group.
    ///
    /// Dependents are not touched here; they notice the missing owner on
    /// their next update.
    pub fn destroy(&mut self, id: u32, reason: DestroyReason) -> Option<Body> {
        let index = self.index_of(id)?;
        let body = self.bodies.remove(index);
        for group in &body.groups {
            if let Some(members) = self.groups.get_mut(group) {
                members.remove(&id);
            }
        }
        if self.player == Some(id) {
            self.player = None;
        }
        debug!("destroyed {:?} #{} ({:?})", body.kind, id, reason);
        self.events.push(SimEvent::Destroyed { id, reason });
        Some(body)
    }

    pub fn lookup(&self, id: u32) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn lookup_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index_of(id).is_some()
    }

    /// Live bodies in id order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Live health bars in id order
    pub fn health_bars(&self) -> &[HealthBar] {
        &self.health_bars
    }

    pub fn health_bar_for(&self, owner: u32) -> Option<&HealthBar> {
        self.health_bars.iter().find(|bar| bar.owner == owner)
    }

    /// Ids currently in `group`, in id order
    pub fn members(&self, group: Group) -> Vec<u32> {
        self.groups
            .get(&group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn group_len(&self, group: Group) -> usize {
        self.groups.get(&group).map_or(0, BTreeSet::len)
    }

    /// Events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every body whose hitpoints dropped below 1
    pub fn reap_dead(&mut self) {
        let dead: Vec<u32> = self
            .bodies
            .iter()
            .filter(|b| !b.is_alive())
            .map(|b| b.id)
            .collect();
        for id in dead {
            self.destroy(id, DestroyReason::Killed);
        }
    }

    /// Move every health bar onto its owner; drop bars whose owner is gone
    pub fn update_health_bars(&mut self) {
        let mut orphaned = Vec::new();
        for bar in &mut self.health_bars {
            let owner = self
                .bodies
                .binary_search_by_key(&bar.owner, |b| b.id)
                .ok()
                .map(|i| &self.bodies[i]);
            if !bar.update(owner) {
                orphaned.push(bar.id);
            }
        }
        if orphaned.is_empty() {
            return;
        }
        self.health_bars.retain(|bar| !orphaned.contains(&bar.id));
        for id in orphaned {
            debug!("destroyed health bar #{} (owner gone)", id);
            self.events.push(SimEvent::Destroyed {
                id,
                reason: DestroyReason::Orphaned,
            });
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            seed: self.seed,
            frame: self.frame,
            time: self.time,
            player: self.player,
            bodies: self.bodies.clone(),
            health_bars: self.health_bars.clone(),
        }
    }

    pub(crate) fn index_of(&self, id: u32) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub(crate) fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

/// Two distinct bodies of `bodies` borrowed mutably at once
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}
