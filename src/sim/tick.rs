//! Frame step
//!
//! Advances the world by one frame: commands, integration, collisions,
//! removal of the dead, then dependents.

use glam::Vec2;
use log::warn;

use super::body::StepOutcome;
use super::glide::glide_to_grid;
use super::world::{DestroyReason, World};

/// A requested glide to a grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGlide {
    pub col: i32,
    pub row: i32,
    /// Seconds; `None` travels at the body's speed
    pub duration: Option<f32>,
}

/// Commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    // Held this frame
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub strafe_right: bool,
    pub strafe_left: bool,
    // Pressed this frame
    /// Fire a bullet from the player
    pub fire: bool,
    /// Add a ball at a random spot
    pub spawn_ball: bool,
    /// Add a stray bullet from the corner
    pub spawn_bullet: bool,
    /// Halt the player
    pub stop: bool,
    pub grid_glide: Option<GridGlide>,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    apply_input(world, input);

    let arena = world.arena;
    let mut gone = Vec::new();
    for body in &mut world.bodies {
        match body.integrate(dt, &arena) {
            StepOutcome::Alive => {}
            StepOutcome::Dead => gone.push((body.id, DestroyReason::Killed)),
            StepOutcome::Expired => gone.push((body.id, DestroyReason::Expired)),
        }
    }
    for (id, reason) in gone {
        world.destroy(id, reason);
    }

    world.resolve_collisions();
    world.reap_dead();
    world.update_health_bars();

    world.time += dt;
    world.frame += 1;
}

fn apply_input(world: &mut World, input: &TickInput) {
    if input.spawn_ball {
        world.spawn_random_ball();
    }
    if input.spawn_bullet {
        world.spawn_stray_bullet();
    }

    let Some(player) = world.player else {
        return;
    };

    if let Some(request) = input.grid_glide {
        let grid = world.grid;
        if let Some(body) = world.lookup_mut(player) {
            let result = glide_to_grid(
                body,
                &grid,
                request.col,
                request.row,
                true,
                None,
                request.duration,
            );
            if let Err(err) = result {
                warn!("glide rejected: {err}");
            }
        }
    }
    if input.fire {
        world.fire(player);
    }

    let Some(body) = world.lookup_mut(player) else {
        return;
    };
    if input.stop {
        body.stop();
    }

    // Thrust is rebuilt every frame; later commands win
    body.acc = Vec2::ZERO;
    if input.forward {
        body.forward();
    }
    if input.backward {
        body.backward();
    }
    if input.turn_left {
        body.turn_left();
    }
    if input.turn_right {
        body.turn_right();
    }
    if input.strafe_right {
        body.strafe_right();
    }
    if input.strafe_left {
        body.strafe_left();
    }
}
