//! Timed glides: constant-velocity moves to a target point
//!
//! Starting a glide only sets velocity and stores the target; arrival and
//! snapping are handled by [`Body::integrate`].

use glam::Vec2;

use super::arena::{Grid, GridError};
use super::body::{Body, Glide};

/// How a glide request was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideStart {
    /// Body is now moving toward the target
    Gliding,
    /// Body was placed on the target immediately
    Teleported,
}

/// Start gliding `body` to `target`.
///
/// Without a `duration` the body travels at its current speed. A duration of
/// zero or less (or a glide that would take no time) teleports instead;
/// `end_angle` only applies to glides that actually run.
pub fn begin_glide(
    body: &mut Body,
    target: Vec2,
    rotate: bool,
    end_angle: Option<f32>,
    duration: Option<f32>,
) -> GlideStart {
    let distance = body.pos.distance(target);
    let duration = match duration {
        Some(d) => {
            if d > 0.0 {
                body.speed = distance / d;
            }
            d
        }
        None if body.speed > 0.0 => distance / body.speed,
        None => 0.0,
    };

    if !(duration > 0.0) || !duration.is_finite() {
        teleport(body, target, true);
        return GlideStart::Teleported;
    }

    body.vel = (target - body.pos) / duration;
    if rotate {
        body.turn_to_heading();
    }
    body.glide = Some(Glide {
        target,
        remaining: duration,
        end_angle,
    });
    GlideStart::Gliding
}

/// Glide to the center of grid cell (`col`, `row`)
pub fn glide_to_grid(
    body: &mut Body,
    grid: &Grid,
    col: i32,
    row: i32,
    rotate: bool,
    end_angle: Option<f32>,
    duration: Option<f32>,
) -> Result<GlideStart, GridError> {
    let target = grid.cell_center(col, row)?;
    Ok(begin_glide(body, target, rotate, end_angle, duration))
}

/// Jump to the center of grid cell (`col`, `row`)
pub fn teleport_to_grid(
    body: &mut Body,
    grid: &Grid,
    col: i32,
    row: i32,
    stop_moving: bool,
) -> Result<(), GridError> {
    let target = grid.cell_center(col, row)?;
    teleport(body, target, stop_moving);
    Ok(())
}

fn teleport(body: &mut Body, target: Vec2, stop_moving: bool) {
    body.pos = target;
    if stop_moving {
        body.vel = Vec2::ZERO;
    }
    if body.glide.take().is_some() {
        body.speed = body.base_speed;
    }
}
