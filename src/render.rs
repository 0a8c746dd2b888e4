//! Drawing contract
//!
//! The host implements [`Canvas`] on top of its window. [`draw_world`] walks
//! the world and issues primitives: trails first, then bodies by layer, then
//! health bars on top. Nothing flows back into the simulation.

use glam::Vec2;

use crate::consts::TRAIL_LENGTH;
use crate::sim::{Body, BodyKind, HealthBar, World};

pub type Rgb = [u8; 3];

/// Width of trail segments in pixels
pub const TRAIL_WIDTH: f32 = 4.0;

/// Primitive drawing operations the host window must provide
pub trait Canvas {
    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb);
    /// Draw loaded image `image` centered on `center`, rotated by `angle_deg`
    fn sprite(&mut self, image: usize, center: Vec2, angle_deg: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, width: f32);
    fn rect(&mut self, center: Vec2, size: Vec2, color: Rgb, filled: bool);
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Disc {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Sprite {
        image: usize,
        center: Vec2,
        angle_deg: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        width: f32,
    },
    Rect {
        center: Vec2,
        size: Vec2,
        color: Rgb,
        filled: bool,
    },
}

/// Records commands instead of drawing (headless runs, tests)
impl Canvas for Vec<DrawCommand> {
    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }

    fn sprite(&mut self, image: usize, center: Vec2, angle_deg: f32) {
        self.push(DrawCommand::Sprite {
            image,
            center,
            angle_deg,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn rect(&mut self, center: Vec2, size: Vec2, color: Rgb, filled: bool) {
        self.push(DrawCommand::Rect {
            center,
            size,
            color,
            filled,
        });
    }
}

/// Draw the whole world
pub fn draw_world<C: Canvas>(world: &World, canvas: &mut C, trails: bool) {
    if trails {
        for body in world.bodies() {
            draw_trail(body, canvas);
        }
    }

    let mut order: Vec<&Body> = world.bodies().iter().collect();
    order.sort_by_key(|b| (b.layer, b.id));
    for body in order {
        draw_body(body, canvas);
    }

    for bar in world.health_bars() {
        draw_health_bar(bar, canvas);
    }
}

/// Fading polyline through the trail, blue channel rising toward the newest point
pub fn draw_trail<C: Canvas>(body: &Body, canvas: &mut C) {
    let Some(trail) = body.trail.as_ref() else {
        return;
    };
    let [r, g, _] = body.color;
    let mut prev: Option<Vec2> = None;
    for (i, &point) in trail.iter().enumerate() {
        if let Some(from) = prev {
            let blue = (i * 255 / TRAIL_LENGTH).min(255) as u8;
            canvas.line(from, point, [r, g, blue], TRAIL_WIDTH);
        }
        prev = Some(point);
    }
}

pub fn draw_body<C: Canvas>(body: &Body, canvas: &mut C) {
    match (body.kind, body.sprite) {
        (_, Some(image)) => canvas.sprite(image, body.pos, body.angle),
        (BodyKind::Ball, None) => {
            let r = body.radius;
            canvas.disc(body.pos, r, body.color);
            // Eyes
            canvas.disc(body.pos + Vec2::new(-r / 2.0, -r / 2.0), r / 3.0, [0, 0, 200]);
            canvas.disc(body.pos + Vec2::new(r / 2.0, -r / 2.0), r / 3.0, [255, 255, 0]);
        }
        (_, None) => canvas.disc(body.pos, body.radius, body.color),
    }
}

pub fn draw_health_bar<C: Canvas>(bar: &HealthBar, canvas: &mut C) {
    let size = Vec2::new(bar.width, bar.height);
    canvas.rect(bar.pos, size, bar.color, false);
    if bar.fraction > 0.0 {
        let fill = bar.width * bar.fraction;
        let left = bar.pos.x - bar.width / 2.0;
        let center = Vec2::new(left + fill / 2.0, bar.pos.y);
        canvas.rect(center, Vec2::new(fill, bar.height), bar.color, true);
    }
}
