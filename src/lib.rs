//! Flying Objects - a 2D arcade sandbox
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, glides, collisions, entity registry)
//! - `input`: Keyboard contract and key-to-command mapping
//! - `render`: Drawing contract consumed by the host window
//! - `assets`: Named image loading
//! - `settings`: Persisted window/grid preferences

pub mod assets;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default window size in pixels
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 400;
    /// Default target frame rate
    pub const DEFAULT_FPS: u32 = 30;
    /// Default grid cell size in pixels
    pub const DEFAULT_GRID: u32 = 50;

    /// Maximum number of positions kept in a trail
    pub const TRAIL_LENGTH: usize = 50;
    /// A gliding body is pinned to its target once its remaining time drops below this
    pub const GLIDE_ARRIVAL_TOLERANCE: f32 = 1e-4;
    /// A glide is cleared once its remaining time drops to this value
    pub const GLIDE_SNAP_SLACK: f32 = -0.3;

    /// Common body defaults
    pub const BODY_RADIUS: f32 = 50.0;
    pub const BODY_X: f32 = 320.0;
    pub const BODY_Y: f32 = 240.0;
    pub const BODY_MASS: f32 = 10.0;
    pub const BODY_SPEED: f32 = 20.0;
    pub const BODY_HITPOINTS: f32 = 100.0;
    pub const BODY_DAMAGE: f32 = 10.0;
    pub const BODY_LAYER: u8 = 4;
    /// Degrees per frame while a turn key is held
    pub const TURN_SPEED: f32 = 5.0;

    /// Ball defaults
    pub const BALL_MASS: f32 = 150.0;
    /// Initial ball velocity components are drawn from [-BALL_MAX_START_SPEED, BALL_MAX_START_SPEED)
    pub const BALL_MAX_START_SPEED: f32 = 50.0;

    /// Bullet defaults
    pub const BULLET_MASS: f32 = 5.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    /// Seconds before a bullet self-destructs
    pub const BULLET_LIFETIME: f32 = 8.5;
    /// Muzzle speed of bullets fired by the player
    pub const BULLET_FIRE_SPEED: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_MASS: f32 = 50.0;
    pub const PLAYER_FRICTION: f32 = 0.992;
    pub const PLAYER_HITPOINTS: f32 = 200.0;
    pub const PLAYER_DAMAGE: f32 = 1.0;
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Size of the player sprite image in pixels
    pub const PLAYER_SPRITE_SIZE: (f32, f32) = (32.0, 36.0);
    pub const PLAYER_LAYER: u8 = 5;

    /// Health bar geometry
    pub const HEALTH_BAR_HEIGHT: f32 = 7.0;
    pub const HEALTH_BAR_GAP: f32 = 10.0;
}

/// Unit direction the body faces for a given angle in degrees.
///
/// Angle 0 faces up the screen (negative y); positive angles turn left.
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let a = angle_deg.to_radians();
    Vec2::new(-a.sin(), -a.cos())
}

/// Unit direction to the right of the heading for a given angle in degrees
#[inline]
pub fn strafe_vector(angle_deg: f32) -> Vec2 {
    let a = angle_deg.to_radians();
    Vec2::new(a.cos(), -a.sin())
}

/// Angle in degrees whose heading points along `dir`
#[inline]
pub fn heading_angle(dir: Vec2) -> f32 {
    (-dir.x).atan2(-dir.y).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector_cardinals() {
        let up = heading_vector(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);

        let left = heading_vector(90.0);
        assert!((left.x + 1.0).abs() < 1e-6 && left.y.abs() < 1e-6);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        for angle in [0.0, 33.0, 90.0, 180.0, 271.0] {
            assert!(heading_vector(angle).dot(strafe_vector(angle)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_heading_angle_inverts_heading_vector() {
        for angle in [-170.0, -45.0, 0.0, 30.0, 120.0] {
            let back = heading_angle(heading_vector(angle));
            assert!((back - angle).abs() < 1e-3, "{angle} -> {back}");
        }
    }
}
