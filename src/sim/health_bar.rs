//! Health bars: dependents that follow a body and show its hitpoints

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::{HEALTH_BAR_GAP, HEALTH_BAR_HEIGHT};

/// A bar drawn above its owner. Holds the owner's id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthBar {
    pub id: u32,
    pub owner: u32,
    /// Center of the bar
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: [u8; 3],
    /// Filled share of the bar, 0..=1
    pub fraction: f32,
}

impl HealthBar {
    pub fn new(id: u32, owner: &Body) -> Self {
        let mut bar = Self {
            id,
            owner: owner.id,
            pos: owner.pos,
            width: owner.half_extent.x * 2.0,
            height: HEALTH_BAR_HEIGHT,
            color: [0, 255, 0],
            fraction: 1.0,
        };
        bar.track(owner);
        bar
    }

    /// Follow the owner. Returns false when the owner is gone and the bar
    /// should be removed.
    pub fn update(&mut self, owner: Option<&Body>) -> bool {
        match owner {
            Some(owner) => {
                self.track(owner);
                true
            }
            None => false,
        }
    }

    fn track(&mut self, owner: &Body) {
        self.pos = Vec2::new(
            owner.pos.x,
            owner.pos.y - owner.half_extent.y - HEALTH_BAR_GAP,
        );
        self.fraction = owner.health_fraction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, BodyParams};

    #[test]
    fn test_bar_tracks_owner() {
        let params = BodyParams::for_kind(BodyKind::Ball)
            .at(100.0, 200.0)
            .with_radius(20.0);
        let mut owner = Body::new(1, params, Vec2::ZERO, [1, 2, 3]);
        let mut bar = HealthBar::new(2, &owner);
        assert_eq!(bar.width, 40.0);
        assert_eq!(bar.pos, Vec2::new(100.0, 170.0));

        owner.pos = Vec2::new(150.0, 250.0);
        owner.hitpoints = 25.0;
        assert!(bar.update(Some(&owner)));
        assert_eq!(bar.pos, Vec2::new(150.0, 220.0));
        assert!((bar.fraction - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_bar_dies_without_owner() {
        let params = BodyParams::for_kind(BodyKind::Player);
        let owner = Body::new(1, params, Vec2::ZERO, [0, 0, 0]);
        let mut bar = HealthBar::new(2, &owner);
        assert!(!bar.update(None));
    }
}
