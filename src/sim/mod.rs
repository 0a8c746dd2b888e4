//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod collision;
pub mod glide;
pub mod health_bar;
pub mod pairs;
pub mod tick;
pub mod world;

pub use arena::{Arena, Grid, GridError};
pub use body::{Body, BodyKind, BodyParams, Glide, Group, StepOutcome, Trail};
pub use collision::{bodies_intersect, circles_intersect, elastic_collision};
pub use glide::{GlideStart, begin_glide, glide_to_grid, teleport_to_grid};
pub use health_bar::HealthBar;
pub use pairs::{PAIRINGS, Pairing, intersecting_pairs};
pub use tick::{GridGlide, TickInput, tick};
pub use world::{DestroyReason, SimEvent, World, WorldSnapshot};
