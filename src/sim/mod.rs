//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed sub-steps only
//! - Seeded RNG only, reseeded before any stage sampling
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod physics;
pub mod rng;
pub mod seed;
pub mod stage;
pub mod state;
pub mod tick;

pub use physics::{BodyHandle, BodyKind, PhysicsWorld, Shape, ShapeDesc};
pub use rng::StageRng;
pub use seed::next_seed_from_digit;
pub use stage::{Item, Platform, StageLayout, generate_items, generate_platforms, platforms_collide, try_place_platform};
pub use state::{ClearState, GameState, LiveItem, Player};
pub use tick::{TickInput, TickReport, collect_items, correct_tunneling, on_ground, tick};
