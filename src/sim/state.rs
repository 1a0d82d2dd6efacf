//! Per-stage game state
//!
//! Everything here is built wholesale by [`GameState::new`] and thrown away on
//! the next reset. The physics world holds the authoritative positions.

use glam::Vec2;
use super::physics::{BodyHandle, BodyKind, PhysicsWorld, ShapeDesc};
use super::rng::StageRng;
use super::stage::{Item, Platform, StageLayout};
use crate::settings::Settings;

/// The player's ball
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub body: BodyHandle,
    pub radius: f32,
}

/// An item that has not been picked up yet, with its sensor body
#[derive(Debug, Clone, Copy)]
pub struct LiveItem {
    pub item: Item,
    pub body: BodyHandle,
}

/// Whether the stage has been cleared, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearState {
    #[default]
    Playing,
    /// Frozen at the frame the last item was picked up
    Cleared { elapsed_frames: u64 },
}

impl ClearState {
    pub fn is_cleared(&self) -> bool {
        matches!(self, ClearState::Cleared { .. })
    }

    /// Clear time in seconds, if cleared
    pub fn clear_time(&self) -> Option<f32> {
        match *self {
            ClearState::Cleared { elapsed_frames } => Some(crate::frames_to_secs(elapsed_frames)),
            ClearState::Playing => None,
        }
    }
}

/// Complete state of one stage
#[derive(Debug)]
pub struct GameState {
    /// Seed this stage was generated from
    pub seed: u64,
    pub settings: Settings,
    pub world: PhysicsWorld,
    pub player: Player,
    /// Remaining items, in generation order
    pub items: Vec<LiveItem>,
    pub platforms: Vec<Platform>,
    /// Items collected so far
    pub score: u32,
    pub clear: ClearState,
    /// Global frame at which this stage started
    pub start_frame: u64,
    /// Items generated for this stage
    item_total: u32,
}

impl GameState {
    /// Build a fresh stage. Reseeds `rng` with `seed` before any sampling.
    pub fn new(seed: u64, settings: &Settings, rng: &mut StageRng, start_frame: u64) -> Self {
        rng.reseed(seed);

        let mut world = PhysicsWorld::new(Vec2::new(0.0, settings.gravity));
        let player = spawn_player(&mut world, settings);
        build_walls(&mut world, settings);

        let layout = StageLayout::generate(rng, settings);
        let items = layout
            .items
            .iter()
            .map(|item| LiveItem {
                item: *item,
                body: world.add_body_with_shape(
                    BodyKind::Static,
                    item.pos,
                    ShapeDesc::rect(settings.item_size, settings.item_size).sensor(true),
                ),
            })
            .collect();
        for platform in &layout.platforms {
            world.add_body_with_shape(
                BodyKind::Static,
                platform.pos,
                ShapeDesc::rect(platform.width, platform.height).elasticity(settings.object_elasticity),
            );
        }

        log::info!(
            "Stage {}: {} items, {} platforms",
            seed,
            layout.items.len(),
            layout.platforms.len()
        );

        Self {
            seed,
            settings: settings.clone(),
            world,
            player,
            items,
            platforms: layout.platforms,
            score: 0,
            clear: ClearState::Playing,
            start_frame,
            item_total: settings.item_count,
        }
    }

    /// Items generated for this stage (collected or not)
    pub fn item_total(&self) -> u32 {
        self.item_total
    }

    pub fn player_pos(&self) -> Vec2 {
        self.world.position(self.player.body).unwrap_or_default()
    }

    pub fn player_vel(&self) -> Vec2 {
        self.world.velocity(self.player.body).unwrap_or_default()
    }

    /// Seconds since the stage started, frozen once cleared
    pub fn elapsed_secs(&self, frame: u64) -> f32 {
        match self.clear {
            ClearState::Cleared { elapsed_frames } => crate::frames_to_secs(elapsed_frames),
            ClearState::Playing => crate::frames_to_secs(frame.saturating_sub(self.start_frame)),
        }
    }

    /// Remaining items and all platforms as a plain layout
    pub fn layout(&self) -> StageLayout {
        StageLayout {
            items: self.items.iter().map(|live| live.item).collect(),
            platforms: self.platforms.clone(),
        }
    }
}

fn spawn_player(world: &mut PhysicsWorld, settings: &Settings) -> Player {
    let spawn = Vec2::new((settings.width / 2) as f32, settings.floor_contact_y());
    let body = world.add_body_with_shape(
        BodyKind::Dynamic,
        spawn,
        ShapeDesc::circle(settings.player_radius)
            .elasticity(settings.player_elasticity)
            .mass(settings.player_mass),
    );
    Player {
        body,
        radius: settings.player_radius,
    }
}

/// Floor and side walls, as 2px-thick boxes on one static body
fn build_walls(world: &mut PhysicsWorld, settings: &Settings) {
    const THICKNESS: f32 = 2.0;
    let width = settings.width as f32;
    let floor_y = settings.floor_y();
    let walls = world.add_body(BodyKind::Static, Vec2::ZERO);

    world.attach(
        walls,
        ShapeDesc::rect(width + THICKNESS, THICKNESS)
            .offset(Vec2::new(width / 2.0, floor_y))
            .elasticity(settings.object_elasticity)
            .friction(settings.floor_friction),
    );

    let wall_height = floor_y - settings.wall_top;
    let wall_center_y = (settings.wall_top + floor_y) / 2.0;
    for x in [settings.wall_inset, width - settings.wall_inset] {
        world.attach(
            walls,
            ShapeDesc::rect(THICKNESS, wall_height + THICKNESS)
                .offset(Vec2::new(x, wall_center_y))
                .elasticity(settings.object_elasticity),
        );
    }
}
