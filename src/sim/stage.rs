//! Stage layout generation
//!
//! A stage is a fixed number of items plus up to `platform_rounds` platforms,
//! all drawn from the seeded stream in a fixed order: every item (x, y),
//! then every platform candidate (w, x, y). Platforms use rejection sampling
//! with a bounded number of candidates per round; a round that finds no free
//! spot places nothing, so some stages have fewer platforms than others.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::StageRng;
use crate::settings::Settings;

/// A collectible item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Generation index, stable for the life of the stage
    pub id: u32,
    pub pos: Vec2,
}

/// A static platform rectangle, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Center height of a ball of `radius` resting on this platform
    pub fn contact_y(&self, radius: f32) -> f32 {
        self.pos.y - radius - 1.0
    }
}

/// Items and platforms of one stage, in generation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub items: Vec<Item>,
    pub platforms: Vec<Platform>,
}

impl StageLayout {
    /// Generate the full layout. Consumes the stream in item-then-platform order.
    pub fn generate(rng: &mut StageRng, settings: &Settings) -> Self {
        let items = generate_items(rng, settings);
        let platforms = generate_platforms(rng, settings);
        Self { items, platforms }
    }
}

/// Sample `item_count` items uniformly inside the item margins.
///
/// Items are not checked against each other or against platforms.
pub fn generate_items(rng: &mut StageRng, settings: &Settings) -> Vec<Item> {
    let floor = settings.floor_line();
    (0..settings.item_count)
        .map(|id| {
            let x = rng.rndi(settings.item_margin_x, settings.width - settings.item_margin_x);
            let y = rng.rndi(settings.item_margin_top, floor - settings.item_margin_bottom);
            Item {
                id,
                pos: Vec2::new(x as f32, y as f32),
            }
        })
        .collect()
}

/// Run every placement round and collect the platforms that found room.
pub fn generate_platforms(rng: &mut StageRng, settings: &Settings) -> Vec<Platform> {
    let mut placed = Vec::with_capacity(settings.platform_rounds as usize);
    for _ in 0..settings.platform_rounds {
        if let Some(platform) = try_place_platform(rng, settings, &placed) {
            placed.push(platform);
        }
    }
    placed
}

/// One placement round: the first of up to `platform_candidates` candidates
/// that clears every placed platform, or `None` if all of them collide.
pub fn try_place_platform(rng: &mut StageRng, settings: &Settings, placed: &[Platform]) -> Option<Platform> {
    let floor = settings.floor_line();
    let h = settings.platform_height;
    for _ in 0..settings.platform_candidates {
        let w = rng.rndi(settings.platform_min_width, settings.platform_max_width);
        let x = rng.rndi(
            settings.platform_margin_x + w / 2,
            settings.width - settings.platform_margin_x - w / 2,
        );
        let y = rng.rndi(
            settings.platform_margin_top + h / 2,
            floor - settings.platform_margin_bottom - h / 2,
        );
        let candidate = Platform::new(x as f32, y as f32, w as f32, h as f32);

        if !placed
            .iter()
            .any(|other| platforms_collide(&candidate, other, settings.platform_spacing))
        {
            return Some(candidate);
        }
    }
    None
}

/// Inflated AABB overlap: on both axes the center distance is below the
/// combined half extents plus `spacing`.
pub fn platforms_collide(a: &Platform, b: &Platform, spacing: f32) -> bool {
    let d = (a.pos - b.pos).abs();
    d.x < (a.width + b.width) / 2.0 + spacing && d.y < (a.height + b.height) / 2.0 + spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(seed: u64) -> StageLayout {
        let settings = Settings::default();
        StageLayout::generate(&mut StageRng::new(seed), &settings)
    }

    #[test]
    fn test_collision_predicate() {
        let a = Platform::new(50.0, 100.0, 20.0, 6.0);
        // Horizontal gap exactly at the threshold: (20 + 20) / 2 + 12 = 32
        assert!(!platforms_collide(&a, &Platform::new(82.0, 100.0, 20.0, 6.0), 12.0));
        assert!(platforms_collide(&a, &Platform::new(81.0, 100.0, 20.0, 6.0), 12.0));
        // Vertical threshold: (6 + 6) / 2 + 12 = 18
        assert!(!platforms_collide(&a, &Platform::new(50.0, 118.0, 20.0, 6.0), 12.0));
        assert!(platforms_collide(&a, &Platform::new(50.0, 117.5, 20.0, 6.0), 12.0));
        // Both axes must be close
        assert!(!platforms_collide(&a, &Platform::new(60.0, 140.0, 20.0, 6.0), 12.0));
    }

    #[test]
    fn test_first_platform_always_placed() {
        let settings = Settings::default();
        let mut rng = StageRng::new(3);
        assert!(try_place_platform(&mut rng, &settings, &[]).is_some());
    }

    #[test]
    fn test_blocked_round_places_nothing() {
        // One huge platform covering the whole playable area blocks every candidate
        let settings = Settings::default();
        let wall = Platform::new(80.0, 120.0, 400.0, 400.0);
        let mut rng = StageRng::new(11);
        assert_eq!(try_place_platform(&mut rng, &settings, &[wall]), None);
    }

    #[test]
    fn test_blocked_round_consumes_all_candidates() {
        let settings = Settings::default();
        let wall = Platform::new(80.0, 120.0, 400.0, 400.0);
        let mut rng = StageRng::new(11);
        try_place_platform(&mut rng, &settings, &[wall]);

        // Replay exactly the draws of ten rejected candidates
        let mut replay = StageRng::new(11);
        for _ in 0..settings.platform_candidates {
            let w = replay.rndi(10, 50);
            replay.rndi(17 + w / 2, 160 - 17 - w / 2);
            replay.rndi(27 + 3, 235 - 17 - 3);
        }
        assert_eq!(rng.rndi(0, 1 << 20), replay.rndi(0, 1 << 20));
    }

    #[test]
    fn test_no_rounds_no_platforms() {
        let settings = Settings {
            platform_rounds: 0,
            ..Settings::default()
        };
        let stage = StageLayout::generate(&mut StageRng::new(5), &settings);
        assert!(stage.platforms.is_empty());
        assert_eq!(stage.items.len(), 10);
    }

    #[test]
    fn test_item_ids_follow_generation_order() {
        let stage = layout(42);
        let ids: Vec<u32> = stage.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn same_seed_same_stage(seed in 0u64..200_000) {
            prop_assert_eq!(layout(seed), layout(seed));
        }

        #[test]
        fn placed_platforms_never_collide(seed in 0u64..200_000) {
            let stage = layout(seed);
            for (i, a) in stage.platforms.iter().enumerate() {
                for b in &stage.platforms[i + 1..] {
                    prop_assert!(!platforms_collide(a, b, 12.0), "{:?} vs {:?}", a, b);
                }
            }
        }

        #[test]
        fn counts_within_limits(seed in 0u64..200_000) {
            let stage = layout(seed);
            prop_assert_eq!(stage.items.len(), 10);
            prop_assert!(stage.platforms.len() <= 20);
        }

        #[test]
        fn everything_inside_playfield(seed in 0u64..200_000) {
            let settings = Settings::default();
            let stage = layout(seed);
            let floor = settings.floor_y();
            for item in &stage.items {
                prop_assert!(item.pos.x >= 10.0 && item.pos.x <= 150.0);
                prop_assert!(item.pos.y >= 20.0 && item.pos.y <= floor - 20.0);
            }
            for p in &stage.platforms {
                prop_assert!(p.pos.x - p.half_width() >= 16.0);
                prop_assert!(p.pos.x + p.half_width() <= 144.0);
                prop_assert!(p.pos.y - p.height / 2.0 >= 27.0);
                prop_assert!(p.pos.y + p.height / 2.0 <= floor - 17.0);
            }
        }
    }
}
