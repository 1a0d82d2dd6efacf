//! Per-frame gameplay update
//!
//! Order within a frame: movement force, ground test and jump, physics
//! sub-steps, floor tunneling fix, item pickup, clear check.

use glam::Vec2;

use super::physics::{BodyHandle, PhysicsWorld};
use super::stage::Platform;
use super::state::{ClearState, GameState};
use crate::consts::{SUB_DT, SUBSTEPS};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Jump pressed this frame (rising edge)
    pub jump: bool,
    /// Demo mode - steer toward the nearest item
    pub idle_mode: bool,
}

/// What happened during a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Ids of the items picked up, in generation order
    pub picked: Vec<u32>,
    pub jumped: bool,
    /// The stage was cleared on this frame
    pub cleared: bool,
}

/// Advance the stage by one frame. `frame` is the global frame counter.
pub fn tick(state: &mut GameState, input: &TickInput, frame: u64) -> TickReport {
    let mut report = TickReport::default();
    let input = if input.idle_mode { autopilot(state) } else { *input };

    let settings = &state.settings;
    let body = state.player.body;

    if input.left {
        state.world.apply_force(body, Vec2::new(-settings.move_power, 0.0));
    }
    if input.right {
        state.world.apply_force(body, Vec2::new(settings.move_power, 0.0));
    }

    let grounded = on_ground(
        state.player_pos(),
        state.player.radius,
        settings.floor_y(),
        &state.platforms,
        settings.jump_margin,
    );
    if grounded && input.jump {
        state.world.apply_impulse(body, Vec2::new(0.0, -settings.jump_power));
        report.jumped = true;
    }

    for _ in 0..SUBSTEPS {
        state.world.step(SUB_DT);
    }

    correct_tunneling(&mut state.world, body, state.settings.floor_y());

    report.picked = collect_items(state);

    if !state.clear.is_cleared() && state.score >= state.item_total() {
        let elapsed_frames = frame.saturating_sub(state.start_frame);
        state.clear = ClearState::Cleared { elapsed_frames };
        report.cleared = true;
        log::info!(
            "Stage {} cleared in {:.2} sec",
            state.seed,
            crate::frames_to_secs(elapsed_frames)
        );
    }

    report
}

/// Position-proximity ground test.
///
/// True when the ball is at or below the floor contact height minus `margin`,
/// or horizontally over a platform and within `margin` of resting on it.
pub fn on_ground(pos: Vec2, radius: f32, floor_y: f32, platforms: &[Platform], margin: f32) -> bool {
    if pos.y >= floor_y - radius - 1.0 - margin {
        return true;
    }
    platforms.iter().any(|p| {
        (pos.x - p.pos.x).abs() < p.half_width() && (pos.y - p.contact_y(radius)).abs() < margin
    })
}

/// Clamp a body that sank past the floor line back onto it.
///
/// Only the vertical velocity is zeroed. Returns whether a correction happened.
pub fn correct_tunneling(world: &mut PhysicsWorld, body: BodyHandle, floor_y: f32) -> bool {
    let (Some(pos), Some(vel)) = (world.position(body), world.velocity(body)) else {
        return false;
    };
    if pos.y <= floor_y {
        return false;
    }
    world.set_position(body, Vec2::new(pos.x, floor_y));
    world.set_velocity(body, Vec2::new(vel.x, 0.0));
    true
}

/// Pick up every remaining item within the pickup radius of the player.
///
/// Decides against a snapshot of the remaining items, then removes the picked
/// ones from the world and the live list. Returns the picked ids.
pub fn collect_items(state: &mut GameState) -> Vec<u32> {
    let player = state.player_pos();
    let radius = state.settings.pickup_radius;

    let picked: Vec<_> = state
        .items
        .iter()
        .filter(|live| player.distance(live.item.pos) <= radius)
        .copied()
        .collect();

    for live in &picked {
        state.world.remove_body(live.body);
        state.score += 1;
        log::debug!("Picked item {} at {}", live.item.id, live.item.pos);
    }
    state
        .items
        .retain(|live| !picked.iter().any(|p| p.item.id == live.item.id));

    picked.iter().map(|live| live.item.id).collect()
}

/// Demo input: head for the nearest item and jump when it is overhead.
fn autopilot(state: &GameState) -> TickInput {
    let pos = state.player_pos();
    let Some(target) = state
        .items
        .iter()
        .map(|live| live.item.pos)
        .min_by(|a, b| {
            a.distance_squared(pos)
                .partial_cmp(&b.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    else {
        return TickInput::default();
    };

    let dx = target.x - pos.x;
    TickInput {
        left: dx < -2.0,
        right: dx > 2.0,
        jump: target.y < pos.y - state.player.radius * 2.0,
        idle_mode: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::physics::{BodyKind, ShapeDesc};
    use crate::sim::rng::StageRng;
    use crate::sim::stage::Item;
    use crate::sim::state::LiveItem;

    fn fresh(seed: u64) -> GameState {
        GameState::new(seed, &Settings::default(), &mut StageRng::new(0), 0)
    }

    /// A stage with no platforms and a single item
    fn bare(seed: u64) -> GameState {
        let settings = Settings {
            item_count: 1,
            platform_rounds: 0,
            ..Settings::default()
        };
        GameState::new(seed, &settings, &mut StageRng::new(0), 0)
    }

    /// Replace the generated items with sensors at the given points
    fn place_items(state: &mut GameState, points: &[Vec2]) {
        for live in std::mem::take(&mut state.items) {
            state.world.remove_body(live.body);
        }
        for (id, &pos) in points.iter().enumerate() {
            let body = state
                .world
                .add_body_with_shape(BodyKind::Static, pos, ShapeDesc::rect(8.0, 8.0).sensor(true));
            state.items.push(LiveItem {
                item: Item { id: id as u32, pos },
                body,
            });
        }
    }

    #[test]
    fn test_on_ground_floor() {
        // floor 235, radius 5 -> contact 229, margin 5 -> threshold 224
        assert!(on_ground(Vec2::new(80.0, 229.0), 5.0, 235.0, &[], 5.0));
        assert!(on_ground(Vec2::new(80.0, 224.0), 5.0, 235.0, &[], 5.0));
        assert!(!on_ground(Vec2::new(80.0, 223.9), 5.0, 235.0, &[], 5.0));
        assert!(on_ground(Vec2::new(80.0, 240.0), 5.0, 235.0, &[], 5.0));
    }

    #[test]
    fn test_on_ground_platform() {
        let platforms = [Platform::new(60.0, 100.0, 30.0, 6.0)];
        // contact height: 100 - 5 - 1 = 94
        assert!(on_ground(Vec2::new(60.0, 94.0), 5.0, 235.0, &platforms, 5.0));
        assert!(on_ground(Vec2::new(74.9, 90.5), 5.0, 235.0, &platforms, 5.0));
        // beyond the half width
        assert!(!on_ground(Vec2::new(75.0, 94.0), 5.0, 235.0, &platforms, 5.0));
        // too far above or below the surface
        assert!(!on_ground(Vec2::new(60.0, 89.0), 5.0, 235.0, &platforms, 5.0));
        assert!(!on_ground(Vec2::new(60.0, 99.0), 5.0, 235.0, &platforms, 5.0));
    }

    #[test]
    fn test_tunneling_correction() {
        let mut state = fresh(42);
        let body = state.player.body;
        state.world.set_position(body, Vec2::new(50.0, 240.0));
        state.world.set_velocity(body, Vec2::new(12.5, 300.0));

        assert!(correct_tunneling(&mut state.world, body, 235.0));
        assert_eq!(state.player_pos(), Vec2::new(50.0, 235.0));
        assert_eq!(state.player_vel(), Vec2::new(12.5, 0.0));
    }

    #[test]
    fn test_no_correction_above_floor() {
        let mut state = fresh(42);
        let body = state.player.body;
        state.world.set_velocity(body, Vec2::new(1.0, 2.0));
        assert!(!correct_tunneling(&mut state.world, body, 235.0));
        assert_eq!(state.player_vel(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_tick_puts_tunneled_player_on_floor() {
        let mut state = bare(42);
        let body = state.player.body;
        let floor_y = state.settings.floor_y();
        state.world.set_position(body, Vec2::new(50.0, floor_y + 25.0));
        state.world.set_velocity(body, Vec2::new(12.5, 400.0));

        tick(&mut state, &TickInput::default(), 1);

        let pos = state.player_pos();
        assert_eq!(pos.y, floor_y);
        assert!(pos.x > 50.0);
        assert_eq!(state.player_vel(), Vec2::new(12.5, 0.0));
    }

    #[test]
    fn test_collect_multiple_items_same_frame() {
        let mut state = fresh(42);
        let pos = state.player_pos();
        place_items(
            &mut state,
            &[pos + Vec2::new(8.0, 0.0), Vec2::new(20.0, 20.0), pos + Vec2::new(0.0, -3.0)],
        );

        let picked = collect_items(&mut state);
        assert_eq!(picked, vec![0, 2]);
        assert_eq!(state.score, 2);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].item.id, 1);

        // Picked items are gone for good
        assert!(collect_items(&mut state).is_empty());
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_pickup_radius_is_inclusive() {
        let mut state = fresh(1);
        let pos = state.player_pos();
        place_items(&mut state, &[pos + Vec2::new(8.01, 0.0)]);
        assert!(collect_items(&mut state).is_empty());
        place_items(&mut state, &[pos + Vec2::new(6.0, 0.0)]);
        assert_eq!(collect_items(&mut state), vec![0]);
    }

    #[test]
    fn test_collected_bodies_leave_world() {
        let mut state = fresh(8);
        let pos = state.player_pos();
        place_items(&mut state, &[pos]);
        let body = state.items[0].body;
        collect_items(&mut state);
        assert!(!state.world.contains(body));
    }

    #[test]
    fn test_jump_only_on_ground_and_on_press() {
        let mut state = bare(5);
        place_items(&mut state, &[Vec2::new(20.0, 20.0)]);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        let report = tick(&mut state, &jump, 1);
        assert!(report.jumped);
        assert!(state.player_vel().y < 0.0);

        // Airborne a few frames later: a second press does nothing
        for frame in 2..6 {
            tick(&mut state, &TickInput::default(), frame);
        }
        assert!(!tick(&mut state, &jump, 6).jumped);
    }

    #[test]
    fn test_held_direction_accelerates() {
        let mut state = bare(5);
        place_items(&mut state, &[Vec2::new(20.0, 20.0)]);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 1);
        let v1 = state.player_vel().x;
        tick(&mut state, &right, 2);
        let v2 = state.player_vel().x;
        assert!(v1 > 0.0);
        assert!(v2 > v1);
    }

    #[test]
    fn test_clear_is_one_shot() {
        let mut state = bare(42);
        let pos = state.player_pos();
        place_items(&mut state, &[pos]);

        let report = tick(&mut state, &TickInput::default(), 90);
        assert!(report.cleared);
        assert_eq!(state.clear, ClearState::Cleared { elapsed_frames: 90 });

        for frame in 91..200 {
            assert!(!tick(&mut state, &TickInput::default(), frame).cleared);
        }
        assert_eq!(state.clear, ClearState::Cleared { elapsed_frames: 90 });
        assert_eq!(state.elapsed_secs(500), 3.0);
    }

    #[test]
    fn test_autopilot_targets_nearest_item() {
        let mut state = fresh(42);
        let pos = state.player_pos();
        place_items(&mut state, &[pos + Vec2::new(-30.0, -50.0), pos + Vec2::new(60.0, 0.0)]);
        let input = autopilot(&state);
        assert!(input.left && !input.right);
        assert!(input.jump);

        place_items(&mut state, &[]);
        assert_eq!(autopilot(&state), TickInput::default());
    }
}
