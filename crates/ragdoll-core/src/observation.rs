//! Read-only export of the current world/game state into the fixed-shape
//! record policy code consumes.
//!
//! Structurally mirrors the teacher's `RaycastHit`-returning query methods
//! in `physics/src/raycast.rs`: a plain data struct produced by a read-only
//! method with no mutation of the world it reads.

use crate::constants::{BODY_PARTS, DISTANCE_LOWER_BOUND, DISTANCE_UPPER_BOUND, SUCCESS_THRESHOLD};
use crate::state::GameState;
use crate::world::RagdollWorld;

/// One body part's contribution to the observation vector:
/// `(worldCenter.x, worldCenter.y, angle, linearVelocity.x, linearVelocity.y)`.
pub const SCALARS_PER_PART: usize = 5;
pub const OBS_LEN: usize = BODY_PARTS.len() * SCALARS_PER_PART;

/// Fixed-shape record handed back to the training loop each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub obs: [f32; OBS_LEN],
    pub distance: f32,
    pub time: f32,
    pub game_ended: bool,
    pub success: bool,
    pub fallen: bool,
    pub jumped: bool,
    pub jump_landed: bool,
}

impl Default for Observation {
    /// All-zero record, returned when a core is queried before its first
    /// reset (§7: "the observation exporter is tolerant of missing
    /// bodies").
    fn default() -> Self {
        Self {
            obs: [0.0; OBS_LEN],
            distance: 0.0,
            time: 0.0,
            game_ended: false,
            success: false,
            fallen: false,
            jumped: false,
            jump_landed: false,
        }
    }
}

/// Builds the observation record from the current world and game state.
/// Missing bodies (world not yet built) contribute five zeros each rather
/// than erroring, per §7's "observation exporter is tolerant of missing
/// bodies".
pub fn export(world: &RagdollWorld, state: &GameState) -> Observation {
    let mut obs = [0.0f32; OBS_LEN];
    for (i, part) in BODY_PARTS.iter().enumerate() {
        let base = i * SCALARS_PER_PART;
        let center = world.body_center(part.name);
        let angle = world.body_angle(part.name);
        let linvel = world.body_linvel(part.name);
        if let (Some((x, y)), Some(angle), Some((vx, vy))) = (center, angle, linvel) {
            obs[base] = x;
            obs[base + 1] = y;
            obs[base + 2] = angle;
            obs[base + 3] = vx;
            obs[base + 4] = vy;
        }
    }

    let distance = world.body_center_x("torso").map(|x| x / 10.0).unwrap_or(0.0);
    let time = state.score_time / 10.0;
    let game_ended =
        state.game_ended || distance < DISTANCE_LOWER_BOUND || distance > DISTANCE_UPPER_BOUND;
    let success = distance > SUCCESS_THRESHOLD;

    Observation {
        obs,
        distance,
        time,
        game_ended,
        success,
        fallen: state.fallen,
        jumped: state.jumped,
        jump_landed: state.jump_landed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[test]
    fn missing_bodies_contribute_zeros() {
        let world = RagdollWorld::new();
        let state = GameState::default();
        let observation = export(&world, &state);
        assert_eq!(observation.obs, [0.0; OBS_LEN]);
        assert_eq!(observation.distance, 0.0);
    }

    #[test]
    fn cold_start_observation_matches_spawn_table() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let state = GameState::default();
        let observation = export(&world, &state);

        for (i, part) in constants::BODY_PARTS.iter().enumerate() {
            let base = i * SCALARS_PER_PART;
            assert_eq!(observation.obs[base], part.x, "{} x", part.name);
            assert_eq!(observation.obs[base + 1], part.y, "{} y", part.name);
            assert!((observation.obs[base + 2] - part.angle).abs() < 1e-3, "{} angle", part.name);
        }

        let torso = constants::body_part("torso").unwrap();
        assert!((observation.distance - torso.x / 10.0).abs() < 1e-4);
        assert_eq!(observation.time, 0.0);
        assert!(!observation.fallen);
        assert!(!observation.game_ended);
    }

    #[test]
    fn distance_bounds_force_game_ended_even_without_internal_flag() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        world.set_body_translation("torso", 1060.0, 0.0);
        let state = GameState::default();
        let observation = export(&world, &state);
        assert!(!state.game_ended);
        assert!(observation.game_ended);
        assert!(observation.success);
    }

    #[test]
    fn success_flag_requires_distance_strictly_above_hundred() {
        let world = RagdollWorld::new();
        world.build_ragdoll();
        let state = GameState::default();
        let observation = export(&world, &state);
        assert!(!observation.success);
    }
}
