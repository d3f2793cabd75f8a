//! Advances the simulation one fixed tick at a time.
//!
//! Grounded on the teacher's `engine_core::Time::should_fixed_update`
//! accumulator shape for "track an in-world clock separately from the
//! physics dt", and on `physics::PhysicsWorld`'s step invocation for the
//! solver-advance call itself. The six-step ordering (score-time →
//! head torque → control → solve → score → termination) is load-bearing
//! and comes straight from the spec: reordering it changes which game-state
//! transitions a contact inside step 4 can still affect in step 5/6.

use crate::constants::{HEAD_TORQUE_BIAS, HEAD_TORQUE_GAIN};
use crate::contact;
use crate::control::{self, KeyState};
use crate::state::GameState;
use crate::world::RagdollWorld;

/// Rounds to the nearest integer, ties away from zero. `f32::round` already
/// has this behaviour (unlike languages whose default rounds half-to-even),
/// so this is a thin named wrapper kept for the scoring call sites to read
/// as intentional rather than incidental.
pub fn round_half_away_from_zero(x: f32) -> f32 {
    x.round()
}

/// Runs one fixed tick: advances `scoreTime`, applies the head-stabilising
/// torque, runs the control translator, advances the solver, resolves any
/// contacts that began this step, and updates score/termination state.
///
/// `physics_dt` is the solver timestep (defaults to [`PHYSICS_DT`] at the
/// call site in `lib.rs`); `score_dt` is the separate score-time delta the
/// spec allows callers to override independently.
pub fn step(
    world: &mut RagdollWorld,
    state: &mut GameState,
    keys: KeyState,
    physics_dt: f32,
    score_dt: f32,
    warned_missing_joint: &mut bool,
) {
    if !state.game_ended {
        state.score_time += score_dt;
    }

    if !state.fallen {
        if let Some(head_angle) = world.body_angle("head") {
            let torque = HEAD_TORQUE_GAIN * (head_angle + HEAD_TORQUE_BIAS);
            world.apply_torque("head", torque);
        }
    }

    control::apply(world, keys, warned_missing_joint);

    let contacts = world.step(physics_dt);
    contact::process(world, state, &contacts);

    if !state.jump_landed && !state.game_ended {
        if let Some(x) = world.body_center_x("torso") {
            state.score = round_half_away_from_zero(x) / 10.0;
        }
    }

    if state.jump_landed && !state.game_ended {
        state.game_ended = true;
    } else if !state.jump_landed && !state.game_ended && state.fallen {
        state.game_ended = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    fn fresh() -> (RagdollWorld, GameState) {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        (world, GameState::default())
    }

    #[test]
    fn score_time_advances_only_while_not_ended() {
        let (mut world, mut state) = fresh();
        for _ in 0..50 {
            let mut warned = false;
            step(&mut world, &mut state, KeyState::default(), constants::PHYSICS_DT, constants::PHYSICS_DT, &mut warned);
        }
        assert!((state.score_time - 2.0).abs() < 1e-4);
    }

    #[test]
    fn score_time_freezes_once_game_ended() {
        let (mut world, mut state) = fresh();
        state.game_ended = true;
        let before = state.score_time;
        let mut warned = false;
        step(&mut world, &mut state, KeyState::default(), constants::PHYSICS_DT, constants::PHYSICS_DT, &mut warned);
        assert_eq!(state.score_time, before);
    }

    #[test]
    fn fallen_without_game_ended_terminates_on_next_step() {
        let (mut world, mut state) = fresh();
        state.fallen = true;
        assert!(!state.game_ended);
        let mut warned = false;
        step(&mut world, &mut state, KeyState::default(), constants::PHYSICS_DT, constants::PHYSICS_DT, &mut warned);
        assert!(state.game_ended);
    }

    #[test]
    fn unactuated_ragdoll_eventually_falls_within_fifty_steps() {
        let (mut world, mut state) = fresh();
        let mut fell_at = None;
        for i in 0..50 {
            let mut warned = false;
            step(&mut world, &mut state, KeyState::default(), constants::PHYSICS_DT, constants::PHYSICS_DT, &mut warned);
            if state.fallen && fell_at.is_none() {
                fell_at = Some(i);
            }
        }
        assert!(fell_at.is_some(), "ragdoll never fell under pure gravity in 50 steps");
    }

    #[test]
    fn rounding_ties_go_away_from_zero() {
        assert_eq!(round_half_away_from_zero(0.5), 1.0);
        assert_eq!(round_half_away_from_zero(-0.5), -1.0);
        assert_eq!(round_half_away_from_zero(2.5), 3.0);
    }
}
