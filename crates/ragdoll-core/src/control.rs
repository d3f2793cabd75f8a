//! Per-step translation of the four-button control surface into joint motor
//! targets and hip-limit reconfiguration.
//!
//! Grounded on `crates/input/src/lib.rs`'s query-style input reads, adapted
//! to the fixed four-key `(q, w, o, p)` state this core's control scheme
//! uses instead of a general keyboard/mouse surface.

use log::warn;

use crate::constants::{DEFAULT_LEFT_HIP_LIMITS, DEFAULT_RIGHT_HIP_LIMITS};
use crate::world::RagdollWorld;

/// The four buttons read by the control translator each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub q: bool,
    pub w: bool,
    pub o: bool,
    pub p: bool,
}

/// Translates `keys` into joint motor targets and hip-limit overwrites for
/// one step. `warned` tracks whether a missing-joint warning has already
/// fired this reset generation (§10.1: a single rate-limited `warn!` per
/// generation, not one per step, so a long-running stuck episode with no
/// world built doesn't spam the log).
pub fn apply(world: &mut RagdollWorld, keys: KeyState, warned: &mut bool) {
    let mut all_found = true;
    all_found &= apply_q_group(world, keys);
    all_found &= apply_o_group(world, keys);

    if !all_found && !*warned {
        warn!("control translator: one or more joints not found; world may not be built yet");
        *warned = true;
    }
}

/// Q dominates W when both are held; with neither held, all four motors go
/// to rest. Returns `false` if any of the four joints this group touches
/// was missing.
fn apply_q_group(world: &mut RagdollWorld, keys: KeyState) -> bool {
    let (right_hip, left_hip, right_shoulder, left_shoulder) = if keys.q {
        (2.5, -2.5, -2.0, 2.0)
    } else if keys.w {
        (-2.5, 2.5, 2.0, -2.0)
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };
    let mut found = world.set_joint_motor_velocity("rightHip", right_hip);
    found &= world.set_joint_motor_velocity("leftHip", left_hip);
    found &= world.set_joint_motor_velocity("rightShoulder", right_shoulder);
    found &= world.set_joint_motor_velocity("leftShoulder", left_shoulder);
    found
}

/// O dominates P. Hip limits are overwritten every step rather than pushed
/// onto a stack: the "neither held" branch runs every step neither O nor P
/// is held and restores the default stance limits. Returns `false` if any
/// of the joints this group touches was missing.
fn apply_o_group(world: &mut RagdollWorld, keys: KeyState) -> bool {
    if keys.o {
        let mut found = world.set_joint_motor_velocity("rightKnee", 2.5);
        found &= world.set_joint_motor_velocity("leftKnee", -2.5);
        found &= world.set_joint_limits("leftHip", -1.0, 1.0);
        found &= world.set_joint_limits("rightHip", -1.3, 0.7);
        found
    } else if keys.p {
        let mut found = world.set_joint_motor_velocity("rightKnee", -2.5);
        found &= world.set_joint_motor_velocity("leftKnee", 2.5);
        found &= world.set_joint_limits("leftHip", -1.5, 0.5);
        found &= world.set_joint_limits("rightHip", -0.8, 1.2);
        found
    } else {
        let mut found = world.set_joint_motor_velocity("rightKnee", 0.0);
        found &= world.set_joint_motor_velocity("leftKnee", 0.0);
        found &= world.set_joint_limits("leftHip", DEFAULT_LEFT_HIP_LIMITS.0, DEFAULT_LEFT_HIP_LIMITS.1);
        found &= world.set_joint_limits("rightHip", DEFAULT_RIGHT_HIP_LIMITS.0, DEFAULT_RIGHT_HIP_LIMITS.1);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_dominates_w_when_both_held() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut warned = false;
        apply(
            &mut world,
            KeyState {
                q: true,
                w: true,
                o: false,
                p: false,
            },
            &mut warned,
        );
        // No direct motor-speed accessor exists on RagdollWorld (it isn't
        // needed by the public API), so this test only checks that applying
        // a combined key state doesn't panic and, since the world is fully
        // built, that no missing-joint warning fires.
        assert!(!warned);
    }

    #[test]
    fn o_dominates_p_when_both_held() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut warned = false;
        apply(
            &mut world,
            KeyState {
                q: false,
                w: false,
                o: true,
                p: true,
            },
            &mut warned,
        );
        assert!(!warned);
    }

    #[test]
    fn no_keys_held_is_a_no_op_shape() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut warned = false;
        apply(&mut world, KeyState::default(), &mut warned);
        assert!(!warned);
    }

    #[test]
    fn missing_joints_warn_once_per_generation() {
        let mut world = RagdollWorld::new();
        // No build_ragdoll(): every joint lookup misses.
        let mut warned = false;
        apply(&mut world, KeyState::default(), &mut warned);
        assert!(warned);
        apply(&mut world, KeyState::default(), &mut warned);
        assert!(warned);
    }
}
