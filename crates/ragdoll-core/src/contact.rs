//! Resolves new contacts into jump/landing/fall game-state transitions.
//!
//! Grounded on the teacher's `ChannelEventCollector` wiring in `world.rs`
//! (itself generalised from `physics_world.rs`) for collecting contact-begin
//! events, and on the `astraweave-physics` / `aaa-mmorpg-launcher` reference
//! examples' `narrow_phase.contact_pair(...).manifolds().points()` pattern
//! for pulling a world-space max-X out of a contact manifold. The state
//! machine itself (§4.4) is spec-literal.

use log::debug;

use crate::constants::{JUMP_THRESHOLD_PX, LANDING_THRESHOLD_PX, WORLD_SCALE};
use crate::state::GameState;
use crate::world::{ContactBegin, PartTag, RagdollWorld};

const FOOT_PARTS: [&str; 2] = ["leftFoot", "rightFoot"];
const UPPER_BODY_PARTS: [&str; 5] = ["head", "leftArm", "rightArm", "leftForearm", "rightForearm"];

/// Processes every contact that began during the step just taken, in the
/// order rapier delivered them. The spec's per-episode invariant (at most
/// one `fallen` transition, at most one `jumpLanded` transition) holds
/// regardless of delivery order because each transition is idempotent: a
/// second contact against an already-fallen/landed body is a no-op here.
pub fn process(world: &RagdollWorld, state: &mut GameState, contacts: &[ContactBegin]) {
    for contact in contacts {
        process_one(world, state, *contact);
    }
}

fn process_one(world: &RagdollWorld, state: &mut GameState, contact: ContactBegin) {
    let Some(part_name) = resolve_track_pair(world, contact) else {
        return;
    };

    let max_x = world
        .contact_max_x(contact.collider_a, contact.collider_b)
        .or_else(|| world.body_center_x(part_name))
        .unwrap_or(0.0);

    if FOOT_PARTS.contains(&part_name) {
        handle_foot_contact(state, part_name, max_x);
    } else if UPPER_BODY_PARTS.contains(&part_name) {
        handle_upper_body_contact(state, part_name, max_x);
    }
    // Other parts touching track (torso, thighs, calves) are ignored per §4.4.
}

/// Identifies whether exactly one side of the pair is tagged `"track"`,
/// returning the non-track part's name. Pairs that are neither or both
/// track are not this event's concern and are ignored.
fn resolve_track_pair(world: &RagdollWorld, contact: ContactBegin) -> Option<&'static str> {
    let tag_a = world.tag_of(contact.collider_a)?;
    let tag_b = world.tag_of(contact.collider_b)?;
    match (tag_a, tag_b) {
        (PartTag::Track, PartTag::Body(name)) => Some(name),
        (PartTag::Body(name), PartTag::Track) => Some(name),
        _ => None,
    }
}

fn handle_foot_contact(state: &mut GameState, part_name: &str, max_x: f32) {
    if state.game_ended || state.fallen {
        return;
    }
    let px = max_x * WORLD_SCALE;
    if !state.jumped && px > JUMP_THRESHOLD_PX {
        state.jumped = true;
        debug!("jump armed by {part_name} at px={px}");
    }
    if state.jumped && !state.jump_landed && px > LANDING_THRESHOLD_PX {
        state.jump_landed = true;
        let scored = max_x.round() / 10.0;
        state.score = scored;
        state.raise_high_score(scored);
        debug!("jump landed by {part_name} at px={px}, score={scored}");
    }
}

fn handle_upper_body_contact(state: &mut GameState, part_name: &str, max_x: f32) {
    if !state.fallen {
        state.fallen = true;
        debug!("fallen: {part_name} touched track at x={max_x}");
    }
    if state.jumped && !state.jump_landed {
        state.jump_landed = true;
    }
    let scored = max_x.round() / 10.0;
    state.score = scored;
    state.raise_high_score(scored);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ContactBegin;
    use rapier2d::prelude::ColliderHandle;

    fn find_collider(world: &RagdollWorld, name: &str) -> ColliderHandle {
        world.collider_of(name).expect("part must exist")
    }

    fn ground_collider(world: &RagdollWorld) -> ColliderHandle {
        world.track_collider_handles()[0]
    }

    #[test]
    fn foot_contact_below_jump_threshold_is_a_no_op() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut state = GameState::default();
        let contact = ContactBegin {
            collider_a: ground_collider(&world),
            collider_b: find_collider(&world, "leftFoot"),
        };
        process(&world, &mut state, std::slice::from_ref(&contact));
        assert!(!state.jumped);
        assert!(!state.fallen);
    }

    #[test]
    fn upper_body_contact_sets_fallen_once() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut state = GameState::default();
        let contact = ContactBegin {
            collider_a: find_collider(&world, "head"),
            collider_b: ground_collider(&world),
        };
        process(&world, &mut state, &[contact, contact]);
        assert!(state.fallen);
    }

    #[test]
    fn torso_contact_with_track_is_ignored() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut state = GameState::default();
        let contact = ContactBegin {
            collider_a: find_collider(&world, "torso"),
            collider_b: ground_collider(&world),
        };
        process(&world, &mut state, std::slice::from_ref(&contact));
        assert!(!state.fallen);
    }

    #[test]
    fn fall_while_jumped_but_not_landed_also_lands_the_jump() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        let mut state = GameState {
            jumped: true,
            ..GameState::default()
        };
        let contact = ContactBegin {
            collider_a: find_collider(&world, "leftArm"),
            collider_b: ground_collider(&world),
        };
        process(&world, &mut state, std::slice::from_ref(&contact));
        assert!(state.fallen);
        assert!(state.jump_landed);
    }
}
