//! Rigid-body world: owns all rapier2d state, builds the ground and the
//! twelve-part ragdoll from `constants`, and advances the simulation one
//! fixed tick at a time.
//!
//! Grounded on the teacher's `physics_world.rs` for the set/pipeline
//! field layout and step shape, generalized from rapier3d to rapier2d and
//! from free-roam bodies to the fixed ragdoll topology.

use std::collections::HashMap;

use rapier2d::crossbeam::channel::{unbounded, Receiver};
use rapier2d::prelude::*;

use crate::constants::{
    self, BodyPartSpec, JointSpec, BODY_COLLISION_CATEGORY, BODY_COLLISION_MASK,
    BODY_PARTS, GROUND_COLLISION_CATEGORY, GROUND_COLLISION_MASK, JOINTS,
};

/// A contact that began during the most recent `step`, identified by
/// collider handle. Resolved into game semantics by `contact::process`.
#[derive(Debug, Clone, Copy)]
pub struct ContactBegin {
    pub collider_a: ColliderHandle,
    pub collider_b: ColliderHandle,
}

/// Name tag carried by every collider, used to resolve contacts back to
/// game semantics without re-deriving them from rapier handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartTag {
    Track,
    Body(&'static str),
}

pub struct RagdollWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    tags: HashMap<ColliderHandle, PartTag>,
    bodies: HashMap<&'static str, RigidBodyHandle>,
    colliders: HashMap<&'static str, ColliderHandle>,
    joints: HashMap<&'static str, ImpulseJointHandle>,

    // Built once and reused across every `step`: the teacher's own
    // `ChannelEventCollector` wiring keeps these alive for the world's
    // lifetime rather than re-allocating a channel pair per tick, which
    // matters at the tens-of-thousands-of-steps-per-second budget this
    // core is built for.
    collision_recv: Receiver<CollisionEvent>,
    event_handler: ChannelEventCollector,
}

impl RagdollWorld {
    pub fn new() -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = constants::PHYSICS_DT;
        // Modern rapier2d folds Box2D-style separate velocity/position solver
        // passes into one TGS-soft iteration count; `VELOCITY_ITERATIONS` is
        // the closest surviving knob and `POSITION_ITERATIONS` has nothing to
        // bind to (kept in `constants` for parity documentation only).
        integration_params.num_solver_iterations =
            std::num::NonZeroUsize::new(constants::VELOCITY_ITERATIONS).unwrap();

        let (collision_send, collision_recv) = unbounded::<CollisionEvent>();
        let (force_send, _force_recv) = unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        let mut world = Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, constants::GRAVITY_Y],
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            tags: HashMap::new(),
            bodies: HashMap::new(),
            colliders: HashMap::new(),
            joints: HashMap::new(),
            collision_recv,
            event_handler,
        };
        world.build_ground();
        world
    }

    fn build_ground(&mut self) {
        let group = InteractionGroups::new(
            Group::from_bits_truncate(GROUND_COLLISION_CATEGORY),
            Group::from_bits_truncate(GROUND_COLLISION_MASK),
        );
        for &x in constants::GROUND_SEGMENT_X.iter() {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![x, constants::GROUND_Y])
                .build();
            let body_handle = self.rigid_body_set.insert(body);
            let collider = ColliderBuilder::cuboid(
                constants::GROUND_HALF_WIDTH,
                constants::GROUND_HALF_HEIGHT,
            )
            .friction(constants::GROUND_FRICTION)
            .density(constants::GROUND_DENSITY)
            .collision_groups(group)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
            let collider_handle =
                self.collider_set
                    .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
            self.tags.insert(collider_handle, PartTag::Track);
        }
    }

    /// Tears down the ragdoll (joints, then bodies) but keeps the world and
    /// the ground segments intact.
    pub fn destroy_ragdoll(&mut self) {
        for (_, joint_handle) in self.joints.drain() {
            self.impulse_joint_set.remove(joint_handle, true);
        }
        for (_, body_handle) in self.bodies.drain() {
            self.rigid_body_set.remove(
                body_handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
        self.colliders.clear();
        self.tags.retain(|_, tag| matches!(tag, PartTag::Track));
    }

    /// Builds the twelve body parts and eleven joints from the compatibility
    /// tables, in the fixed construction order from `constants`.
    pub fn build_ragdoll(&mut self) {
        let group = InteractionGroups::new(
            Group::from_bits_truncate(BODY_COLLISION_CATEGORY),
            Group::from_bits_truncate(BODY_COLLISION_MASK),
        );

        for part in BODY_PARTS.iter() {
            self.build_body_part(part, group);
        }
        for joint in JOINTS.iter() {
            self.build_joint(joint);
        }
    }

    fn build_body_part(&mut self, part: &BodyPartSpec, group: InteractionGroups) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![part.x, part.y])
            .rotation(part.angle)
            .build();
        let body_handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(part.half_width, part.half_height)
            .friction(part.friction)
            .density(part.density)
            .collision_groups(group)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        self.bodies.insert(part.name, body_handle);
        self.colliders.insert(part.name, collider_handle);
        self.tags.insert(collider_handle, PartTag::Body(part.name));
    }

    fn build_joint(&mut self, joint: &JointSpec) {
        let body_a = *self
            .bodies
            .get(joint.body_a)
            .expect("joint body_a must be built before joints");
        let body_b = *self
            .bodies
            .get(joint.body_b)
            .expect("joint body_b must be built before joints");

        // The reference game reports joint angle as `angleB - angleA -
        // referenceAngle`; rapier2d's revolute joint has no reference-angle
        // field and reports the raw `angleB - angleA`. Baking the reference
        // angle into both limit bounds keeps "within limits" identical
        // between the two conventions. Anchors are given in world space at
        // spawn time and must be converted to each body's local frame.
        let iso_a = *self.rigid_body_set[body_a].position();
        let iso_b = *self.rigid_body_set[body_b].position();
        let local_anchor_a = iso_a.inverse_transform_point(&point![joint.anchor_a.0, joint.anchor_a.1]);
        let local_anchor_b = iso_b.inverse_transform_point(&point![joint.anchor_b.0, joint.anchor_b.1]);

        let lower = joint.lower_angle + joint.reference_angle;
        let upper = joint.upper_angle + joint.reference_angle;

        let mut builder = RevoluteJointBuilder::new()
            .local_anchor1(local_anchor_a)
            .local_anchor2(local_anchor_b)
            .limits([lower, upper]);

        if joint.motor_enabled {
            builder = builder
                .motor_max_force(joint.max_motor_torque)
                .motor_model(MotorModel::ForceBased)
                .motor_velocity(0.0, 1.0);
        }

        let joint_handle = self
            .impulse_joint_set
            .insert(body_a, body_b, builder.build(), true);
        self.joints.insert(joint.name, joint_handle);
    }

    /// Advances the simulation by `dt` seconds and returns the contacts that
    /// began during this step, in rapier's raw (non-deterministic) delivery
    /// order — callers that need a stable order sort by resolved part name.
    pub fn step(&mut self, dt: f32) -> Vec<ContactBegin> {
        self.integration_params.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                contacts.push(ContactBegin {
                    collider_a: h1,
                    collider_b: h2,
                });
            }
        }
        contacts
    }

    pub fn tag_of(&self, handle: ColliderHandle) -> Option<PartTag> {
        self.tags.get(&handle).copied()
    }

    /// The collider handle for a named body part, if it has been built.
    pub fn collider_of(&self, name: &str) -> Option<ColliderHandle> {
        self.colliders.get(name).copied()
    }

    /// Handles of the three ground-segment colliders, in build order.
    /// Exposed for tests that need to synthesize a track-vs-part contact.
    pub fn track_collider_handles(&self) -> Vec<ColliderHandle> {
        self.tags
            .iter()
            .filter(|(_, tag)| matches!(tag, PartTag::Track))
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Greatest world-space X among the contact manifold's points, or `None`
    /// if the pair carries no manifold (the caller falls back to the part's
    /// world centre X in that case).
    pub fn contact_max_x(&self, h1: ColliderHandle, h2: ColliderHandle) -> Option<f32> {
        let pair = self.narrow_phase.contact_pair(h1, h2)?;
        let collider1 = self.collider_set.get(h1)?;
        let pos1 = *collider1.position();
        let mut max_x: Option<f32> = None;
        for manifold in pair.manifolds.iter() {
            for point in manifold.points.iter() {
                let world_point = pos1 * point.local_p1;
                max_x = Some(max_x.map_or(world_point.x, |m: f32| m.max(world_point.x)));
            }
        }
        max_x
    }

    pub fn body_center(&self, name: &str) -> Option<(f32, f32)> {
        let handle = *self.bodies.get(name)?;
        let translation = self.rigid_body_set.get(handle)?.translation();
        Some((translation.x, translation.y))
    }

    pub fn body_center_x(&self, name: &str) -> Option<f32> {
        self.body_center(name).map(|(x, _)| x)
    }

    pub fn body_angle(&self, name: &str) -> Option<f32> {
        let handle = *self.bodies.get(name)?;
        Some(self.rigid_body_set.get(handle)?.rotation().angle())
    }

    pub fn body_linvel(&self, name: &str) -> Option<(f32, f32)> {
        let handle = *self.bodies.get(name)?;
        let v = self.rigid_body_set.get(handle)?.linvel();
        Some((v.x, v.y))
    }

    /// Test-only teleport hook (§8 scenario 6): directly overwrites a named
    /// body's translation, bypassing the solver entirely. Not part of the
    /// normal step/control/contact flow.
    #[cfg(test)]
    pub fn set_body_translation(&mut self, name: &str, x: f32, y: f32) {
        if let Some(&handle) = self.bodies.get(name) {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                body.set_translation(vector![x, y], true);
            }
        }
    }

    pub fn apply_torque(&mut self, name: &str, torque: f32) {
        if let Some(&handle) = self.bodies.get(name) {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                body.add_torque(torque, true);
            }
        }
    }

    /// Returns `false` (a silent no-op per §7) if `name` isn't a built joint.
    pub fn set_joint_motor_velocity(&mut self, name: &str, target_velocity: f32) -> bool {
        let Some(&handle) = self.joints.get(name) else {
            return false;
        };
        let Some(joint) = self.impulse_joint_set.get_mut(handle) else {
            return false;
        };
        joint
            .data
            .set_motor_velocity(JointAxis::AngX, target_velocity, 1.0);
        true
    }

    /// Overwrites a joint's angular limits, given in the same "spec space"
    /// as `constants::JointSpec`'s `lower_angle`/`upper_angle` fields — the
    /// reference-angle offset is applied here so callers never have to.
    /// Returns `false` (a silent no-op per §7) if `name` isn't a built joint.
    pub fn set_joint_limits(&mut self, name: &str, lower: f32, upper: f32) -> bool {
        let reference_angle = constants::joint(name).map(|j| j.reference_angle).unwrap_or(0.0);
        let Some(&handle) = self.joints.get(name) else {
            return false;
        };
        let Some(joint) = self.impulse_joint_set.get_mut(handle) else {
            return false;
        };
        joint.data.set_limits(
            JointAxis::AngX,
            [lower + reference_angle, upper + reference_angle],
        );
        true
    }

    /// Reads a joint's current angular limits back in the same "spec space"
    /// `set_joint_limits` takes them in (the reference-angle offset baked in
    /// at construction/overwrite time is subtracted back out here). Returns
    /// `None` if `name` isn't a built joint or carries no angular limits.
    pub fn joint_limits(&self, name: &str) -> Option<(f32, f32)> {
        let reference_angle = constants::joint(name).map(|j| j.reference_angle).unwrap_or(0.0);
        let &handle = self.joints.get(name)?;
        let joint = self.impulse_joint_set.get(handle)?;
        let limits = joint.data.limits(JointAxis::AngX)?;
        Some((limits.min - reference_angle, limits.max - reference_angle))
    }
}

impl Default for RagdollWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_ragdoll_places_all_parts_at_spawn_pose() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        for part in BODY_PARTS.iter() {
            let (x, y) = world.body_center(part.name).unwrap();
            assert_eq!(x, part.x, "{} x mismatch", part.name);
            assert_eq!(y, part.y, "{} y mismatch", part.name);
        }
    }

    #[test]
    fn destroy_ragdoll_clears_named_lookups_but_keeps_ground() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        world.destroy_ragdoll();
        assert!(world.body_center("torso").is_none());
        assert!(world
            .tags
            .values()
            .all(|tag| matches!(tag, PartTag::Track)));
    }

    #[test]
    fn rebuild_after_destroy_restores_spawn_pose() {
        let mut world = RagdollWorld::new();
        world.build_ragdoll();
        for _ in 0..10 {
            world.step(constants::PHYSICS_DT);
        }
        world.destroy_ragdoll();
        world.build_ragdoll();
        let (x, y) = world.body_center("torso").unwrap();
        let torso = constants::body_part("torso").unwrap();
        assert_eq!(x, torso.x);
        assert_eq!(y, torso.y);
    }

    #[test]
    fn gravity_pulls_unjoined_body_downward() {
        // Sanity check on the Y-down gravity convention independent of the
        // ragdoll's joint constraints.
        let mut world = RagdollWorld::new();
        let body = RigidBodyBuilder::dynamic().translation(vector![0.0, 0.0]).build();
        let handle = world.rigid_body_set.insert(body);
        for _ in 0..20 {
            world.step(constants::PHYSICS_DT);
        }
        let y = world.rigid_body_set.get(handle).unwrap().translation().y;
        assert!(y > 0.0, "body should have fallen toward +Y, got y={y}");
    }
}
