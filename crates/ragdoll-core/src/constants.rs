//! Compatibility constants: body-part and joint tables, world geometry, and
//! tuning values. Every number here reproduces the reference game's spawn
//! pose and joint behaviour; changing one breaks parity with it.

/// Fixed physics timestep, seconds.
pub const PHYSICS_DT: f32 = 0.04;
/// Velocity solver iterations per step, wired to rapier2d's
/// `IntegrationParameters::num_solver_iterations` in `world.rs`.
pub const VELOCITY_ITERATIONS: usize = 5;
/// Position solver iterations per step. Box2D-era rapier exposed this as a
/// separate pass; the current TGS-soft solver folds it into
/// `num_solver_iterations` and has no standalone knob for it. Kept for
/// parity with the reference tuning triple `(0.04, 5, 5)`.
pub const POSITION_ITERATIONS: usize = 5;

/// Downward gravity acceleration, m/s^2. Positive Y is "down" in this world's
/// frame (feet and ground sit at larger Y than the head).
pub const GRAVITY_Y: f32 = 10.0;

/// Pixels per metre; used only to evaluate the pixel-space jump/landing
/// thresholds below.
pub const WORLD_SCALE: f32 = 20.0;

pub const GROUND_Y: f32 = 10.74275;
pub const GROUND_HALF_WIDTH: f32 = 16.0;
pub const GROUND_HALF_HEIGHT: f32 = 1.6;
pub const GROUND_SEGMENT_X: [f32; 3] = [0.0, 32.0, 64.0];
pub const GROUND_FRICTION: f32 = 0.2;
pub const GROUND_DENSITY: f32 = 30.0;

/// Name tag applied to every ground segment collider.
pub const GROUND_TAG: &str = "track";

/// Ground colliders: category bit 1, collide with everything.
pub const GROUND_COLLISION_CATEGORY: u32 = 0b0000_0000_0000_0001;
pub const GROUND_COLLISION_MASK: u32 = 0xFFFF;

/// Ragdoll body colliders: category bit 2, mask excludes bit 2 so the
/// ragdoll never self-collides.
pub const BODY_COLLISION_CATEGORY: u32 = 0b0000_0000_0000_0010;
pub const BODY_COLLISION_MASK: u32 = 0xFFFD;

/// Head-stabilising torque: `gain * (headAngle + bias)`, applied every step
/// the ragdoll hasn't fallen.
pub const HEAD_TORQUE_GAIN: f32 = -4.0;
pub const HEAD_TORQUE_BIAS: f32 = 0.2;

/// world-X * WORLD_SCALE past which a foot touching track counts as a jump.
pub const JUMP_THRESHOLD_PX: f32 = 20_000.0 - 220.0;
/// world-X * WORLD_SCALE past which a foot touching track after a jump
/// counts as landing.
pub const LANDING_THRESHOLD_PX: f32 = 20_000.0;

pub const DISTANCE_LOWER_BOUND: f32 = -10.0;
pub const DISTANCE_UPPER_BOUND: f32 = 105.0;
pub const SUCCESS_THRESHOLD: f32 = 100.0;

pub const DEFAULT_LEFT_HIP_LIMITS: (f32, f32) = (-1.5, 0.5);
pub const DEFAULT_RIGHT_HIP_LIMITS: (f32, f32) = (-1.3, 0.7);

/// A single rigid body making up the ragdoll.
#[derive(Debug, Clone, Copy)]
pub struct BodyPartSpec {
    pub name: &'static str,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub friction: f32,
    pub density: f32,
}

/// A hinge constraint between two named body parts.
#[derive(Debug, Clone, Copy)]
pub struct JointSpec {
    pub name: &'static str,
    pub body_a: &'static str,
    pub body_b: &'static str,
    pub anchor_a: (f32, f32),
    pub anchor_b: (f32, f32),
    pub lower_angle: f32,
    pub upper_angle: f32,
    pub reference_angle: f32,
    pub max_motor_torque: f32,
    pub motor_enabled: bool,
}

/// Body parts in construction order. This is also the observation vector's
/// iteration order.
pub const BODY_PARTS: [BodyPartSpec; 12] = [
    BodyPartSpec { name: "torso", x: 2.511_172_6, y: -1.870_951_8, angle: -1.251_449_7, half_width: 3.275, half_height: 1.425, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "head", x: 3.888_130_3, y: -5.621_803, angle: 0.064_484_16, half_width: 1.075, half_height: 1.325, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "leftArm", x: 4.417_861, y: -2.806_563_6, angle: 0.904_009_6, half_width: 1.850, half_height: 0.625, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "leftCalf", x: 3.125_857_3, y: 5.525_511_7, angle: -1.590_397_2, half_width: 2.500, half_height: 0.750, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "leftFoot", x: 3.926_921_8, y: 8.088_840_3, angle: 0.120_275_25, half_width: 1.350, half_height: 0.675, friction: 1.5, density: 3.0 },
    BodyPartSpec { name: "leftForearm", x: 5.830_008_6, y: -2.873_354, angle: -1.204_977_3, half_width: 1.750, half_height: 0.550, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "leftThigh", x: 2.564_898_8, y: 1.648_090_7, angle: -2.017_723_4, half_width: 2.525, half_height: 1.000, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "rightArm", x: 1.181_230_4, y: -3.500_025_7, angle: -0.522_221_74, half_width: 1.950, half_height: 0.750, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "rightCalf", x: -0.072_539_06, y: 5.347_881_9, angle: -0.758_886, half_width: 2.500, half_height: 0.750, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "rightFoot", x: -1.125_474_3, y: 7.567_193, angle: 0.589_760_5, half_width: 1.350, half_height: 0.725, friction: 1.5, density: 3.0 },
    BodyPartSpec { name: "rightForearm", x: 0.407_820_64, y: -1.059_995_3, angle: -1.755_335_8, half_width: 2.225, half_height: 0.675, friction: 0.2, density: 1.0 },
    BodyPartSpec { name: "rightThigh", x: 1.612_018_6, y: 2.061_532, angle: 1.484_942_3, half_width: 2.650, half_height: 1.000, friction: 0.2, density: 1.0 },
];

/// Joints in construction order: neck, shoulders, hips, elbows, knees,
/// ankles. Some solvers are order-sensitive; this order is load-bearing.
pub const JOINTS: [JointSpec; 11] = [
    JointSpec { name: "neck", body_a: "head", body_b: "torso", anchor_a: (3.588_514_2, -4.526_224_3), anchor_b: (3.588_733_3, -4.526_434_7), lower_angle: -0.5, upper_angle: 0.0, reference_angle: -1.308_996_4, max_motor_torque: 0.0, motor_enabled: false },
    JointSpec { name: "rightShoulder", body_a: "rightArm", body_b: "torso", anchor_a: (2.228_476_8, -4.086_468_7), anchor_b: (2.228_93, -4.087_075_6), lower_angle: -0.5, upper_angle: 1.5, reference_angle: -0.785_390_7, max_motor_torque: 1000.0, motor_enabled: true },
    JointSpec { name: "leftShoulder", body_a: "leftArm", body_b: "torso", anchor_a: (3.624_198, -3.533_488_2), anchor_b: (3.624_178, -3.533_950_4), lower_angle: -2.0, upper_angle: 0.0, reference_angle: -2.094_383_1, max_motor_torque: 1000.0, motor_enabled: true },
    JointSpec { name: "leftHip", body_a: "leftThigh", body_b: "torso", anchor_a: (2.003_034, 0.237_371_6), anchor_b: (2.003_367_2, 0.238_025_9), lower_angle: -1.5, upper_angle: 0.5, reference_angle: 0.725_847_75, max_motor_torque: 6000.0, motor_enabled: true },
    JointSpec { name: "rightHip", body_a: "rightThigh", body_b: "torso", anchor_a: (1.247_590_1, -0.011_046_64), anchor_b: (1.247_005_3, -0.011_635_35), lower_angle: -1.3, upper_angle: 0.7, reference_angle: -2.719_359_4, max_motor_torque: 6000.0, motor_enabled: true },
    JointSpec { name: "leftElbow", body_a: "leftForearm", body_b: "leftArm", anchor_a: (5.525_375_3, -1.638_562), anchor_b: (5.525_375_3, -1.638_562), lower_angle: -0.1, upper_angle: 0.5, reference_angle: 2.094_383_1, max_motor_torque: 0.0, motor_enabled: false },
    JointSpec { name: "rightElbow", body_a: "rightForearm", body_b: "rightArm", anchor_a: (-0.006_090_86, -2.800_475_9), anchor_b: (-0.006_090_86, -2.800_475_9), lower_angle: -0.1, upper_angle: 0.5, reference_angle: 1.296_819_9, max_motor_torque: 0.0, motor_enabled: false },
    JointSpec { name: "leftKnee", body_a: "leftCalf", body_b: "leftThigh", anchor_a: (3.384_323_4, 3.516_893_1), anchor_b: (3.384_468_4, 3.517_412_3), lower_angle: -1.6, upper_angle: 0.0, reference_angle: -0.395_311_38, max_motor_torque: 3000.0, motor_enabled: true },
    JointSpec { name: "rightKnee", body_a: "rightCalf", body_b: "rightThigh", anchor_a: (1.498_237, 4.175_600_3), anchor_b: (1.498_204_3, 4.174_935_2), lower_angle: -1.3, upper_angle: 0.3, reference_angle: 2.289_340_6, max_motor_torque: 3000.0, motor_enabled: true },
    JointSpec { name: "leftAnkle", body_a: "leftFoot", body_b: "leftCalf", anchor_a: (3.312_322_5, 7.947_705), anchor_b: (3.312_322_5, 7.947_705), lower_angle: -0.5, upper_angle: 0.5, reference_angle: -1.724_432_8, max_motor_torque: 2000.0, motor_enabled: false },
    JointSpec { name: "rightAnkle", body_a: "rightFoot", body_b: "rightCalf", anchor_a: (-1.656_285_5, 6.961_551_5), anchor_b: (-1.655_726_7, 6.961_494), lower_angle: -0.5, upper_angle: 0.5, reference_angle: -1.570_804_6, max_motor_torque: 2000.0, motor_enabled: false },
];

pub fn body_part(name: &str) -> Option<&'static BodyPartSpec> {
    BODY_PARTS.iter().find(|b| b.name == name)
}

pub fn joint(name: &str) -> Option<&'static JointSpec> {
    JOINTS.iter().find(|j| j.name == name)
}
