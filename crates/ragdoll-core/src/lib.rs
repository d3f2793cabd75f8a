//! Headless 2D ragdoll physics core for reinforcement-learning training.
//!
//! Reproduces a QWOP-style browser game's physics deterministically: spawn
//! pose, joint topology and limits, control-driven joint reconfiguration,
//! head-stabilising torque, fixed-step integration, and the contact-based
//! fall/jump/landing state machine. See [`RagdollCore`] for the public API
//! (§6 of the design spec this crate implements).
//!
//! Grounded on the teacher's `physics/src/lib.rs` module-declaration and
//! re-export shape.

pub mod constants;
pub mod contact;
pub mod control;
pub mod error;
pub mod observation;
pub mod rng;
pub mod state;
pub mod stepper;
pub mod world;

pub use control::KeyState;
pub use error::{CoreError, CoreResult};
pub use observation::{Observation, OBS_LEN};
pub use rng::Rng32;
pub use state::GameState;

use log::debug;

use crate::constants::PHYSICS_DT;
use crate::world::RagdollWorld;

/// Owns one independent ragdoll instance: its physics world, game state,
/// control state and RNG. Instances share no process-wide mutable state
/// (§5) and are safe to run concurrently on separate threads, one per
/// instance, provided the rapier2d backend itself is instance-local-safe
/// (it is: it carries no global state).
pub struct RagdollCore {
    world: Option<RagdollWorld>,
    state: GameState,
    keys: KeyState,
    rng: Rng32,
    reset_generation: u64,
    warned_missing_joint: bool,
}

impl Default for RagdollCore {
    fn default() -> Self {
        Self::new()
    }
}

impl RagdollCore {
    /// Constructs a core with no world yet built. The world is created
    /// lazily on the first [`RagdollCore::reset`] call, matching §4.1's
    /// "lazily created on first reset" lifetime.
    pub fn new() -> Self {
        Self {
            world: None,
            state: GameState::default(),
            keys: KeyState::default(),
            rng: Rng32::default(),
            reset_generation: 0,
            warned_missing_joint: false,
        }
    }

    /// Rebuilds the world to its spawn state: destroys the ragdoll (or
    /// creates the world and ground on first call), re-seeds the RNG if a
    /// seed is given, rebuilds bodies and joints, and zeroes game/key state
    /// while preserving `high_score`. Returns `true` unconditionally — the
    /// reference runtime the original game embeds rejects an empty return
    /// from its host bindings, so the mutators here mirror that sentinel
    /// (§6).
    pub fn reset(&mut self, seed: Option<u32>) -> bool {
        let is_first_build = self.world.is_none();
        match self.world.as_mut() {
            Some(world) => world.destroy_ragdoll(),
            None => self.world = Some(RagdollWorld::new()),
        }
        if let Some(seed) = seed {
            self.rng.reseed(seed);
        }
        self.world.as_mut().expect("just constructed").build_ragdoll();

        self.state.reset_keep_high_score();
        self.keys = KeyState::default();
        self.reset_generation += 1;
        self.warned_missing_joint = false;

        debug!(
            "reset: generation={}, first_build={}, seed={:?}",
            self.reset_generation, is_first_build, seed
        );
        true
    }

    /// Overwrites the four-button key state read by the control translator
    /// on the next [`RagdollCore::step`]. Returns `true` unconditionally
    /// per §6.
    pub fn set_action(&mut self, q: bool, w: bool, o: bool, p: bool) -> bool {
        self.keys = KeyState { q, w, o, p };
        true
    }

    /// Advances the simulation one fixed tick. `dt` defaults to the fixed
    /// physics timestep (0.04s) when `None`; `time_dt` defaults to the same
    /// value for score-time advancement when `None`, per §6's `step(dt?,
    /// timeDt?)`. Calling this before a world has been built is a no-op
    /// that still returns `true`, matching §7's "API misuse... silently
    /// no-op".
    pub fn step(&mut self, dt: Option<f32>, time_dt: Option<f32>) -> bool {
        let physics_dt = dt.unwrap_or(PHYSICS_DT);
        let score_dt = time_dt.unwrap_or(PHYSICS_DT);
        if let Some(world) = self.world.as_mut() {
            stepper::step(
                world,
                &mut self.state,
                self.keys,
                physics_dt,
                score_dt,
                &mut self.warned_missing_joint,
            );
        }
        true
    }

    /// Reads the current observation record (§4.5) without mutating
    /// anything. Safe to call before the first reset: all 60 floats are
    /// zero and `distance` is zero in that case.
    pub fn get_observation(&self) -> Observation {
        match self.world.as_ref() {
            Some(world) => observation::export(world, &self.state),
            None => Observation::default(),
        }
    }
}
