use crate::scene::animation::{ControllerTiming, Keys};
use crate::scene::types::StateSet;
use glam::{Vec3, Vec4};
use nifscene_files::common::types::RecordIndex;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Particles move with the node of the particle system.
    Relative,
    /// Particles live in world space once emitted.
    Absolute,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticleState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifespan: f32,
    pub size: f32,
    pub color: Vec4,
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub name: String,
    pub record: RecordIndex,
    pub reference_frame: ReferenceFrame,
    /// Upper bound of particles alive at the same time.
    pub quota: u16,
    pub particles: Vec<ParticleState>,
    pub state: StateSet,
    pub auto_play: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shooter {
    pub horizontal_direction: f32,
    pub horizontal_angle: f32,
    pub vertical_direction: f32,
    pub vertical_angle: f32,
    pub velocity: f32,
    pub velocity_random: f32,
    pub lifetime: f32,
    pub lifetime_random: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GravityKind {
    /// Pulls along the direction.
    Wind,
    /// Pulls towards the position.
    Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleAffector {
    GrowFade {
        grow_time: f32,
        fade_time: f32,
    },
    Gravity {
        force: f32,
        kind: GravityKind,
        position: Vec3,
        direction: Vec3,
    },
    Color {
        keys: Keys<Vec4>,
    },
    Rotation {
        initial_axis: Vec3,
        speed: f32,
    },
}

/// Spawns particles into the particle system living on `particle_system`. Emitters are attached
/// to the emitter node, so new particles start at its position.
#[derive(Debug, Clone)]
pub struct Emitter<N> {
    /// The NiParticleSystemController.
    pub record: RecordIndex,
    pub particle_system: N,
    /// Particles per second.
    pub rate: f32,
    pub shooter: Shooter,
    /// Random offset around the emitter node.
    pub placer_offset: Vec3,
    pub affectors: Vec<ParticleAffector>,
    pub timing: ControllerTiming,
}
