use crate::StructuralError;
use crate::loader::controllers::{convert_keys, ControllerBinder};
use crate::loader::conversions::{color, vec3};
use crate::loader::properties::EffectiveState;
use crate::scene::animation::{ControllerChannel, ControllerTarget, RuntimeController};
use crate::scene::particles::{
    Emitter, GravityKind, ParticleAffector, ParticleState, ParticleSystem, ReferenceFrame, Shooter,
};
use crate::textures::TextureResolver;
use glam::{Affine3A, Vec4};
use log::{debug, warn};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{
    ControllerKind, EmitFlags, ModifierKind, NiColorData, NiParticles, NiParticlesData, ParticleFlags,
    ParticleModifier, ParticleSystemController,
};
use std::collections::HashSet;

/// An emitter waiting for its emitter node. The node may be anywhere in the file, so it is
/// looked up once the walk is done.
pub struct PendingEmitter<N> {
    pub emitter_node: RecordIndex,
    pub emitter: Emitter<N>,
    pub controller: RuntimeController,
}

pub struct ParticleBuild<N> {
    pub system: ParticleSystem,
    pub emitter: Option<PendingEmitter<N>>,
}

pub struct ParticleBuilder<'b, 'f, T: TextureResolver + ?Sized> {
    file: &'f NifFile,
    binder: &'b ControllerBinder<'f, T>,
    flags: ParticleFlags,
}

impl<'b, 'f, T: TextureResolver + ?Sized> ParticleBuilder<'b, 'f, T> {
    pub fn new(file: &'f NifFile, binder: &'b ControllerBinder<'f, T>, flags: ParticleFlags) -> Self {
        Self { file, binder, flags }
    }

    /// `node` is the scene node of `particles`, `world` its world transform. `None` when the
    /// record has no usable particle controller or data.
    pub fn build<N: Copy>(
        &self,
        index: RecordIndex,
        particles: &NiParticles,
        node: N,
        world: Affine3A,
        state: &EffectiveState,
    ) -> Result<Option<ParticleBuild<N>>, StructuralError> {
        let chain = self.binder.chain(particles.base.controller)?;
        let Some((controller_index, controller, system_controller)) =
            chain
                .iter()
                .find_map(|(controller_index, controller)| match &controller.kind {
                    ControllerKind::ParticleSystem(system) => Some((*controller_index, *controller, system.as_ref())),
                    _ => None,
                })
        else {
            warn!("{}: particle system {} has no particle controller", self.file.name(), index);
            return Ok(None);
        };

        let data = match particles.data.map(|data| self.file.get::<NiParticlesData>(data)) {
            Some(Ok(data)) => data,
            Some(Err(e)) => {
                warn!("{}: particle system {} skipped: {}", self.file.name(), index, e);
                return Ok(None);
            }
            None => {
                warn!("{}: particle system {} has no data", self.file.name(), index);
                return Ok(None);
            }
        };

        let reference_frame = if self.flags.contains(ParticleFlags::LOCAL_SPACE) {
            ReferenceFrame::Relative
        } else {
            ReferenceFrame::Absolute
        };
        // Absolute particles are already emitted, so they carry the world transform with them.
        let transform = match reference_frame {
            ReferenceFrame::Relative => Affine3A::IDENTITY,
            ReferenceFrame::Absolute => world,
        };

        let initial = self.initial_particles(index, system_controller, data, transform);

        let mut state = state.geometry_state_set(true);
        state.lighting = false;

        let system = ParticleSystem {
            name: particles.base.name.clone(),
            record: index,
            reference_frame,
            quota: system_controller.num_particles,
            particles: initial,
            state,
            auto_play: self.flags.contains(ParticleFlags::AUTO_PLAY),
        };

        let emitter = match system_controller.emitter {
            Some(emitter_node) => {
                let mut timing = self.binder.timing(controller);
                timing.auto_play = self.flags.contains(ParticleFlags::AUTO_PLAY);

                Some(PendingEmitter {
                    emitter_node,
                    emitter: Emitter {
                        record: controller_index,
                        particle_system: node,
                        rate: emit_rate(system_controller),
                        shooter: Shooter {
                            horizontal_direction: system_controller.horizontal_direction,
                            horizontal_angle: system_controller.horizontal_angle,
                            vertical_direction: system_controller.vertical_direction,
                            vertical_angle: system_controller.vertical_angle,
                            velocity: system_controller.velocity,
                            velocity_random: system_controller.velocity_random,
                            lifetime: system_controller.lifetime,
                            lifetime_random: system_controller.lifetime_random,
                        },
                        placer_offset: vec3(&system_controller.offset_random),
                        affectors: self.affectors(controller_index, system_controller.modifier),
                        timing,
                    },
                    controller: RuntimeController {
                        record: controller_index,
                        target: ControllerTarget::Particles,
                        timing,
                        channel: ControllerChannel::ParticleSystem {
                            emit_start: system_controller.emit_start,
                            emit_stop: system_controller.emit_stop,
                        },
                    },
                })
            }
            None => {
                warn!("{}: particle controller {} has no emitter", self.file.name(), controller_index);
                None
            }
        };

        Ok(Some(ParticleBuild { system, emitter }))
    }

    fn initial_particles(
        &self,
        index: RecordIndex,
        controller: &ParticleSystemController,
        data: &NiParticlesData,
        transform: Affine3A,
    ) -> Vec<ParticleState> {
        let active = (data.active_count as usize).min(controller.particles.len());
        let mut particles = Vec::with_capacity(active);

        for particle in controller.particles.iter().take(active) {
            let vertex = particle.vertex as usize;
            let Some(position) = data.vertices.get(vertex) else {
                warn!("{}: particle of {} uses missing vertex {}", self.file.name(), index, vertex);
                continue;
            };

            particles.push(ParticleState {
                position: transform.transform_point3(vec3(position)),
                velocity: transform.transform_vector3(vec3(&particle.velocity)),
                age: particle.lifetime.max(0.0),
                lifespan: particle.lifespan.max(0.0),
                size: data.sizes.get(vertex).copied().unwrap_or(1.0) * controller.size,
                color: data.colors.get(vertex).map(color).unwrap_or(Vec4::ONE),
            });
        }

        particles
    }

    fn affectors(&self, controller: RecordIndex, head: Option<RecordIndex>) -> Vec<ParticleAffector> {
        let mut visited = HashSet::new();
        let mut affectors = Vec::new();
        let mut next = head;

        while let Some(index) = next {
            if !visited.insert(index) {
                warn!("{}: particle modifiers of {} loop back to {}", self.file.name(), controller, index);
                break;
            }

            let modifier = match self.file.get::<ParticleModifier>(index) {
                Ok(modifier) => modifier,
                Err(e) => {
                    warn!("{}: particle modifiers of {} cut short: {}", self.file.name(), controller, e);
                    break;
                }
            };
            next = modifier.next;

            match &modifier.kind {
                ModifierKind::GrowFade { grow_time, fade_time } => affectors.push(ParticleAffector::GrowFade {
                    grow_time: *grow_time,
                    fade_time: *fade_time,
                }),
                ModifierKind::Gravity {
                    force,
                    gravity_type,
                    position,
                    direction,
                } => {
                    let kind = match gravity_type {
                        0 => GravityKind::Wind,
                        1 => GravityKind::Point,
                        other => {
                            warn!("{}: unknown gravity type {} in {}", self.file.name(), other, index);
                            continue;
                        }
                    };
                    affectors.push(ParticleAffector::Gravity {
                        force: *force,
                        kind,
                        position: vec3(position),
                        direction: vec3(direction),
                    });
                }
                ModifierKind::ColorModifier { data } => {
                    let data = match data.map(|data| self.file.get::<NiColorData>(data)) {
                        Some(Ok(data)) => data,
                        Some(Err(e)) => {
                            warn!("{}: color modifier {} skipped: {}", self.file.name(), index, e);
                            continue;
                        }
                        None => {
                            warn!("{}: color modifier {} has no data", self.file.name(), index);
                            continue;
                        }
                    };
                    if let Some(keys) = convert_keys(self.file, index, &data.keys, color) {
                        affectors.push(ParticleAffector::Color { keys });
                    }
                }
                ModifierKind::Rotation {
                    initial_axis,
                    rotation_speed,
                } => affectors.push(ParticleAffector::Rotation {
                    initial_axis: vec3(initial_axis),
                    speed: *rotation_speed,
                }),
                ModifierKind::Unknown(name) => {
                    warn!("{}: unhandled particle modifier {} ({})", self.file.name(), name, index);
                }
            }
        }

        debug!("{}: {} particle affectors for {}", self.file.name(), affectors.len(), controller);
        affectors
    }
}

/// Particles per second. Unless told otherwise, the rate keeps the system at its particle count.
pub fn emit_rate(controller: &ParticleSystemController) -> f32 {
    if controller.emit_flags.contains(EmitFlags::NO_AUTO_ADJUST) {
        return controller.emit_rate;
    }

    let lifetime = controller.lifetime + controller.lifetime_random / 2.0;
    if lifetime > 0.0 {
        controller.num_particles as f32 / lifetime
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_rate_adjusts_to_the_particle_count() {
        let mut controller = ParticleSystemController {
            num_particles: 30,
            lifetime: 2.0,
            lifetime_random: 2.0,
            emit_rate: 5.0,
            ..Default::default()
        };
        assert_eq!(emit_rate(&controller), 10.0);

        controller.emit_flags = EmitFlags::NO_AUTO_ADJUST;
        assert_eq!(emit_rate(&controller), 5.0);

        controller.emit_flags = EmitFlags::empty();
        controller.lifetime = 0.0;
        controller.lifetime_random = 0.0;
        assert_eq!(emit_rate(&controller), 0.0);
    }
}
