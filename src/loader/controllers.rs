use crate::StructuralError;
use crate::loader::conversions::{quat, vec3};
use crate::scene::animation::{
    ControllerChannel, ControllerTarget, ControllerTiming, Keys, MaterialColor, MorphTarget, RuntimeController,
};
use crate::textures::{correct_texture_path, TextureReference, TextureResolver};
use log::{debug, trace, warn};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{
    AnimationFlags, Controller, ControllerFlags, ControllerKind, Extrapolation, KeyMap, KeyType, NiFloatData,
    NiKeyframeData, NiMorphData, NiPosData, NiSourceTexture, NiUvData, NiVisData, RecordType,
};
use std::collections::HashSet;
use std::sync::Arc;

/// What owns the controller chain, decides which controller kinds make sense.
#[derive(Debug, Copy, Clone)]
pub enum ControllerHost<'u> {
    Node,
    /// A NiTriShape, `texture_units` are the units bound at the shape.
    Shape { texture_units: &'u [u32] },
    Particles,
    Material,
    Texturing,
}

pub struct ControllerBinder<'f, T: TextureResolver + ?Sized> {
    file: &'f NifFile,
    textures: &'f T,
    flags: AnimationFlags,
}

impl<'f, T: TextureResolver + ?Sized> ControllerBinder<'f, T> {
    pub fn new(file: &'f NifFile, textures: &'f T, flags: AnimationFlags) -> Self {
        Self { file, textures, flags }
    }

    /// Unrolls the chain starting at `head`. A broken link ends the chain with a warning, a link
    /// back into the chain is fatal.
    pub fn chain(&self, head: Option<RecordIndex>) -> Result<Vec<(RecordIndex, &'f Controller)>, StructuralError> {
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        let mut next = head;

        while let Some(index) = next {
            if !visited.insert(index) {
                return Err(StructuralError::ControllerCycle {
                    file: self.file.name().to_owned(),
                    index,
                });
            }

            let controller = match self.file.get::<Controller>(index) {
                Ok(controller) => controller,
                Err(e) => {
                    warn!("{}: controller chain cut short: {}", self.file.name(), e);
                    break;
                }
            };

            chain.push((index, controller));
            next = controller.next;
        }

        Ok(chain)
    }

    /// Every active controller of the chain that fits `host`, in chain order.
    pub fn bind(
        &self,
        owner: RecordIndex,
        head: Option<RecordIndex>,
        host: ControllerHost,
    ) -> Result<Vec<RuntimeController>, StructuralError> {
        let mut controllers = Vec::new();
        for (index, controller) in self.chain(head)? {
            if !controller.flags.contains(ControllerFlags::ACTIVE) {
                debug!("{}: skipping inactive {} {}", self.file.name(), controller.kind.name(), index);
                continue;
            }

            if let Some((target, channel)) = self.channel(owner, index, controller, host) {
                trace!("{}: binding {} {} to {}", self.file.name(), controller.kind.name(), index, owner);
                controllers.push(RuntimeController {
                    record: index,
                    target,
                    timing: self.timing(controller),
                    channel,
                });
            }
        }

        Ok(controllers)
    }

    pub fn timing(&self, controller: &Controller) -> ControllerTiming {
        let bits = controller.flags.extrapolation_bits();
        let extrapolation = Extrapolation::try_from(bits).unwrap_or_else(|_| {
            warn!("{}: unexpected extrapolation mode {}", self.file.name(), bits);
            Extrapolation::Cycle
        });

        ControllerTiming {
            frequency: controller.frequency,
            phase: controller.phase,
            start_time: controller.start_time,
            stop_time: controller.stop_time,
            extrapolation,
            auto_play: self.flags.contains(AnimationFlags::AUTO_PLAY),
        }
    }

    fn channel(
        &self,
        owner: RecordIndex,
        index: RecordIndex,
        controller: &Controller,
        host: ControllerHost,
    ) -> Option<(ControllerTarget, ControllerChannel)> {
        use ControllerHost as H;

        match (&controller.kind, host) {
            (ControllerKind::Keyframe { data }, H::Node | H::Shape { .. } | H::Particles) => {
                let data = self.data::<NiKeyframeData>(index, *data)?;
                let channel = ControllerChannel::Keyframe {
                    rotations: convert_keys(self.file, index, &data.rotations, quat)?,
                    translations: convert_keys(self.file, index, &data.translations, vec3)?,
                    scales: convert_keys(self.file, index, &data.scales, |scale| *scale)?,
                };
                Some((ControllerTarget::Transform, channel))
            }
            (ControllerKind::Visibility { data }, H::Node | H::Shape { .. } | H::Particles) => {
                let data = self.data::<NiVisData>(index, *data)?;
                let keys = data.keys.iter().map(|key| (key.time, key.value)).collect();
                Some((ControllerTarget::Visibility, ControllerChannel::Visibility { keys }))
            }
            (ControllerKind::Uv { data }, H::Shape { texture_units }) => {
                let data = self.data::<NiUvData>(index, *data)?;
                let [u_offset, v_offset, u_tiling, v_tiling] = &data.tracks;
                let channel = ControllerChannel::Uv {
                    texture_units: texture_units.to_vec(),
                    u_offset: convert_keys(self.file, index, u_offset, |v| *v)?,
                    v_offset: convert_keys(self.file, index, v_offset, |v| *v)?,
                    u_tiling: convert_keys(self.file, index, u_tiling, |v| *v)?,
                    v_tiling: convert_keys(self.file, index, v_tiling, |v| *v)?,
                };
                Some((ControllerTarget::TextureCoordinates, channel))
            }
            (ControllerKind::GeomMorpher { data }, H::Shape { .. }) => {
                let data = self.data::<NiMorphData>(index, *data)?;
                let targets = data
                    .morphs
                    .iter()
                    .map(|morph| {
                        Some(MorphTarget {
                            keys: convert_keys(self.file, index, &morph.keys, |v| *v)?,
                            offsets: morph.vertices.iter().map(vec3).collect(),
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some((ControllerTarget::Geometry, ControllerChannel::Morph { targets }))
            }
            (ControllerKind::ParticleSystem(_), H::Particles) => {
                // installed together with the particle system
                None
            }
            (ControllerKind::Alpha { data }, H::Material) => {
                let data = self.data::<NiFloatData>(index, *data)?;
                let keys = convert_keys(self.file, index, &data.keys, |v| *v)?;
                Some((ControllerTarget::Material, ControllerChannel::Alpha { keys }))
            }
            (ControllerKind::MaterialColor { data }, H::Material) => {
                let data = self.data::<NiPosData>(index, *data)?;
                let color = match (controller.flags.bits() >> 4) & 0x3 {
                    0 => MaterialColor::Ambient,
                    1 => MaterialColor::Diffuse,
                    2 => MaterialColor::Specular,
                    _ => MaterialColor::Emissive,
                };
                let keys = convert_keys(self.file, index, &data.keys, vec3)?;
                Some((ControllerTarget::Material, ControllerChannel::MaterialColor { color, keys }))
            }
            (
                ControllerKind::Flip {
                    texture_slot,
                    delta,
                    sources,
                },
                H::Texturing,
            ) => {
                let textures = sources
                    .iter()
                    .flatten()
                    .filter_map(|source| self.flip_texture(index, *source))
                    .collect();
                let channel = ControllerChannel::Flip {
                    texture_unit: *texture_slot,
                    delta: *delta,
                    textures,
                };
                Some((ControllerTarget::Texture, channel))
            }
            (kind, host) => {
                warn!(
                    "{}: unexpected {} {} on {:?} {}",
                    self.file.name(),
                    kind.name(),
                    index,
                    host,
                    owner
                );
                None
            }
        }
    }

    fn data<D: RecordType>(&self, controller: RecordIndex, data: Option<RecordIndex>) -> Option<&'f D> {
        let Some(data) = data else {
            warn!("{}: controller {} has no data", self.file.name(), controller);
            return None;
        };

        self.file
            .get::<D>(data)
            .inspect_err(|e| warn!("{}: controller {} dropped: {}", self.file.name(), controller, e))
            .ok()
    }

    fn flip_texture(&self, controller: RecordIndex, source: RecordIndex) -> Option<Arc<TextureReference>> {
        let texture = self
            .file
            .get::<NiSourceTexture>(source)
            .inspect_err(|e| warn!("{}: flip texture of {} skipped: {}", self.file.name(), controller, e))
            .ok()?;

        if !texture.external {
            warn!("{}: embedded texture {} is not supported", self.file.name(), source);
            return None;
        }

        self.textures
            .resolve(&correct_texture_path(&texture.filename))
            .inspect_err(|e| warn!("{}: {}", self.file.name(), e))
            .ok()
    }
}

/// `None` drops whatever the keys belong to, files do contain interpolation kinds that are not
/// supported (XYZ rotations) or not defined at all.
pub(crate) fn convert_keys<S, D>(
    file: &NifFile,
    owner: RecordIndex,
    map: &KeyMap<S>,
    convert: impl Fn(&S) -> D,
) -> Option<Keys<D>> {
    match map.key_type() {
        None => Some(Keys::empty()),
        Some(Ok(KeyType::XyzRotation)) => {
            warn!("{}: {} uses XYZ rotation keys, which are not supported", file.name(), owner);
            None
        }
        Some(Ok(interpolation)) => Some(Keys {
            interpolation,
            keys: map
                .keys
                .iter()
                .map(|key| (key.time, convert(&key.value)))
                .collect(),
        }),
        Some(Err(e)) => {
            warn!("{}: {} uses unknown interpolation {}", file.name(), owner, e.number);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_support::FakeTextures;
    use nifscene_files::common::types::{C3Vector, C4Quaternion};
    use nifscene_files::nif::builder::NifFileBuilder;
    use nifscene_files::nif::types::{Key, ParticleSystemController};

    #[test]
    fn chain_order_is_kept() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("chain.nif");
        let vis = builder.push(NiVisData {
            keys: vec![Key {
                time: 0.0,
                value: true,
            }],
        });
        let keyframes = builder.push(NiKeyframeData {
            rotations: KeyMap::new(KeyType::Linear, vec![(0.0, C4Quaternion::default())]),
            translations: KeyMap::new(KeyType::Tbc, vec![(0.0, C3Vector::new(1.0, 2.0, 3.0))]),
            ..Default::default()
        });
        let c = builder.reserve();
        let inactive = builder.reserve();
        let b = builder.push(Controller::new(ControllerKind::Keyframe { data: Some(keyframes) }).with_next(inactive));
        let a = builder.push(Controller::new(ControllerKind::Visibility { data: Some(vis) }).with_next(b));
        builder.set(
            inactive,
            Controller::new(ControllerKind::Visibility { data: Some(vis) })
                .with_flags(ControllerFlags::empty())
                .with_next(c),
        )?;
        builder.set(c, Controller::new(ControllerKind::Visibility { data: Some(vis) }))?;
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let binder = ControllerBinder::new(&file, &textures, AnimationFlags::AUTO_PLAY);
        let controllers = binder.bind(RecordIndex(99), Some(a), ControllerHost::Node)?;

        let order = controllers.iter().map(|c| c.record).collect::<Vec<_>>();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(controllers[0].target, ControllerTarget::Visibility);
        assert_eq!(controllers[1].target, ControllerTarget::Transform);
        assert!(controllers.iter().all(|c| c.timing.auto_play));
        match &controllers[1].channel {
            ControllerChannel::Keyframe {
                translations, scales, ..
            } => {
                assert_eq!(translations.interpolation, KeyType::Tbc);
                assert_eq!(translations.keys, vec![(0.0, glam::Vec3::new(1.0, 2.0, 3.0))]);
                assert!(scales.is_empty());
            }
            other => panic!("expected keyframes, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn looping_chains_are_fatal() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("loop.nif");
        let second = builder.reserve();
        let first = builder.push(Controller::new(ControllerKind::Visibility { data: None }).with_next(second));
        builder.set(
            second,
            Controller::new(ControllerKind::Visibility { data: None }).with_next(first),
        )?;
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let binder = ControllerBinder::new(&file, &textures, AnimationFlags::empty());
        let result = binder.bind(RecordIndex(0), Some(first), ControllerHost::Node);
        assert!(matches!(result, Err(StructuralError::ControllerCycle { index, .. }) if index == first));

        Ok(())
    }

    #[test]
    fn misplaced_and_broken_controllers_are_dropped() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("dropped.nif");
        let xyz = builder.push(NiKeyframeData {
            rotations: KeyMap::new(KeyType::XyzRotation, vec![(0.0, C4Quaternion::default())]),
            ..Default::default()
        });
        let alpha_data = builder.push(NiFloatData {
            keys: KeyMap::new(KeyType::Linear, vec![(0.0, 1.0), (1.0, 0.0)]),
        });
        let particles = builder.push(Controller::new(ControllerKind::ParticleSystem(Box::new(
            ParticleSystemController::default(),
        ))));
        let no_data = builder.push(Controller::new(ControllerKind::Keyframe { data: None }).with_next(particles));
        let alpha = builder.push(Controller::new(ControllerKind::Alpha { data: Some(alpha_data) }).with_next(no_data));
        let head = builder.push(Controller::new(ControllerKind::Keyframe { data: Some(xyz) }).with_next(alpha));
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let binder = ControllerBinder::new(&file, &textures, AnimationFlags::empty());
        assert!(binder.bind(RecordIndex(0), Some(head), ControllerHost::Node)?.is_empty());

        let material = binder.bind(RecordIndex(0), Some(alpha), ControllerHost::Material)?;
        assert_eq!(material.len(), 1);
        assert_eq!(material[0].target, ControllerTarget::Material);
        assert!(!material[0].timing.auto_play);

        Ok(())
    }

    #[test]
    fn timing_and_material_color_target() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("timing.nif");
        let data = builder.push(NiPosData {
            keys: KeyMap::new(KeyType::Linear, vec![(0.0, C3Vector::new(1.0, 0.0, 0.0))]),
        });
        // constant extrapolation, emissive target
        let flags = ControllerFlags::ACTIVE | ControllerFlags::from_bits_retain(0x4 | (3 << 4));
        let controller = builder.push(
            Controller::new(ControllerKind::MaterialColor { data: Some(data) })
                .with_flags(flags)
                .with_timing(2.0, 0.5, 1.0, 3.0),
        );
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let binder = ControllerBinder::new(&file, &textures, AnimationFlags::empty());
        let controllers = binder.bind(RecordIndex(0), Some(controller), ControllerHost::Material)?;

        let timing = controllers[0].timing;
        assert_eq!(timing.extrapolation, Extrapolation::Constant);
        assert_eq!((timing.frequency, timing.phase), (2.0, 0.5));
        assert_eq!((timing.start_time, timing.stop_time), (1.0, 3.0));
        assert!(matches!(
            controllers[0].channel,
            ControllerChannel::MaterialColor {
                color: MaterialColor::Emissive,
                ..
            }
        ));

        Ok(())
    }

    #[test]
    fn flip_controllers_resolve_their_textures() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("flip.nif");
        let first = builder.push(NiSourceTexture::external("fire01.tga"));
        let second = builder.push(NiSourceTexture::external("Fire02.TGA"));
        let controller = builder.push(Controller::new(ControllerKind::Flip {
            texture_slot: 0,
            delta: 0.1,
            sources: vec![Some(first), None, Some(second)],
        }));
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let binder = ControllerBinder::new(&file, &textures, AnimationFlags::empty());
        let controllers = binder.bind(RecordIndex(0), Some(controller), ControllerHost::Texturing)?;

        match &controllers[0].channel {
            ControllerChannel::Flip { textures, .. } => {
                let paths = textures.iter().map(|t| t.path.as_str()).collect::<Vec<_>>();
                assert_eq!(paths, vec!["textures\\fire01.dds", "textures\\fire02.dds"]);
            }
            other => panic!("expected a flip controller, got {:?}", other),
        }

        Ok(())
    }
}
