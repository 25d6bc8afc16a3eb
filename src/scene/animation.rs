use crate::textures::TextureReference;
use glam::{Quat, Vec3};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::types::{Extrapolation, KeyType};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerTarget {
    Transform,
    Visibility,
    TextureCoordinates,
    Geometry,
    Material,
    Texture,
    Particles,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControllerTiming {
    pub frequency: f32,
    pub phase: f32,
    pub start_time: f32,
    pub stop_time: f32,
    pub extrapolation: Extrapolation,
    pub auto_play: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keys<T> {
    pub interpolation: KeyType,
    pub keys: Vec<(f32, T)>,
}

impl<T> Keys<T> {
    pub fn empty() -> Self {
        Self {
            interpolation: KeyType::Linear,
            keys: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MaterialColor {
    Ambient,
    Diffuse,
    Specular,
    Emissive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MorphTarget {
    pub keys: Keys<f32>,
    pub offsets: Vec<Vec3>,
}

#[derive(Debug, Clone)]
pub enum ControllerChannel {
    Keyframe {
        rotations: Keys<Quat>,
        translations: Keys<Vec3>,
        scales: Keys<f32>,
    },
    Visibility {
        keys: Vec<(f32, bool)>,
    },
    Uv {
        /// The texture units whose coordinates are animated.
        texture_units: Vec<u32>,
        u_offset: Keys<f32>,
        v_offset: Keys<f32>,
        u_tiling: Keys<f32>,
        v_tiling: Keys<f32>,
    },
    Alpha {
        keys: Keys<f32>,
    },
    MaterialColor {
        color: MaterialColor,
        keys: Keys<Vec3>,
    },
    Flip {
        texture_unit: u32,
        delta: f32,
        textures: Vec<Arc<TextureReference>>,
    },
    Morph {
        targets: Vec<MorphTarget>,
    },
    ParticleSystem {
        emit_start: f32,
        emit_stop: f32,
    },
}

/// A controller as installed on a scene node. Evaluating it is up to the host.
#[derive(Debug, Clone)]
pub struct RuntimeController {
    pub record: RecordIndex,
    pub target: ControllerTarget,
    pub timing: ControllerTiming,
    pub channel: ControllerChannel,
}
