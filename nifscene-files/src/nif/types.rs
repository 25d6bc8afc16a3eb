// Record names follow the NetImmerse class names (NiNode, NiTriShape, ...), see NifSkope's nif.xml
use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive, TryFromPrimitiveError};

use crate::common::types::{C2Vector, C3Vector, C4Quaternion, CColor4, NiTransform, RecordIndex};

bitflags! {
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct NodeFlags: u16 {
        const HIDDEN = 0x0001;
        const MESH_COLLISION = 0x0002;
        const BBOX_COLLISION = 0x0004;
        // the remaining bits are reused by NiBSAnimationNode and NiBSParticleNode
        const _ = !0;
    }
}

bitflags! {
    /// Flags of a NiBSAnimationNode, applying to every controller below it.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct AnimationFlags: u16 {
        const AUTO_PLAY = 0x0020;
    }
}

bitflags! {
    /// Flags of a NiBSParticleNode, applying to every particle system below it.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct ParticleFlags: u16 {
        const AUTO_PLAY = 0x0020;
        const LOCAL_SPACE = 0x0080;
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct ControllerFlags: u16 {
        const EXTRAPOLATION = 0x0006;
        const ACTIVE = 0x0008;
        // NiMaterialColorController stores its target color in bits 4 and 5
        const _ = !0;
    }
}

impl ControllerFlags {
    /// Raw extrapolation mode, see [`Extrapolation`].
    pub fn extrapolation_bits(self) -> u16 {
        (self.bits() & Self::EXTRAPOLATION.bits()) >> 1
    }
}

#[repr(u16)]
#[derive(TryFromPrimitive, IntoPrimitive, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Extrapolation {
    #[default]
    Cycle = 0,
    Reverse = 1,
    Constant = 2,
}

/// Interpolation of a key group. Stored raw inside [`KeyMap`], since files do contain values
/// outside of this list.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyType {
    Linear = 1,
    Quadratic = 2,
    Tbc = 3,
    XyzRotation = 4,
    Constant = 5,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key<T> {
    pub time: f32,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap<T> {
    pub interpolation: u32,
    pub keys: Vec<Key<T>>,
}

impl<T> Default for KeyMap<T> {
    fn default() -> Self {
        KeyMap {
            interpolation: 0,
            keys: Vec::new(),
        }
    }
}

impl<T> KeyMap<T> {
    pub fn new(interpolation: KeyType, keys: Vec<(f32, T)>) -> Self {
        KeyMap {
            interpolation: interpolation.into(),
            keys: keys
                .into_iter()
                .map(|(time, value)| Key { time, value })
                .collect(),
        }
    }

    /// Files write an interpolation of 0 for empty groups, so there is nothing to decode then.
    pub fn key_type(&self) -> Option<Result<KeyType, TryFromPrimitiveError<KeyType>>> {
        if self.keys.is_empty() {
            return None;
        }

        Some(KeyType::try_from(self.interpolation))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// The part that every object placed in the scene shares (NiAVObject and NiObjectNET).
pub struct AvObject {
    pub name: String,
    /// Head of the extra data chain.
    pub extra: Option<RecordIndex>,
    /// Head of the controller chain.
    pub controller: Option<RecordIndex>,
    pub flags: NodeFlags,
    pub transform: NiTransform,
    pub properties: Vec<Option<RecordIndex>>,
}

impl AvObject {
    pub fn named(name: impl Into<String>) -> Self {
        AvObject {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum NodeType {
    #[default]
    Plain,
    RootCollision,
    BsAnimation,
    BsParticle,
    Billboard,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiNode {
    pub base: AvObject,
    pub node_type: NodeType,
    pub children: Vec<Option<RecordIndex>>,
}

impl NiNode {
    pub fn named(name: impl Into<String>) -> Self {
        NiNode {
            base: AvObject::named(name),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.base.flags = flags;
        self
    }

    pub fn with_transform(mut self, transform: NiTransform) -> Self {
        self.base.transform = transform;
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RecordIndex>) -> Self {
        self.children.extend(children.into_iter().map(Some));
        self
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = RecordIndex>) -> Self {
        self.base
            .properties
            .extend(properties.into_iter().map(Some));
        self
    }

    pub fn with_controller(mut self, controller: RecordIndex) -> Self {
        self.base.controller = Some(controller);
        self
    }

    pub fn with_extra(mut self, extra: RecordIndex) -> Self {
        self.base.extra = Some(extra);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiTriShape {
    pub base: AvObject,
    pub data: Option<RecordIndex>,
    pub skin: Option<RecordIndex>,
}

impl NiTriShape {
    pub fn new(name: impl Into<String>, data: RecordIndex) -> Self {
        NiTriShape {
            base: AvObject::named(name),
            data: Some(data),
            skin: None,
        }
    }

    pub fn with_skin(mut self, skin: RecordIndex) -> Self {
        self.skin = Some(skin);
        self
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = RecordIndex>) -> Self {
        self.base
            .properties
            .extend(properties.into_iter().map(Some));
        self
    }

    pub fn with_controller(mut self, controller: RecordIndex) -> Self {
        self.base.controller = Some(controller);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiTriShapeData {
    pub vertices: Vec<C3Vector>,
    pub normals: Vec<C3Vector>,
    pub colors: Vec<CColor4>,
    pub uv_sets: Vec<Vec<C2Vector>>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u16>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ParticlesType {
    #[default]
    AutoNormal,
    Rotating,
}

/// NiAutoNormalParticles and NiRotatingParticles, the particle system driven by a
/// NiParticleSystemController in its controller chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiParticles {
    pub base: AvObject,
    pub particles_type: ParticlesType,
    pub data: Option<RecordIndex>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiParticlesData {
    pub vertices: Vec<C3Vector>,
    pub colors: Vec<CColor4>,
    pub sizes: Vec<f32>,
    pub active_count: u16,
    /// Only written for NiRotatingParticles.
    pub rotations: Vec<C4Quaternion>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBase {
    pub name: String,
    pub controller: Option<RecordIndex>,
    pub flags: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub base: PropertyBase,
    pub kind: PropertyKind,
}

impl Property {
    pub fn new(flags: u16, kind: PropertyKind) -> Self {
        Property {
            base: PropertyBase {
                flags,
                ..Default::default()
            },
            kind,
        }
    }

    pub fn with_controller(mut self, controller: RecordIndex) -> Self {
        self.base.controller = Some(controller);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Texturing(NiTexturingProperty),
    Material(NiMaterialProperty),
    VertexColor(NiVertexColorProperty),
    Specular,
    Alpha { threshold: u8 },
    ZBuffer,
    Wireframe,
    Stencil(NiStencilProperty),
    Shade,
    Dither,
    Fog,
    Unknown(String),
}

pub const NUM_TEXTURES: usize = 7;

#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    Base = 0,
    Dark = 1,
    Detail = 2,
    Gloss = 3,
    Glow = 4,
    Bump = 5,
    Decal = 6,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextureDesc {
    pub in_use: bool,
    /// The NiSourceTexture to sample.
    pub source: Option<RecordIndex>,
    pub clamp: u32,
    pub filter: u32,
    pub uv_set: u32,
}

impl TextureDesc {
    pub fn new(source: RecordIndex, uv_set: u32) -> Self {
        TextureDesc {
            in_use: true,
            source: Some(source),
            // wrap in both directions
            clamp: 3,
            filter: 0,
            uv_set,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiTexturingProperty {
    pub apply_mode: u32,
    pub textures: [TextureDesc; NUM_TEXTURES],
}

impl NiTexturingProperty {
    pub fn with_texture(mut self, slot: TextureSlot, desc: TextureDesc) -> Self {
        self.textures[u32::from(slot) as usize] = desc;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NiMaterialProperty {
    pub ambient: C3Vector,
    pub diffuse: C3Vector,
    pub specular: C3Vector,
    pub emissive: C3Vector,
    pub glossiness: f32,
    pub alpha: f32,
}

impl Default for NiMaterialProperty {
    fn default() -> Self {
        NiMaterialProperty {
            ambient: C3Vector::new(1.0, 1.0, 1.0),
            diffuse: C3Vector::new(1.0, 1.0, 1.0),
            specular: C3Vector::new(0.0, 0.0, 0.0),
            emissive: C3Vector::new(0.0, 0.0, 0.0),
            glossiness: 0.0,
            alpha: 1.0,
        }
    }
}

#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum VertexMode {
    SrcIgnore = 0,
    SrcEmissive = 1,
    #[default]
    SrcAmbDif = 2,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NiVertexColorProperty {
    pub vertex_mode: u32,
    pub lighting_mode: u32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NiStencilProperty {
    pub enabled: bool,
    pub compare_func: u32,
    pub reference: u32,
    pub mask: u32,
    pub fail_action: u32,
    pub z_fail_action: u32,
    pub z_pass_action: u32,
    /// 0: counter clockwise or both, 1: counter clockwise, 2: clockwise, 3: both
    pub draw_mode: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiSourceTexture {
    pub name: String,
    pub external: bool,
    pub filename: String,
    /// Embedded pixel data, only set when not external.
    pub pixel_data: Option<RecordIndex>,
}

impl NiSourceTexture {
    pub fn external(filename: impl Into<String>) -> Self {
        NiSourceTexture {
            name: String::new(),
            external: true,
            filename: filename.into(),
            pixel_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub next: Option<RecordIndex>,
    pub flags: ControllerFlags,
    pub frequency: f32,
    pub phase: f32,
    pub start_time: f32,
    pub stop_time: f32,
    pub target: Option<RecordIndex>,
    pub kind: ControllerKind,
}

impl Controller {
    pub fn new(kind: ControllerKind) -> Self {
        Controller {
            next: None,
            flags: ControllerFlags::ACTIVE,
            frequency: 1.0,
            phase: 0.0,
            start_time: 0.0,
            stop_time: 0.0,
            target: None,
            kind,
        }
    }

    pub fn with_next(mut self, next: RecordIndex) -> Self {
        self.next = Some(next);
        self
    }

    pub fn with_flags(mut self, flags: ControllerFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_timing(mut self, frequency: f32, phase: f32, start_time: f32, stop_time: f32) -> Self {
        self.frequency = frequency;
        self.phase = phase;
        self.start_time = start_time;
        self.stop_time = stop_time;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerKind {
    Keyframe { data: Option<RecordIndex> },
    Visibility { data: Option<RecordIndex> },
    Uv { data: Option<RecordIndex> },
    Alpha { data: Option<RecordIndex> },
    MaterialColor { data: Option<RecordIndex> },
    Flip {
        texture_slot: u32,
        delta: f32,
        sources: Vec<Option<RecordIndex>>,
    },
    GeomMorpher { data: Option<RecordIndex> },
    ParticleSystem(Box<ParticleSystemController>),
    Unknown(String),
}

impl ControllerKind {
    pub fn name(&self) -> &str {
        match self {
            ControllerKind::Keyframe { .. } => "NiKeyframeController",
            ControllerKind::Visibility { .. } => "NiVisController",
            ControllerKind::Uv { .. } => "NiUVController",
            ControllerKind::Alpha { .. } => "NiAlphaController",
            ControllerKind::MaterialColor { .. } => "NiMaterialColorController",
            ControllerKind::Flip { .. } => "NiFlipController",
            ControllerKind::GeomMorpher { .. } => "NiGeomMorpherController",
            ControllerKind::ParticleSystem(_) => "NiParticleSystemController",
            ControllerKind::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Particle {
    pub velocity: C3Vector,
    pub lifetime: f32,
    pub lifespan: f32,
    pub timestamp: f32,
    /// Index into the vertices of the NiParticlesData.
    pub vertex: u16,
}

bitflags! {
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct EmitFlags: u16 {
        /// Use the emit rate instead of deriving it from the particle count and lifetime.
        const NO_AUTO_ADJUST = 0x0001;
        const _ = !0;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystemController {
    pub velocity: f32,
    pub velocity_random: f32,
    pub vertical_direction: f32,
    pub vertical_angle: f32,
    pub horizontal_direction: f32,
    pub horizontal_angle: f32,
    pub color: CColor4,
    pub size: f32,
    pub emit_start: f32,
    pub emit_stop: f32,
    pub emit_rate: f32,
    pub lifetime: f32,
    pub lifetime_random: f32,
    pub emit_flags: EmitFlags,
    pub offset_random: C3Vector,
    /// The node the particles are emitted from.
    pub emitter: Option<RecordIndex>,
    /// Head of the particle modifier chain.
    pub modifier: Option<RecordIndex>,
    pub num_particles: u16,
    pub active_count: u16,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiKeyframeData {
    pub rotations: KeyMap<C4Quaternion>,
    pub translations: KeyMap<C3Vector>,
    pub scales: KeyMap<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiFloatData {
    pub keys: KeyMap<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiPosData {
    pub keys: KeyMap<C3Vector>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiVisData {
    pub keys: Vec<Key<bool>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiUvData {
    /// U offset, V offset, U tiling, V tiling.
    pub tracks: [KeyMap<f32>; 4],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiColorData {
    pub keys: KeyMap<CColor4>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Morph {
    pub keys: KeyMap<f32>,
    pub vertices: Vec<C3Vector>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiMorphData {
    pub morphs: Vec<Morph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleModifier {
    pub next: Option<RecordIndex>,
    pub kind: ModifierKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierKind {
    GrowFade {
        grow_time: f32,
        fade_time: f32,
    },
    Gravity {
        force: f32,
        /// 0: wind (along the direction), 1: point
        gravity_type: u32,
        position: C3Vector,
        direction: C3Vector,
    },
    ColorModifier {
        data: Option<RecordIndex>,
    },
    Rotation {
        initial_axis: C3Vector,
        rotation_speed: f32,
    },
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiSkinInstance {
    pub data: Option<RecordIndex>,
    pub root: Option<RecordIndex>,
    pub bones: Vec<Option<RecordIndex>>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VertexWeight {
    pub vertex: u16,
    pub weight: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinBoneData {
    /// Transforms from mesh space into the space of this bone.
    pub transform: NiTransform,
    pub bound_center: C3Vector,
    pub bound_radius: f32,
    pub weights: Vec<VertexWeight>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiSkinData {
    pub transform: NiTransform,
    /// One entry per bone of the owning NiSkinInstance, in the same order.
    pub bones: Vec<SkinBoneData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextKey {
    pub time: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtraData {
    pub next: Option<RecordIndex>,
    pub kind: ExtraDataKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtraDataKind {
    String(String),
    TextKeys(Vec<TextKey>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Node(NiNode),
    TriShape(NiTriShape),
    TriShapeData(NiTriShapeData),
    Particles(NiParticles),
    ParticlesData(NiParticlesData),
    Property(Property),
    SourceTexture(NiSourceTexture),
    Controller(Controller),
    KeyframeData(NiKeyframeData),
    FloatData(NiFloatData),
    PosData(NiPosData),
    VisData(NiVisData),
    UvData(NiUvData),
    ColorData(NiColorData),
    MorphData(NiMorphData),
    ParticleModifier(ParticleModifier),
    SkinInstance(NiSkinInstance),
    SkinData(NiSkinData),
    ExtraData(ExtraData),
    /// A record type the decoder could read past but which has no typed representation.
    Unknown { name: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Node,
    TriShape,
    TriShapeData,
    Particles,
    ParticlesData,
    Property,
    SourceTexture,
    Controller,
    KeyframeData,
    FloatData,
    PosData,
    VisData,
    UvData,
    ColorData,
    MorphData,
    ParticleModifier,
    SkinInstance,
    SkinData,
    ExtraData,
    Unknown,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Node => "NiNode",
            RecordKind::TriShape => "NiTriShape",
            RecordKind::TriShapeData => "NiTriShapeData",
            RecordKind::Particles => "NiParticles",
            RecordKind::ParticlesData => "NiParticlesData",
            RecordKind::Property => "NiProperty",
            RecordKind::SourceTexture => "NiSourceTexture",
            RecordKind::Controller => "NiTimeController",
            RecordKind::KeyframeData => "NiKeyframeData",
            RecordKind::FloatData => "NiFloatData",
            RecordKind::PosData => "NiPosData",
            RecordKind::VisData => "NiVisData",
            RecordKind::UvData => "NiUVData",
            RecordKind::ColorData => "NiColorData",
            RecordKind::MorphData => "NiMorphData",
            RecordKind::ParticleModifier => "NiParticleModifier",
            RecordKind::SkinInstance => "NiSkinInstance",
            RecordKind::SkinData => "NiSkinData",
            RecordKind::ExtraData => "NiExtraData",
            RecordKind::Unknown => "unknown record",
        };
        f.write_str(name)
    }
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Node(_) => RecordKind::Node,
            Record::TriShape(_) => RecordKind::TriShape,
            Record::TriShapeData(_) => RecordKind::TriShapeData,
            Record::Particles(_) => RecordKind::Particles,
            Record::ParticlesData(_) => RecordKind::ParticlesData,
            Record::Property(_) => RecordKind::Property,
            Record::SourceTexture(_) => RecordKind::SourceTexture,
            Record::Controller(_) => RecordKind::Controller,
            Record::KeyframeData(_) => RecordKind::KeyframeData,
            Record::FloatData(_) => RecordKind::FloatData,
            Record::PosData(_) => RecordKind::PosData,
            Record::VisData(_) => RecordKind::VisData,
            Record::UvData(_) => RecordKind::UvData,
            Record::ColorData(_) => RecordKind::ColorData,
            Record::MorphData(_) => RecordKind::MorphData,
            Record::ParticleModifier(_) => RecordKind::ParticleModifier,
            Record::SkinInstance(_) => RecordKind::SkinInstance,
            Record::SkinData(_) => RecordKind::SkinData,
            Record::ExtraData(_) => RecordKind::ExtraData,
            Record::Unknown { .. } => RecordKind::Unknown,
        }
    }

    /// The scene placement part of records that can appear in a child list.
    pub fn av_object(&self) -> Option<&AvObject> {
        match self {
            Record::Node(node) => Some(&node.base),
            Record::TriShape(shape) => Some(&shape.base),
            Record::Particles(particles) => Some(&particles.base),
            _ => None,
        }
    }

    /// Name as it would appear in the file, including the specific class of unknown records.
    pub fn record_name(&self) -> String {
        match self {
            Record::Unknown { name } => name.clone(),
            Record::Property(Property {
                kind: PropertyKind::Unknown(name),
                ..
            }) => name.clone(),
            Record::Controller(controller) => controller.kind.name().to_owned(),
            other => other.kind().to_string(),
        }
    }
}

/// Typed access into the [`Record`] enum, used by [`crate::nif::file::NifFile::get`].
pub trait RecordType: Sized {
    const KIND: RecordKind;

    fn from_record(record: &Record) -> Option<&Self>;
}

macro_rules! record_type {
    ($ty:ty, $variant:ident) => {
        impl RecordType for $ty {
            const KIND: RecordKind = RecordKind::$variant;

            fn from_record(record: &Record) -> Option<&Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Record {
            fn from(value: $ty) -> Self {
                Record::$variant(value)
            }
        }
    };
}

record_type!(NiNode, Node);
record_type!(NiTriShape, TriShape);
record_type!(NiTriShapeData, TriShapeData);
record_type!(NiParticles, Particles);
record_type!(NiParticlesData, ParticlesData);
record_type!(Property, Property);
record_type!(NiSourceTexture, SourceTexture);
record_type!(Controller, Controller);
record_type!(NiKeyframeData, KeyframeData);
record_type!(NiFloatData, FloatData);
record_type!(NiPosData, PosData);
record_type!(NiVisData, VisData);
record_type!(NiUvData, UvData);
record_type!(NiColorData, ColorData);
record_type!(NiMorphData, MorphData);
record_type!(ParticleModifier, ParticleModifier);
record_type!(NiSkinInstance, SkinInstance);
record_type!(NiSkinData, SkinData);
record_type!(ExtraData, ExtraData);
