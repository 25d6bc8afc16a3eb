use crate::scene::skeleton::BoneId;
use crate::textures::TextureReference;
use glam::{Affine3A, Vec2, Vec3, Vec4};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::types::TextureSlot;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    Zero,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareFunc {
    Always,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Never,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendState {
    pub src: BlendFactor,
    pub dst: BlendFactor,
    /// Whether the renderer should depth sort this as transparent geometry.
    pub sorted: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlphaTest {
    pub func: CompareFunc,
    pub threshold: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DepthState {
    pub test: bool,
    pub write: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceCulling {
    pub enabled: bool,
    pub front_face: FrontFace,
}

/// Which material colors are replaced by the vertex colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorMode {
    Off,
    Emission,
    AmbientAndDiffuse,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub shininess: f32,
    pub color_mode: ColorMode,
}

impl Default for Material {
    /// The fixed function pipeline defaults.
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            color_mode: ColorMode::Off,
        }
    }
}

/// How a texture unit combines with the result of the previous units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureEnv {
    Modulate,
    Add,
    /// Modulate and scale the result by two, used by detail maps.
    Modulate2x,
}

#[derive(Debug, Clone)]
pub struct BoundTexture {
    /// The NiSourceTexture record.
    pub source: RecordIndex,
    pub slot: TextureSlot,
    pub uv_set: u32,
    pub wrap_s: bool,
    pub wrap_t: bool,
    pub env: TextureEnv,
    /// None if the texture file could not be found.
    pub texture: Option<Arc<TextureReference>>,
}

#[derive(Debug, Clone)]
pub struct StateSet {
    /// Bound textures by texture unit.
    pub textures: BTreeMap<u32, BoundTexture>,
    pub material: Option<Material>,
    pub blend: Option<BlendState>,
    pub alpha_test: Option<AlphaTest>,
    pub depth: Option<DepthState>,
    pub wireframe: bool,
    pub culling: Option<FaceCulling>,
    pub lighting: bool,
}

impl Default for StateSet {
    fn default() -> Self {
        Self {
            textures: BTreeMap::new(),
            material: None,
            blend: None,
            alpha_test: None,
            depth: None,
            wireframe: false,
            culling: None,
            lighting: true,
        }
    }
}

#[derive(Clone, Default)]
pub struct VertexBuffers {
    pub position_buffer: Vec<Vec3>,
    pub normals_buffer: Vec<Vec3>,
    /// Texture coordinates by the texture unit that samples them.
    pub texcoord_buffers: BTreeMap<u32, Vec<Vec2>>,
    pub vertex_color_0: Vec<Vec4>,
}

impl Debug for VertexBuffers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ position_buffer: [{}], ", self.position_buffer.len())?;
        write!(f, "normals_buffer: [{}], ", self.normals_buffer.len())?;
        write!(f, "texcoord_buffers: {:?}, ", self.texcoord_buffers.keys())?;
        write!(f, "vertex_color_0: [{}] }}", self.vertex_color_0.len())
    }
}

#[derive(Clone, Default)]
pub struct Mesh {
    pub vertex_buffers: VertexBuffers,
    pub index_buffer: Vec<u32>,
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ vertex_buffers: {:?}, ", self.vertex_buffers)?;
        write!(f, "index_buffer: [{}] }}", self.index_buffer.len())
    }
}

#[derive(Debug, Clone)]
pub struct BoneInfluence {
    pub bone: BoneId,
    pub bone_name: String,
    /// Transforms from mesh space into the space of the bone.
    pub mesh_to_bone: Affine3A,
    pub bound_center: Vec3,
    pub bound_radius: f32,
    /// (vertex, weight)
    pub weights: Vec<(u32, f32)>,
}

#[derive(Debug, Clone)]
pub struct SkinBinding {
    pub skin_transform: Affine3A,
    pub influences: Vec<BoneInfluence>,
}

#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: String,
    pub record: RecordIndex,
    pub mesh: Mesh,
    pub state: StateSet,
    pub skin: Option<SkinBinding>,
    /// Geometry below a RootCollisionNode, only meant for the physics.
    pub collision: bool,
}
