use crate::loader::conversions::vec3;
use crate::scene::types::{
    AlphaTest, BlendFactor, BlendState, BoundTexture, ColorMode, CompareFunc, DepthState, FaceCulling, FrontFace,
    Material, StateSet, TextureEnv,
};
use crate::textures::{correct_texture_path, TextureResolver};
use log::{debug, warn};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{
    NiMaterialProperty, NiSourceTexture, NiStencilProperty, NiTexturingProperty, NiVertexColorProperty, Property,
    PropertyKind, TextureSlot, VertexMode,
};
use std::collections::BTreeMap;

const ALPHA_BLEND: u16 = 0x0001;
const ALPHA_TEST: u16 = 0x0200;
const ALPHA_NO_SORTER: u16 = 0x2000;

/// The render state in effect at a node: the inherited state with the node's own properties
/// applied on top. Properties are kept as references into the file until a [`StateSet`] is
/// needed, since the material depends on the geometry it ends up on.
#[derive(Debug, Clone, Default)]
pub struct EffectiveState<'f> {
    /// Bound Texture Map, by texture unit. Units are only ever added or replaced.
    pub textures: BTreeMap<u32, BoundTexture>,
    pub material: Option<&'f NiMaterialProperty>,
    pub vertex_color: Option<&'f NiVertexColorProperty>,
    pub specular: Option<u16>,
    /// (flags, threshold)
    pub alpha: Option<(u16, u8)>,
    pub zbuffer: Option<u16>,
    pub wireframe: Option<u16>,
    pub stencil: Option<&'f NiStencilProperty>,
}

#[derive(Debug, Clone)]
pub struct ResolvedProperties<'f> {
    pub state: EffectiveState<'f>,
    /// The properties declared by the node itself, in declaration order.
    pub declared: Vec<(RecordIndex, &'f Property)>,
}

pub struct PropertyResolver<'f, T: TextureResolver + ?Sized> {
    file: &'f NifFile,
    textures: &'f T,
}

impl<'f, T: TextureResolver + ?Sized> PropertyResolver<'f, T> {
    pub fn new(file: &'f NifFile, textures: &'f T) -> Self {
        Self { file, textures }
    }

    pub fn resolve(
        &self,
        owner: RecordIndex,
        own: &'f [Option<RecordIndex>],
        inherited: &EffectiveState<'f>,
    ) -> ResolvedProperties<'f> {
        let mut state = inherited.clone();
        let mut declared = Vec::with_capacity(own.len());

        for index in own.iter().flatten().copied() {
            let property = match self.file.get::<Property>(index) {
                Ok(property) => property,
                Err(e) => {
                    warn!("{}: property of {} skipped: {}", self.file.name(), owner, e);
                    continue;
                }
            };

            match &property.kind {
                PropertyKind::Texturing(texturing) => self.apply_texturing(index, texturing, &mut state.textures),
                PropertyKind::Material(material) => state.material = Some(material),
                PropertyKind::VertexColor(vertex_color) => state.vertex_color = Some(vertex_color),
                PropertyKind::Specular => state.specular = Some(property.base.flags),
                PropertyKind::Alpha { threshold } => state.alpha = Some((property.base.flags, *threshold)),
                PropertyKind::ZBuffer => state.zbuffer = Some(property.base.flags),
                PropertyKind::Wireframe => state.wireframe = Some(property.base.flags),
                PropertyKind::Stencil(stencil) => state.stencil = Some(stencil),
                PropertyKind::Shade | PropertyKind::Dither | PropertyKind::Fog => {
                    debug!("{}: ignoring {:?} property {}", self.file.name(), property.kind, index);
                }
                PropertyKind::Unknown(name) => {
                    warn!("{}: unhandled property type {} ({})", self.file.name(), name, index);
                }
            }

            declared.push((index, property));
        }

        ResolvedProperties { state, declared }
    }

    fn apply_texturing(
        &self,
        index: RecordIndex,
        texturing: &NiTexturingProperty,
        textures: &mut BTreeMap<u32, BoundTexture>,
    ) {
        for (unit, desc) in texturing.textures.iter().enumerate() {
            if !desc.in_use {
                continue;
            }

            let unit = unit as u32;
            let slot = match TextureSlot::try_from(unit) {
                Ok(slot @ (TextureSlot::Base | TextureSlot::Dark | TextureSlot::Detail | TextureSlot::Glow)) => slot,
                Ok(slot) => {
                    warn!("{}: unhandled {:?} map in {}", self.file.name(), slot, index);
                    continue;
                }
                Err(_) => continue,
            };

            let Some(source) = desc.source else {
                warn!("{}: texture unit {} of {} is used but empty", self.file.name(), unit, index);
                continue;
            };

            let texture = match self.file.get::<NiSourceTexture>(source) {
                Ok(texture) => texture,
                Err(e) => {
                    warn!("{}: texture unit {} of {} skipped: {}", self.file.name(), unit, index, e);
                    continue;
                }
            };

            if !texture.external {
                warn!("{}: embedded texture {} is not supported", self.file.name(), source);
                continue;
            }

            let path = correct_texture_path(&texture.filename);
            let reference = match self.textures.resolve(&path) {
                Ok(reference) => Some(reference),
                Err(e) => {
                    warn!("{}: {}", self.file.name(), e);
                    None
                }
            };

            let env = match slot {
                TextureSlot::Glow => TextureEnv::Add,
                TextureSlot::Detail => TextureEnv::Modulate2x,
                _ => TextureEnv::Modulate,
            };

            textures.insert(unit, BoundTexture {
                source,
                slot,
                uv_set: desc.uv_set,
                wrap_s: desc.clamp & 0x2 != 0,
                wrap_t: desc.clamp & 0x1 != 0,
                env,
                texture: reference,
            });
        }
    }
}

impl EffectiveState<'_> {
    /// The state a node with own properties carries. Only includes a material when a material
    /// property is in effect.
    pub fn state_set(&self) -> StateSet {
        let mut state = self.render_state();
        state.material = self.material.map(|_| self.build_material(false));
        state
    }

    /// The complete state of a piece of geometry.
    pub fn geometry_state_set(&self, has_vertex_colors: bool) -> StateSet {
        let mut state = self.render_state();
        state.material = Some(self.build_material(has_vertex_colors));
        state
    }

    fn render_state(&self) -> StateSet {
        let mut state = StateSet {
            textures: self.textures.clone(),
            ..Default::default()
        };

        if let Some((flags, threshold)) = self.alpha {
            if flags & ALPHA_BLEND != 0 {
                state.blend = Some(BlendState {
                    src: blend_factor((flags >> 1) & 0xf),
                    dst: blend_factor((flags >> 5) & 0xf),
                    sorted: flags & ALPHA_NO_SORTER == 0,
                });
            }

            if flags & ALPHA_TEST != 0 {
                state.alpha_test = Some(AlphaTest {
                    func: compare_func((flags >> 10) & 0x7),
                    threshold: threshold as f32 / 255.0,
                });
            }
        }

        state.depth = self.zbuffer.map(|flags| DepthState {
            test: flags & 0x1 != 0,
            write: flags & 0x2 != 0,
        });

        state.wireframe = self.wireframe.is_some_and(|flags| flags != 0);

        state.culling = self.stencil.map(|stencil| FaceCulling {
            enabled: stencil.draw_mode != 3,
            front_face: if stencil.draw_mode == 2 {
                FrontFace::Clockwise
            } else {
                FrontFace::CounterClockwise
            },
        });

        state
    }

    fn build_material(&self, has_vertex_colors: bool) -> Material {
        let mut material = Material::default();

        if let Some(properties) = self.material {
            material.ambient = vec3(&properties.ambient).extend(1.0);
            material.diffuse = vec3(&properties.diffuse).extend(properties.alpha);
            material.specular = vec3(&properties.specular).extend(1.0);
            material.emission = vec3(&properties.emissive).extend(1.0);
            material.shininess = properties.glossiness;
        }

        if !self.specular.is_some_and(|flags| flags & 0x1 != 0) {
            material.specular = glam::Vec4::ZERO;
        }

        material.color_mode = if !has_vertex_colors {
            ColorMode::Off
        } else {
            match self.vertex_color.map(|vc| VertexMode::try_from(vc.vertex_mode)) {
                None | Some(Ok(VertexMode::SrcAmbDif)) => ColorMode::AmbientAndDiffuse,
                Some(Ok(VertexMode::SrcEmissive)) => ColorMode::Emission,
                Some(Ok(VertexMode::SrcIgnore)) => ColorMode::Off,
                Some(Err(e)) => {
                    warn!("Unexpected vertex color mode: {}", e.number);
                    ColorMode::AmbientAndDiffuse
                }
            }
        };

        material
    }
}

fn blend_factor(mode: u16) -> BlendFactor {
    match mode {
        0 => BlendFactor::One,
        1 => BlendFactor::Zero,
        2 => BlendFactor::SrcColor,
        3 => BlendFactor::OneMinusSrcColor,
        4 => BlendFactor::DstColor,
        5 => BlendFactor::OneMinusDstColor,
        6 => BlendFactor::SrcAlpha,
        7 => BlendFactor::OneMinusSrcAlpha,
        8 => BlendFactor::DstAlpha,
        9 => BlendFactor::OneMinusDstAlpha,
        10 => BlendFactor::SrcAlphaSaturate,
        _ => {
            warn!("Unexpected blend mode: {}", mode);
            BlendFactor::SrcAlpha
        }
    }
}

fn compare_func(func: u16) -> CompareFunc {
    match func {
        0 => CompareFunc::Always,
        1 => CompareFunc::Less,
        2 => CompareFunc::Equal,
        3 => CompareFunc::LessOrEqual,
        4 => CompareFunc::Greater,
        5 => CompareFunc::NotEqual,
        6 => CompareFunc::GreaterOrEqual,
        _ => CompareFunc::Never,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_support::FakeTextures;
    use nifscene_files::common::types::C3Vector;
    use nifscene_files::nif::builder::NifFileBuilder;
    use nifscene_files::nif::types::TextureDesc;

    fn texturing(builder: &mut NifFileBuilder, slots: &[(TextureSlot, &str)]) -> RecordIndex {
        let mut property = NiTexturingProperty::default();
        for (slot, filename) in slots {
            let source = builder.push(NiSourceTexture::external(*filename));
            property = property.with_texture(*slot, TextureDesc::new(source, 0));
        }
        builder.push(Property::new(0, PropertyKind::Texturing(property)))
    }

    #[test]
    fn own_texture_units_override_inherited_ones() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("units.nif");
        let parent = texturing(&mut builder, &[
            (TextureSlot::Base, "parent_base.tga"),
            (TextureSlot::Dark, "parent_dark.tga"),
        ]);
        let child = texturing(&mut builder, &[(TextureSlot::Base, "child_base.tga")]);
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let resolver = PropertyResolver::new(&file, &textures);
        let parent_props = [Some(parent)];
        let child_props = [Some(child)];

        let parent_state = resolver.resolve(RecordIndex(100), &parent_props, &EffectiveState::default());
        let child_state = resolver.resolve(RecordIndex(101), &child_props, &parent_state.state);

        let units = child_state.state.textures;
        assert_eq!(units.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        let base = units[&0].texture.as_ref().map(|t| t.path.clone());
        let dark = units[&1].texture.as_ref().map(|t| t.path.clone());
        assert_eq!(base.as_deref(), Some("textures\\child_base.dds"));
        assert_eq!(dark.as_deref(), Some("textures\\parent_dark.dds"));
        assert_eq!(units[&1].env, TextureEnv::Modulate);

        // the parent did not see the child's binding
        let parent_base = parent_state.state.textures[&0].texture.as_ref().map(|t| t.path.clone());
        assert_eq!(parent_base.as_deref(), Some("textures\\parent_base.dds"));
        assert_eq!(child_state.declared.len(), 1);

        Ok(())
    }

    #[test]
    fn unsupported_and_broken_units_are_skipped() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("broken_units.nif");
        let internal = builder.push(NiSourceTexture {
            external: false,
            ..Default::default()
        });
        let bump = builder.push(NiSourceTexture::external("bump.tga"));
        let glow = builder.push(NiSourceTexture::external("missing_glow.tga"));
        let property = NiTexturingProperty::default()
            .with_texture(TextureSlot::Base, TextureDesc::new(internal, 0))
            .with_texture(TextureSlot::Bump, TextureDesc::new(bump, 0))
            .with_texture(TextureSlot::Detail, TextureDesc {
                in_use: true,
                ..Default::default()
            })
            .with_texture(TextureSlot::Glow, TextureDesc::new(glow, 1));
        let property = builder.push(Property::new(0, PropertyKind::Texturing(property)));
        let file = builder.build()?;

        let textures = FakeTextures::with_missing(["textures\\missing_glow.dds"]);
        let resolver = PropertyResolver::new(&file, &textures);
        let props = [Some(property)];
        let resolved = resolver.resolve(RecordIndex(0), &props, &EffectiveState::default());

        let units = resolved.state.textures;
        assert_eq!(units.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(units[&4].env, TextureEnv::Add);
        assert_eq!(units[&4].uv_set, 1);
        assert!(units[&4].texture.is_none());
        assert!(units[&4].wrap_s && units[&4].wrap_t);

        Ok(())
    }

    #[test]
    fn alpha_zbuffer_and_stencil_flags() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("flags.nif");
        // blend src alpha / one minus src alpha, alpha test greater than 128
        let alpha_flags = ALPHA_BLEND | (6 << 1) | (7 << 5) | ALPHA_TEST | (4 << 10) | ALPHA_NO_SORTER;
        let alpha = builder.push(Property::new(alpha_flags, PropertyKind::Alpha { threshold: 128 }));
        let zbuffer = builder.push(Property::new(0x1, PropertyKind::ZBuffer));
        let stencil = builder.push(Property::new(
            0,
            PropertyKind::Stencil(NiStencilProperty {
                draw_mode: 3,
                ..Default::default()
            }),
        ));
        let wireframe = builder.push(Property::new(1, PropertyKind::Wireframe));
        let fog = builder.push(Property::new(0, PropertyKind::Fog));
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let resolver = PropertyResolver::new(&file, &textures);
        let props = [Some(alpha), Some(zbuffer), Some(stencil), Some(wireframe), Some(fog), None];
        let state = resolver
            .resolve(RecordIndex(0), &props, &EffectiveState::default())
            .state
            .state_set();

        assert_eq!(
            state.blend,
            Some(BlendState {
                src: BlendFactor::SrcAlpha,
                dst: BlendFactor::OneMinusSrcAlpha,
                sorted: false
            })
        );
        let alpha_test = state.alpha_test.expect("alpha test enabled");
        assert_eq!(alpha_test.func, CompareFunc::Greater);
        assert!((alpha_test.threshold - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(state.depth, Some(DepthState { test: true, write: false }));
        assert_eq!(state.culling.map(|c| c.enabled), Some(false));
        assert!(state.wireframe);
        assert!(state.material.is_none());

        Ok(())
    }

    #[test]
    fn material_specular_and_vertex_colors() -> Result<(), anyhow::Error> {
        let mut builder = NifFileBuilder::new("material.nif");
        let material = builder.push(Property::new(
            0,
            PropertyKind::Material(NiMaterialProperty {
                specular: C3Vector::new(1.0, 1.0, 1.0),
                glossiness: 10.0,
                alpha: 0.5,
                ..Default::default()
            }),
        ));
        let specular = builder.push(Property::new(1, PropertyKind::Specular));
        let vertex_color = builder.push(Property::new(
            0,
            PropertyKind::VertexColor(NiVertexColorProperty {
                vertex_mode: 1,
                lighting_mode: 1,
            }),
        ));
        let file = builder.build()?;

        let textures = FakeTextures::default();
        let resolver = PropertyResolver::new(&file, &textures);

        let only_material = [Some(material)];
        let state = resolver.resolve(RecordIndex(0), &only_material, &EffectiveState::default()).state;
        let plain = state.geometry_state_set(false).material.expect("material");
        assert_eq!(plain.specular, glam::Vec4::ZERO);
        assert_eq!(plain.diffuse.w, 0.5);
        assert_eq!(plain.color_mode, ColorMode::Off);
        let colored = state.geometry_state_set(true).material.expect("material");
        assert_eq!(colored.color_mode, ColorMode::AmbientAndDiffuse);

        let all = [Some(material), Some(specular), Some(vertex_color)];
        let state = resolver.resolve(RecordIndex(0), &all, &EffectiveState::default()).state;
        let lit = state.geometry_state_set(true).material.expect("material");
        assert_eq!(lit.specular, glam::Vec4::ONE);
        assert_eq!(lit.shininess, 10.0);
        assert_eq!(lit.color_mode, ColorMode::Emission);

        Ok(())
    }
}
