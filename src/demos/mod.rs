//! Small hand built record tables, standing in for files on disk.
use nifscene_files::RecordError;
use nifscene_files::common::types::{C2Vector, C3Vector, CColor4, NiTransform, RecordIndex};
use nifscene_files::nif::builder::NifFileBuilder;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{
    AvObject, Controller, ControllerKind, ExtraData, ExtraDataKind, KeyMap, KeyType, ModifierKind, NiColorData,
    NiFloatData, NiKeyframeData, NiMaterialProperty, NiNode, NiParticles, NiParticlesData, NiSkinData,
    NiSkinInstance, NiSourceTexture, NiTexturingProperty, NiTriShape, NiTriShapeData, NodeFlags, NodeType,
    Particle, ParticleModifier, ParticleSystemController, ParticlesType, Property, PropertyKind, SkinBoneData,
    TextKey, TextureDesc, TextureSlot, VertexWeight,
};

pub const SKELETON_FILE: &str = "meshes\\base_anim.nif";

/// A textured unit quad in the XY plane.
pub fn quad(size: f32) -> NiTriShapeData {
    NiTriShapeData {
        vertices: vec![
            C3Vector::new(0.0, 0.0, 0.0),
            C3Vector::new(size, 0.0, 0.0),
            C3Vector::new(size, size, 0.0),
            C3Vector::new(0.0, size, 0.0),
        ],
        normals: vec![C3Vector::new(0.0, 0.0, 1.0); 4],
        colors: vec![],
        uv_sets: vec![vec![
            C2Vector::new(0.0, 0.0),
            C2Vector::new(1.0, 0.0),
            C2Vector::new(1.0, 1.0),
            C2Vector::new(0.0, 1.0),
        ]],
        triangles: vec![0, 1, 2, 0, 2, 3],
    }
}

fn texturing(builder: &mut NifFileBuilder, slot: TextureSlot, filename: &str) -> RecordIndex {
    let source = builder.push(NiSourceTexture::external(filename));
    builder.push(Property::new(
        0,
        PropertyKind::Texturing(NiTexturingProperty::default().with_texture(slot, TextureDesc::new(source, 0))),
    ))
}

/// A table with a glowing lamp, a collision box and an editor marker.
pub fn static_scene() -> Result<NifFile, RecordError> {
    let mut builder = NifFileBuilder::new("meshes\\demo_table.nif");

    let wood = texturing(&mut builder, TextureSlot::Base, "Tx_Wood_Table.tga");
    let table_data = builder.push(quad(2.0));
    let table = builder.push(NiTriShape::new("Table", table_data));

    let alpha_data = builder.push(NiFloatData {
        keys: KeyMap::new(KeyType::Linear, vec![(0.0, 1.0), (1.0, 0.25), (2.0, 1.0)]),
    });
    let flicker = builder.push(Controller::new(ControllerKind::Alpha { data: Some(alpha_data) }));
    let material = builder.push(
        Property::new(
            0,
            PropertyKind::Material(NiMaterialProperty {
                emissive: C3Vector::new(1.0, 0.8, 0.4),
                ..Default::default()
            }),
        )
        .with_controller(flicker),
    );
    let glow = texturing(&mut builder, TextureSlot::Glow, "Tx_Lamp_Glow.tga");
    let bob_data = builder.push(NiKeyframeData {
        translations: KeyMap::new(KeyType::Linear, vec![
            (0.0, C3Vector::new(1.0, 1.0, 1.0)),
            (1.0, C3Vector::new(1.0, 1.0, 1.2)),
        ]),
        ..Default::default()
    });
    let bob = builder.push(Controller::new(ControllerKind::Keyframe { data: Some(bob_data) }));
    let lamp_data = builder.push(quad(0.5));
    let lamp_shape = builder.push(NiTriShape::new("Lamp Shade", lamp_data).with_properties([glow]));
    let lamp = builder.push(
        NiNode::named("Lamp")
            .with_transform(NiTransform::from_translation(C3Vector::new(1.0, 1.0, 1.0)))
            .with_properties([material])
            .with_controller(bob)
            .with_children([lamp_shape]),
    );

    let collision_data = builder.push(quad(2.0));
    let collision_shape = builder.push(NiTriShape::new("Collision Box", collision_data));
    let collision = builder.push(
        NiNode::named("RootCollisionNode")
            .with_type(NodeType::RootCollision)
            .with_children([collision_shape]),
    );

    let marker_extra = builder.push(ExtraData {
        next: None,
        kind: ExtraDataKind::String(String::from("MRK")),
    });
    let marker_data = builder.push(quad(0.1));
    let marker_shape = builder.push(NiTriShape::new("Marker Arrow", marker_data));
    let marker = builder.push(
        NiNode::named("Editor Marker")
            .with_flags(NodeFlags::HIDDEN)
            .with_extra(marker_extra)
            .with_children([marker_shape]),
    );

    let text_keys = builder.push(ExtraData {
        next: None,
        kind: ExtraDataKind::TextKeys(vec![
            TextKey {
                time: 0.0,
                text: String::from("Idle: Start"),
            },
            TextKey {
                time: 2.0,
                text: String::from("Idle: Stop"),
            },
        ]),
    });
    let root = builder.push(
        NiNode::named("Scene Root")
            .with_properties([wood])
            .with_extra(text_keys)
            .with_children([table, lamp, collision, marker]),
    );
    builder.add_root(root);

    builder.build()
}

/// Three bones in a row, the skeleton the skinned demo binds to.
pub fn skeleton() -> Result<NifFile, RecordError> {
    let mut builder = NifFileBuilder::new(SKELETON_FILE);
    let head = builder.push(
        NiNode::named("Bip01 Head").with_transform(NiTransform::from_translation(C3Vector::new(0.0, 0.0, 1.0))),
    );
    let spine = builder.push(
        NiNode::named("Bip01 Spine")
            .with_transform(NiTransform::from_translation(C3Vector::new(0.0, 0.0, 1.0)))
            .with_children([head]),
    );
    let root = builder.push(NiNode::named("Bip01").with_children([spine]));
    builder.add_root(root);

    builder.build()
}

/// A body part skinned to the bones of [`skeleton`], referring to them by name through
/// placeholder nodes of its own.
pub fn skinned_part() -> Result<NifFile, RecordError> {
    let mut builder = NifFileBuilder::new("meshes\\demo_part.nif");

    let spine = builder.push(NiNode::named("Bip01 Spine"));
    let head = builder.push(NiNode::named("Bip01 Head"));
    let weights = |vertices: &[u16]| {
        vertices
            .iter()
            .map(|&vertex| VertexWeight { vertex, weight: 1.0 })
            .collect::<Vec<_>>()
    };
    let skin_data = builder.push(NiSkinData {
        transform: NiTransform::IDENTITY,
        bones: vec![
            SkinBoneData {
                transform: NiTransform::from_translation(C3Vector::new(0.0, 0.0, -1.0)),
                bound_center: C3Vector::new(0.5, 0.5, 0.0),
                bound_radius: 1.0,
                weights: weights(&[0, 1]),
            },
            SkinBoneData {
                transform: NiTransform::from_translation(C3Vector::new(0.0, 0.0, -2.0)),
                bound_center: C3Vector::new(0.5, 0.5, 0.0),
                bound_radius: 1.0,
                weights: weights(&[2, 3]),
            },
        ],
    });
    let skin = builder.push(NiSkinInstance {
        data: Some(skin_data),
        root: None,
        bones: vec![Some(spine), Some(head)],
    });
    let body = texturing(&mut builder, TextureSlot::Base, "Tx_Body.tga");
    let shape_data = builder.push(quad(1.0));
    let shape = builder.push(
        NiTriShape::new("Tri Chest", shape_data)
            .with_skin(skin)
            .with_properties([body]),
    );
    let root = builder.push(NiNode::named("Chest").with_children([shape, spine, head]));
    builder.add_root(root);

    builder.build()
}

/// A smoke fountain: a particle system in world space, emitting from a separate node.
pub fn particle_fountain() -> Result<NifFile, RecordError> {
    let mut builder = NifFileBuilder::new("meshes\\demo_fountain.nif");

    let emitter = builder.push(
        NiNode::named("Emitter").with_transform(NiTransform::from_translation(C3Vector::new(0.0, 0.0, 0.5))),
    );

    let colors = builder.push(NiColorData {
        keys: KeyMap::new(KeyType::Linear, vec![
            (0.0, CColor4::default()),
            (1.0, CColor4 {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 0.0,
            }),
        ]),
    });
    let color_modifier = builder.push(ParticleModifier {
        next: None,
        kind: ModifierKind::ColorModifier { data: Some(colors) },
    });
    let grow_fade = builder.push(ParticleModifier {
        next: Some(color_modifier),
        kind: ModifierKind::GrowFade {
            grow_time: 0.2,
            fade_time: 0.5,
        },
    });
    let gravity = builder.push(ParticleModifier {
        next: Some(grow_fade),
        kind: ModifierKind::Gravity {
            force: 0.3,
            gravity_type: 0,
            position: C3Vector::new(0.0, 0.0, 0.0),
            direction: C3Vector::new(0.0, 0.0, 1.0),
        },
    });

    let particle_controller = builder.push(Controller::new(ControllerKind::ParticleSystem(Box::new(
        ParticleSystemController {
            velocity: 1.0,
            velocity_random: 0.2,
            vertical_angle: 0.3,
            size: 0.5,
            emit_stop: 10.0,
            lifetime: 2.0,
            lifetime_random: 1.0,
            offset_random: C3Vector::new(0.1, 0.1, 0.0),
            emitter: Some(emitter),
            modifier: Some(gravity),
            num_particles: 25,
            active_count: 2,
            particles: vec![
                Particle {
                    velocity: C3Vector::new(0.0, 0.0, 1.0),
                    lifetime: 0.5,
                    lifespan: 2.0,
                    timestamp: 0.0,
                    vertex: 0,
                },
                Particle {
                    velocity: C3Vector::new(0.0, 0.0, 1.0),
                    lifetime: 1.0,
                    lifespan: 2.0,
                    timestamp: 0.0,
                    vertex: 1,
                },
            ],
            ..Default::default()
        },
    ))));

    let data = builder.push(NiParticlesData {
        vertices: vec![C3Vector::new(0.0, 0.0, 0.0), C3Vector::new(0.0, 0.0, 0.5)],
        colors: vec![],
        sizes: vec![1.0, 2.0],
        active_count: 2,
        rotations: vec![],
    });
    let smoke = texturing(&mut builder, TextureSlot::Base, "Tx_Smoke.tga");
    let alpha = builder.push(Property::new(0x1 | (6 << 1) | (7 << 5), PropertyKind::Alpha { threshold: 0 }));
    let particles = builder.push(NiParticles {
        base: AvObject {
            name: String::from("Smoke"),
            controller: Some(particle_controller),
            properties: vec![Some(smoke), Some(alpha)],
            ..Default::default()
        },
        particles_type: ParticlesType::AutoNormal,
        data: Some(data),
    });

    let root = builder.push(
        NiNode::named("Fountain")
            .with_type(NodeType::BsParticle)
            // auto play
            .with_flags(NodeFlags::from_bits_retain(0x20))
            .with_transform(NiTransform::from_translation(C3Vector::new(5.0, 0.0, 0.0)))
            .with_children([particles, emitter]),
    );
    builder.add_root(root);

    builder.build()
}
