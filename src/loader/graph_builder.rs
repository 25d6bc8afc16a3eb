use crate::StructuralError;
use crate::loader::LoaderOptions;
use crate::loader::controllers::{ControllerBinder, ControllerHost};
use crate::loader::conversions::affine;
use crate::loader::particles::{ParticleBuilder, PendingEmitter};
use crate::loader::properties::{EffectiveState, PropertyResolver, ResolvedProperties};
use crate::loader::shape_importer::ShapeImporter;
use crate::loader::skeleton::{bind_skin, PendingSkin, SkeletonMode};
use crate::scene::backend::{NodeDesc, SceneBackend};
use crate::scene::skeleton::{BoneId, Skeleton};
use crate::scene::types::Geometry;
use crate::textures::TextureResolver;
use glam::Affine3A;
use itertools::Itertools;
use log::{debug, trace, warn};
use nifscene_files::RecordError;
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{
    AnimationFlags, AvObject, ExtraData, ExtraDataKind, NiParticles, NiTriShape, NiTriShapeData, NodeFlags,
    NodeType, ParticleFlags, PropertyKind, Record, TextKey,
};
use std::collections::{HashMap, HashSet};

/// Nodes nested deeper than this fail the load instead of exhausting the stack.
pub const MAX_NODE_DEPTH: usize = 128;

/// What a parent hands down to its children.
#[derive(Debug, Clone)]
struct Branch<'f> {
    state: EffectiveState<'f>,
    world: Affine3A,
    collision: bool,
    skip_meshes: bool,
    bone: Option<BoneId>,
    depth: usize,
}

pub struct GraphOutput<N> {
    pub root: N,
    pub text_keys: Vec<TextKey>,
    pub node_count: usize,
    pub skeleton: Option<Skeleton<N>>,
}

/// State of a single load. Lives exactly as long as one call into the
/// [`crate::loader::Loader`].
pub struct GraphBuilder<'f, 'b, B: SceneBackend, T: TextureResolver + ?Sized> {
    file: &'f NifFile,
    backend: &'b mut B,
    options: &'f LoaderOptions,
    root: RecordIndex,
    properties: PropertyResolver<'f, T>,
    controllers: ControllerBinder<'f, T>,
    particle_flags: ParticleFlags,
    skeleton: SkeletonMode<'f, B::Node>,
    /// The records from the root down to the node being built.
    path: HashSet<RecordIndex>,
    /// First scene node built for each record.
    built: HashMap<RecordIndex, B::Node>,
    pending_skins: Vec<PendingSkin<B::Node>>,
    pending_emitters: Vec<PendingEmitter<B::Node>>,
    text_keys: Vec<TextKey>,
    node_count: usize,
}

impl<'f, 'b, B: SceneBackend, T: TextureResolver + ?Sized> GraphBuilder<'f, 'b, B, T> {
    pub fn new(
        file: &'f NifFile,
        backend: &'b mut B,
        textures: &'f T,
        options: &'f LoaderOptions,
        skeleton: SkeletonMode<'f, B::Node>,
    ) -> Result<Self, StructuralError> {
        let root = file.root(0).ok_or_else(|| StructuralError::NoRoot {
            file: file.name().to_owned(),
        })?;
        let record = file
            .get_record(root)
            .map_err(|source| record_error(file, source))?;
        if record.av_object().is_none() {
            return Err(StructuralError::RootNotANode {
                file: file.name().to_owned(),
                index: root,
                kind: record.kind(),
            });
        }

        if file.roots().len() > 1 {
            debug!("{}: {} roots, only the first one is loaded", file.name(), file.roots().len());
        }

        // NiBSAnimationNode and NiBSParticleNode flags only count at the root.
        let (animation_flags, particle_flags) = match record {
            Record::Node(node) if node.node_type == NodeType::BsAnimation => (
                AnimationFlags::from_bits_truncate(node.base.flags.bits()),
                ParticleFlags::empty(),
            ),
            Record::Node(node) if node.node_type == NodeType::BsParticle => (
                AnimationFlags::empty(),
                ParticleFlags::from_bits_truncate(node.base.flags.bits()),
            ),
            _ => (AnimationFlags::empty(), ParticleFlags::empty()),
        };

        Ok(Self {
            file,
            backend,
            options,
            root,
            properties: PropertyResolver::new(file, textures),
            controllers: ControllerBinder::new(file, textures, animation_flags),
            particle_flags,
            skeleton,
            path: HashSet::new(),
            built: HashMap::new(),
            pending_skins: Vec::new(),
            pending_emitters: Vec::new(),
            text_keys: Vec::new(),
            node_count: 0,
        })
    }

    pub fn build(mut self, parent: B::Node) -> Result<GraphOutput<B::Node>, StructuralError> {
        let branch = Branch {
            state: EffectiveState::default(),
            world: Affine3A::IDENTITY,
            collision: false,
            skip_meshes: false,
            bone: None,
            depth: 0,
        };

        let Some(root) = self.handle_node(self.root, parent, &branch)? else {
            let kind = self.file.get_record(self.root).map(|record| record.kind());
            return Err(match kind {
                Ok(kind) => StructuralError::RootNotANode {
                    file: self.file.name().to_owned(),
                    index: self.root,
                    kind,
                },
                Err(source) => record_error(self.file, source),
            });
        };

        self.finish(root)
    }

    /// Builds the scene node for `index` and everything below it. `None` for records that can't
    /// be placed in the scene.
    fn handle_node(
        &mut self,
        index: RecordIndex,
        parent: B::Node,
        branch: &Branch<'f>,
    ) -> Result<Option<B::Node>, StructuralError> {
        let file = self.file;
        if branch.depth >= MAX_NODE_DEPTH {
            return Err(StructuralError::TooDeep {
                file: file.name().to_owned(),
                index,
                limit: MAX_NODE_DEPTH,
            });
        }

        let record = file
            .get_record(index)
            .map_err(|source| record_error(file, source))?;
        let Some(av) = record.av_object() else {
            warn!(
                "{}: {} is a {}, which can't be placed in the scene",
                file.name(),
                index,
                record.record_name()
            );
            return Ok(None);
        };
        trace!("{}: building {} \"{}\"", file.name(), index, av.name);

        let node_type = match record {
            Record::Node(node) => node.node_type,
            _ => NodeType::Plain,
        };
        if index != self.root && matches!(node_type, NodeType::BsAnimation | NodeType::BsParticle) {
            debug!("{}: flags of nested {:?} node {} are ignored", file.name(), node_type, index);
        }

        let skip_meshes = self.scan_extra_data(index, av) || branch.skip_meshes;
        let collision = branch.collision || node_type == NodeType::RootCollision;
        let hidden = av.flags.contains(NodeFlags::HIDDEN) || node_type == NodeType::RootCollision;

        let resolved = self.properties.resolve(index, &av.properties, &branch.state);
        let local = affine(&av.transform);
        let world = branch.world * local;

        let desc = NodeDesc {
            name: av.name.clone(),
            record: Some(index),
            transform: local,
            billboard: node_type == NodeType::Billboard,
            hidden,
            collision,
        };
        let (node, bone) = if self.skeleton.is_building() {
            let inverse_bind = world.inverse();
            let node = self.backend.create_bone_node(desc, inverse_bind);
            let bone = self
                .skeleton
                .add_bone(&av.name, index, node, branch.bone, inverse_bind);
            (node, bone)
        } else {
            (self.backend.create_transform_node(desc), None)
        };
        self.backend.attach_child(parent, node);
        self.built.entry(index).or_insert(node);
        self.node_count += 1;
        self.path.insert(index);

        if !resolved.declared.is_empty() {
            self.backend.attach_state_set(node, resolved.state.state_set());
        }
        self.install_property_controllers(node, &resolved)?;

        let texture_units = resolved.state.textures.keys().copied().collect_vec();
        let host = match record {
            Record::TriShape(shape) => {
                if skip_meshes {
                    debug!("{}: skipping marker shape {}", file.name(), index);
                } else {
                    self.handle_shape(index, shape, node, &resolved.state, collision);
                }
                ControllerHost::Shape {
                    texture_units: &texture_units,
                }
            }
            Record::Particles(particles) => {
                self.handle_particles(index, particles, node, world, &resolved.state)?;
                ControllerHost::Particles
            }
            _ => ControllerHost::Node,
        };

        for controller in self.controllers.bind(index, av.controller, host)? {
            self.backend.attach_controller(node, controller);
        }

        if let Record::Node(ni_node) = record {
            let child_branch = Branch {
                state: resolved.state,
                world,
                collision,
                skip_meshes,
                bone: bone.or(branch.bone),
                depth: branch.depth + 1,
            };

            for child in ni_node.children.iter().flatten().copied() {
                if self.path.contains(&child) {
                    return Err(StructuralError::Cycle {
                        file: file.name().to_owned(),
                        parent: index,
                        child,
                    });
                }

                self.handle_node(child, node, &child_branch)?;
            }
        }

        self.path.remove(&index);
        Ok(Some(node))
    }

    fn handle_shape(
        &mut self,
        index: RecordIndex,
        shape: &NiTriShape,
        node: B::Node,
        state: &EffectiveState,
        collision: bool,
    ) {
        let file = self.file;
        let data = match shape.data.map(|data| file.get::<NiTriShapeData>(data)) {
            Some(Ok(data)) => data,
            Some(Err(e)) => {
                warn!("{}: shape {} skipped: {}", file.name(), index, e);
                return;
            }
            None => {
                warn!("{}: shape {} has no data", file.name(), index);
                return;
            }
        };

        let mesh = ShapeImporter::create_mesh(file, index, data, &state.textures);
        let has_vertex_colors = !mesh.vertex_buffers.vertex_color_0.is_empty();
        let geometry = Geometry {
            name: shape.base.name.clone(),
            record: index,
            mesh,
            state: state.geometry_state_set(has_vertex_colors),
            skin: None,
            collision,
        };

        match (shape.skin, self.skeleton.skeleton()) {
            (Some(skin), Some(_)) => self.pending_skins.push(PendingSkin { node, geometry, skin }),
            (Some(_), None) => {
                debug!("{}: no skeleton to bind {} to, loading it static", file.name(), index);
                self.backend.attach_geometry(node, geometry);
            }
            (None, _) => self.backend.attach_geometry(node, geometry),
        }
    }

    fn handle_particles(
        &mut self,
        index: RecordIndex,
        particles: &NiParticles,
        node: B::Node,
        world: Affine3A,
        state: &EffectiveState,
    ) -> Result<(), StructuralError> {
        let builder = ParticleBuilder::new(self.file, &self.controllers, self.particle_flags);
        let Some(build) = builder.build(index, particles, node, world, state)? else {
            return Ok(());
        };

        self.backend.attach_particle_system(node, build.system);
        if let Some(emitter) = build.emitter {
            self.pending_emitters.push(emitter);
        }
        Ok(())
    }

    /// Controllers of material and texturing properties end up on the node declaring the
    /// property.
    fn install_property_controllers(
        &mut self,
        node: B::Node,
        resolved: &ResolvedProperties<'f>,
    ) -> Result<(), StructuralError> {
        for (index, property) in &resolved.declared {
            let host = match property.kind {
                PropertyKind::Material(_) => ControllerHost::Material,
                PropertyKind::Texturing(_) => ControllerHost::Texturing,
                _ => {
                    if property.base.controller.is_some() {
                        warn!("{}: controller on property {} is not supported", self.file.name(), index);
                    }
                    continue;
                }
            };

            for controller in self.controllers.bind(*index, property.base.controller, host)? {
                self.backend.attach_controller(node, controller);
            }
        }

        Ok(())
    }

    /// Collects text keys of the root and reports whether this node starts a marker sub-tree.
    fn scan_extra_data(&mut self, index: RecordIndex, av: &AvObject) -> bool {
        let file = self.file;
        let mut visited = HashSet::new();
        let mut marker = false;
        let mut next = av.extra;

        while let Some(extra_index) = next {
            if !visited.insert(extra_index) {
                warn!("{}: extra data of {} loops back to {}", file.name(), index, extra_index);
                break;
            }

            let extra = match file.get::<ExtraData>(extra_index) {
                Ok(extra) => extra,
                Err(e) => {
                    warn!("{}: extra data of {} cut short: {}", file.name(), index, e);
                    break;
                }
            };
            next = extra.next;

            match &extra.kind {
                ExtraDataKind::String(string) if string == "MRK" => {
                    marker = !self.options.show_markers;
                }
                ExtraDataKind::TextKeys(keys) if index == self.root => {
                    self.text_keys.extend(keys.iter().cloned());
                }
                ExtraDataKind::TextKeys(_) => {
                    debug!("{}: ignoring text keys below the root at {}", file.name(), index);
                }
                _ => {}
            }
        }

        marker
    }

    fn finish(mut self, root: B::Node) -> Result<GraphOutput<B::Node>, StructuralError> {
        for PendingSkin {
            node,
            mut geometry,
            skin,
        } in std::mem::take(&mut self.pending_skins)
        {
            if let Some(skeleton) = self.skeleton.skeleton() {
                geometry.skin = bind_skin(self.file, skeleton, &geometry, skin)?;
            }
            self.backend.attach_geometry(node, geometry);
        }

        for pending in std::mem::take(&mut self.pending_emitters) {
            match self.built.get(&pending.emitter_node) {
                Some(&emitter_node) => {
                    self.backend.attach_emitter(emitter_node, pending.emitter);
                    self.backend.attach_controller(emitter_node, pending.controller);
                }
                None => warn!(
                    "{}: emitter node {} of particle controller {} was never built",
                    self.file.name(),
                    pending.emitter_node,
                    pending.emitter.record
                ),
            }
        }

        let skeleton = match self.skeleton {
            SkeletonMode::Building(skeleton) => Some(skeleton),
            _ => None,
        };

        Ok(GraphOutput {
            root,
            text_keys: self.text_keys,
            node_count: self.node_count,
            skeleton,
        })
    }
}

fn record_error(file: &NifFile, source: RecordError) -> StructuralError {
    StructuralError::Record {
        file: file.name().to_owned(),
        source,
    }
}
