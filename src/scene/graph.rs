use crate::scene::animation::RuntimeController;
use crate::scene::backend::{NodeDesc, SceneBackend};
use crate::scene::particles::{Emitter, ParticleSystem};
use crate::scene::types::{Geometry, StateSet};
use glam::Affine3A;
use nifscene_files::common::types::RecordIndex;
use std::io::Write;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SceneNodeKind {
    Group,
    Transform,
    Billboard,
    Bone { inverse_bind: Affine3A },
}

#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub record: Option<RecordIndex>,
    pub kind: SceneNodeKind,
    pub transform: Affine3A,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub hidden: bool,
    pub collision: bool,
    pub state: Option<StateSet>,
    pub geometry: Vec<Geometry>,
    pub controllers: Vec<RuntimeController>,
    pub particle_systems: Vec<ParticleSystem>,
    pub emitters: Vec<Emitter<NodeId>>,
}

impl SceneNode {
    fn new(name: String, record: Option<RecordIndex>, kind: SceneNodeKind, transform: Affine3A) -> Self {
        Self {
            name,
            record,
            kind,
            transform,
            parent: None,
            children: Vec::new(),
            hidden: false,
            collision: false,
            state: None,
            geometry: Vec::new(),
            controllers: Vec::new(),
            particle_systems: Vec::new(),
            emitters: Vec::new(),
        }
    }

    fn from_desc(desc: NodeDesc, kind: SceneNodeKind) -> Self {
        let mut node = Self::new(desc.name, desc.record, kind, desc.transform);
        node.hidden = desc.hidden;
        node.collision = desc.collision;
        node
    }
}

/// A plain arena scene graph. Node 0 is the root group everything else hangs below.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new(
                String::from("Root"),
                None,
                SceneNodeKind::Group,
                Affine3A::IDENTITY,
            )],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds a group node below `parent`, e.g. to load several files next to each other.
    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.push(SceneNode::new(name.into(), None, SceneNodeKind::Group, Affine3A::IDENTITY));
        self.attach_child(parent, id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes below `id` (excluding it), depth first in child order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = self.nodes[id.0]
            .children
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>();

        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }

        result
    }

    pub fn find_by_record(&self, below: NodeId, record: RecordIndex) -> Option<NodeId> {
        self.descendants(below)
            .into_iter()
            .find(|id| self.nodes[id.0].record == Some(record))
    }

    pub fn find_by_name(&self, below: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(below)
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// World transform, the product of the transforms from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Affine3A {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) => self.world_transform(parent) * node.transform,
            None => node.transform,
        }
    }

    pub fn dump_tree<W: Write>(&self, w: &mut W, id: NodeId) -> std::io::Result<()> {
        self.dump_node(w, id, 0)
    }

    fn dump_node<W: Write>(&self, w: &mut W, id: NodeId, depth: usize) -> std::io::Result<()> {
        let node = &self.nodes[id.0];
        let record = node
            .record
            .map(|record| record.to_string())
            .unwrap_or_else(|| String::from("-"));
        write!(w, "{:indent$}{} \"{}\" [{}]", "", node.kind_name(), node.name, record, indent = depth * 2)?;
        if node.hidden {
            write!(w, " hidden")?;
        }
        if node.collision {
            write!(w, " collision")?;
        }
        writeln!(w)?;

        let indent = depth * 2 + 2;
        if let Some(state) = &node.state {
            writeln!(w, "{:indent$}state: textures {:?}", "", state.textures.keys(), indent = indent)?;
        }
        for geometry in &node.geometry {
            writeln!(
                w,
                "{:indent$}geometry \"{}\" {:?} skinned: {}",
                "",
                geometry.name,
                geometry.mesh,
                geometry.skin.is_some(),
                indent = indent
            )?;
        }
        for controller in &node.controllers {
            writeln!(
                w,
                "{:indent$}controller {} -> {:?}",
                "",
                controller.record,
                controller.target,
                indent = indent
            )?;
        }
        for system in &node.particle_systems {
            writeln!(
                w,
                "{:indent$}particles \"{}\" {:?} ({} initial)",
                "",
                system.name,
                system.reference_frame,
                system.particles.len(),
                indent = indent
            )?;
        }
        for emitter in &node.emitters {
            writeln!(
                w,
                "{:indent$}emitter for {:?} at {} particles/s",
                "",
                emitter.particle_system,
                emitter.rate,
                indent = indent
            )?;
        }

        for child in &node.children {
            self.dump_node(w, *child, depth + 1)?;
        }
        Ok(())
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

impl SceneNode {
    fn kind_name(&self) -> &'static str {
        match self.kind {
            SceneNodeKind::Group => "Group",
            SceneNodeKind::Transform => "Transform",
            SceneNodeKind::Billboard => "Billboard",
            SceneNodeKind::Bone { .. } => "Bone",
        }
    }
}

impl SceneBackend for SceneGraph {
    type Node = NodeId;

    fn create_transform_node(&mut self, desc: NodeDesc) -> NodeId {
        let kind = if desc.billboard {
            SceneNodeKind::Billboard
        } else {
            SceneNodeKind::Transform
        };
        self.push(SceneNode::from_desc(desc, kind))
    }

    fn create_bone_node(&mut self, desc: NodeDesc, inverse_bind: Affine3A) -> NodeId {
        self.push(SceneNode::from_desc(desc, SceneNodeKind::Bone { inverse_bind }))
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "{:?} already has a parent",
            child
        );
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn attach_geometry(&mut self, node: NodeId, geometry: Geometry) {
        self.nodes[node.0].geometry.push(geometry);
    }

    fn attach_state_set(&mut self, node: NodeId, state: StateSet) {
        self.nodes[node.0].state = Some(state);
    }

    fn attach_controller(&mut self, node: NodeId, controller: RuntimeController) {
        self.nodes[node.0].controllers.push(controller);
    }

    fn attach_particle_system(&mut self, node: NodeId, system: ParticleSystem) {
        self.nodes[node.0].particle_systems.push(system);
    }

    fn attach_emitter(&mut self, node: NodeId, emitter: Emitter<NodeId>) {
        self.nodes[node.0].emitters.push(emitter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec3A};

    fn desc(name: &str, record: u32, translation: Vec3) -> NodeDesc {
        NodeDesc {
            name: name.to_owned(),
            record: Some(RecordIndex(record)),
            transform: Affine3A::from_translation(translation),
            billboard: false,
            hidden: false,
            collision: false,
        }
    }

    #[test]
    fn nodes_are_linked_both_ways() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group(graph.root(), "model");
        let parent = graph.create_transform_node(desc("parent", 0, Vec3::X));
        let child = graph.create_bone_node(desc("child", 1, Vec3::Y), Affine3A::IDENTITY);
        graph.attach_child(group, parent);
        graph.attach_child(parent, child);

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.node(child).parent, Some(parent));
        assert_eq!(graph.descendants(group), vec![parent, child]);
        assert_eq!(graph.find_by_record(group, RecordIndex(1)), Some(child));
        assert_eq!(graph.find_by_name(graph.root(), "parent"), Some(parent));
        assert_eq!(graph.world_transform(child).translation, Vec3A::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn dump_lists_every_node() -> Result<(), anyhow::Error> {
        let mut graph = SceneGraph::new();
        let node = graph.create_transform_node(desc("Scene Root", 0, Vec3::ZERO));
        graph.attach_child(graph.root(), node);

        let mut out = Vec::new();
        graph.dump_tree(&mut out, graph.root())?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("\"Root\""));
        assert!(text.contains("Transform \"Scene Root\" [#0]"));

        Ok(())
    }
}
