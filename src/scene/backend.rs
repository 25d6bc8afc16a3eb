use crate::scene::animation::RuntimeController;
use crate::scene::particles::{Emitter, ParticleSystem};
use crate::scene::types::{Geometry, StateSet};
use glam::Affine3A;
use nifscene_files::common::types::RecordIndex;
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub name: String,
    /// The record the node was built from, `None` for nodes the loader adds itself.
    pub record: Option<RecordIndex>,
    pub transform: Affine3A,
    pub billboard: bool,
    pub hidden: bool,
    /// Below a RootCollisionNode.
    pub collision: bool,
}

/// The primitives the loader needs to build a scene graph. The backend owns the scene, the
/// loader only holds on to node handles for the duration of a load.
pub trait SceneBackend {
    type Node: Copy + Eq + Hash + Debug;

    fn create_transform_node(&mut self, desc: NodeDesc) -> Self::Node;
    fn create_bone_node(&mut self, desc: NodeDesc, inverse_bind: Affine3A) -> Self::Node;
    fn attach_child(&mut self, parent: Self::Node, child: Self::Node);
    fn attach_geometry(&mut self, node: Self::Node, geometry: Geometry);
    fn attach_state_set(&mut self, node: Self::Node, state: StateSet);
    fn attach_controller(&mut self, node: Self::Node, controller: RuntimeController);
    fn attach_particle_system(&mut self, node: Self::Node, system: ParticleSystem);
    fn attach_emitter(&mut self, node: Self::Node, emitter: Emitter<Self::Node>);
}
