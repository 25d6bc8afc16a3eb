use crate::StructuralError;
use crate::loader::graph_builder::GraphBuilder;
use crate::loader::skeleton::SkeletonMode;
use crate::scene::backend::SceneBackend;
use crate::scene::skeleton::Skeleton;
use crate::textures::TextureResolver;
use log::info;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::TextKey;

pub mod controllers;
pub mod conversions;
pub mod graph_builder;
pub mod particles;
pub mod properties;
pub mod shape_importer;
pub mod skeleton;

#[cfg(test)]
mod test_support;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Build the shapes of editor marker sub-trees (NiStringExtraData "MRK") too.
    pub show_markers: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedScene<N> {
    /// The scene node of the file's root record, attached below the parent passed in.
    pub root: N,
    /// Text keys (animation groups and sound triggers) of the root node.
    pub text_keys: Vec<TextKey>,
    pub node_count: usize,
}

/// Builds scene graphs from record tables. A loader keeps no state between calls, so one
/// instance can serve any number of files.
pub struct Loader<'t, T: TextureResolver + ?Sized> {
    textures: &'t T,
    options: LoaderOptions,
}

impl<'t, T: TextureResolver + ?Sized> Loader<'t, T> {
    pub fn new(textures: &'t T, options: LoaderOptions) -> Self {
        Self { textures, options }
    }

    /// Builds the scene graph of `file` below `parent`. Skinned shapes are loaded static.
    pub fn load<B: SceneBackend>(
        &self,
        file: &NifFile,
        backend: &mut B,
        parent: B::Node,
    ) -> Result<LoadedScene<B::Node>, StructuralError> {
        profiling::scope!("Loader::load");
        let output = GraphBuilder::new(file, backend, self.textures, &self.options, SkeletonMode::None)?.build(parent)?;
        info!("{}: loaded {} nodes", file.name(), output.node_count);

        Ok(LoadedScene {
            root: output.root,
            text_keys: output.text_keys,
            node_count: output.node_count,
        })
    }

    /// Builds every node of `file` as a bone and returns the resulting skeleton. Skinned shapes
    /// in the same file are bound to it.
    pub fn load_as_skeleton<B: SceneBackend>(
        &self,
        file: &NifFile,
        backend: &mut B,
        parent: B::Node,
    ) -> Result<Skeleton<B::Node>, StructuralError> {
        profiling::scope!("Loader::load_as_skeleton");
        let mode = SkeletonMode::Building(Skeleton::new(file.name(), file.id()));
        let output = GraphBuilder::new(file, backend, self.textures, &self.options, mode)?.build(parent)?;
        let skeleton = output.skeleton.unwrap_or_else(|| Skeleton::new(file.name(), file.id()));
        info!("{}: loaded skeleton with {} bones", file.name(), skeleton.len());

        Ok(skeleton)
    }

    /// Like [`Loader::load`], but skinned shapes bind to the bones of `skeleton`. Bones are
    /// matched by record if the skeleton was built from this very file (not just one with the
    /// same name), by name otherwise.
    pub fn load_with_skeleton<B: SceneBackend>(
        &self,
        file: &NifFile,
        backend: &mut B,
        parent: B::Node,
        skeleton: &Skeleton<B::Node>,
    ) -> Result<LoadedScene<B::Node>, StructuralError> {
        profiling::scope!("Loader::load_with_skeleton");
        let mode = SkeletonMode::Existing(skeleton);
        let output = GraphBuilder::new(file, backend, self.textures, &self.options, mode)?.build(parent)?;
        info!(
            "{}: loaded {} nodes onto skeleton {}",
            file.name(),
            output.node_count,
            skeleton.source()
        );

        Ok(LoadedScene {
            root: output.root,
            text_keys: output.text_keys,
            node_count: output.node_count,
        })
    }
}
