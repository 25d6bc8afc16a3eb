use crate::settings::{CliArgs, Demo};
use clap::Parser;
use log::{info, warn};
use nifscene::demos;
use nifscene::loader::{Loader, LoaderOptions};
use nifscene::scene::graph::SceneGraph;
use nifscene::textures::cache::{TextureCache, TextureLoader};
use nifscene::textures::{TextureError, TextureHandle};
use std::io::Write;

mod settings;

/// There is no renderer, so every texture stays pending until the end of the run.
struct QueueingLoader;

impl TextureLoader for QueueingLoader {
    fn request(&self, path: &str) -> Result<Option<TextureHandle>, TextureError> {
        log::trace!("Queueing texture {}", path);
        Ok(None)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let textures = TextureCache::new(QueueingLoader);
    let loader = Loader::new(&textures, LoaderOptions {
        show_markers: args.show_markers,
    });
    let mut graph = SceneGraph::new();
    let root = graph.root();

    match args.demo {
        Demo::Static => {
            let scene = loader.load(&demos::static_scene()?, &mut graph, root)?;
            for key in &scene.text_keys {
                info!("Text key at {}: {}", key.time, key.text);
            }
        }
        Demo::Skinned { skeleton: true } => {
            let skeleton = loader.load_as_skeleton(&demos::skeleton()?, &mut graph, root)?;
            let parent = skeleton.root().map(|bone| bone.node).unwrap_or(root);
            loader.load_with_skeleton(&demos::skinned_part()?, &mut graph, parent, &skeleton)?;
        }
        Demo::Skinned { skeleton: false } => {
            loader.load(&demos::skinned_part()?, &mut graph, root)?;
        }
        Demo::Particles => {
            loader.load(&demos::particle_fountain()?, &mut graph, root)?;
        }
    }

    let mut stdout = std::io::stdout().lock();
    graph.dump_tree(&mut stdout, root)?;
    stdout.flush()?;

    let pending = textures.pending();
    if !pending.is_empty() {
        warn!("{} textures were never resolved: {}", pending.len(), pending.join(", "));
    }

    Ok(())
}
