use arc_swap::ArcSwapOption;
use std::sync::Arc;
use thiserror::Error;

pub mod cache;

/// Whatever the host uses to identify an uploaded texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A texture that has been requested but may not be loaded yet. The scene keeps the reference,
/// the host fills in the handle whenever the pixels are ready.
#[derive(Debug)]
pub struct TextureReference {
    pub path: String,
    handle: ArcSwapOption<TextureHandle>,
}

impl TextureReference {
    pub fn deferred(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handle: ArcSwapOption::empty(),
        }
    }

    pub fn resolved(path: impl Into<String>, handle: TextureHandle) -> Self {
        Self {
            path: path.into(),
            handle: ArcSwapOption::from_pointee(handle),
        }
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle.load().as_deref().copied()
    }

    pub fn is_resolved(&self) -> bool {
        self.handle.load().is_some()
    }

    pub fn resolve(&self, handle: TextureHandle) {
        self.handle.store(Some(Arc::new(handle)));
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture {path} could not be found")]
    NotFound { path: String },
}

pub trait TextureResolver {
    /// `path` is already normalized, see [`correct_texture_path`].
    fn resolve(&self, path: &str) -> Result<Arc<TextureReference>, TextureError>;
}

/// Turns the filename stored in a NiSourceTexture into the path of the texture inside the data
/// directory: lowercase, backslash separated, below `textures\` and pointing to the `.dds`
/// variant of `.tga` and `.bmp` files.
pub fn correct_texture_path(filename: &str) -> String {
    let mut path = filename.to_lowercase().replace('/', "\\");
    while path.starts_with('\\') {
        path.remove(0);
    }

    if !path.starts_with("textures\\") {
        path.insert_str(0, "textures\\");
    }

    for extension in [".tga", ".bmp"] {
        if let Some(stem) = path.strip_suffix(extension) {
            path = format!("{}.dds", stem);
            break;
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_paths_are_normalized() {
        assert_eq!(correct_texture_path("Tx_Wood_01.TGA"), "textures\\tx_wood_01.dds");
        assert_eq!(
            correct_texture_path("textures/clutter/Bottle.bmp"),
            "textures\\clutter\\bottle.dds"
        );
        assert_eq!(correct_texture_path("\\tx_glass.dds"), "textures\\tx_glass.dds");
        assert_eq!(correct_texture_path("tx_fire.png"), "textures\\tx_fire.png");
    }

    #[test]
    fn deferred_references_resolve_later() {
        let reference = TextureReference::deferred("textures\\tx_a.dds");
        assert!(!reference.is_resolved());
        assert_eq!(reference.handle(), None);

        reference.resolve(TextureHandle(7));
        assert_eq!(reference.handle(), Some(TextureHandle(7)));
    }
}
