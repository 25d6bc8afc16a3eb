use crate::textures::{TextureError, TextureReference, TextureResolver};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Hands out a fresh deferred reference for every path that is not listed as missing.
#[derive(Default)]
pub struct FakeTextures {
    missing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeTextures {
    pub fn with_missing<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            missing: paths.into_iter().map(str::to_owned).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl TextureResolver for FakeTextures {
    fn resolve(&self, path: &str) -> Result<Arc<TextureReference>, TextureError> {
        self.requested.lock().unwrap().push(path.to_owned());
        if self.missing.contains(path) {
            return Err(TextureError::NotFound { path: path.to_owned() });
        }

        Ok(Arc::new(TextureReference::deferred(path)))
    }
}
