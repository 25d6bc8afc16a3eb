use crate::textures::{TextureError, TextureHandle, TextureReference, TextureResolver};
use dashmap::DashMap;
use std::ops::DerefMut;
use std::sync::{Arc, RwLock, RwLockWriteGuard, Weak};

pub trait TextureLoader {
    /// `Ok(None)` means the texture exists but loads in the background. The host then calls
    /// [`TextureCache::complete`] once it has a handle.
    fn request(&self, path: &str) -> Result<Option<TextureHandle>, TextureError>;
}

/// Deduplicates texture references by path. Entries are weak, so a texture that no scene uses
/// anymore is requested again the next time.
pub struct TextureCache<L: TextureLoader> {
    ref_cache: DashMap<String, RwLock<Weak<TextureReference>>>,
    loader: L,
}

impl<L: TextureLoader> TextureCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            ref_cache: DashMap::with_capacity(100),
            loader,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn get(&self, path: &str) -> Option<Arc<TextureReference>> {
        let weak_lock = self.ref_cache.get(path)?;
        let weak = weak_lock.read().expect("Get the read lock on the entry");
        weak.upgrade()
    }

    /// Hands the handle of a background load to the reference that is waiting for it. Returns
    /// false if nobody holds the reference anymore.
    pub fn complete(&self, path: &str, handle: TextureHandle) -> bool {
        match self.get(path) {
            Some(reference) => {
                reference.resolve(handle);
                true
            }
            None => false,
        }
    }

    /// Paths that are still referenced but have no handle yet.
    pub fn pending(&self) -> Vec<String> {
        let mut pending = self
            .ref_cache
            .iter()
            .filter_map(|entry| {
                let weak = entry.value().read().expect("Get the read lock on the entry");
                weak.upgrade()
                    .filter(|reference| !reference.is_resolved())
                    .map(|_| entry.key().clone())
            })
            .collect::<Vec<_>>();
        pending.sort();
        pending
    }

    fn generate(
        &self,
        path: &str,
        weak: &mut RwLockWriteGuard<Weak<TextureReference>>,
    ) -> Result<Arc<TextureReference>, TextureError> {
        if let Some(arc) = weak.upgrade() {
            // maybe we have been raced
            return Ok(arc);
        }

        let reference = match self.loader.request(path)? {
            Some(handle) => TextureReference::resolved(path, handle),
            None => TextureReference::deferred(path),
        };
        let arc = Arc::new(reference);
        *weak.deref_mut() = Arc::downgrade(&arc);
        Ok(arc)
    }
}

impl<L: TextureLoader> TextureResolver for TextureCache<L> {
    fn resolve(&self, path: &str) -> Result<Arc<TextureReference>, TextureError> {
        // Easy path: The cache contains a weak reference
        if let Some(weak_lock) = self.ref_cache.get(path) {
            {
                let weak = weak_lock.read().expect("Get the read lock on the entry");
                if let Some(arc) = weak.upgrade() {
                    return Ok(arc);
                }
            }

            let mut weak = weak_lock.write().expect("Get the write lock on the entry");
            return self.generate(path, &mut weak);
        }

        // Only hold the shard lock for the insert, the loader runs under the entry lock.
        self.ref_cache
            .entry(path.to_owned())
            .or_insert_with(|| RwLock::new(Weak::new()));

        let Some(entry) = self.ref_cache.get(path) else {
            return Err(TextureError::NotFound { path: path.to_owned() });
        };
        let mut weak = entry.write().expect("Get the write lock on the entry");
        self.generate(path, &mut weak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingLoader {
        requests: Mutex<Vec<String>>,
    }

    impl TextureLoader for CountingLoader {
        fn request(&self, path: &str) -> Result<Option<TextureHandle>, TextureError> {
            self.requests.lock().unwrap().push(path.to_owned());
            match path {
                "textures\\missing.dds" => Err(TextureError::NotFound { path: path.to_owned() }),
                "textures\\slow.dds" => Ok(None),
                _ => Ok(Some(TextureHandle(1))),
            }
        }
    }

    #[test]
    fn references_are_shared_while_alive() -> Result<(), anyhow::Error> {
        let cache = TextureCache::new(CountingLoader::default());
        let first = cache.resolve("textures\\a.dds")?;
        let second = cache.resolve("textures\\a.dds")?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.loader().requests.lock().unwrap().len(), 1);

        drop(first);
        drop(second);
        let _third = cache.resolve("textures\\a.dds")?;
        assert_eq!(cache.loader().requests.lock().unwrap().len(), 2);

        Ok(())
    }

    #[test]
    fn deferred_textures_are_completed() -> Result<(), anyhow::Error> {
        let cache = TextureCache::new(CountingLoader::default());
        let slow = cache.resolve("textures\\slow.dds")?;
        assert!(!slow.is_resolved());
        assert_eq!(cache.pending(), vec![String::from("textures\\slow.dds")]);

        assert!(cache.complete("textures\\slow.dds", TextureHandle(9)));
        assert_eq!(slow.handle(), Some(TextureHandle(9)));
        assert!(cache.pending().is_empty());
        assert!(!cache.complete("textures\\unknown.dds", TextureHandle(3)));

        Ok(())
    }

    #[test]
    fn missing_textures_are_not_cached() {
        let cache = TextureCache::new(CountingLoader::default());
        assert!(cache.resolve("textures\\missing.dds").is_err());
        assert!(cache.resolve("textures\\missing.dds").is_err());
        assert_eq!(cache.loader().requests.lock().unwrap().len(), 2);
        assert!(cache.get("textures\\missing.dds").is_none());
    }
}
