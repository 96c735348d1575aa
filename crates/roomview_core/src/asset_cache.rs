//! Asset cache
//!
//! A type-erased cache for anything implementing [`Asset`]. Loading the same
//! path twice returns the same handle and shares the data through an `Arc`.
//!
//! ```ignore
//! let mut cache = AssetCache::new();
//! let handle = cache.load::<ModelAsset>("assets/models/table.gltf")?;
//! let model: Arc<ModelAsset> = cache.get::<ModelAsset>(&handle).unwrap();
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Sequential id; 0 is never assigned
pub type AssetId = u64;

/// A cheap handle to a cached asset
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Types that can be loaded from a file and cached
pub trait Asset: Sized + Send + Sync + 'static {
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

struct CachedEntry {
    data: Arc<dyn Any + Send + Sync>,
}

/// Path-deduplicating asset cache
pub struct AssetCache {
    assets: HashMap<AssetId, CachedEntry>,
    path_index: HashMap<PathBuf, AssetId>,
    next_id: u64,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            path_index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Load an asset, or return the cached handle if the path was loaded before
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref().to_path_buf();

        if let Some(&id) = self.path_index.get(&path) {
            return Ok(AssetHandle { id, path });
        }

        let data = T::load_from_file(&path)?;
        let id = self.next_id;
        self.next_id += 1;

        self.assets.insert(
            id,
            CachedEntry {
                data: Arc::new(data),
            },
        );
        self.path_index.insert(path.clone(), id);
        log::debug!("cached asset {} as #{}", path.display(), id);

        Ok(AssetHandle { id, path })
    }

    /// Cached data for a handle, or `None` if unknown or of another type
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.assets.get(&handle.id)?;
        entry.data.clone().downcast::<T>().ok()
    }

    /// Load-or-get in one call
    pub fn fetch<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<Arc<T>, AssetError> {
        let handle = self.load::<T>(path)?;
        self.get::<T>(&handle)
            .ok_or_else(|| AssetError::NotFound(format!("{} (cached as another type)", handle.path.display())))
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.assets.contains_key(&handle.id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}
