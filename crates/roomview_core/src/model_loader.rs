//! Background model loading
//!
//! The [`ModelLoader`] owns a worker thread that imports models from a
//! [`ModelSource`] and sends them back over a channel. Once per frame the
//! main thread calls [`ModelLoader::drain`], which instantiates each finished
//! model under its placeholder node and then runs the completion callbacks
//! registered for it with [`ModelLoader::when_loaded`].
//!
//! ```ignore
//! let id = loader.request(placeholder, "assets/models/plant.gltf");
//! loader.when_loaded(id, |ctx| {
//!     ctx.graph.attach_body(ctx.placeholder, body, offset);
//! });
//!
//! // Every frame:
//! loader.drain(&mut graph, &mut mixers);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::animation::AnimationMixer;
use crate::asset_cache::AssetCache;
use crate::asset_error::AssetError;
use crate::graph::{NodeKey, SceneGraph};
use crate::model::ModelAsset;

/// Where model data comes from
///
/// Runs on the loader's worker thread.
pub trait ModelSource: Send + 'static {
    fn load(&mut self, path: &Path) -> Result<Arc<ModelAsset>, AssetError>;
}

/// Reads glTF files, caching by path
#[derive(Default)]
pub struct GltfSource {
    cache: AssetCache,
}

impl GltfSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelSource for GltfSource {
    fn load(&mut self, path: &Path) -> Result<Arc<ModelAsset>, AssetError> {
        self.cache.fetch::<ModelAsset>(path)
    }
}

/// Identifies one load request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

#[derive(Clone, Debug)]
pub enum LoadStatus {
    Pending,
    Loaded { model_root: NodeKey },
    Failed(String),
}

/// What a completion callback can touch
pub struct LoadContext<'a> {
    pub graph: &'a mut SceneGraph,
    pub mixers: &'a mut Vec<AnimationMixer>,
    /// Node the model was attached under
    pub placeholder: NodeKey,
    /// Group node holding the instantiated model
    pub model_root: NodeKey,
    pub asset: &'a ModelAsset,
}

type Callback = Box<dyn FnOnce(&mut LoadContext<'_>)>;

struct LoadRequest {
    id: LoadId,
    path: PathBuf,
}

struct LoadResult {
    id: LoadId,
    result: Result<Arc<ModelAsset>, AssetError>,
}

struct PendingLoad {
    placeholder: NodeKey,
    path: PathBuf,
    callbacks: Vec<Callback>,
}

struct CompletedLoad {
    placeholder: NodeKey,
    model_root: NodeKey,
    asset: Arc<ModelAsset>,
}

/// Loads models off the main thread and attaches them on `drain`
pub struct ModelLoader {
    sender: Sender<LoadRequest>,
    receiver: Receiver<LoadResult>,
    next_id: u64,
    pending: HashMap<LoadId, PendingLoad>,
    completed: HashMap<LoadId, CompletedLoad>,
    failed: HashMap<LoadId, String>,
    /// Callbacks registered after their load already completed
    late: Vec<(LoadId, Callback)>,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader {
    /// Loader reading glTF files
    pub fn new() -> Self {
        Self::with_source(GltfSource::new())
    }

    /// Loader with a custom source; the worker runs until the loader is dropped
    pub fn with_source(mut source: impl ModelSource) -> Self {
        let (request_tx, request_rx) = channel::<LoadRequest>();
        let (result_tx, result_rx) = channel::<LoadResult>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let result = source.load(&request.path);
                if result_tx.send(LoadResult { id: request.id, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: result_rx,
            next_id: 0,
            pending: HashMap::new(),
            completed: HashMap::new(),
            failed: HashMap::new(),
            late: Vec::new(),
        }
    }

    /// Queue a model to be loaded and attached under `placeholder`
    pub fn request(&mut self, placeholder: NodeKey, path: impl Into<PathBuf>) -> LoadId {
        self.next_id += 1;
        let id = LoadId(self.next_id);
        let path = path.into();
        log::debug!("requesting model {}", path.display());

        if self.sender.send(LoadRequest { id, path: path.clone() }).is_err() {
            log::error!("model loader worker has exited; {} will not load", path.display());
            self.failed.insert(id, "loader worker exited".to_string());
            return id;
        }
        self.pending.insert(
            id,
            PendingLoad {
                placeholder,
                path,
                callbacks: Vec::new(),
            },
        );
        id
    }

    /// Run `callback` once the model is attached
    ///
    /// Callbacks run on the main thread inside [`drain`](Self::drain), in
    /// registration order. Registering after completion runs the callback on
    /// the next drain. Returns false (and drops the callback) if the load
    /// failed or the id is unknown.
    pub fn when_loaded(&mut self, id: LoadId, callback: impl FnOnce(&mut LoadContext<'_>) + 'static) -> bool {
        if let Some(pending) = self.pending.get_mut(&id) {
            pending.callbacks.push(Box::new(callback));
            true
        } else if self.completed.contains_key(&id) {
            self.late.push((id, Box::new(callback)));
            true
        } else {
            false
        }
    }

    pub fn status(&self, id: LoadId) -> Option<LoadStatus> {
        if self.pending.contains_key(&id) {
            Some(LoadStatus::Pending)
        } else if let Some(done) = self.completed.get(&id) {
            Some(LoadStatus::Loaded {
                model_root: done.model_root,
            })
        } else {
            self.failed.get(&id).map(|e| LoadStatus::Failed(e.clone()))
        }
    }

    /// Most recent load targeting `placeholder`, pending or completed
    pub fn load_for(&self, placeholder: NodeKey) -> Option<LoadId> {
        let pending = self
            .pending
            .iter()
            .filter(|(_, p)| p.placeholder == placeholder)
            .map(|(id, _)| *id);
        let completed = self
            .completed
            .iter()
            .filter(|(_, c)| c.placeholder == placeholder)
            .map(|(id, _)| *id);
        pending.chain(completed).max()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Attach every finished model and run its callbacks (non-blocking)
    ///
    /// Returns the number of loads that finished, successfully or not.
    pub fn drain(&mut self, graph: &mut SceneGraph, mixers: &mut Vec<AnimationMixer>) -> usize {
        self.run_late(graph, mixers);
        let mut finished = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(result) => {
                    self.finish(result, graph, mixers);
                    finished += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.pending.is_empty() {
                        log::error!("model loader worker exited with {} loads pending", self.pending.len());
                    }
                    break;
                }
            }
        }
        finished
    }

    /// Like [`drain`](Self::drain), but waits up to `timeout` for all pending loads
    pub fn drain_blocking(&mut self, graph: &mut SceneGraph, mixers: &mut Vec<AnimationMixer>, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut finished = self.drain(graph, mixers);
        while !self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(result) => {
                    self.finish(result, graph, mixers);
                    finished += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        finished
    }

    fn finish(&mut self, result: LoadResult, graph: &mut SceneGraph, mixers: &mut Vec<AnimationMixer>) {
        let Some(pending) = self.pending.remove(&result.id) else {
            return;
        };
        match result.result {
            Ok(asset) => {
                let model_root = asset.instantiate(graph, pending.placeholder);
                log::info!("Attached model {} ({} callbacks)", pending.path.display(), pending.callbacks.len());
                let mut ctx = LoadContext {
                    graph,
                    mixers,
                    placeholder: pending.placeholder,
                    model_root,
                    asset: &asset,
                };
                for callback in pending.callbacks {
                    callback(&mut ctx);
                }
                self.completed.insert(
                    result.id,
                    CompletedLoad {
                        placeholder: pending.placeholder,
                        model_root,
                        asset,
                    },
                );
            }
            Err(err) => {
                log::warn!("Failed to load model {}: {}", pending.path.display(), err);
                self.failed.insert(result.id, err.to_string());
            }
        }
    }

    fn run_late(&mut self, graph: &mut SceneGraph, mixers: &mut Vec<AnimationMixer>) {
        for (id, callback) in std::mem::take(&mut self.late) {
            let Some(done) = self.completed.get(&id) else {
                continue;
            };
            let mut ctx = LoadContext {
                graph: &mut *graph,
                mixers: &mut *mixers,
                placeholder: done.placeholder,
                model_root: done.model_root,
                asset: &done.asset,
            };
            callback(&mut ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SceneNode;
    use std::cell::Cell;
    use std::rc::Rc;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_drain_with_nothing_requested() {
        let mut loader = ModelLoader::new();
        let mut graph = SceneGraph::new();
        let mut mixers = Vec::new();
        assert_eq!(loader.drain(&mut graph, &mut mixers), 0);
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_load_for_finds_latest_request() {
        let mut loader = ModelLoader::new();
        let mut graph = SceneGraph::new();
        let table = graph.add(SceneNode::group("table"));
        let other = graph.add(SceneNode::group("plant"));
        let first = loader.request(table, "/nonexistent/roomview/a.gltf");
        let second = loader.request(table, "/nonexistent/roomview/b.gltf");
        assert_ne!(first, second);
        assert_eq!(loader.load_for(table), Some(second));
        assert_eq!(loader.load_for(other), None);
    }

    #[test]
    fn test_missing_file_fails_and_drops_callbacks() {
        let mut loader = ModelLoader::new();
        let mut graph = SceneGraph::new();
        let mut mixers = Vec::new();
        let placeholder = graph.add(SceneNode::group("plant"));
        let id = loader.request(placeholder, "/nonexistent/roomview/plant.gltf");

        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        assert!(loader.when_loaded(id, move |_| flag.set(true)));

        assert_eq!(loader.drain_blocking(&mut graph, &mut mixers, WAIT), 1);
        assert!(!ran.get());
        assert!(matches!(loader.status(id), Some(LoadStatus::Failed(_))));
        assert!(!loader.when_loaded(id, |_| {}));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_loaded_model_attaches_before_callback() {
        let path = crate::model::tests::write_test_model("roomview_loader_attach");
        let mut loader = ModelLoader::new();
        let mut graph = SceneGraph::new();
        let mut mixers = Vec::new();
        let placeholder = graph.add(SceneNode::group("tv"));
        let id = loader.request(placeholder, &path);

        let seen = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&seen);
        loader.when_loaded(id, move |ctx| {
            let screen = ctx.graph.find_in_subtree(ctx.model_root, "screen");
            assert!(screen.is_some());
            for clip in &ctx.asset.clips {
                let mut mixer = AnimationMixer::new(ctx.model_root);
                mixer.play(Arc::clone(clip));
                ctx.mixers.push(mixer);
            }
            counter.set(counter.get() + 1);
        });

        loader.drain_blocking(&mut graph, &mut mixers, WAIT);
        assert_eq!(seen.get(), 1);
        assert_eq!(mixers.len(), 1);
        match loader.status(id) {
            Some(LoadStatus::Loaded { model_root }) => {
                assert_eq!(graph.get(model_root).and_then(|n| n.parent()), Some(placeholder));
            }
            other => panic!("expected loaded, got {other:?}"),
        }

        // Late registration runs on the next drain, exactly once
        let late = Rc::clone(&seen);
        assert!(loader.when_loaded(id, move |_| late.set(late.get() + 1)));
        loader.drain(&mut graph, &mut mixers);
        loader.drain(&mut graph, &mut mixers);
        assert_eq!(seen.get(), 2);
    }
}
