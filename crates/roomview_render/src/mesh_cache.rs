//! GPU mesh cache
//!
//! Uploads each [`MeshData`] once, keyed by its [`MeshId`]. Nodes sharing an
//! `Arc<MeshData>` share one pair of buffers. Meshes not drawn for
//! `max_idle_frames` frames are released.

use std::collections::HashMap;

use roomview_math::{MeshData, MeshId, Topology};
use wgpu::util::DeviceExt;

use crate::pipeline::Vertex;

/// Vertex and index buffers for one mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub topology: Topology,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertices = Vertex::from_mesh(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices().len() as u32,
            topology: mesh.topology(),
        }
    }
}

struct CacheEntry<T> {
    value: T,
    last_used: u64,
}

/// Cache of uploaded meshes with idle eviction
///
/// Generic over the stored value so the bookkeeping is testable without a
/// GPU; the renderer uses `MeshCache<GpuMesh>`.
pub struct MeshCache<T = GpuMesh> {
    entries: HashMap<MeshId, CacheEntry<T>>,
    frame: u64,
    pub max_idle_frames: u64,
}

impl<T> Default for MeshCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MeshCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            frame: 0,
            max_idle_frames: 120,
        }
    }

    /// Start a new frame
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Make sure `mesh` is cached, creating it with `create` on first use
    ///
    /// Empty meshes are never cached. Returns whether the mesh is drawable.
    pub fn prepare(&mut self, mesh: &MeshData, create: impl FnOnce(&MeshData) -> T) -> bool {
        if mesh.indices().is_empty() || mesh.positions().is_empty() {
            return false;
        }
        let frame = self.frame;
        self.entries
            .entry(mesh.id())
            .and_modify(|e| e.last_used = frame)
            .or_insert_with(|| CacheEntry {
                value: create(mesh),
                last_used: frame,
            });
        true
    }

    pub fn get(&self, id: MeshId) -> Option<&T> {
        self.entries.get(&id).map(|e| &e.value)
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop meshes idle for longer than `max_idle_frames`; returns how many
    pub fn evict_idle(&mut self) -> usize {
        let before = self.entries.len();
        let (frame, max_idle) = (self.frame, self.max_idle_frames);
        self.entries.retain(|_, e| frame - e.last_used <= max_idle);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("Released {} idle GPU meshes", evicted);
        }
        evicted
    }
}
