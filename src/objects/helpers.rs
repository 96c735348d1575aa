//! Debug helpers and the wireframe primitives shown by the `primitives` preset

use roomview_core::{primitives, Material, NodeKey, SceneNode, Vec3};

use super::{Placement, SceneObject, SpawnContext};

/// Red X, green Y and blue Z lines from the origin
#[derive(Clone, Copy, Debug)]
pub struct AxesHelper {
    pub length: f32,
}

impl AxesHelper {
    pub fn new(length: f32) -> Self {
        Self { length }
    }
}

impl Default for AxesHelper {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl SceneObject for AxesHelper {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let root = ctx.graph.add_child(parent, SceneNode::group("axesHelper"));
        let axes = [
            ("axisX", Vec3::X, 0xff0000),
            ("axisY", Vec3::Y, 0x00ff00),
            ("axisZ", Vec3::Z, 0x0000ff),
        ];
        for (name, direction, color) in axes {
            ctx.graph.add_child(
                root,
                SceneNode::mesh(
                    primitives::line_segment(Vec3::ZERO, direction * self.length),
                    Material::hex(color).unlit(),
                )
                .with_name(name),
            );
        }
        root
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WireframeCube {
    pub size: f32,
    pub color: u32,
    pub placement: Placement,
}

impl Default for WireframeCube {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: 0x0ff000,
            placement: Placement::at(Vec3::new(-6.0, 3.0, 5.0)),
        }
    }
}

impl SceneObject for WireframeCube {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let mesh = primitives::wireframe(&primitives::cuboid(self.size, self.size, self.size));
        ctx.graph.add_child(
            parent,
            SceneNode::mesh(mesh, Material::hex(self.color).unlit())
                .with_name("cube")
                .with_transform(self.placement.transform()),
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WireframeSphere {
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
    pub color: u32,
    pub placement: Placement,
}

impl Default for WireframeSphere {
    fn default() -> Self {
        Self {
            radius: 5.0,
            segments: 10,
            rings: 10,
            color: 0x00ffff,
            placement: Placement::at(Vec3::new(10.0, 5.0, -5.0)),
        }
    }
}

impl SceneObject for WireframeSphere {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let mesh = primitives::wireframe(&primitives::sphere(self.radius, self.segments, self.rings));
        ctx.graph.add_child(
            parent,
            SceneNode::mesh(mesh, Material::hex(self.color).unlit())
                .with_name("sphere")
                .with_transform(self.placement.transform()),
        )
    }
}

/// Wireframe plane lying in XZ
#[derive(Clone, Copy, Debug)]
pub struct WireframePlane {
    pub width: f32,
    pub depth: f32,
    pub color: u32,
    pub placement: Placement,
}

impl Default for WireframePlane {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 40.0,
            color: 0x888888,
            placement: Placement::default(),
        }
    }
}

impl SceneObject for WireframePlane {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let mesh = primitives::wireframe(&primitives::plane(self.width, self.depth));
        ctx.graph.add_child(
            parent,
            SceneNode::mesh(mesh, Material::hex(self.color).unlit())
                .with_name("plane")
                .with_transform(self.placement.transform()),
        )
    }
}
