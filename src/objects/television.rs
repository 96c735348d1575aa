//! Procedural television
//!
//! Node layout:
//! ```text
//! television
//! ├── corpus
//! ├── screen
//! ├── stand
//! └── knobAssembly        (rotated 90° about X, so local +Y faces out of the front)
//!     └── powerKnob       (PowerToggle)
//!         └── powerKnobGrip
//! ```
//! Clicking anywhere on the knob, grip included, toggles the power flag.
//! [`TvRig::sync`] turns the knob and lights the screen to match it.

use roomview_core::{
    primitives, Easing, Material, NodeKey, PowerToggle, SceneGraph, SceneNode, Tween, TweenManager, TweenTarget, Vec3,
};

use super::{Placement, SceneObject, SpawnContext};

/// Knob yaw when powered on
pub const KNOB_ON_DEGREES: f32 = -90.0;
/// Knob yaw when powered off
pub const KNOB_OFF_DEGREES: f32 = 0.0;

const CORPUS_SIZE: Vec3 = Vec3::new(50.0, 35.0, 35.0);

/// Builder for the procedural television
#[derive(Clone, Debug)]
pub struct Television {
    pub placement: Placement,
    pub knob_turn_seconds: f32,
}

impl Default for Television {
    fn default() -> Self {
        Self {
            placement: Placement::at(Vec3::new(-30.0, 55.0, 0.0)).with_yaw(10.0),
            knob_turn_seconds: 0.25,
        }
    }
}

impl Television {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    pub fn with_knob_turn_seconds(mut self, seconds: f32) -> Self {
        self.knob_turn_seconds = seconds.max(0.0);
        self
    }

    /// Build the node tree and return the rig that drives it
    pub fn spawn_rig(&self, graph: &mut SceneGraph, parent: NodeKey) -> TvRig {
        let front = CORPUS_SIZE.z * 0.5;

        let root = graph.add_child(
            parent,
            SceneNode::group("television").with_transform(self.placement.transform()),
        );

        graph.add_child(
            root,
            SceneNode::mesh(primitives::cuboid(CORPUS_SIZE.x, CORPUS_SIZE.y, CORPUS_SIZE.z), Material::hex(0x5c3a1e))
                .with_name("corpus")
                .with_shadows(true, true),
        );

        let screen = graph.add_child(
            root,
            SceneNode::mesh(primitives::cuboid(34.0, 25.0, 1.0), TvRig::screen_off_material())
                .with_name("screen")
                .with_position(Vec3::new(-5.0, 2.0, front + 0.5)),
        );

        graph.add_child(
            root,
            SceneNode::mesh(primitives::cuboid(30.0, 4.0, 25.0), Material::hex(0x222222))
                .with_name("stand")
                .with_position(Vec3::new(0.0, -CORPUS_SIZE.y * 0.5 - 2.0, 0.0))
                .with_shadows(true, false),
        );

        let assembly = graph.add_child(
            root,
            SceneNode::group("knobAssembly")
                .with_position(Vec3::new(18.0, 4.0, front))
                .with_euler_degrees(90.0, 0.0, 0.0),
        );

        let knob = graph.add_child(
            assembly,
            SceneNode::mesh(primitives::cylinder(3.0, 3.0, 2.0, 16), Material::hex(0xb0b0b0))
                .with_name("powerKnob")
                .with_position(Vec3::new(0.0, 1.0, 0.0))
                .with_behavior(PowerToggle),
        );

        graph.add_child(
            knob,
            SceneNode::mesh(primitives::cuboid(1.0, 2.2, 5.0), Material::hex(0x303030))
                .with_name("powerKnobGrip")
                .with_position(Vec3::new(0.0, 0.6, 0.0)),
        );

        TvRig {
            root,
            knob,
            screen,
            powered: false,
            knob_turn_seconds: self.knob_turn_seconds,
        }
    }
}

impl SceneObject for Television {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        self.spawn_rig(ctx.graph, parent).root
    }
}

/// Handles to the parts of a spawned television that react to power
#[derive(Clone, Debug)]
pub struct TvRig {
    pub root: NodeKey,
    pub knob: NodeKey,
    pub screen: NodeKey,
    powered: bool,
    pub knob_turn_seconds: f32,
}

impl TvRig {
    pub fn screen_off_material() -> Material {
        Material::hex(0x0a0a0a)
    }

    pub fn screen_on_material() -> Material {
        Material::hex(0x1a2a44).with_emissive([0.25, 0.45, 0.85])
    }

    /// Power state the rig currently shows
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Bring the rig in line with `power_on`
    ///
    /// On a change, swaps the screen material and starts a knob tween
    /// (replacing any running one). A missing knob or screen only skips
    /// its own part. Returns whether the power state changed.
    pub fn sync(&mut self, power_on: bool, graph: &mut SceneGraph, tweens: &mut TweenManager) -> bool {
        if power_on == self.powered {
            return false;
        }
        self.powered = power_on;

        let material = if power_on {
            Self::screen_on_material()
        } else {
            Self::screen_off_material()
        };
        match graph.get_mut(self.screen) {
            Some(screen) => screen.set_material(material),
            None => log::warn!("Television screen node is gone; screen not updated"),
        }

        match graph.get(self.knob).map(|n| n.transform.euler()) {
            Some(current) => {
                let yaw = if power_on { KNOB_ON_DEGREES } else { KNOB_OFF_DEGREES };
                tweens.start(
                    Tween::new(
                        self.knob,
                        TweenTarget::RotationEuler,
                        Vec3::new(current.x, yaw.to_radians(), current.z),
                        self.knob_turn_seconds,
                    )
                    .with_easing(Easing::QuadInOut),
                );
            }
            None => log::warn!("Television knob node is gone; knob not turned"),
        }

        log::info!("Television power {}", if power_on { "on" } else { "off" });
        true
    }
}
