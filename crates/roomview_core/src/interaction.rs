//! Click interaction
//!
//! A click casts a ray from the camera through the pointer, takes the
//! nearest hit, and walks from the hit node up through its ancestors to the
//! first node carrying a [`Behavior`]. That behavior runs exactly once.

use std::fmt;
use std::sync::Arc;

use roomview_math::{Ray, Vec2};

use crate::camera::PerspectiveCamera;
use crate::graph::{NodeKey, SceneGraph};
use crate::raycast::{RayHit, Raycaster};

/// Pointer and toggle state shared by behaviors
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    /// Pointer in normalized device coordinates, +Y up
    pub pointer_ndc: Vec2,
    pub power_on: bool,
    /// Number of power toggles so far
    pub toggles: u32,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_power(&mut self) {
        self.power_on = !self.power_on;
        self.toggles += 1;
    }
}

/// Something that happens when a node (or one of its descendants) is clicked
pub trait Behavior: fmt::Debug {
    /// Short human-readable name, used in logs
    fn label(&self) -> &str;

    fn activate(&self, state: &mut InteractionState);
}

/// Flips the power flag
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerToggle;

impl Behavior for PowerToggle {
    fn label(&self) -> &str {
        "power toggle"
    }

    fn activate(&self, state: &mut InteractionState) {
        state.toggle_power();
    }
}

/// Result of one click
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The ray hit nothing
    Missed,
    /// The nearest hit has no behavior on itself or any ancestor
    Unhandled { node: NodeKey },
    /// A behavior ran on `handler` (the hit node or an ancestor of it)
    Activated { handler: NodeKey, hit: RayHit, label: String },
}

impl DispatchOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, DispatchOutcome::Activated { .. })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InteractionDispatcher {
    raycaster: Raycaster,
}

impl InteractionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast through the current pointer position and run the resolved behavior
    pub fn dispatch_click(&self, graph: &SceneGraph, camera: &PerspectiveCamera, state: &mut InteractionState) -> DispatchOutcome {
        let ray = camera.ray_from_ndc(state.pointer_ndc);
        self.dispatch_ray(graph, &ray, state)
    }

    pub fn dispatch_ray(&self, graph: &SceneGraph, ray: &Ray, state: &mut InteractionState) -> DispatchOutcome {
        let Some(hit) = self.raycaster.intersect_first(graph, ray) else {
            return DispatchOutcome::Missed;
        };

        match Self::resolve_handler(graph, hit.node) {
            Some((handler, behavior)) => {
                behavior.activate(state);
                log::debug!("{} activated on {:?}", behavior.label(), graph.get(handler).and_then(|n| n.name.as_deref()));
                DispatchOutcome::Activated {
                    handler,
                    hit,
                    label: behavior.label().to_string(),
                }
            }
            None => DispatchOutcome::Unhandled { node: hit.node },
        }
    }

    /// First node from `node` up to the root that carries a behavior
    pub fn resolve_handler(graph: &SceneGraph, node: NodeKey) -> Option<(NodeKey, Arc<dyn Behavior>)> {
        graph
            .ancestors(node)
            .find_map(|key| graph.get(key)?.behavior().map(|b| (key, Arc::clone(b))))
    }
}
