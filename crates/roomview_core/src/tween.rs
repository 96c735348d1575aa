//! Property tweens
//!
//! A Tween moves one property of a node (position, Euler rotation or scale)
//! from a start value to an end value over a fixed duration. Tweens are
//! driven by the frame delta through [`TweenManager::update`] and removed
//! once they complete.

use roomview_math::Vec3;

use crate::graph::{NodeKey, SceneGraph};

/// Easing curve applied to normalized progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicInOut,
}

impl Easing {
    /// Map progress in [0, 1] onto the curve; input is clamped
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }
        }
    }
}

/// Which node property a tween drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    Position,
    /// Euler angles in radians, see [`crate::Transform::euler`]
    RotationEuler,
    Scale,
}

impl TweenTarget {
    fn read(self, graph: &SceneGraph, node: NodeKey) -> Option<Vec3> {
        let t = &graph.get(node)?.transform;
        Some(match self {
            TweenTarget::Position => t.position,
            TweenTarget::RotationEuler => t.euler(),
            TweenTarget::Scale => t.scale,
        })
    }

    fn write(self, graph: &mut SceneGraph, node: NodeKey, value: Vec3) -> bool {
        let Some(n) = graph.get_mut(node) else {
            return false;
        };
        match self {
            TweenTarget::Position => n.set_position(value),
            TweenTarget::RotationEuler => {
                let mut t = n.transform;
                t.set_euler(value);
                n.set_rotation(t.rotation);
            }
            TweenTarget::Scale => n.set_scale(value),
        }
        true
    }
}

/// One running transition
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    node: NodeKey,
    target: TweenTarget,
    from: Option<Vec3>,
    to: Vec3,
    duration: f32,
    delay: f32,
    easing: Easing,
    elapsed: f32,
}

impl Tween {
    /// Tween `target` of `node` to `to` over `duration` seconds
    ///
    /// The start value is read from the node when the tween first runs,
    /// unless set with [`Tween::from`].
    pub fn new(node: NodeKey, target: TweenTarget, to: Vec3, duration: f32) -> Self {
        Self {
            node,
            target,
            from: None,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing: Easing::Linear,
            elapsed: 0.0,
        }
    }

    pub fn from(mut self, from: Vec3) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn node(&self) -> NodeKey {
        self.node
    }

    pub fn target(&self) -> TweenTarget {
        self.target
    }

    /// Progress after the delay, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.delay && self.progress() >= 1.0
    }

    /// Advance and write the current value; false once the node is gone
    fn advance(&mut self, dt: f32, graph: &mut SceneGraph) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.delay {
            return graph.contains(self.node);
        }
        let from = match self.from {
            Some(from) => from,
            None => match self.target.read(graph, self.node) {
                Some(current) => {
                    self.from = Some(current);
                    current
                }
                None => return false,
            },
        };
        let k = self.easing.apply(self.progress());
        self.target.write(graph, self.node, from.lerp(self.to, k))
    }
}

/// Identifies a started tween
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Owns and advances all running tweens
#[derive(Debug, Default)]
pub struct TweenManager {
    tweens: Vec<(TweenId, Tween)>,
    next_id: u64,
}

impl TweenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween, replacing any running tween on the same node property
    pub fn start(&mut self, tween: Tween) -> TweenId {
        self.tweens
            .retain(|(_, t)| !(t.node == tween.node && t.target == tween.target));
        self.next_id += 1;
        let id = TweenId(self.next_id);
        self.tweens.push((id, tween));
        id
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|(tid, _)| *tid == id)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advance every tween by `dt` seconds
    ///
    /// Returns how many completed this call. Tweens whose node no longer
    /// exists are dropped silently.
    pub fn update(&mut self, dt: f32, graph: &mut SceneGraph) -> usize {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut completed = 0;
        self.tweens.retain_mut(|(_, tween)| {
            if !tween.advance(dt, graph) {
                return false;
            }
            if tween.is_complete() {
                completed += 1;
                return false;
            }
            true
        });
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SceneNode;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_easing_end_points() {
        for easing in [Easing::Linear, Easing::QuadIn, Easing::QuadOut, Easing::QuadInOut, Easing::CubicInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_position_tween_reaches_target() {
        let mut graph = SceneGraph::new();
        let node = graph.add(SceneNode::new());
        let mut tweens = TweenManager::new();
        let id = tweens.start(Tween::new(node, TweenTarget::Position, Vec3::new(10.0, 0.0, 0.0), 1.0));

        assert_eq!(tweens.update(0.5, &mut graph), 0);
        let x = graph.get(node).map(|n| n.transform.position.x);
        assert!(x.is_some_and(|x| (x - 5.0).abs() < 1e-4));

        assert_eq!(tweens.update(0.6, &mut graph), 1);
        assert!(!tweens.is_active(id));
        assert_eq!(graph.get(node).map(|n| n.transform.position.x), Some(10.0));
    }

    #[test]
    fn test_delay_holds_start_value() {
        let mut graph = SceneGraph::new();
        let node = graph.add(SceneNode::new().with_position(Vec3::ONE));
        let mut tweens = TweenManager::new();
        tweens.start(Tween::new(node, TweenTarget::Scale, Vec3::splat(2.0), 1.0).with_delay(0.5));
        tweens.update(0.25, &mut graph);
        assert_eq!(graph.get(node).map(|n| n.transform.scale), Some(Vec3::ONE));
        tweens.update(1.5, &mut graph);
        assert_eq!(graph.get(node).map(|n| n.transform.scale), Some(Vec3::splat(2.0)));
        assert_eq!(tweens.active_count(), 0);
    }

    #[test]
    fn test_rotation_tween() {
        let mut graph = SceneGraph::new();
        let knob = graph.add(SceneNode::new());
        let mut tweens = TweenManager::new();
        tweens.start(Tween::new(knob, TweenTarget::RotationEuler, Vec3::new(0.0, -FRAC_PI_2, 0.0), 0.25));
        tweens.update(0.3, &mut graph);
        let y = graph.get(knob).map(|n| n.transform.euler().y).unwrap_or(f32::NAN);
        assert!((y + FRAC_PI_2).abs() < 1e-3, "y = {y}");
    }

    #[test]
    fn test_restart_replaces_running_tween() {
        let mut graph = SceneGraph::new();
        let node = graph.add(SceneNode::new());
        let mut tweens = TweenManager::new();
        let first = tweens.start(Tween::new(node, TweenTarget::Position, Vec3::X, 1.0));
        let second = tweens.start(Tween::new(node, TweenTarget::Position, Vec3::ZERO, 1.0));
        assert!(!tweens.is_active(first));
        assert!(tweens.is_active(second));
        assert_eq!(tweens.active_count(), 1);
    }

    #[test]
    fn test_zero_duration_completes_on_first_update() {
        let mut graph = SceneGraph::new();
        let node = graph.add(SceneNode::new());
        let mut tweens = TweenManager::new();
        tweens.start(Tween::new(node, TweenTarget::Position, Vec3::Y, 0.0));
        assert_eq!(tweens.update(0.0, &mut graph), 1);
        assert_eq!(graph.get(node).map(|n| n.transform.position), Some(Vec3::Y));
    }

    #[test]
    fn test_nan_delta_holds_tween() {
        let mut graph = SceneGraph::new();
        let node = graph.add(SceneNode::new());
        let mut tweens = TweenManager::new();
        tweens.start(Tween::new(node, TweenTarget::Position, Vec3::X, 1.0).from(Vec3::ZERO));
        assert_eq!(tweens.update(f32::NAN, &mut graph), 0);
        assert_eq!(tweens.active_count(), 1);
        assert_eq!(graph.get(node).map(|n| n.transform.position), Some(Vec3::ZERO));
    }
}
