//! Keyframe animation
//!
//! An [`AnimationClip`] holds tracks of translation, rotation or scale
//! keyframes, each targeting a node by name. An [`AnimationMixer`] is bound
//! to a subtree root, resolves track targets inside that subtree, and writes
//! sampled values to the nodes as it advances.

use std::collections::HashMap;
use std::sync::Arc;

use roomview_math::{Quat, Vec3};

use crate::graph::{NodeKey, SceneGraph};

/// How values between two keyframes are computed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    /// Hold the previous keyframe until the next one
    Step,
}

/// Keyframe values of one track; one value per keyframe time
#[derive(Clone, Debug, PartialEq)]
pub enum TrackValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl TrackValues {
    fn len(&self) -> usize {
        match self {
            TrackValues::Translation(v) | TrackValues::Scale(v) => v.len(),
            TrackValues::Rotation(v) => v.len(),
        }
    }
}

/// A value sampled from a track at some time
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampledValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

/// Keyframes for one property of one node
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Name of the node the track drives
    pub target: String,
    times: Vec<f32>,
    values: TrackValues,
    pub interpolation: Interpolation,
}

impl Track {
    /// Build a track; extra times or values beyond the shorter list are dropped
    pub fn new(target: impl Into<String>, mut times: Vec<f32>, mut values: TrackValues, interpolation: Interpolation) -> Self {
        let n = times.len().min(values.len());
        times.truncate(n);
        match &mut values {
            TrackValues::Translation(v) | TrackValues::Scale(v) => v.truncate(n),
            TrackValues::Rotation(v) => v.truncate(n),
        }
        Self {
            target: target.into(),
            times,
            values,
            interpolation,
        }
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &TrackValues {
        &self.values
    }

    /// Time of the last keyframe, 0 for an empty track
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Sample at time `t`; clamps outside the keyframe range
    pub fn sample(&self, t: f32) -> Option<SampledValue> {
        let last = self.times.len().checked_sub(1)?;
        let next = self.times.partition_point(|&k| k <= t);
        let (i, j, k) = if next == 0 {
            (0, 0, 0.0)
        } else if next > last {
            (last, last, 0.0)
        } else {
            let i = next - 1;
            let span = self.times[next] - self.times[i];
            let k = if span > 0.0 { (t - self.times[i]) / span } else { 0.0 };
            match self.interpolation {
                Interpolation::Linear => (i, next, k),
                Interpolation::Step => (i, i, 0.0),
            }
        };

        Some(match &self.values {
            TrackValues::Translation(v) => SampledValue::Translation(v[i].lerp(v[j], k)),
            TrackValues::Scale(v) => SampledValue::Scale(v[i].lerp(v[j], k)),
            TrackValues::Rotation(v) => SampledValue::Rotation(v[i].slerp(v[j], k).normalize()),
        })
    }
}

/// A named set of tracks
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub tracks: Vec<Track>,
    /// Length in seconds (last keyframe of any track)
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0, f32::max);
        Self {
            name: name.into(),
            tracks,
            duration,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and hold the final pose
    Once,
    #[default]
    Repeat,
}

/// A clip being played by a mixer
#[derive(Clone, Debug)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,
    time: f32,
    pub loop_mode: LoopMode,
    /// Playback rate multiplier
    pub time_scale: f32,
    pub paused: bool,
    finished: bool,
}

impl AnimationAction {
    fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            loop_mode: LoopMode::Repeat,
            time_scale: 1.0,
            paused: false,
            finished: false,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Local playback time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    fn advance(&mut self, dt: f32) {
        if self.paused || self.finished {
            return;
        }
        self.time += dt * self.time_scale;
        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
            self.finished = self.loop_mode == LoopMode::Once;
            return;
        }
        match self.loop_mode {
            LoopMode::Repeat => self.time = self.time.rem_euclid(duration),
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.finished = true;
                }
            }
        }
    }
}

/// Plays clips on the nodes of one subtree
#[derive(Debug)]
pub struct AnimationMixer {
    root: NodeKey,
    actions: Vec<AnimationAction>,
    bindings: HashMap<String, Option<NodeKey>>,
}

impl AnimationMixer {
    pub fn new(root: NodeKey) -> Self {
        Self {
            root,
            actions: Vec::new(),
            bindings: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Start playing a clip from the beginning, looping by default
    pub fn play(&mut self, clip: Arc<AnimationClip>) -> &mut AnimationAction {
        log::debug!("mixer playing clip {:?} ({:.2}s)", clip.name, clip.duration);
        self.actions.push(AnimationAction::new(clip));
        let last = self.actions.len() - 1;
        &mut self.actions[last]
    }

    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn stop_all(&mut self) {
        self.actions.clear();
    }

    /// Advance all actions by `dt` and apply the sampled pose
    ///
    /// Track targets missing from the subtree are skipped.
    pub fn update(&mut self, dt: f32, graph: &mut SceneGraph) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let root = self.root;
        for action in &mut self.actions {
            action.advance(dt);
            for track in &action.clip.tracks {
                let node = *self
                    .bindings
                    .entry(track.target.clone())
                    .or_insert_with(|| graph.find_in_subtree(root, &track.target));
                let (Some(node), Some(value)) = (node, track.sample(action.time)) else {
                    continue;
                };
                let Some(n) = graph.get_mut(node) else {
                    continue;
                };
                match value {
                    SampledValue::Translation(p) => n.set_position(p),
                    SampledValue::Rotation(r) => n.set_rotation(r),
                    SampledValue::Scale(s) => n.set_scale(s),
                }
            }
        }
    }
}
