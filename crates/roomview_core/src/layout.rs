//! Scene layout snapshots
//!
//! A SceneLayout records where the named top-level objects of a scene are
//! placed, plus the scene lighting, in a RON file. Saving captures the live
//! graph; loading and applying moves matching nodes back into place.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::graph::{NodeKey, SceneGraph};
use crate::light::Lighting;
use crate::Transform;

/// Placement of one named node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePlacement {
    pub name: String,
    pub transform: Transform,
}

/// Serializable placement of a scene's objects and lights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Layout name (for display/debugging)
    pub name: String,
    pub placements: Vec<NodePlacement>,
    /// Lighting to restore; absent keeps the scene's own lights
    #[serde(default)]
    pub lighting: Option<Lighting>,
}

impl SceneLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placements: Vec::new(),
            lighting: None,
        }
    }

    /// Snapshot the named direct children of the root and the lighting
    pub fn capture(name: impl Into<String>, graph: &SceneGraph) -> Self {
        let placements = graph
            .get(graph.root())
            .map(|root| {
                root.children()
                    .iter()
                    .filter_map(|&key| {
                        let node = graph.get(key)?;
                        Some(NodePlacement {
                            name: node.name.clone()?,
                            transform: node.transform,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: name.into(),
            placements,
            lighting: Some(graph.lighting.clone()),
        }
    }

    /// Move matching nodes into place and restore lighting
    ///
    /// Only direct children of the root are matched, as in [`capture`](Self::capture).
    /// Returns how many placements found a node. Unknown names are skipped.
    pub fn apply(&self, graph: &mut SceneGraph) -> usize {
        let mut applied = 0;
        for placement in &self.placements {
            let Some(key) = top_level_named(graph, &placement.name) else {
                log::debug!("layout {:?}: no node named {:?}", self.name, placement.name);
                continue;
            };
            if let Some(node) = graph.get_mut(key) {
                node.set_position(placement.transform.position);
                node.set_rotation(placement.transform.rotation);
                node.set_scale(placement.transform.scale);
                applied += 1;
            }
        }
        if let Some(lighting) = &self.lighting {
            graph.lighting = lighting.clone();
        }
        applied
    }

    /// Load a layout from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        let layout = ron::from_str(&contents)?;
        Ok(layout)
    }

    /// Save a layout to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LayoutError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

fn top_level_named(graph: &SceneGraph, name: &str) -> Option<NodeKey> {
    let root = graph.get(graph.root())?;
    root.children()
        .iter()
        .copied()
        .find(|&key| graph.get(key).is_some_and(|n| n.name.as_deref() == Some(name)))
}

/// Error loading or saving a layout
#[derive(Debug)]
pub enum LayoutError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for LayoutError {
    fn from(e: io::Error) -> Self {
        LayoutError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LayoutError {
    fn from(e: ron::error::SpannedError) -> Self {
        LayoutError::Parse(e)
    }
}

impl From<ron::Error> for LayoutError {
    fn from(e: ron::Error) -> Self {
        LayoutError::Serialize(e)
    }
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Io(e) => write!(f, "IO error: {}", e),
            LayoutError::Parse(e) => write!(f, "Parse error: {}", e),
            LayoutError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SceneNode;
    use roomview_math::Vec3;

    fn living_room() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let tv = graph.add(SceneNode::group("tv").with_position(Vec3::new(-30.0, 55.0, 0.0)));
        graph.add_child(tv, SceneNode::group("screen"));
        graph.add(SceneNode::group("table"));
        graph.add(SceneNode::new());
        graph
    }

    #[test]
    fn test_capture_takes_named_top_level_nodes() {
        let graph = living_room();
        let layout = SceneLayout::capture("room", &graph);
        let names: Vec<_> = layout.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["tv", "table"]);
        assert!(layout.lighting.is_some());
    }

    #[test]
    fn test_apply_moves_nodes() {
        let mut graph = living_room();
        let mut layout = SceneLayout::new("moved");
        layout.placements.push(NodePlacement {
            name: "tv".to_string(),
            transform: Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
        });
        layout.placements.push(NodePlacement {
            name: "sofa".to_string(),
            transform: Transform::IDENTITY,
        });
        assert_eq!(layout.apply(&mut graph), 1);
        let tv = graph.find_by_name("tv").and_then(|k| graph.get(k));
        assert_eq!(tv.map(|n| n.transform.position), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_apply_skips_nested_namesake() {
        let mut graph = SceneGraph::new();
        let first = graph.add(SceneNode::group("tvFromFile"));
        let nested = graph.add_child(first, SceneNode::group("television"));
        let top = graph.add(SceneNode::group("television"));

        let mut layout = SceneLayout::new("moved");
        layout.placements.push(NodePlacement {
            name: "television".to_string(),
            transform: Transform::from_position(Vec3::new(5.0, 0.0, 0.0)),
        });
        assert_eq!(layout.apply(&mut graph), 1);
        assert_eq!(graph.get(top).map(|n| n.transform.position), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(graph.get(nested).map(|n| n.transform.position), Some(Vec3::ZERO));
    }

    #[test]
    fn test_save_and_load_file() {
        let graph = living_room();
        let layout = SceneLayout::capture("room", &graph);
        let path = std::env::temp_dir().join("roomview_layout_test").join("layout.ron");
        layout.save(&path).unwrap();
        let loaded = SceneLayout::load(&path).unwrap();
        assert_eq!(loaded, layout);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_parse_minimal_ron() {
        let ron_str = r#"(
            name: "minimal",
            placements: [
                (name: "table", transform: (position: (0.0, 0.0, 10.0), rotation: (0.0, 0.0, 0.0, 1.0), scale: (1.0, 1.0, 1.0))),
            ],
        )"#;
        let layout: SceneLayout = ron::from_str(ron_str).unwrap();
        assert_eq!(layout.placements.len(), 1);
        assert!(layout.lighting.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = SceneLayout::load("/nonexistent/roomview/layout.ron");
        assert!(matches!(result, Err(LayoutError::Io(_))));
    }
}
