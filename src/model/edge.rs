//! Edge (directed, typed) in the property graph.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value, VertexId};

/// Opaque edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared traversal length bounds on a pattern edge: `-[e:knows*1..5]->`.
///
/// Lower/upper are carried through from the script and not interpreted
/// by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLength {
    pub lower: Option<u32>,
    pub upper: Option<u32>,
}

/// A directed edge in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub label: Option<String>,
    pub properties: PropertyMap,
    pub length: Option<EdgeLength>,
}

impl Edge {
    pub fn new(id: EdgeId, source: VertexId, target: VertexId) -> Self {
        Self {
            id,
            source,
            target,
            label: None,
            properties: PropertyMap::new(),
            length: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The "other" end of the edge from the given vertex.
    pub fn other_vertex(&self, from: VertexId) -> Option<VertexId> {
        if from == self.source { Some(self.target) }
        else if from == self.target { Some(self.source) }
        else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_vertex() {
        let e = Edge::new(EdgeId(0), VertexId(1), VertexId(2));
        assert_eq!(e.other_vertex(VertexId(1)), Some(VertexId(2)));
        assert_eq!(e.other_vertex(VertexId(2)), Some(VertexId(1)));
        assert_eq!(e.other_vertex(VertexId(9)), None);
    }

    #[test]
    fn test_builder_style_construction() {
        let e = Edge::new(EdgeId(0), VertexId(1), VertexId(2))
            .with_label("knows")
            .with_property("since", 2021);
        assert!(e.has_label("knows"));
        assert_eq!(e.get("since"), Some(&Value::Int(2021)));
    }
}
