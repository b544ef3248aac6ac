//! Graph — a labeled, property-carrying container of vertices and edges.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use super::{EdgeId, PropertyMap, Value, VertexId};

/// Opaque graph identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphId(pub u64);

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logical graph. Vertices and edges are referenced by id, never owned:
/// the same vertex may belong to any number of graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: GraphId,
    pub label: Option<String>,
    pub properties: PropertyMap,
    pub vertices: BTreeSet<VertexId>,
    pub edges: BTreeSet<EdgeId>,
}

impl Graph {
    pub fn new(id: GraphId) -> Self {
        Self {
            id,
            label: None,
            properties: PropertyMap::new(),
            vertices: BTreeSet::new(),
            edges: BTreeSet::new(),
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

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut g = Graph::new(GraphId(0)).with_label("Community");
        g.vertices.insert(VertexId(1));
        g.edges.insert(EdgeId(2));

        assert!(g.has_label("Community"));
        assert!(g.contains_vertex(VertexId(1)));
        assert!(!g.contains_vertex(VertexId(2)));
        assert!(g.contains_edge(EdgeId(2)));
    }
}
