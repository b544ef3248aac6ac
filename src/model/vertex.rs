//! Vertex in the property graph.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// Opaque vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            label: None,
            properties: PropertyMap::new(),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_properties() {
        let v = Vertex::new(VertexId(7))
            .with_label("Person")
            .with_property("name", "Ada");
        assert!(v.has_label("Person"));
        assert!(!v.has_label("Forum"));
        assert_eq!(v.get("name"), Some(&Value::String("Ada".into())));
        assert_eq!(v.get("age"), None);
    }
}
