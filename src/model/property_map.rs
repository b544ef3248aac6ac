//! PropertyMap — the key-value store on graphs, vertices and edges.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;
