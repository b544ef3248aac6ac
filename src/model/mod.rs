//! # Property Graph Model
//!
//! Clean DTOs built by the loader: graphs, vertices, edges and their
//! property values. These types cross every boundary: parser ↔ loader ↔ user.
//!
//! Design rule: this module is pure data — no I/O, no loader state.
//! Entities reference each other only by id, never by ownership pointer.

pub mod graph;
pub mod vertex;
pub mod edge;
pub mod value;
pub mod property_map;

pub use graph::{Graph, GraphId};
pub use vertex::{Vertex, VertexId};
pub use edge::{Edge, EdgeId, EdgeLength};
pub use value::Value;
pub use property_map::PropertyMap;
