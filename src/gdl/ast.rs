//! Syntax events produced by the GDL parser.
//!
//! These types represent parsed declarations. They are pure data — no
//! behavior, no loader references. The parser lowers the script into a
//! flat, document-ordered event stream; the loader folds the stream into
//! the model.

use serde::{Deserialize, Serialize};

use crate::model::{EdgeLength, PropertyMap};
use crate::predicate::Predicate;

/// One syntax event, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum GdlEvent {
    /// A graph header was opened: `g:Label {props} [`
    GraphStart(GraphDecl),
    /// The matching `]` closed the graph scope.
    GraphEnd,
    /// A vertex pattern: `(a:Person {age: 42})`
    Vertex(VertexDecl),
    /// An edge pattern: `-[e:knows*1..5]->` or `<-[e]-`
    Edge(EdgeDecl),
    /// A `WHERE` filter expression attached to the enclosing path.
    Where(Predicate),
}

/// Graph declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDecl {
    /// Literal identifier. Never produced by the parser (GDL has no id
    /// syntax); callers driving events directly may pin an id, which the
    /// loader reserves so the supplier cannot reissue it.
    pub id: Option<u64>,
    pub variable: Option<String>,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

/// Vertex declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexDecl {
    pub variable: Option<String>,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

/// Edge declaration.
///
/// `source`/`target` are explicit vertex-variable references for callers
/// that drive the loader with raw events. The parser leaves both unset:
/// pattern edges are chained positionally between the adjacent vertex
/// events, oriented by `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDecl {
    pub variable: Option<String>,
    pub label: Option<String>,
    pub properties: PropertyMap,
    pub length: Option<EdgeLength>,
    pub direction: Direction,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl Default for EdgeDecl {
    fn default() -> Self {
        Self {
            variable: None,
            label: None,
            properties: PropertyMap::new(),
            length: None,
            direction: Direction::LeftToRight,
            source: None,
            target: None,
        }
    }
}

/// Orientation of a pattern edge relative to document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `-[e]->`: the preceding vertex is the source.
    LeftToRight,
    /// `<-[e]-`: the preceding vertex is the target.
    RightToLeft,
}
