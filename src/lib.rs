//! # gdl-rs
//!
//! A loader for GDL (Graph Definition Language): parses textual
//! graph-pattern scripts into an in-memory property-graph model of
//! graphs, vertices and edges, plus a normalized filter predicate
//! assembled from `WHERE` clauses.
//!
//! ```
//! use gdl_rs::GdlHandler;
//!
//! let mut handler = GdlHandler::builder().build()?;
//! handler.append("(alice:Person {age: 23})-[:knows]->(bob:Person)")?;
//!
//! assert_eq!(handler.vertices().len(), 2);
//! assert_eq!(handler.edges().len(), 1);
//! assert_eq!(handler.vertex_cache()["alice"].label.as_deref(), Some("Person"));
//! # Ok::<(), gdl_rs::Error>(())
//! ```
//!
//! Scripts can be appended incrementally; variable bindings, identifiers
//! and predicates carry over between appends. See [`GdlHandler`].

pub mod gdl;
pub mod loader;
pub mod model;
pub mod predicate;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::loader::{Loader, LoaderConfig};

pub use crate::gdl::{ErrorStrategy, FailFast, Recovery, SkipMalformedElements};
pub use crate::loader::{
    ContinuousId, IdSupplier, DEFAULT_EDGE_LABEL, DEFAULT_GRAPH_LABEL, DEFAULT_VERTEX_LABEL,
};
pub use crate::model::{
    Edge, EdgeId, EdgeLength, Graph, GraphId, PropertyMap, Value, Vertex, VertexId,
};
pub use crate::predicate::{Comparator, Comparison, Operand, Predicate};

/// All failure modes of parsing and loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied value or call sequence is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The script violates the grammar. `position` is a byte offset into
    /// the offending fragment.
    #[error("syntax error at offset {position}: {message}")]
    SyntaxError { position: usize, message: String },

    /// A well-formed script contradicts an earlier declaration.
    #[error("semantic conflict: {0}")]
    SemanticConflict(String),

    /// A referenced entity does not exist at the end of the batch.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The public entry point: owns a [`Loader`] and an error strategy, and
/// feeds parsed scripts through it.
///
/// Construct via [`GdlHandler::builder`]. All read accessors reflect
/// every fragment appended so far.
pub struct GdlHandler {
    loader: Loader,
    strategy: Box<dyn ErrorStrategy>,
}

impl GdlHandler {
    /// A builder with default labels, zero-based id suppliers and the
    /// fail-fast error strategy.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Parse a script fragment and fold it into the model. Bindings and
    /// ids from earlier fragments stay live, so `append("(a)")` twice
    /// yields one vertex.
    pub fn append(&mut self, script: &str) -> Result<()> {
        if script.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "script must not be empty or blank".into(),
            ));
        }
        debug!(bytes = script.len(), "appending script fragment");
        let events = gdl::parse_with_strategy(script, self.strategy.as_ref())?;
        for event in events {
            self.loader.process(event)?;
        }
        self.loader.finish()
    }

    /// All graphs declared so far, ordered by id.
    pub fn graphs(&self) -> Vec<Graph> {
        self.loader.graphs()
    }

    /// All vertices declared so far, ordered by id.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.loader.vertices()
    }

    /// All edges declared so far, ordered by id.
    pub fn edges(&self) -> Vec<Edge> {
        self.loader.edges()
    }

    /// The conjunction of every `WHERE` clause seen so far, in
    /// conjunctive normal form. `None` if no clause was declared.
    pub fn predicates(&self) -> Option<Predicate> {
        self.loader.predicates()
    }

    /// User-defined graph variables mapped to their graphs.
    pub fn graph_cache(&self) -> std::collections::HashMap<String, Graph> {
        self.loader.graph_cache()
    }

    /// Graph variables filtered by partition (user-defined and/or
    /// auto-generated names).
    pub fn graph_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Graph> {
        self.loader
            .graph_cache_filtered(include_user_defined, include_auto_generated)
    }

    /// User-defined vertex variables mapped to their vertices.
    pub fn vertex_cache(&self) -> std::collections::HashMap<String, Vertex> {
        self.loader.vertex_cache()
    }

    /// Vertex variables filtered by partition.
    pub fn vertex_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Vertex> {
        self.loader
            .vertex_cache_filtered(include_user_defined, include_auto_generated)
    }

    /// User-defined edge variables mapped to their edges.
    pub fn edge_cache(&self) -> std::collections::HashMap<String, Edge> {
        self.loader.edge_cache()
    }

    /// Edge variables filtered by partition.
    pub fn edge_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Edge> {
        self.loader
            .edge_cache_filtered(include_user_defined, include_auto_generated)
    }
}

/// Configures and constructs a [`GdlHandler`].
///
/// ```
/// use gdl_rs::{ContinuousId, GdlHandler};
///
/// let handler = GdlHandler::builder()
///     .set_default_vertex_label("Node")
///     .disable_default_edge_label()
///     .set_next_vertex_id(ContinuousId::starting_at(100))
///     .build_from_string("(a)-[e]->(b)")?;
///
/// assert_eq!(handler.vertex_cache()["a"].label.as_deref(), Some("Node"));
/// assert_eq!(handler.edge_cache()["e"].label, None);
/// # Ok::<(), gdl_rs::Error>(())
/// ```
pub struct Builder {
    config: LoaderConfig,
    strategy: Box<dyn ErrorStrategy>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            config: LoaderConfig::default(),
            strategy: Box::new(FailFast),
        }
    }
}

impl Builder {
    /// Label given to graphs declared without one.
    pub fn set_default_graph_label(mut self, label: impl Into<String>) -> Self {
        self.config.graph_label = label.into();
        self
    }

    /// Label given to vertices declared without one.
    pub fn set_default_vertex_label(mut self, label: impl Into<String>) -> Self {
        self.config.vertex_label = label.into();
        self
    }

    /// Label given to edges declared without one.
    pub fn set_default_edge_label(mut self, label: impl Into<String>) -> Self {
        self.config.edge_label = label.into();
        self
    }

    /// Re-enable default-label injection for graphs (on by default).
    pub fn enable_default_graph_label(mut self) -> Self {
        self.config.use_default_graph_label = true;
        self
    }

    /// Unlabeled graphs keep `label == None`.
    pub fn disable_default_graph_label(mut self) -> Self {
        self.config.use_default_graph_label = false;
        self
    }

    /// Re-enable default-label injection for vertices (on by default).
    pub fn enable_default_vertex_label(mut self) -> Self {
        self.config.use_default_vertex_label = true;
        self
    }

    /// Unlabeled vertices keep `label == None`.
    pub fn disable_default_vertex_label(mut self) -> Self {
        self.config.use_default_vertex_label = false;
        self
    }

    /// Re-enable default-label injection for edges (on by default).
    pub fn enable_default_edge_label(mut self) -> Self {
        self.config.use_default_edge_label = true;
        self
    }

    /// Unlabeled edges keep `label == None`.
    pub fn disable_default_edge_label(mut self) -> Self {
        self.config.use_default_edge_label = false;
        self
    }

    /// Replace the graph id supplier.
    pub fn set_next_graph_id(mut self, supplier: impl IdSupplier + 'static) -> Self {
        self.config.next_graph_id = Box::new(supplier);
        self
    }

    /// Replace the vertex id supplier.
    pub fn set_next_vertex_id(mut self, supplier: impl IdSupplier + 'static) -> Self {
        self.config.next_vertex_id = Box::new(supplier);
        self
    }

    /// Replace the edge id supplier.
    pub fn set_next_edge_id(mut self, supplier: impl IdSupplier + 'static) -> Self {
        self.config.next_edge_id = Box::new(supplier);
        self
    }

    /// Replace the syntax-error recovery strategy. The default,
    /// [`FailFast`], aborts on the first error; [`SkipMalformedElements`]
    /// drops the offending top-level element and continues.
    pub fn set_error_strategy(mut self, strategy: impl ErrorStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Build an empty handler.
    pub fn build(self) -> Result<GdlHandler> {
        for (label, kind) in [
            (&self.config.graph_label, "graph"),
            (&self.config.vertex_label, "vertex"),
            (&self.config.edge_label, "edge"),
        ] {
            if label.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "default {kind} label must not be empty"
                )));
            }
        }
        Ok(GdlHandler {
            loader: Loader::new(self.config),
            strategy: self.strategy,
        })
    }

    /// Build a handler and load an initial script.
    pub fn build_from_string(self, script: &str) -> Result<GdlHandler> {
        let mut handler = self.build()?;
        handler.append(script)?;
        Ok(handler)
    }

    /// Build a handler from a script read off `reader`.
    pub fn build_from_reader(self, mut reader: impl Read) -> Result<GdlHandler> {
        let mut script = String::new();
        reader.read_to_string(&mut script)?;
        self.build_from_string(&script)
    }

    /// Build a handler from a script file.
    pub fn build_from_file(self, path: impl AsRef<Path>) -> Result<GdlHandler> {
        let script = std::fs::read_to_string(path)?;
        self.build_from_string(&script)
    }
}
