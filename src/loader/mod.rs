//! # Loader
//!
//! The stateful orchestrator: consumes syntax events in document order and
//! incrementally builds the property-graph model plus the accumulated
//! filter predicate. One loader instance survives any number of appended
//! script fragments; ids, variable bindings and predicates carry over.
//!
//! Single-writer by design: events are processed one at a time to
//! completion. After an error the instance is not rolled back and should
//! be discarded.

pub mod cache;
pub mod ids;

use hashbrown::{HashMap as FastMap, HashSet as FastSet};
use tracing::debug;

use crate::gdl::ast::{Direction, EdgeDecl, GdlEvent, GraphDecl, VertexDecl};
use crate::model::{Edge, EdgeId, Graph, GraphId, PropertyMap, Vertex, VertexId};
use crate::predicate::{combine, to_cnf, Predicate};
use crate::{Error, Result};

pub use cache::{Resolution, VariableCache};
pub use ids::{ContinuousId, IdSupplier};

/// Label injected for unlabeled graphs unless overridden or disabled.
pub const DEFAULT_GRAPH_LABEL: &str = "__GRAPH";
/// Label injected for unlabeled vertices unless overridden or disabled.
pub const DEFAULT_VERTEX_LABEL: &str = "__VERTEX";
/// Label injected for unlabeled edges unless overridden or disabled.
pub const DEFAULT_EDGE_LABEL: &str = "__EDGE";

/// Endpoint marker for edges whose vertex is not yet known. Never visible
/// after a successful batch: `finish` fails on any remaining placeholder.
const UNRESOLVED: VertexId = VertexId(u64::MAX);

/// Construction-time configuration for a [`Loader`].
pub struct LoaderConfig {
    pub graph_label: String,
    pub vertex_label: String,
    pub edge_label: String,
    pub use_default_graph_label: bool,
    pub use_default_vertex_label: bool,
    pub use_default_edge_label: bool,
    pub next_graph_id: Box<dyn IdSupplier>,
    pub next_vertex_id: Box<dyn IdSupplier>,
    pub next_edge_id: Box<dyn IdSupplier>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            graph_label: DEFAULT_GRAPH_LABEL.to_owned(),
            vertex_label: DEFAULT_VERTEX_LABEL.to_owned(),
            edge_label: DEFAULT_EDGE_LABEL.to_owned(),
            use_default_graph_label: true,
            use_default_vertex_label: true,
            use_default_edge_label: true,
            next_graph_id: Box::new(ContinuousId::new()),
            next_vertex_id: Box::new(ContinuousId::new()),
            next_edge_id: Box::new(ContinuousId::new()),
        }
    }
}

/// Which end of an edge a reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointSlot {
    Source,
    Target,
}

/// An edge waiting for the next vertex event to complete one endpoint.
struct PendingEdge {
    id: EdgeId,
    slot: EndpointSlot,
    /// False when the edge is a re-reference: the arriving vertex must
    /// then match the stored endpoint instead of filling it.
    created: bool,
}

/// An explicit endpoint reference deferred to end-of-batch resolution.
struct UnresolvedRef {
    edge: EdgeId,
    slot: EndpointSlot,
    name: String,
    created: bool,
}

/// The model-construction and predicate-assembly engine.
pub struct Loader {
    config: LoaderConfig,

    graphs: FastMap<GraphId, Graph>,
    vertices: FastMap<VertexId, Vertex>,
    edges: FastMap<EdgeId, Edge>,

    graph_cache: VariableCache<GraphId>,
    vertex_cache: VariableCache<VertexId>,
    edge_cache: VariableCache<EdgeId>,

    // Ids ever issued or pinned, per kind. The supplier is re-polled past
    // any reserved value so pinned ids are never reissued.
    used_graph_ids: FastSet<u64>,
    used_vertex_ids: FastSet<u64>,
    used_edge_ids: FastSet<u64>,

    graph_stack: Vec<GraphId>,
    last_vertex: Option<VertexId>,
    pending_edge: Option<PendingEdge>,
    unresolved: Vec<UnresolvedRef>,

    predicates: Option<Predicate>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            graphs: FastMap::new(),
            vertices: FastMap::new(),
            edges: FastMap::new(),
            graph_cache: VariableCache::new("__g"),
            vertex_cache: VariableCache::new("__v"),
            edge_cache: VariableCache::new("__e"),
            used_graph_ids: FastSet::new(),
            used_vertex_ids: FastSet::new(),
            used_edge_ids: FastSet::new(),
            graph_stack: Vec::new(),
            last_vertex: None,
            pending_edge: None,
            unresolved: Vec::new(),
            predicates: None,
        }
    }

    // ========================================================================
    // Event processing
    // ========================================================================

    /// Consume one syntax event. Events must arrive in document order;
    /// state carries over across batches.
    pub fn process(&mut self, event: GdlEvent) -> Result<()> {
        match event {
            GdlEvent::GraphStart(decl) => self.handle_graph_start(decl),
            GdlEvent::GraphEnd => self.handle_graph_end(),
            GdlEvent::Vertex(decl) => self.handle_vertex(decl),
            GdlEvent::Edge(decl) => self.handle_edge(decl),
            GdlEvent::Where(predicate) => {
                self.predicates = combine(self.predicates.take(), Some(predicate));
                Ok(())
            }
        }
    }

    /// Close the current batch: resolves deferred endpoint references and
    /// checks the model invariants. Called once per appended fragment.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(pending) = self.pending_edge.take() {
            return Err(Error::DanglingReference(format!(
                "edge {} is missing its {} vertex",
                pending.id,
                slot_name(pending.slot),
            )));
        }

        for r in std::mem::take(&mut self.unresolved) {
            let vertex = self.vertex_cache.get(&r.name).ok_or_else(|| {
                Error::DanglingReference(format!(
                    "edge endpoint '{}' does not resolve to a vertex",
                    r.name
                ))
            })?;
            self.set_or_check_endpoint(r.edge, r.slot, vertex, r.created)?;
        }

        // Safety net: every edge must point at known vertices.
        for edge in self.edges.values() {
            for endpoint in [edge.source, edge.target] {
                if endpoint == UNRESOLVED || !self.vertices.contains_key(&endpoint) {
                    return Err(Error::DanglingReference(format!(
                        "edge {} references unknown vertex {}",
                        edge.id, endpoint
                    )));
                }
            }
        }

        Ok(())
    }

    /// Process a whole batch of events and close it.
    pub fn process_all(&mut self, events: impl IntoIterator<Item = GdlEvent>) -> Result<()> {
        for event in events {
            self.process(event)?;
        }
        self.finish()
    }

    // ========================================================================
    // Graph events
    // ========================================================================

    fn handle_graph_start(&mut self, decl: GraphDecl) -> Result<()> {
        if let Some(name) = decl.variable.as_deref() {
            self.check_kind_conflict(name, EntityKind::Graph)?;
        }

        let bound = decl.variable.as_deref().and_then(|n| self.graph_cache.get(n));
        let resolution = match bound {
            Some(id) => {
                if let Some(pinned) = decl.id {
                    if pinned != id.0 {
                        return Err(Error::SemanticConflict(format!(
                            "graph '{}' is already bound to id {} (declared {})",
                            decl.variable.as_deref().unwrap_or_default(),
                            id,
                            pinned
                        )));
                    }
                }
                Resolution {
                    name: decl.variable.clone().unwrap_or_default(),
                    id,
                    created: false,
                }
            }
            None => {
                let id = GraphId(alloc_id(
                    &mut *self.config.next_graph_id,
                    &mut self.used_graph_ids,
                    decl.id,
                    "graph",
                )?);
                self.graph_cache.resolve_or_create(decl.variable.as_deref(), || id)
            }
        };

        if resolution.created {
            let label = effective_label(
                decl.label,
                &self.config.graph_label,
                self.config.use_default_graph_label,
            );
            let mut graph = Graph::new(resolution.id);
            graph.label = label;
            graph.properties = decl.properties;
            debug!(graph = %resolution.id, variable = %resolution.name, "created graph");
            self.graphs.insert(resolution.id, graph);
        } else {
            let graph = self
                .graphs
                .get_mut(&resolution.id)
                .ok_or_else(|| Error::SemanticConflict(format!(
                    "graph variable '{}' is bound but has no entity",
                    resolution.name
                )))?;
            merge_redeclaration(
                "graph",
                &resolution.name,
                &mut graph.label,
                &mut graph.properties,
                decl.label,
                decl.properties,
            )?;
        }

        self.graph_stack.push(resolution.id);
        Ok(())
    }

    fn handle_graph_end(&mut self) -> Result<()> {
        self.graph_stack.pop().map(|_| ()).ok_or_else(|| {
            Error::InvalidArgument("graph-end event without an open graph scope".into())
        })
    }

    // ========================================================================
    // Vertex events
    // ========================================================================

    fn handle_vertex(&mut self, decl: VertexDecl) -> Result<()> {
        if let Some(name) = decl.variable.as_deref() {
            self.check_kind_conflict(name, EntityKind::Vertex)?;
        }

        let bound = decl.variable.as_deref().and_then(|n| self.vertex_cache.get(n));
        let resolution = match bound {
            Some(id) => Resolution {
                name: decl.variable.clone().unwrap_or_default(),
                id,
                created: false,
            },
            None => {
                let id = VertexId(alloc_id(
                    &mut *self.config.next_vertex_id,
                    &mut self.used_vertex_ids,
                    None,
                    "vertex",
                )?);
                self.vertex_cache.resolve_or_create(decl.variable.as_deref(), || id)
            }
        };

        if resolution.created {
            let label = effective_label(
                decl.label,
                &self.config.vertex_label,
                self.config.use_default_vertex_label,
            );
            let mut vertex = Vertex::new(resolution.id);
            vertex.label = label;
            vertex.properties = decl.properties;
            debug!(vertex = %resolution.id, variable = %resolution.name, "created vertex");
            self.vertices.insert(resolution.id, vertex);
        } else {
            let vertex = self
                .vertices
                .get_mut(&resolution.id)
                .ok_or_else(|| Error::SemanticConflict(format!(
                    "vertex variable '{}' is bound but has no entity",
                    resolution.name
                )))?;
            merge_redeclaration(
                "vertex",
                &resolution.name,
                &mut vertex.label,
                &mut vertex.properties,
                decl.label,
                decl.properties,
            )?;
        }

        for graph_id in &self.graph_stack {
            if let Some(graph) = self.graphs.get_mut(graph_id) {
                graph.vertices.insert(resolution.id);
            }
        }

        if let Some(pending) = self.pending_edge.take() {
            self.set_or_check_endpoint(pending.id, pending.slot, resolution.id, pending.created)?;
        }
        self.last_vertex = Some(resolution.id);
        Ok(())
    }

    // ========================================================================
    // Edge events
    // ========================================================================

    fn handle_edge(&mut self, decl: EdgeDecl) -> Result<()> {
        if self.pending_edge.is_some() {
            return Err(Error::InvalidArgument(
                "edge event with no vertex between it and the previous edge".into(),
            ));
        }
        if let Some(name) = decl.variable.as_deref() {
            self.check_kind_conflict(name, EntityKind::Edge)?;
        }

        let bound = decl.variable.as_deref().and_then(|n| self.edge_cache.get(n));
        let resolution = match bound {
            Some(id) => Resolution {
                name: decl.variable.clone().unwrap_or_default(),
                id,
                created: false,
            },
            None => {
                let id = EdgeId(alloc_id(
                    &mut *self.config.next_edge_id,
                    &mut self.used_edge_ids,
                    None,
                    "edge",
                )?);
                self.edge_cache.resolve_or_create(decl.variable.as_deref(), || id)
            }
        };

        // Which end the preceding vertex feeds, and which end the next one
        // completes, follows the arrow orientation.
        let (prev_slot, next_slot) = match decl.direction {
            Direction::LeftToRight => (EndpointSlot::Source, EndpointSlot::Target),
            Direction::RightToLeft => (EndpointSlot::Target, EndpointSlot::Source),
        };

        if resolution.created {
            let label = effective_label(
                decl.label,
                &self.config.edge_label,
                self.config.use_default_edge_label,
            );
            let mut edge = Edge::new(resolution.id, UNRESOLVED, UNRESOLVED);
            edge.label = label;
            edge.properties = decl.properties;
            edge.length = decl.length;
            debug!(edge = %resolution.id, variable = %resolution.name, "created edge");
            self.edges.insert(resolution.id, edge);
        } else {
            let edge = self
                .edges
                .get_mut(&resolution.id)
                .ok_or_else(|| Error::SemanticConflict(format!(
                    "edge variable '{}' is bound but has no entity",
                    resolution.name
                )))?;
            merge_redeclaration(
                "edge",
                &resolution.name,
                &mut edge.label,
                &mut edge.properties,
                decl.label,
                decl.properties,
            )?;
            if let Some(length) = decl.length {
                match edge.length {
                    Some(existing) if existing != length => {
                        return Err(Error::SemanticConflict(format!(
                            "edge '{}' redeclared with different length bounds",
                            resolution.name
                        )));
                    }
                    _ => edge.length = Some(length),
                }
            }
        }

        for graph_id in &self.graph_stack {
            if let Some(graph) = self.graphs.get_mut(graph_id) {
                graph.edges.insert(resolution.id);
            }
        }

        for slot in [EndpointSlot::Source, EndpointSlot::Target] {
            let explicit = match slot {
                EndpointSlot::Source => decl.source.as_deref(),
                EndpointSlot::Target => decl.target.as_deref(),
            };
            if let Some(name) = explicit {
                self.unresolved.push(UnresolvedRef {
                    edge: resolution.id,
                    slot,
                    name: name.to_owned(),
                    created: resolution.created,
                });
            } else if slot == prev_slot {
                let vertex = self.last_vertex.ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "edge {} has no preceding vertex for its {} end",
                        resolution.id,
                        slot_name(slot),
                    ))
                })?;
                self.set_or_check_endpoint(resolution.id, slot, vertex, resolution.created)?;
            } else {
                debug_assert_eq!(slot, next_slot);
                self.pending_edge = Some(PendingEdge {
                    id: resolution.id,
                    slot,
                    created: resolution.created,
                });
            }
        }

        Ok(())
    }

    // ========================================================================
    // Read accessors (pure)
    // ========================================================================

    /// All graphs, ordered by id.
    pub fn graphs(&self) -> Vec<Graph> {
        let mut out: Vec<Graph> = self.graphs.values().cloned().collect();
        out.sort_by_key(|g| g.id);
        out
    }

    /// All vertices, ordered by id.
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out: Vec<Vertex> = self.vertices.values().cloned().collect();
        out.sort_by_key(|v| v.id);
        out
    }

    /// All edges, ordered by id.
    pub fn edges(&self) -> Vec<Edge> {
        let mut out: Vec<Edge> = self.edges.values().cloned().collect();
        out.sort_by_key(|e| e.id);
        out
    }

    /// The accumulated filter predicate in conjunctive normal form, or
    /// `None` if no `WHERE` expression was ever declared.
    pub fn predicates(&self) -> Option<Predicate> {
        self.predicates.clone().map(to_cnf)
    }

    /// User-defined graph variables and their entities.
    pub fn graph_cache(&self) -> std::collections::HashMap<String, Graph> {
        self.graph_cache_filtered(true, false)
    }

    /// Graph variables filtered by partition; snapshot, independent of
    /// later mutation.
    pub fn graph_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Graph> {
        self.graph_cache
            .snapshot(include_user_defined, include_auto_generated)
            .into_iter()
            .filter_map(|(name, id)| self.graphs.get(&id).map(|g| (name, g.clone())))
            .collect()
    }

    /// User-defined vertex variables and their entities.
    pub fn vertex_cache(&self) -> std::collections::HashMap<String, Vertex> {
        self.vertex_cache_filtered(true, false)
    }

    /// Vertex variables filtered by partition.
    pub fn vertex_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Vertex> {
        self.vertex_cache
            .snapshot(include_user_defined, include_auto_generated)
            .into_iter()
            .filter_map(|(name, id)| self.vertices.get(&id).map(|v| (name, v.clone())))
            .collect()
    }

    /// User-defined edge variables and their entities.
    pub fn edge_cache(&self) -> std::collections::HashMap<String, Edge> {
        self.edge_cache_filtered(true, false)
    }

    /// Edge variables filtered by partition.
    pub fn edge_cache_filtered(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Edge> {
        self.edge_cache
            .snapshot(include_user_defined, include_auto_generated)
            .into_iter()
            .filter_map(|(name, id)| self.edges.get(&id).map(|e| (name, e.clone())))
            .collect()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_kind_conflict(&self, name: &str, kind: EntityKind) -> Result<()> {
        let clash = match kind {
            EntityKind::Graph if self.vertex_cache.contains(name) => Some(EntityKind::Vertex),
            EntityKind::Graph if self.edge_cache.contains(name) => Some(EntityKind::Edge),
            EntityKind::Vertex if self.graph_cache.contains(name) => Some(EntityKind::Graph),
            EntityKind::Vertex if self.edge_cache.contains(name) => Some(EntityKind::Edge),
            EntityKind::Edge if self.graph_cache.contains(name) => Some(EntityKind::Graph),
            EntityKind::Edge if self.vertex_cache.contains(name) => Some(EntityKind::Vertex),
            _ => None,
        };
        match clash {
            Some(other) => Err(Error::SemanticConflict(format!(
                "variable '{name}' is declared as a {kind} but already bound to a {other}",
                kind = kind.as_str(),
                other = other.as_str(),
            ))),
            None => Ok(()),
        }
    }

    fn set_or_check_endpoint(
        &mut self,
        edge_id: EdgeId,
        slot: EndpointSlot,
        vertex: VertexId,
        created: bool,
    ) -> Result<()> {
        let edge = self.edges.get_mut(&edge_id).ok_or_else(|| {
            Error::SemanticConflict(format!("edge {edge_id} vanished from the model"))
        })?;
        let field = match slot {
            EndpointSlot::Source => &mut edge.source,
            EndpointSlot::Target => &mut edge.target,
        };
        if created || *field == UNRESOLVED {
            *field = vertex;
            Ok(())
        } else if *field != vertex {
            Err(Error::SemanticConflict(format!(
                "edge {} redeclared with a different {} vertex",
                edge_id,
                slot_name(slot),
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Graph,
    Vertex,
    Edge,
}

impl EntityKind {
    fn as_str(self) -> &'static str {
        match self {
            EntityKind::Graph => "graph",
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
        }
    }
}

fn slot_name(slot: EndpointSlot) -> &'static str {
    match slot {
        EndpointSlot::Source => "source",
        EndpointSlot::Target => "target",
    }
}

/// Declared label, or the configured default, or nothing.
fn effective_label(declared: Option<String>, default: &str, use_default: bool) -> Option<String> {
    declared.or_else(|| use_default.then(|| default.to_owned()))
}

/// Allocate an id: a pinned literal wins and is reserved; otherwise the
/// supplier is polled past any reserved value.
fn alloc_id(
    supplier: &mut dyn IdSupplier,
    used: &mut FastSet<u64>,
    pinned: Option<u64>,
    kind: &str,
) -> Result<u64> {
    match pinned {
        Some(id) => {
            if used.insert(id) {
                Ok(id)
            } else {
                Err(Error::SemanticConflict(format!(
                    "{kind} id {id} is already in use"
                )))
            }
        }
        None => loop {
            let id = supplier.next_id();
            if used.insert(id) {
                return Ok(id);
            }
        },
    }
}

/// Fold a re-reference into an existing entity. A differing explicit
/// label is a conflict; properties merge, last write wins per key.
fn merge_redeclaration(
    kind: &str,
    name: &str,
    existing_label: &mut Option<String>,
    existing_properties: &mut PropertyMap,
    label: Option<String>,
    properties: PropertyMap,
) -> Result<()> {
    if let Some(new_label) = label {
        match existing_label {
            Some(old) if *old != new_label => {
                return Err(Error::SemanticConflict(format!(
                    "{kind} '{name}' redeclared with label '{new_label}' (was '{old}')"
                )));
            }
            _ => *existing_label = Some(new_label),
        }
    }
    existing_properties.extend(properties);
    Ok(())
}
