//! End-to-end model construction: scripts in, graphs/vertices/edges out.

use gdl_rs::{
    ContinuousId, EdgeLength, GdlHandler, Value, VertexId, DEFAULT_EDGE_LABEL,
    DEFAULT_GRAPH_LABEL, DEFAULT_VERTEX_LABEL,
};
use pretty_assertions::assert_eq;

fn load(script: &str) -> GdlHandler {
    GdlHandler::builder()
        .build_from_string(script)
        .expect("script should load")
}

#[test]
fn test_single_labeled_vertex() {
    let handler = load("(alice:Person {name: \"Alice\", age: 23})");

    let vertices = handler.vertices();
    assert_eq!(vertices.len(), 1);
    assert_eq!(vertices[0].label.as_deref(), Some("Person"));
    assert_eq!(vertices[0].get("name"), Some(&Value::String("Alice".into())));
    assert_eq!(vertices[0].get("age"), Some(&Value::Int(23)));
}

#[test]
fn test_path_chains_edges_between_adjacent_vertices() {
    let handler = load("(a)-[e:knows]->(b)<-[f:likes]-(c)");

    let cache = handler.vertex_cache();
    let (a, b, c) = (cache["a"].id, cache["b"].id, cache["c"].id);
    let edges = handler.edge_cache();

    assert_eq!(edges["e"].source, a);
    assert_eq!(edges["e"].target, b);
    // `<-[f]-` points right to left: c is the source.
    assert_eq!(edges["f"].source, c);
    assert_eq!(edges["f"].target, b);
}

#[test]
fn test_variable_reuse_resolves_to_same_vertex() {
    let handler = load("(a)-->(b), (a)-->(c)");

    assert_eq!(handler.vertices().len(), 3);
    assert_eq!(handler.edges().len(), 2);

    let a = handler.vertex_cache()["a"].id;
    let sources: Vec<VertexId> = handler.edges().iter().map(|e| e.source).collect();
    assert_eq!(sources, vec![a, a]);
}

#[test]
fn test_anonymous_vertices_are_distinct() {
    let handler = load("()-->()");
    assert_eq!(handler.vertices().len(), 2);
}

#[test]
fn test_graph_membership() {
    let handler = load("g1[(a)-->(b)], g2[(b)-->(c)]");

    let graphs = handler.graph_cache();
    let cache = handler.vertex_cache();
    let (a, b, c) = (cache["a"].id, cache["b"].id, cache["c"].id);

    assert!(graphs["g1"].contains_vertex(a));
    assert!(graphs["g1"].contains_vertex(b));
    assert!(!graphs["g1"].contains_vertex(c));
    // b is shared: one vertex, two graphs.
    assert!(graphs["g2"].contains_vertex(b));
    assert!(graphs["g2"].contains_vertex(c));
    assert_eq!(handler.vertices().len(), 3);
}

#[test]
fn test_graph_redeclaration_unions_membership() {
    let handler = load("g {backend: \"test\"}[(a)], g {size: 2}[(b)]");

    let graphs = handler.graphs();
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0].vertices.len(), 2);
    assert_eq!(graphs[0].properties.get("backend"), Some(&Value::String("test".into())));
    assert_eq!(graphs[0].properties.get("size"), Some(&Value::Int(2)));
}

#[test]
fn test_anonymous_graph() {
    let handler = load("[(a)-->(b)]");

    let graphs = handler.graphs();
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0].label.as_deref(), Some(DEFAULT_GRAPH_LABEL));
    assert_eq!(graphs[0].vertices.len(), 2);
    assert_eq!(graphs[0].edges.len(), 1);
}

#[test]
fn test_ungrouped_path_belongs_to_no_graph() {
    let handler = load("(a)-->(b)");
    assert!(handler.graphs().is_empty());
}

#[test]
fn test_default_labels_injected() {
    let handler = load("g[(v)-[e]->(w)]");

    assert_eq!(handler.graph_cache()["g"].label.as_deref(), Some(DEFAULT_GRAPH_LABEL));
    assert_eq!(handler.vertex_cache()["v"].label.as_deref(), Some(DEFAULT_VERTEX_LABEL));
    assert_eq!(handler.edge_cache()["e"].label.as_deref(), Some(DEFAULT_EDGE_LABEL));
}

#[test]
fn test_custom_default_labels() {
    let handler = GdlHandler::builder()
        .set_default_graph_label("Graph")
        .set_default_vertex_label("Node")
        .set_default_edge_label("Link")
        .build_from_string("g[(v)-[e]->(w)]")
        .unwrap();

    assert_eq!(handler.graph_cache()["g"].label.as_deref(), Some("Graph"));
    assert_eq!(handler.vertex_cache()["v"].label.as_deref(), Some("Node"));
    assert_eq!(handler.edge_cache()["e"].label.as_deref(), Some("Link"));
}

#[test]
fn test_disabled_default_labels() {
    let mut handler = GdlHandler::builder()
        .disable_default_graph_label()
        .disable_default_vertex_label()
        .disable_default_edge_label()
        .build_from_string("g[(v)-[e]->(w)]")
        .unwrap();

    assert_eq!(handler.graph_cache()["g"].label, None);
    assert_eq!(handler.vertex_cache()["v"].label, None);
    assert_eq!(handler.edge_cache()["e"].label, None);
    // Explicit labels are untouched by the policy.
    handler.append("(p:Person)").unwrap();
    assert_eq!(handler.vertex_cache()["p"].label.as_deref(), Some("Person"));
}

#[test]
fn test_property_value_types() {
    let handler = load(
        "(v {s: \"str\", i: 42, l: 1337L, f: 3.14f, d: 2.5d, t: true, f2: false, n: NULL, neg: -7})",
    );

    let v = &handler.vertices()[0];
    assert_eq!(v.get("s"), Some(&Value::String("str".into())));
    assert_eq!(v.get("i"), Some(&Value::Int(42)));
    assert_eq!(v.get("l"), Some(&Value::Int(1337)));
    assert_eq!(v.get("f"), Some(&Value::Float(3.14)));
    assert_eq!(v.get("d"), Some(&Value::Float(2.5)));
    assert_eq!(v.get("t"), Some(&Value::Bool(true)));
    assert_eq!(v.get("f2"), Some(&Value::Bool(false)));
    assert_eq!(v.get("n"), Some(&Value::Null));
    assert_eq!(v.get("neg"), Some(&Value::Int(-7)));
}

#[test]
fn test_edge_length_bounds() {
    let handler = load("(a)-[e1:knows*2..5]->(b)-[e2*3]->(c)-[e3*..4]->(d)-[e4*]->(f)");

    let edges = handler.edge_cache();
    assert_eq!(edges["e1"].length, Some(EdgeLength { lower: Some(2), upper: Some(5) }));
    assert_eq!(edges["e2"].length, Some(EdgeLength { lower: Some(3), upper: Some(3) }));
    assert_eq!(edges["e3"].length, Some(EdgeLength { lower: None, upper: Some(4) }));
    assert_eq!(edges["e4"].length, Some(EdgeLength { lower: None, upper: None }));
    assert_eq!(edges["e1"].label.as_deref(), Some("knows"));
}

#[test]
fn test_ids_are_unique_per_kind_and_continuous() {
    let handler = load("g1[(a)-[e]->(b)], g2[(c)]");

    let graph_ids: Vec<u64> = handler.graphs().iter().map(|g| g.id.0).collect();
    let vertex_ids: Vec<u64> = handler.vertices().iter().map(|v| v.id.0).collect();
    assert_eq!(graph_ids, vec![0, 1]);
    assert_eq!(vertex_ids, vec![0, 1, 2]);
    assert_eq!(handler.edges()[0].id.0, 0);
}

#[test]
fn test_custom_id_suppliers() {
    let handler = GdlHandler::builder()
        .set_next_graph_id(ContinuousId::starting_at(10))
        .set_next_vertex_id(ContinuousId::starting_at(100))
        .set_next_edge_id(ContinuousId::starting_at(1000))
        .build_from_string("g[(a)-[e]->(b)]")
        .unwrap();

    assert_eq!(handler.graphs()[0].id.0, 10);
    assert_eq!(handler.vertices()[0].id.0, 100);
    assert_eq!(handler.edges()[0].id.0, 1000);
}

#[test]
fn test_closure_id_supplier() {
    let mut next = 7u64;
    let handler = GdlHandler::builder()
        .set_next_vertex_id(move || {
            let id = next;
            next += 2;
            id
        })
        .build_from_string("(a)-->(b)")
        .unwrap();

    let ids: Vec<u64> = handler.vertices().iter().map(|v| v.id.0).collect();
    assert_eq!(ids, vec![7, 9]);
}

#[test]
fn test_append_continues_bindings_and_ids() {
    let mut handler = load("(a)-->(b)");
    handler.append("(a)-->(c)").unwrap();

    assert_eq!(handler.vertices().len(), 3);
    assert_eq!(handler.edges().len(), 2);
    let ids: Vec<u64> = handler.vertices().iter().map(|v| v.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_cache_partitions() {
    let handler = load("(a)-->()-->(b)");

    // Default view: user-defined names only.
    let user = handler.vertex_cache();
    assert_eq!(user.len(), 2);
    assert!(user.contains_key("a") && user.contains_key("b"));

    let auto = handler.vertex_cache_filtered(false, true);
    assert_eq!(auto.len(), 1);
    assert!(auto.keys().all(|k| k.starts_with("__v")));

    let all = handler.vertex_cache_filtered(true, true);
    assert_eq!(all.len(), 3);

    assert!(handler.vertex_cache_filtered(false, false).is_empty());
}

#[test]
fn test_anonymous_edges_land_in_auto_cache() {
    let handler = load("(a)-->(b)-[e]->(c)");

    assert_eq!(handler.edge_cache().len(), 1);
    let auto = handler.edge_cache_filtered(false, true);
    assert_eq!(auto.len(), 1);
    assert!(auto.keys().all(|k| k.starts_with("__e")));
}

#[test]
fn test_semicolon_separators() {
    let handler = load("(a); (b); (c)");
    assert_eq!(handler.vertices().len(), 3);
}

#[test]
fn test_comments_and_whitespace() {
    let handler = load(
        "// leading comment\n(a)-->(b) /* block\ncomment */ , (c)\n// trailing",
    );
    assert_eq!(handler.vertices().len(), 3);
}
