use rdfgraph::{BlankNode, Decoder, Graph, Literal, NamedNode, Node, Triple};

fn iri(s: &str) -> NamedNode {
    NamedNode::new(format!("http://ex.org/{}", s)).unwrap()
}

fn parse(doc: &str) -> Vec<Triple> {
    Decoder::new(doc.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn mutual_knows_stats() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut g = Graph::new();
    let added = g.insert(parse(
        "<http://ex.org/h1> <http://ex.org/knows> <http://ex.org/h2> .\n\
         <http://ex.org/h2> <http://ex.org/knows> <http://ex.org/h1> .\n",
    ));
    assert_eq!(added, 2);
    let stats = g.stats();
    assert_eq!(stats.num_triples, 2);
    assert_eq!(stats.num_subjects, 2);
    assert_eq!(stats.num_objects, 2);
    assert_eq!(stats.num_predicates, 1);
    assert_eq!(stats.num_nodes, 3);
    assert_eq!(g.size(), 3);
    assert_eq!(stats.predicates.get("http://ex.org/knows"), Some(&2));

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["num_triples"], 2);
}

#[test]
fn insert_is_idempotent_for_ground_triples() {
    let mut g = Graph::new();
    let t = Triple::new(iri("s"), iri("p"), Literal::new_simple("o"));
    assert_eq!(g.insert([&t, &t]), 1);
    assert_eq!(g.insert([&t]), 0);
    assert_eq!(g.len(), 1);
    assert!(g.contains(&t));
}

#[test]
fn blank_labels_are_scoped_per_insert() {
    let mut g = Graph::new();
    let t = Triple::new(BlankNode::new("x").unwrap(), iri("p"), iri("o"));
    g.insert([&t, &t]);
    assert_eq!(g.len(), 1);
    g.insert([&t]);
    // the second call's `_:x` is a fresh node
    assert_eq!(g.len(), 2);
    assert_eq!(g.stats().num_blank, 2);

    // stored labels belong to the graph, not to the input
    for triple in g.iter() {
        match Node::from(triple.subject) {
            Node::Blank(b) => assert_ne!(b.as_str(), "x"),
            other => panic!("expected blank subject, got {}", other),
        }
    }
}

#[test]
fn delete_purges_orphaned_nodes() {
    let mut g = Graph::new();
    g.insert(parse(
        "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n\
         <http://ex.org/a> <http://ex.org/q> \"lit\" .\n",
    ));
    assert_eq!(g.size(), 5);

    let removed = g.delete(parse("<http://ex.org/a> <http://ex.org/q> \"lit\" .\n"));
    assert_eq!(removed, 1);
    assert_eq!(g.len(), 1);
    assert_eq!(g.size(), 3);
    assert_eq!(g.id_of(&Node::Literal(Literal::new_simple("lit"))), None);
    assert!(g.id_of(&Node::Named(iri("a"))).is_some());

    // deleting again is a no-op
    assert_eq!(g.delete(parse("<http://ex.org/a> <http://ex.org/q> \"lit\" .\n")), 0);

    g.delete(parse("<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n"));
    assert!(g.is_empty());
    assert_eq!(g.size(), 0);
    assert!(g.triples().is_empty());
}

#[test]
fn delete_skips_triples_with_blank_nodes() {
    let doc = "<http://ex.org/b1> <http://ex.org/contributor> _:x .\n";
    let mut g = Graph::new();
    g.insert(parse(doc));
    assert_eq!(g.delete(parse(doc)), 0);
    assert_eq!(g.len(), 1);

    // even when addressed by the graph's own label
    let stored = g.triples();
    assert_eq!(g.delete(&stored), 0);
    assert_eq!(g.len(), 1);
}

#[test]
fn node_ids_are_not_reused() {
    let mut g = Graph::new();
    let t1 = Triple::new(iri("a"), iri("p"), iri("b"));
    let t2 = Triple::new(iri("c"), iri("p"), iri("d"));
    g.insert([&t1]);
    let b = g.id_of(&Node::Named(iri("b"))).unwrap();
    g.delete([&t1]);
    g.insert([&t2]);
    let d = g.id_of(&Node::Named(iri("d"))).unwrap();
    assert!(d > b);
    assert_eq!(g.node(d), Some(&Node::Named(iri("d"))));
}
