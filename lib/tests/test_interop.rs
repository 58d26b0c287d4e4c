#![cfg(feature = "oxigraph")]

use oxigraph::io::{RdfFormat, RdfParser};
use rdfgraph::util::parse_graph;
use rdfgraph::{Config, Graph};

// strict N-Triples has no `a` shorthand
fn fixture() -> String {
    std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/formats.nt"))
        .unwrap()
        .replace(" a <", " <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <")
}

#[test]
fn agrees_with_oxigraph_parser() {
    let doc = fixture();
    let (ours, _) = parse_graph(doc.as_bytes(), &Config::default()).unwrap();

    let mut theirs = oxigraph::model::Graph::new();
    for quad in RdfParser::from_format(RdfFormat::NTriples).for_reader(doc.as_bytes()) {
        let quad = quad.unwrap();
        theirs.insert(&oxigraph::model::Triple::new(quad.subject, quad.predicate, quad.object));
    }
    assert_eq!(theirs.len(), ours.len());

    let converted = Graph::from_oxigraph_graph(&theirs).unwrap();
    assert_eq!(converted, ours);
}

#[test]
fn converts_back_and_forth() {
    let (graph, _) = parse_graph(fixture().as_bytes(), &Config::default()).unwrap();
    let ox = graph.to_oxigraph_graph();
    assert_eq!(ox.len(), graph.len());
    assert_eq!(Graph::from_oxigraph_graph(&ox).unwrap(), graph);
}
