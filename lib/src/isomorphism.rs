//! Graph equality up to blank node renaming.
//!
//! Triples without blank nodes must match exactly. Blank nodes are compared
//! through a signature built from their edges, with neighbouring blank nodes
//! rendered anonymously. This is not a general isomorphism test: two blank
//! nodes with identical signatures but different positions in a larger blank
//! structure are not told apart.

use crate::graph::{Graph, NodeId};
use crate::node::Node;
use crate::options::SignatureMode;
use log::trace;
use std::collections::HashSet;

impl Graph {
    /// Isomorphism check with incoming and outgoing edges in the signatures.
    pub fn is_isomorphic(&self, other: &Graph) -> bool {
        self.is_isomorphic_with(other, SignatureMode::default())
    }

    pub fn is_isomorphic_with(&self, other: &Graph, mode: SignatureMode) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut ours = HashSet::new();
        let mut theirs = HashSet::new();
        if !ground_triples_in(self, other, &mut ours) || !ground_triples_in(other, self, &mut theirs) {
            return false;
        }
        if ours.len() != theirs.len() {
            return false;
        }
        let mut a: Vec<String> = ours.iter().map(|&id| signature(self, id, mode)).collect();
        let mut b: Vec<String> = theirs.iter().map(|&id| signature(other, id, mode)).collect();
        a.sort_unstable();
        b.sort_unstable();
        trace!("comparing {} blank node signatures", a.len());
        a == b
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.is_isomorphic(other)
    }
}

impl Eq for Graph {}

/// Checks every blank-free triple of `a` is in `b`, collecting `a`'s blank
/// nodes along the way.
fn ground_triples_in(a: &Graph, b: &Graph, blanks: &mut HashSet<NodeId>) -> bool {
    for (&s, by_p) in &a.spo {
        for (&p, objects) in by_p {
            for &o in objects {
                let (Some(sn), Some(pn), Some(on)) = (a.node(s), a.node(p), a.node(o)) else {
                    return false;
                };
                let mut has_blank = false;
                if sn.is_blank() {
                    blanks.insert(s);
                    has_blank = true;
                }
                if on.is_blank() {
                    blanks.insert(o);
                    has_blank = true;
                }
                if has_blank {
                    continue;
                }
                let found = match (b.id_of(sn), b.id_of(pn), b.id_of(on)) {
                    (Some(x), Some(y), Some(z)) => b.has_ids(x, y, z),
                    _ => false,
                };
                if !found {
                    return false;
                }
            }
        }
    }
    true
}

fn render(graph: &Graph, id: NodeId) -> String {
    match graph.node(id) {
        Some(Node::Blank(_)) => "_:".to_string(),
        Some(node) => node.to_string(),
        None => String::new(),
    }
}

fn signature(graph: &Graph, id: NodeId, mode: SignatureMode) -> String {
    let mut parts = Vec::new();
    if let Some(by_p) = graph.spo.get(&id) {
        for (&p, objects) in by_p {
            for &o in objects {
                parts.push(format!("{}{}", render(graph, p), render(graph, o)));
            }
        }
    }
    if mode.includes_incoming() {
        if let Some(by_s) = graph.osp.get(&id) {
            for (&s, preds) in by_s {
                for &p in preds {
                    parts.push(format!("^{}{}", render(graph, p), render(graph, s)));
                }
            }
        }
    }
    parts.sort_unstable();
    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BlankNode, Literal, NamedNode, Triple};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(format!("http://ex.org/{}", s)).unwrap()
    }

    fn bnode(s: &str) -> BlankNode {
        BlankNode::new(s).unwrap()
    }

    #[test]
    fn test_incoming_edges_matter_only_when_enabled() {
        // same outgoing edges, but the blank node is referenced by different subjects
        let g1: Graph = vec![
            Triple::new(bnode("x"), iri("p"), Literal::new_simple("v")),
            Triple::new(iri("a"), iri("has"), bnode("x")),
        ]
        .into_iter()
        .collect();
        let g2: Graph = vec![
            Triple::new(bnode("y"), iri("p"), Literal::new_simple("v")),
            Triple::new(iri("b"), iri("has"), bnode("y")),
        ]
        .into_iter()
        .collect();
        assert!(g1.is_isomorphic_with(&g2, SignatureMode::Outgoing));
        assert!(!g1.is_isomorphic_with(&g2, SignatureMode::Bidirectional));
    }

    #[test]
    fn test_blank_count_must_match() {
        let g1: Graph = vec![
            Triple::new(bnode("x"), iri("p"), iri("o")),
            Triple::new(bnode("x"), iri("q"), iri("o")),
        ]
        .into_iter()
        .collect();
        let g2: Graph = vec![
            Triple::new(bnode("x"), iri("p"), iri("o")),
            Triple::new(bnode("y"), iri("q"), iri("o")),
        ]
        .into_iter()
        .collect();
        assert_ne!(g1, g2);
    }
}
