//! Conversions to and from `oxigraph::model`, enabled by the `oxigraph`
//! feature.

use crate::errors::{Error, Result};
use crate::graph::Graph;
use crate::node::{BlankNode, Literal, NamedNode, Object, Subject, Triple};
use ::oxigraph::model as ox;

fn named_to_ox(n: &NamedNode) -> ox::NamedNode {
    ox::NamedNode::new_unchecked(n.as_str())
}

fn literal_to_ox(l: &Literal) -> ox::Literal {
    match l.language() {
        Some(lang) => ox::Literal::new_language_tagged_literal_unchecked(l.value(), lang),
        None => ox::Literal::new_typed_literal(l.value(), named_to_ox(l.datatype())),
    }
}

pub fn to_oxigraph(triple: &Triple) -> ox::Triple {
    let subject: ox::NamedOrBlankNode = match &triple.subject {
        Subject::Named(n) => named_to_ox(n).into(),
        Subject::Blank(b) => ox::BlankNode::new_unchecked(b.as_str()).into(),
    };
    let object: ox::Term = match &triple.object {
        Object::Named(n) => named_to_ox(n).into(),
        Object::Blank(b) => ox::BlankNode::new_unchecked(b.as_str()).into(),
        Object::Literal(l) => literal_to_ox(l).into(),
    };
    ox::Triple::new(subject, named_to_ox(&triple.predicate), object)
}

fn blank_from_ox(b: ox::BlankNodeRef<'_>) -> Result<BlankNode> {
    BlankNode::new(b.as_str())
}

#[allow(unreachable_patterns)]
pub fn from_oxigraph(triple: ox::TripleRef<'_>) -> Result<Triple> {
    let subject = match triple.subject {
        ox::NamedOrBlankNodeRef::NamedNode(n) => Subject::Named(NamedNode::new(n.as_str())?),
        ox::NamedOrBlankNodeRef::BlankNode(b) => Subject::Blank(blank_from_ox(b)?),
        other => return Err(Error::UnsupportedTerm(other.to_string())),
    };
    let predicate = NamedNode::new(triple.predicate.as_str())?;
    let object = match triple.object {
        ox::TermRef::NamedNode(n) => Object::Named(NamedNode::new(n.as_str())?),
        ox::TermRef::BlankNode(b) => Object::Blank(blank_from_ox(b)?),
        ox::TermRef::Literal(l) => Object::Literal(match l.language() {
            Some(lang) => Literal::new_language_tagged(l.value(), lang)?,
            None => Literal::new_typed(l.value(), NamedNode::new(l.datatype().as_str())?),
        }),
        other => return Err(Error::UnsupportedTerm(other.to_string())),
    };
    Ok(Triple {
        subject,
        predicate,
        object,
    })
}

impl Graph {
    pub fn to_oxigraph_graph(&self) -> ox::Graph {
        let mut graph = ox::Graph::new();
        for triple in self.iter() {
            graph.insert(&to_oxigraph(&triple));
        }
        graph
    }

    /// Copies an oxigraph graph. Its blank node labels form one scope.
    pub fn from_oxigraph_graph(graph: &ox::Graph) -> Result<Graph> {
        let triples = graph
            .iter()
            .map(from_oxigraph)
            .collect::<Result<Vec<_>>>()?;
        let mut out = Graph::new();
        out.insert(&triples);
        Ok(out)
    }
}
