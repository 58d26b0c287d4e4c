//! Defines constant NamedNodes for the handful of RDF and XSD terms the
//! decoder and literal model need to know about.

use crate::node::NamedNode;

pub const TYPE: NamedNode =
    NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const LANG_STRING: NamedNode =
    NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

// xsd
pub const XSD_STRING: NamedNode =
    NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#string");
pub const XSD_INTEGER: NamedNode =
    NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#integer");
pub const XSD_BOOLEAN: NamedNode =
    NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#boolean");
pub const XSD_DATE: NamedNode = NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#date");
