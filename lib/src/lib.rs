//! rdfgraph: N-Triples decoding and encoding, an indexed in-memory triple
//! store, basic graph pattern queries and graph isomorphism.
//!
//! Quick start: load a document and query it
//!
//! ```
//! use rdfgraph::{Decoder, Graph, Node, Triple};
//! use rdfgraph::util::parse_patterns;
//!
//! let doc = "<http://ex.org/alice> <http://ex.org/knows> <http://ex.org/bob> .\n";
//! let triples = Decoder::new(doc.as_bytes())
//!     .collect::<Result<Vec<Triple>, _>>()
//!     .unwrap();
//! let mut graph = Graph::new();
//! graph.insert(&triples);
//!
//! let patterns = parse_patterns("?who <http://ex.org/knows> <http://ex.org/bob> .").unwrap();
//! let rows = graph.select(&["who"], &patterns);
//! assert_eq!(rows.len(), 1);
//! assert!(matches!(&rows[0][0], Node::Named(n) if n.as_str() == "http://ex.org/alice"));
//! ```
//!
//! Graphs compare equal when they are isomorphic up to blank node labels:
//!
//! ```
//! use rdfgraph::util::parse_graph;
//! use rdfgraph::Config;
//!
//! let a = "_:x <http://ex.org/p> \"v\" .\n";
//! let b = "_:y <http://ex.org/p> \"v\" .\n";
//! let (ga, _) = parse_graph(a.as_bytes(), &Config::default()).unwrap();
//! let (gb, _) = parse_graph(b.as_bytes(), &Config::default()).unwrap();
//! assert_eq!(ga, gb);
//! ```

pub mod config;
pub mod consts;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod graph;
#[cfg(feature = "oxigraph")]
pub mod interop;
pub mod isomorphism;
pub mod node;
pub mod options;
pub mod query;
pub mod scanner;
pub mod util;

pub use config::Config;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use errors::{Error, Result};
pub use graph::{Graph, NodeId, Stats};
pub use node::{
    BlankNode, Literal, NamedNode, Node, Object, PatternTerm, Subject, Triple, TriplePattern,
    Variable,
};
pub use options::{ErrorPolicy, SignatureMode};
pub use query::selectivity;
