//! Serializes triples and patterns back to N-Triples text, one
//! `subject predicate object .` statement per line.

use crate::graph::Graph;
use crate::node::{Triple, TriplePattern};
use std::io::{self, Write};

pub struct Encoder<W: Write> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn encode(&mut self, triple: &Triple) -> io::Result<()> {
        writeln!(self.writer, "{}", triple)
    }

    /// Writes a pattern, rendering variables as `?name`.
    pub fn encode_pattern(&mut self, pattern: &TriplePattern) -> io::Result<()> {
        writeln!(self.writer, "{}", pattern)
    }

    /// Writes every triple of `graph`, sorted so the output is deterministic.
    pub fn encode_graph(&mut self, graph: &Graph) -> io::Result<usize> {
        let mut triples = graph.triples();
        triples.sort();
        for t in &triples {
            self.encode(t)?;
        }
        Ok(triples.len())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
