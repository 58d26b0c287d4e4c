//! Convenience helpers for loading and writing whole N-Triples documents.

use crate::config::Config;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::errors::Error;
use crate::graph::Graph;
use crate::node::TriplePattern;
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

/// Outcome of a bulk load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Statements decoded successfully.
    pub decoded: usize,
    /// Triples that were new to the graph.
    pub inserted: usize,
    /// Malformed statements that were skipped.
    pub errors: Vec<Error>,
}

/// Decodes a whole document into a new graph. The document is one blank
/// node scope.
pub fn parse_graph<R: BufRead>(reader: R, config: &Config) -> Result<(Graph, LoadReport)> {
    let mut report = LoadReport::default();
    let mut triples = Vec::new();
    for result in Decoder::new(reader) {
        match result {
            Ok(triple) => triples.push(triple),
            Err(e) if config.error_policy.is_abort() => return Err(e.into()),
            Err(e) => {
                warn!("skipping malformed statement: {}", e);
                report.errors.push(e);
                if let Some(max) = config.max_errors {
                    if report.errors.len() > max {
                        return Err(anyhow!(
                            "giving up after {} malformed statements",
                            report.errors.len()
                        ));
                    }
                }
            }
        }
    }
    report.decoded = triples.len();
    let mut graph = Graph::new();
    report.inserted = graph.insert(&triples);
    info!(
        "loaded {} triples ({} skipped statements)",
        report.inserted,
        report.errors.len()
    );
    Ok((graph, report))
}

pub fn read_file(file: &Path) -> Result<Graph> {
    debug!("Reading file: {}", file.display());
    let reader = BufReader::new(File::open(file)?);
    let (graph, _) = parse_graph(reader, &Config::default())?;
    Ok(graph)
}

/// Parses query patterns, one per line.
pub fn parse_patterns(text: &str) -> Result<Vec<TriplePattern>> {
    let patterns = Decoder::new(text.as_bytes())
        .patterns()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(patterns)
}

pub fn write_graph_to_file(graph: &Graph, file: &Path) -> Result<()> {
    info!(
        "Writing graph to file: {} with length {}",
        file.display(),
        graph.len()
    );
    let mut encoder = Encoder::new(BufWriter::new(File::create(file)?));
    encoder.encode_graph(graph)?;
    encoder.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ErrorPolicy;

    const DOC: &str = "<http://ex.org/s> <http://ex.org/p> \"ok\" .\n\
                       <http://ex.org/s> \"bad\" <http://ex.org/o> .\n\
                       _:b <http://ex.org/p> <http://ex.org/s> .\n\
                       _:b <http://ex.org/q> <http://ex.org/s> .\n";

    #[test]
    fn test_parse_graph_skips_bad_lines() {
        let (graph, report) = parse_graph(DOC.as_bytes(), &Config::default()).unwrap();
        assert_eq!(report.decoded, 3);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].position().map(|(row, _)| row), Some(2));
        // both `_:b` occurrences are one node
        assert_eq!(graph.stats().num_blank, 1);
    }

    #[test]
    fn test_parse_graph_strict() {
        let config = Config {
            error_policy: ErrorPolicy::Abort,
            ..Default::default()
        };
        assert!(parse_graph(DOC.as_bytes(), &config).is_err());

        let config = Config {
            max_errors: Some(0),
            ..Default::default()
        };
        assert!(parse_graph(DOC.as_bytes(), &config).is_err());
    }
}
