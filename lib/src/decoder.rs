//! Assembles `Triple` and `TriplePattern` values from the scanner's token
//! stream, one `.`-terminated statement per call.
//!
//! A malformed statement discards the rest of its line before the error is
//! returned, so callers can keep calling [`Decoder::decode`] to pick up at the
//! next line.

use crate::errors::{Error, Result};
use crate::node::{BlankNode, Literal, NamedNode, Node, Object, Subject, Triple, TriplePattern, Variable};
use crate::scanner::{Scanner, Token, TokenKind};
use log::trace;
use std::fmt;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Subject,
    Predicate,
    Object,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Subject => f.write_str("subject"),
            Role::Predicate => f.write_str("predicate"),
            Role::Object => f.write_str("object"),
        }
    }
}

pub struct Decoder<R> {
    scanner: Scanner<R>,
    peeked: Option<Token>,
    last: TokenKind,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            scanner: Scanner::new(reader),
            peeked: None,
            last: TokenKind::Eol,
        }
    }

    /// Row and column of the most recently scanned token.
    pub fn position(&self) -> (usize, usize) {
        (self.scanner.row(), self.scanner.col())
    }

    /// Decodes the next triple. `Ok(None)` marks the end of input.
    pub fn decode(&mut self) -> Result<Option<Triple>> {
        let Some((s, p, o)) = self.statement(false)? else {
            return Ok(None);
        };
        let subject = Subject::try_from(s).map_err(|n| self.unexpected(Role::Subject, &n))?;
        let predicate = match p {
            Node::Named(n) => n,
            other => return Err(self.unexpected(Role::Predicate, &other)),
        };
        let object = Object::try_from(o).map_err(|n| self.unexpected(Role::Object, &n))?;
        Ok(Some(Triple {
            subject,
            predicate,
            object,
        }))
    }

    /// Decodes the next pattern; `?name` is accepted in every position.
    pub fn decode_pattern(&mut self) -> Result<Option<TriplePattern>> {
        match self.statement(true)? {
            Some((s, p, o)) => TriplePattern::new(s, p, o).map(Some),
            None => Ok(None),
        }
    }

    /// Iterates over the remaining statements as patterns.
    pub fn patterns(&mut self) -> Patterns<'_, R> {
        Patterns { decoder: self }
    }

    fn next_token(&mut self) -> Token {
        let token = self.peeked.take().unwrap_or_else(|| self.scanner.scan());
        self.last = token.kind;
        token
    }

    fn statement(&mut self, variables: bool) -> Result<Option<(Node, Node, Node)>> {
        let first = loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Eol => continue,
                TokenKind::Eof => return Ok(None),
                _ => break token,
            }
        };
        let result = self.parse_statement(first, variables);
        if let Err(e) = &result {
            trace!("discarding rest of line after error: {}", e);
            self.recover();
        }
        result.map(Some)
    }

    fn parse_statement(&mut self, first: Token, variables: bool) -> Result<(Node, Node, Node)> {
        let subject = self.node(first, Role::Subject, variables)?;
        let token = self.next_token();
        let predicate = self.node(token, Role::Predicate, variables)?;
        let token = self.next_token();
        let object = self.node(token, Role::Object, variables)?;
        let token = self.next_token();
        if token.kind != TokenKind::Dot {
            return Err(self.syntax(format!("expected dot, got {}", token.kind)));
        }
        Ok((subject, predicate, object))
    }

    fn node(&mut self, token: Token, role: Role, variables: bool) -> Result<Node> {
        match (token.kind, role) {
            (TokenKind::Illegal, _) => Err(Error::Lexical {
                row: self.scanner.row(),
                col: self.scanner.col(),
                message: format!("error parsing {}: {}", role, self.scanner.error()),
            }),
            (TokenKind::Uri, _) => NamedNode::new(token.text)
                .map(Node::Named)
                .map_err(|e| self.syntax(format!("error parsing {}: {}", role, e))),
            (TokenKind::BNode, Role::Subject | Role::Object) => BlankNode::new(token.text)
                .map(Node::Blank)
                .map_err(|e| self.syntax(format!("error parsing {}: {}", role, e))),
            (TokenKind::Variable, _) if variables => Variable::new(token.text)
                .map(Node::Variable)
                .map_err(|e| self.syntax(format!("error parsing {}: {}", role, e))),
            (TokenKind::Literal, Role::Object) => self.literal(token.text).map(Node::Literal),
            (kind, _) => Err(self.syntax(format!("error parsing {}: unexpected {}", role, kind))),
        }
    }

    fn literal(&mut self, value: String) -> Result<Literal> {
        let token = self.next_token();
        match token.kind {
            TokenKind::LangTag => Literal::new_language_tagged(value, token.text)
                .map_err(|e| self.syntax(format!("error parsing object: {}", e))),
            TokenKind::TypeMarker => {
                let datatype = self.next_token();
                if datatype.kind != TokenKind::Uri {
                    return Err(self.syntax(format!(
                        "error parsing object: expected datatype URI, got {}",
                        datatype.kind
                    )));
                }
                let datatype = NamedNode::new(datatype.text)
                    .map_err(|e| self.syntax(format!("error parsing object: {}", e)))?;
                Ok(Literal::new_typed(value, datatype))
            }
            _ => {
                self.peeked = Some(token);
                self.last = TokenKind::Literal;
                Ok(Literal::new_simple(value))
            }
        }
    }

    fn recover(&mut self) {
        if let Some(token) = self.peeked.take() {
            self.last = token.kind;
        }
        if !matches!(self.last, TokenKind::Eol | TokenKind::Eof) {
            self.scanner.skip_line();
        }
        self.last = TokenKind::Eol;
    }

    fn syntax(&self, message: String) -> Error {
        Error::Syntax {
            row: self.scanner.row(),
            col: self.scanner.col(),
            message,
        }
    }

    fn unexpected(&self, role: Role, node: &Node) -> Error {
        self.syntax(format!("error parsing {}: unexpected {}", role, node))
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode().transpose()
    }
}

pub struct Patterns<'a, R> {
    decoder: &'a mut Decoder<R>,
}

impl<R: BufRead> Iterator for Patterns<'_, R> {
    type Item = Result<TriplePattern>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.decode_pattern().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{TYPE, XSD_INTEGER};
    use crate::node::PatternTerm;

    fn decode_all(input: &str) -> Vec<Result<Triple>> {
        Decoder::new(input.as_bytes()).collect()
    }

    #[test]
    fn test_decode_basic() {
        let mut d = Decoder::new(
            "<http://ex.org/s> <http://ex.org/p> \"o\" .\n<http://ex.org/s> a _:b .\n".as_bytes(),
        );
        let t = d.decode().unwrap().unwrap();
        assert_eq!(t.object, Object::Literal(Literal::new_simple("o")));
        let t = d.decode().unwrap().unwrap();
        assert_eq!(t.predicate, TYPE);
        assert_eq!(t.object, Object::Blank(BlankNode::new("b").unwrap()));
        assert_eq!(d.decode().unwrap(), None);
        assert_eq!(d.decode().unwrap(), None);
    }

    #[test]
    fn test_decode_typed_and_tagged() {
        let triples = decode_all(
            "<http://ex.org/s> <http://ex.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
             <http://ex.org/s> <http://ex.org/p> \"en\"@en.\n",
        );
        assert_eq!(triples.len(), 2);
        let first = triples[0].as_ref().unwrap();
        assert_eq!(first.object, Object::Literal(Literal::new_typed("1", XSD_INTEGER)));
        let second = triples[1].as_ref().unwrap();
        assert_eq!(
            second.object,
            Object::Literal(Literal::new_language_tagged("en", "en").unwrap())
        );
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let triples = decode_all("\n\n# comment\n<http://ex.org/s> <http://ex.org/p> <http://ex.org/o> . # tail\n\n");
        assert_eq!(triples.len(), 1);
        assert!(triples[0].is_ok());
    }

    #[test]
    fn test_recovers_after_bad_line() {
        let input = "<http://ex.org/s> \"lit\" <http://ex.org/o> .\n\
                     <http://ex.org/s> <http://ex.org/p> <http://ex.org/o> .\n\
                     <http://ex.org/s> <http://ex.org/p> <http://ex.org/o>\n\
                     <http://ex.org/s> <http://ex.org/p> \"unterminated .\n\
                     _:a <http://ex.org/p> _:b .\n";
        let results = decode_all(input);
        assert_eq!(results.len(), 5);
        match &results[0] {
            Err(Error::Syntax { row, message, .. }) => {
                assert_eq!(*row, 1);
                assert!(message.starts_with("error parsing predicate"), "{}", message);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(results[1].is_ok());
        match &results[2] {
            Err(Error::Syntax { message, .. }) => assert_eq!(message, "expected dot, got EOL"),
            other => panic!("unexpected {:?}", other),
        }
        match &results[3] {
            Err(Error::Lexical { row, message, .. }) => {
                assert_eq!(*row, 4);
                assert_eq!(message, "error parsing object: unterminated Literal");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(results[4].is_ok());
    }

    #[test]
    fn test_lexical_error_position() {
        let mut d = Decoder::new("<http://ex.org/s> <http://ex.org/p> \"open\n; .\n".as_bytes());
        match d.decode() {
            Err(Error::Lexical { row, col, message }) => {
                assert_eq!((row, col), (1, 36));
                assert_eq!(message, "error parsing object: unterminated Literal");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(d.position(), (1, 36));
        // a stray `;` is consumed and reported, not rescanned forever
        assert!(matches!(d.decode(), Err(Error::Lexical { row: 2, col: 1, .. })));
        assert_eq!(d.decode().unwrap(), None);
    }

    #[test]
    fn test_variables_only_in_patterns() {
        let input = "?s <http://ex.org/p> ?o .\n";
        let err = Decoder::new(input.as_bytes()).decode().unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));

        let p = Decoder::new(input.as_bytes())
            .decode_pattern()
            .unwrap()
            .unwrap();
        assert!(p.subject.is_variable());
        assert!(matches!(p.predicate, PatternTerm::Term(_)));
        assert_eq!(p.object.variable().map(|v| v.as_str()), Some("o"));
    }

    #[test]
    fn test_invalid_iri() {
        let err = Decoder::new("<http://ex.org/a b> <http://ex.org/p> <http://ex.org/o> .".as_bytes())
            .decode()
            .unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
