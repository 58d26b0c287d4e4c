//! Defines the RDF term model: named nodes, blank nodes, literals and query
//! variables, together with the role-restricted `Subject`/`Object` unions used
//! by `Triple` and the `PatternTerm` wrapper used by `TriplePattern`.

use crate::consts::{LANG_STRING, XSD_STRING};
use crate::errors::{Error, Result};
use std::borrow::Cow;
use std::fmt;

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode {
    iri: Cow<'static, str>,
}

impl NamedNode {
    /// Builds a named node, rejecting spaces, control characters, angle
    /// brackets, quotes, braces, pipes, carets, backticks and backslashes.
    pub fn new(iri: impl Into<String>) -> Result<Self> {
        let iri = iri.into();
        if let Some(character) = iri.chars().find(|c| is_forbidden_iri_char(*c)) {
            return Err(Error::InvalidIri { iri, character });
        }
        Ok(Self {
            iri: Cow::Owned(iri),
        })
    }

    /// Builds a named node without validation. Meant for constants.
    pub const fn new_unchecked(iri: &'static str) -> Self {
        Self {
            iri: Cow::Borrowed(iri),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }

    pub fn into_string(self) -> String {
        self.iri.into_owned()
    }
}

fn is_forbidden_iri_char(c: char) -> bool {
    c <= '\u{20}' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// A blank node with a label local to one document or one `Graph::insert` call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    /// Labels must read back unchanged after `_:`: no whitespace, none of
    /// `< " ; ,` and no trailing `.`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty()
            || id.ends_with('.')
            || id
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '<' | '"' | ';' | ','))
        {
            return Err(Error::InvalidBlankNode(id));
        }
        Ok(Self { id })
    }

    /// Graph-generated labels are known to be valid.
    pub(crate) fn new_unchecked(id: String) -> Self {
        Self { id }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

/// A literal value. The datatype is always set: plain literals carry
/// `xsd:string` and language-tagged ones carry `rdf:langString`, so a plain
/// literal and an explicitly `xsd:string`-typed one compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: NamedNode,
}

impl Literal {
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: XSD_STRING,
        }
    }

    pub fn new_language_tagged(value: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        let language = language.into();
        if !is_valid_language_tag(&language) {
            return Err(Error::InvalidLanguageTag(language));
        }
        Ok(Self {
            value: value.into(),
            language: Some(language),
            datatype: LANG_STRING,
        })
    }

    pub fn new_typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    /// True for `xsd:string` literals without a language tag.
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype == XSD_STRING
    }
}

/// Accepts `[a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`.
pub(crate) fn is_valid_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary = parts.next().unwrap_or_default();
    !primary.is_empty()
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

pub(crate) fn escape_literal(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut escaped = String::with_capacity(self.value.len() + 2);
        escape_literal(&self.value, &mut escaped);
        write!(f, "\"{}\"", escaped)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if self.datatype != XSD_STRING {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

/// A named placeholder, valid only inside a `TriplePattern`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidVariable(name));
        }
        Ok(Self { name })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// Any RDF term, or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
    Variable(Variable),
}

impl Node {
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Node::Variable(_))
    }

    /// Compares two terms as abstract RDF nodes: any two blank nodes are
    /// interchangeable, everything else compares by value.
    pub fn equivalent(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Blank(_), Node::Blank(_)) => true,
            _ => self == other,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Named(n) => n.fmt(f),
            Node::Blank(b) => b.fmt(f),
            Node::Literal(l) => l.fmt(f),
            Node::Variable(v) => v.fmt(f),
        }
    }
}

impl From<NamedNode> for Node {
    fn from(n: NamedNode) -> Self {
        Node::Named(n)
    }
}

impl From<BlankNode> for Node {
    fn from(b: BlankNode) -> Self {
        Node::Blank(b)
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Node::Literal(l)
    }
}

impl From<Variable> for Node {
    fn from(v: Variable) -> Self {
        Node::Variable(v)
    }
}

/// Terms allowed in subject position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Named(NamedNode),
    Blank(BlankNode),
}

impl Subject {
    pub fn is_blank(&self) -> bool {
        matches!(self, Subject::Blank(_))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Named(n) => n.fmt(f),
            Subject::Blank(b) => b.fmt(f),
        }
    }
}

impl From<NamedNode> for Subject {
    fn from(n: NamedNode) -> Self {
        Subject::Named(n)
    }
}

impl From<BlankNode> for Subject {
    fn from(b: BlankNode) -> Self {
        Subject::Blank(b)
    }
}

impl From<Subject> for Node {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Named(n) => Node::Named(n),
            Subject::Blank(b) => Node::Blank(b),
        }
    }
}

impl TryFrom<Node> for Subject {
    type Error = Node;

    fn try_from(node: Node) -> std::result::Result<Self, Node> {
        match node {
            Node::Named(n) => Ok(Subject::Named(n)),
            Node::Blank(b) => Ok(Subject::Blank(b)),
            other => Err(other),
        }
    }
}

/// Terms allowed in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl Object {
    pub fn is_blank(&self) -> bool {
        matches!(self, Object::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Object::Literal(_))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Named(n) => n.fmt(f),
            Object::Blank(b) => b.fmt(f),
            Object::Literal(l) => l.fmt(f),
        }
    }
}

impl From<NamedNode> for Object {
    fn from(n: NamedNode) -> Self {
        Object::Named(n)
    }
}

impl From<BlankNode> for Object {
    fn from(b: BlankNode) -> Self {
        Object::Blank(b)
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Object::Literal(l)
    }
}

impl From<Object> for Node {
    fn from(o: Object) -> Self {
        match o {
            Object::Named(n) => Node::Named(n),
            Object::Blank(b) => Node::Blank(b),
            Object::Literal(l) => Node::Literal(l),
        }
    }
}

impl TryFrom<Node> for Object {
    type Error = Node;

    fn try_from(node: Node) -> std::result::Result<Self, Node> {
        match node {
            Node::Named(n) => Ok(Object::Named(n)),
            Node::Blank(b) => Ok(Object::Blank(b)),
            Node::Literal(l) => Ok(Object::Literal(l)),
            other => Err(other),
        }
    }
}

/// A ground RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: NamedNode,
    pub object: Object,
}

impl Triple {
    pub fn new(
        subject: impl Into<Subject>,
        predicate: NamedNode,
        object: impl Into<Object>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// True if neither subject nor object is a blank node.
    pub fn is_ground(&self) -> bool {
        !self.subject.is_blank() && !self.object.is_blank()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// One position of a triple pattern: either a concrete term or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm<T> {
    Term(T),
    Variable(Variable),
}

impl<T> PatternTerm<T> {
    pub fn is_variable(&self) -> bool {
        matches!(self, PatternTerm::Variable(_))
    }

    pub fn variable(&self) -> Option<&Variable> {
        match self {
            PatternTerm::Variable(v) => Some(v),
            PatternTerm::Term(_) => None,
        }
    }

    pub fn term(&self) -> Option<&T> {
        match self {
            PatternTerm::Term(t) => Some(t),
            PatternTerm::Variable(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for PatternTerm<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Term(t) => t.fmt(f),
            PatternTerm::Variable(v) => v.fmt(f),
        }
    }
}

impl<T> From<Variable> for PatternTerm<T> {
    fn from(v: Variable) -> Self {
        PatternTerm::Variable(v)
    }
}

/// A triple template in which any position may be a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: PatternTerm<Subject>,
    pub predicate: PatternTerm<NamedNode>,
    pub object: PatternTerm<Object>,
}

impl TriplePattern {
    /// Builds a pattern from untyped nodes, checking each node is allowed in
    /// its role.
    pub fn new(subject: Node, predicate: Node, object: Node) -> Result<Self> {
        let subject = match subject {
            Node::Variable(v) => PatternTerm::Variable(v),
            other => PatternTerm::Term(
                Subject::try_from(other).map_err(|n| Error::Syntax {
                    row: 0,
                    col: 0,
                    message: format!("error parsing subject: unexpected {}", n),
                })?,
            ),
        };
        let predicate = match predicate {
            Node::Variable(v) => PatternTerm::Variable(v),
            Node::Named(n) => PatternTerm::Term(n),
            other => return Err(Error::InvalidPredicate(other.to_string())),
        };
        let object = match object {
            Node::Variable(v) => PatternTerm::Variable(v),
            other => PatternTerm::Term(Object::try_from(other).map_err(|n| Error::Syntax {
                row: 0,
                col: 0,
                message: format!("error parsing object: unexpected {}", n),
            })?),
        };
        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    /// Variables in subject, predicate, object order (repeats included).
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        [
            self.subject.variable(),
            self.predicate.variable(),
            self.object.variable(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables().any(|v| v.as_str() == name)
    }

    /// Converts back to a triple if no position is a variable.
    pub fn to_triple(&self) -> Option<Triple> {
        Some(Triple {
            subject: self.subject.term()?.clone(),
            predicate: self.predicate.term()?.clone(),
            object: self.object.term()?.clone(),
        })
    }
}

impl From<Triple> for TriplePattern {
    fn from(t: Triple) -> Self {
        Self {
            subject: PatternTerm::Term(t.subject),
            predicate: PatternTerm::Term(t.predicate),
            object: PatternTerm::Term(t.object),
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
