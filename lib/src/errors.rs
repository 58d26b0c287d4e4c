//! Error type shared by the scanner, decoder and term constructors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The scanner could not form a token.
    #[error("{row}:{col}: {message}")]
    Lexical {
        row: usize,
        col: usize,
        message: String,
    },
    /// A well-formed token showed up where the statement grammar forbids it.
    #[error("{row}:{col}: {message}")]
    Syntax {
        row: usize,
        col: usize,
        message: String,
    },
    #[error("invalid IRI {iri:?}: disallowed character {character:?}")]
    InvalidIri { iri: String, character: char },
    #[error("invalid language tag {0:?}")]
    InvalidLanguageTag(String),
    #[error("invalid blank node label {0:?}")]
    InvalidBlankNode(String),
    #[error("invalid variable name {0:?}")]
    InvalidVariable(String),
    #[error("predicate must be a named node, got {0}")]
    InvalidPredicate(String),
    #[error("unsupported term {0}")]
    UnsupportedTerm(String),
}

impl Error {
    /// Row and column of a decoding error, if it has a position.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lexical { row, col, .. } | Error::Syntax { row, col, .. } => Some((*row, *col)),
            _ => None,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Error::Lexical { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
