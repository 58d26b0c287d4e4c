//! Small option enums that replace boolean flag parameters in the API.

use serde::{Deserialize, Serialize};

/// What bulk loading does when a statement fails to decode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the error, drop the line and keep going.
    #[default]
    Skip,
    /// Stop at the first malformed statement.
    Abort,
}

impl ErrorPolicy {
    pub fn is_abort(self) -> bool {
        matches!(self, ErrorPolicy::Abort)
    }
}

impl From<bool> for ErrorPolicy {
    /// `true` means strict, i.e. abort on error.
    fn from(strict: bool) -> Self {
        if strict {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Skip
        }
    }
}

/// Which edges make up a blank node's signature when comparing graphs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// Only edges where the blank node is the subject.
    Outgoing,
    /// Outgoing edges plus edges where the blank node is the object.
    #[default]
    Bidirectional,
}

impl SignatureMode {
    pub fn includes_incoming(self) -> bool {
        matches!(self, SignatureMode::Bidirectional)
    }
}

impl From<bool> for SignatureMode {
    /// `true` means incoming edges are included.
    fn from(incoming: bool) -> Self {
        if incoming {
            SignatureMode::Bidirectional
        } else {
            SignatureMode::Outgoing
        }
    }
}
