//! Relationship vocabulary and label sanitizing.

use std::fmt;

pub const DEPENDENCY: &str = "dependency";
pub const RELATED: &str = "related";
pub const CONCEPTUAL_CONNECTION: &str = "conceptual connection";

/// The closed set of relationship kinds between two standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// Directed: the source must be learned before the target.
    Dependency,
    /// Undirected: the two standards reinforce each other.
    ConceptualConnection,
}

impl RelationshipKind {
    /// Parse a raw or already-sanitized label. Case and surrounding
    /// whitespace are ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            DEPENDENCY => Some(Self::Dependency),
            RELATED | CONCEPTUAL_CONNECTION => Some(Self::ConceptualConnection),
            _ => None,
        }
    }

    /// Label used in the sanitized dependencies document.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dependency => DEPENDENCY,
            Self::ConceptualConnection => CONCEPTUAL_CONNECTION,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a relationship label: `dependency` stays, `related` becomes
/// `conceptual connection`. Unrecognized labels are returned unchanged.
pub fn sanitize(label: &str) -> String {
    match label.trim().to_lowercase().as_str() {
        DEPENDENCY => DEPENDENCY.to_string(),
        RELATED => CONCEPTUAL_CONNECTION.to_string(),
        _ => label.to_string(),
    }
}
