//! Row-level diagnostics accumulated during a run.
//!
//! Nothing here aborts a run: the offending row is skipped (or, for
//! identifiers, passed through) and a [`Diagnostic`] is recorded. The CLI
//! prints the whole list once the run is over.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Row does not have exactly three fields.
    InvalidRowFormat { line: usize, found: usize },
    /// One of the three fields is blank.
    EmptyCells { line: usize },
    /// Source and target are the same identifier.
    SelfReference { line: usize, id: String },
    UnknownRelationship { line: usize, label: String },
    DuplicateDependency {
        line: usize,
        source: String,
        target: String,
        first_seen: usize,
    },
    /// The reverse dependency was declared earlier.
    AsymmetricDependency {
        line: usize,
        source: String,
        target: String,
        first_seen: usize,
    },
    DuplicateConnection {
        line: usize,
        source: String,
        target: String,
        first_seen: usize,
    },
    /// A dependency removed because the same pair is also a connection.
    Conflict {
        line: usize,
        source: String,
        target: String,
        connection_line: usize,
    },
    /// A short identifier with no matching reference record.
    UnresolvedIdentifier { id: String },
    /// A reference key declared more than once; the last record won.
    DuplicateReferenceKey { key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRowFormat { line, found } => write!(
                f,
                "Line {line}: Invalid row format. Expected 3 columns, found {found}. Skipping."
            ),
            Self::EmptyCells { line } => {
                write!(f, "Line {line}: Row contains empty cells. Skipping.")
            }
            Self::SelfReference { line, id } => write!(
                f,
                "Line {line}: Source and target are the same ('{id}'). Skipping."
            ),
            Self::UnknownRelationship { line, label } => write!(
                f,
                "Line {line}: Unknown relationship type '{label}'. Skipping."
            ),
            Self::DuplicateDependency {
                line,
                source,
                target,
                first_seen,
            } => write!(
                f,
                "Line {line}: Duplicate 'Dependency' row for ({source} -> {target}). \
                 First seen on line {first_seen}. Skipping."
            ),
            Self::AsymmetricDependency {
                line,
                source,
                target,
                first_seen,
            } => write!(
                f,
                "Line {line}: Asymmetry violation for 'Dependency'. Reverse relationship \
                 ({target} -> {source}) defined on line {first_seen}. Skipping."
            ),
            Self::DuplicateConnection {
                line,
                source,
                target,
                first_seen,
            } => write!(
                f,
                "Line {line}: Duplicate 'Related' relationship between '{source}' and \
                 '{target}'. First seen on line {first_seen}. Skipping."
            ),
            Self::Conflict {
                line,
                source,
                target,
                connection_line,
            } => write!(
                f,
                "Conflict: A 'Dependency' (line {line}) and 'Related' (line {connection_line}) \
                 relationship exist between '{source}' and '{target}'. Removing dependency."
            ),
            Self::UnresolvedIdentifier { id } => write!(
                f,
                "Warning: Could not find a match for short ID '{id}' in the K-8 lookup map."
            ),
            Self::DuplicateReferenceKey { key } => write!(
                f,
                "Warning: Reference key {key} is declared more than once; the last record wins."
            ),
        }
    }
}

/// Render diagnostics in display order (sorted by message text).
pub fn sorted_messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    let mut messages: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asymmetry_message_names_earlier_line() {
        let d = Diagnostic::AsymmetricDependency {
            line: 5,
            source: "B".into(),
            target: "A".into(),
            first_seen: 2,
        };
        let msg = d.to_string();
        assert!(msg.starts_with("Line 5:"));
        assert!(msg.contains("(A -> B)"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_sorted_messages() {
        let diags = vec![
            Diagnostic::EmptyCells { line: 9 },
            Diagnostic::Conflict {
                line: 3,
                source: "A".into(),
                target: "B".into(),
                connection_line: 4,
            },
            Diagnostic::EmptyCells { line: 2 },
        ];
        let sorted = sorted_messages(&diags);
        assert!(sorted[0].starts_with("Conflict"));
        assert!(sorted[1].starts_with("Line 2"));
        assert!(sorted[2].starts_with("Line 9"));
    }
}
