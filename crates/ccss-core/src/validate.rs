//! Relationship list validation.
//!
//! Pass one walks the rows in input order and rejects malformed rows, self
//! references, unknown kinds, duplicate or reversed dependencies and
//! duplicate connections (connections are deduplicated on the sorted pair).
//! Pass two removes every surviving dependency whose pair is also a
//! surviving connection. Connections are never removed in pass two.
//!
//! Line numbers count the header as line 1, so the first data row is line 2.

use crate::diagnostics::Diagnostic;
use crate::error::{CcssError, Result};
use crate::relationship::RelationshipKind;
use crate::table::Table;
use std::collections::HashMap;

/// Line number of the first data row.
pub const FIRST_DATA_LINE: usize = 2;

/// Fields every relationship row must carry.
pub const RELATIONSHIP_COLUMNS: [&str; 3] = ["source", "target", "relationship"];

type Pair = (String, String);

/// A row that survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub line: usize,
    /// The row exactly as read, for writing back out.
    pub fields: Vec<String>,
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Surviving rows in original relative order.
    pub rows: Vec<ValidatedRow>,
    /// Every rejection, in the order it was detected.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Number of data rows written (the header is not counted).
    pub fn written(&self) -> usize {
        self.rows.len()
    }
}

/// Streaming state for pass one.
#[derive(Debug, Default)]
pub struct RelationshipValidator {
    /// Ordered (source, target) → line it was first accepted on.
    dependencies: HashMap<Pair, usize>,
    /// Sorted pair → line it was first accepted on.
    connections: HashMap<Pair, usize>,
    accepted: Vec<ValidatedRow>,
    diagnostics: Vec<Diagnostic>,
}

impl RelationshipValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pass-one rules against one row.
    /// Returns true if the row was accepted.
    pub fn push(&mut self, line: usize, fields: Vec<String>) -> bool {
        if fields.len() != 3 {
            self.reject(Diagnostic::InvalidRowFormat {
                line,
                found: fields.len(),
            });
            return false;
        }

        let source = fields[0].trim().to_string();
        let target = fields[1].trim().to_string();
        let label = fields[2].trim();
        if source.is_empty() || target.is_empty() || label.is_empty() {
            self.reject(Diagnostic::EmptyCells { line });
            return false;
        }

        if source == target {
            self.reject(Diagnostic::SelfReference { line, id: source });
            return false;
        }

        let Some(kind) = RelationshipKind::parse(label) else {
            self.reject(Diagnostic::UnknownRelationship {
                line,
                label: label.to_string(),
            });
            return false;
        };

        match kind {
            RelationshipKind::Dependency => {
                let pair = (source.clone(), target.clone());
                let reverse = (target.clone(), source.clone());
                if let Some(&first_seen) = self.dependencies.get(&pair) {
                    self.reject(Diagnostic::DuplicateDependency {
                        line,
                        source,
                        target,
                        first_seen,
                    });
                    return false;
                }
                if let Some(&first_seen) = self.dependencies.get(&reverse) {
                    self.reject(Diagnostic::AsymmetricDependency {
                        line,
                        source,
                        target,
                        first_seen,
                    });
                    return false;
                }
                self.dependencies.insert(pair, line);
            }
            RelationshipKind::ConceptualConnection => {
                let pair = sorted_pair(&source, &target);
                if let Some(&first_seen) = self.connections.get(&pair) {
                    self.reject(Diagnostic::DuplicateConnection {
                        line,
                        source,
                        target,
                        first_seen,
                    });
                    return false;
                }
                self.connections.insert(pair, line);
            }
        }

        tracing::debug!("line {}: accepted {} {} -> {}", line, kind, source, target);
        self.accepted.push(ValidatedRow {
            line,
            fields,
            source,
            target,
            kind,
        });
        true
    }

    /// Run pass two and produce the report.
    pub fn finish(self) -> ValidationReport {
        let Self {
            connections,
            accepted,
            mut diagnostics,
            ..
        } = self;

        let rows = accepted
            .into_iter()
            .filter(|row| {
                if row.kind != RelationshipKind::Dependency {
                    return true;
                }
                match connections.get(&sorted_pair(&row.source, &row.target)) {
                    Some(&connection_line) => {
                        diagnostics.push(Diagnostic::Conflict {
                            line: row.line,
                            source: row.source.clone(),
                            target: row.target.clone(),
                            connection_line,
                        });
                        false
                    }
                    None => true,
                }
            })
            .collect();

        ValidationReport { rows, diagnostics }
    }

    fn reject(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Validate data rows (header excluded) in input order.
pub fn validate<I>(rows: I) -> ValidationReport
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut validator = RelationshipValidator::new();
    for (line, fields) in (FIRST_DATA_LINE..).zip(rows) {
        validator.push(line, fields);
    }
    validator.finish()
}

/// Data rows of a relationship table, reordered to `source, target,
/// relationship` by header name.
///
/// The header must name exactly those three columns, in any order. Rows of
/// any other width are passed through untouched so validation reports them.
pub fn ordered_rows(table: &Table) -> Result<Vec<Vec<String>>> {
    let columns = table.require_columns(&RELATIONSHIP_COLUMNS)?;
    if table.headers.len() != RELATIONSHIP_COLUMNS.len() {
        return Err(CcssError::HeaderWidth {
            expected: RELATIONSHIP_COLUMNS.len(),
            found: table.headers.len(),
        });
    }
    if columns == [0, 1, 2] {
        return Ok(table.rows.clone());
    }

    tracing::debug!("relationship columns found at {:?}", columns);
    Ok(table
        .rows
        .iter()
        .map(|row| {
            if row.len() == columns.len() {
                columns.iter().map(|&c| row[c].clone()).collect()
            } else {
                row.clone()
            }
        })
        .collect())
}

/// Flag every row whose source and target are the same identifier.
///
/// Only the `source` and `target` columns are required; rows with a blank
/// endpoint are ignored.
pub fn scan_self_references(table: &Table) -> Result<Vec<Diagnostic>> {
    let columns = table.require_columns(&["source", "target"])?;
    let (source_col, target_col) = (columns[0], columns[1]);

    let found = (FIRST_DATA_LINE..)
        .zip(&table.rows)
        .filter_map(|(line, row)| {
            let source = row.get(source_col).map_or("", |s| s.trim());
            let target = row.get(target_col).map_or("", |s| s.trim());
            (!source.is_empty() && source == target).then(|| Diagnostic::SelfReference {
                line,
                id: source.to_string(),
            })
        })
        .collect();
    Ok(found)
}

fn sorted_pair(a: &str, b: &str) -> Pair {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
