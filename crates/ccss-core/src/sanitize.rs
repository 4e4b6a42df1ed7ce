//! Turn a raw relationship table into the sanitized dependencies document.

use crate::canonical::canonicalize;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::model::{DependencyDocument, RelationshipEdge};
use crate::reference::ReferenceIndex;
use crate::relationship::sanitize;
use crate::table::Table;
use crate::validate::{RELATIONSHIP_COLUMNS, ValidatedRow};

/// Canonicalize both endpoints and sanitize the label of every row.
///
/// Columns are looked up by name, so extra columns and any column order are
/// accepted. No validation happens here; see [`crate::validate`].
pub fn sanitize_dependencies(
    table: &Table,
    index: &ReferenceIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DependencyDocument> {
    let columns = table.require_columns(&RELATIONSHIP_COLUMNS)?;
    let (source, target, relationship) = (columns[0], columns[1], columns[2]);

    let dependencies = table
        .rows
        .iter()
        .map(|row| RelationshipEdge {
            source: canonicalize(Table::cell(row, source), index, diagnostics),
            target: canonicalize(Table::cell(row, target), index, diagnostics),
            relationship: Some(sanitize(Table::cell(row, relationship))),
        })
        .collect();

    Ok(DependencyDocument { dependencies })
}

/// Rewrite the endpoints of raw relationship rows to canonical form, leaving
/// the label and any extra fields untouched.
///
/// Used ahead of validation so that a short and a full spelling of the same
/// pair are recognized as duplicates.
pub fn canonicalize_rows(
    rows: &[Vec<String>],
    index: &ReferenceIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let trimmed = cell.trim();
                    if i < 2 && !trimmed.is_empty() {
                        canonicalize(trimmed, index, diagnostics)
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect()
}

/// Build the dependencies document from rows that passed validation.
pub fn edges_from_validated(rows: &[ValidatedRow]) -> DependencyDocument {
    DependencyDocument {
        dependencies: rows
            .iter()
            .map(|row| RelationshipEdge {
                source: row.source.clone(),
                target: row.target.clone(),
                relationship: Some(row.kind.label().to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceRecord;
    use crate::validate::validate;

    fn index() -> ReferenceIndex {
        ReferenceIndex::build(vec![ReferenceRecord {
            grade_level_code: "4".into(),
            category_code: None,
            domain_code: "NF".into(),
            cluster_code: Some("B".into()),
            standard_counter: "3".into(),
            substandard_counter: None,
            description: None,
        }])
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_sanitize_dependencies() {
        let table = Table::new(
            strings(&["relationship", "source", "target"]),
            vec![
                strings(&["Related", "4.NF.3", "HS.N.RN.1"]),
                strings(&["dependency", "0.CC.1", "4.NF.3"]),
            ],
        );
        let mut diags = Vec::new();
        let doc = sanitize_dependencies(&table, &index(), &mut diags).unwrap();

        assert_eq!(doc.dependencies[0].source, "4.NF.B.3");
        assert_eq!(doc.dependencies[0].target, "HSN.RN.1");
        assert_eq!(
            doc.dependencies[0].relationship.as_deref(),
            Some("conceptual connection")
        );
        assert_eq!(doc.dependencies[1].source, "K.CC.1");
        assert_eq!(diags.len(), 1, "K.CC.1 is not in the index");
    }

    #[test]
    fn test_sanitize_requires_columns() {
        let table = Table::new(strings(&["source", "target"]), Vec::new());
        let mut diags = Vec::new();
        assert!(sanitize_dependencies(&table, &index(), &mut diags).is_err());
    }

    #[test]
    fn test_short_and_full_spelling_deduplicated_after_canonicalizing() {
        let rows = vec![
            strings(&["4.NF.3", "5.NF.A.1", "dependency"]),
            strings(&["4.NF.B.3", "5.NF.A.1", "dependency"]),
        ];
        let mut diags = Vec::new();
        let canonical = canonicalize_rows(&rows, &index(), &mut diags);
        let report = validate(canonical);
        assert_eq!(report.written(), 1);
        assert_eq!(report.rows[0].fields[0], "4.NF.B.3");

        let doc = edges_from_validated(&report.rows);
        assert_eq!(doc.dependencies[0].relationship.as_deref(), Some("dependency"));
    }
}
