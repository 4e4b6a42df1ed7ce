//! Generic conversion between flat tables and `{<root_key>: [...]}` documents.

use crate::error::{CcssError, Result};
use serde_json::{Map, Value};

/// An in-memory CSV table: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve column positions by name, failing with every missing name.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(i) => found.push(i),
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(CcssError::MissingColumns {
                required: names.iter().map(|n| (*n).to_string()).collect(),
                missing,
            })
        }
    }

    /// Value of `column` in `row`, or "" if the row is short.
    pub fn cell<'a>(row: &'a [String], column: usize) -> &'a str {
        row.get(column).map_or("", String::as_str)
    }
}

/// Convert a table into `{root_key: [{column: value}, ...]}`.
///
/// Empty cells and cells missing from short rows become `null`. Column order
/// is preserved in every record.
pub fn table_to_document(table: &Table, root_key: &str) -> Result<Value> {
    if table.rows.is_empty() {
        return Err(CcssError::EmptyTable);
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        if row.len() > table.headers.len() {
            return Err(CcssError::RaggedRow {
                line: i + 2,
                expected: table.headers.len(),
                found: row.len(),
            });
        }
        let record: Map<String, Value> = table
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let value = match row.get(col) {
                    Some(cell) if !cell.is_empty() => Value::String(cell.clone()),
                    _ => Value::Null,
                };
                (header.clone(), value)
            })
            .collect();
        records.push(Value::Object(record));
    }

    let mut root = Map::new();
    root.insert(root_key.to_string(), Value::Array(records));
    Ok(Value::Object(root))
}

/// Convert `{root_key: [{...}, ...]}` back into a table.
///
/// Headers come from the keys of the first record. `null` and absent keys
/// become empty cells; non-string values are written as JSON text.
pub fn document_to_table(document: &Value, root_key: &str) -> Result<Table> {
    let records = document
        .get(root_key)
        .and_then(Value::as_array)
        .filter(|records| !records.is_empty())
        .ok_or_else(|| CcssError::MissingRootKey(root_key.to_string()))?;

    let first = records[0]
        .as_object()
        .ok_or(CcssError::NotAnObject { index: 0 })?;
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or(CcssError::NotAnObject { index })?;
        if let Some(field) = object.keys().find(|k| !headers.contains(k)) {
            return Err(CcssError::UnexpectedField {
                index,
                field: field.clone(),
            });
        }
        rows.push(
            headers
                .iter()
                .map(|h| object.get(h).map(cell_text).unwrap_or_default())
                .collect(),
        );
    }

    Ok(Table { headers, rows })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn standards_table() -> Table {
        Table::new(
            strings(&["grade_level_code", "domain_code", "substandard_counter"]),
            vec![strings(&["4", "NF", ""]), strings(&["4", "NF", "a"])],
        )
    }

    #[test]
    fn test_table_to_document_nulls_empty_cells() {
        let doc = table_to_document(&standards_table(), "standards").unwrap();
        assert_eq!(
            doc,
            json!({"standards": [
                {"grade_level_code": "4", "domain_code": "NF", "substandard_counter": null},
                {"grade_level_code": "4", "domain_code": "NF", "substandard_counter": "a"},
            ]})
        );
    }

    #[test]
    fn test_column_order_preserved() {
        let table = Table::new(strings(&["zeta", "alpha"]), vec![strings(&["1", "2"])]);
        let doc = table_to_document(&table, "rows").unwrap();
        let keys: Vec<&String> = doc["rows"][0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_round_trip() {
        let table = standards_table();
        let doc = table_to_document(&table, "standards").unwrap();
        assert_eq!(document_to_table(&doc, "standards").unwrap(), table);
    }

    #[test]
    fn test_header_only_table_rejected() {
        let table = Table::new(strings(&["a"]), Vec::new());
        assert!(matches!(
            table_to_document(&table, "standards"),
            Err(CcssError::EmptyTable)
        ));
    }

    #[test]
    fn test_long_row_rejected() {
        let table = Table::new(strings(&["a"]), vec![strings(&["1", "2"])]);
        assert!(matches!(
            table_to_document(&table, "k"),
            Err(CcssError::RaggedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_short_row_padded_with_null() {
        let table = Table::new(strings(&["a", "b"]), vec![strings(&["1"])]);
        let doc = table_to_document(&table, "k").unwrap();
        assert_eq!(doc["k"][0]["b"], Value::Null);
    }

    #[test]
    fn test_document_to_table_scalars_and_missing_keys() {
        let doc = json!({"items": [
            {"id": "A", "count": 3, "ok": true},
            {"id": "B"},
        ]});
        let table = document_to_table(&doc, "items").unwrap();
        assert_eq!(table.headers, strings(&["id", "count", "ok"]));
        assert_eq!(table.rows[0], strings(&["A", "3", "true"]));
        assert_eq!(table.rows[1], strings(&["B", "", ""]));
    }

    #[test]
    fn test_document_missing_or_empty_root_key() {
        assert!(matches!(
            document_to_table(&json!({"other": []}), "standards"),
            Err(CcssError::MissingRootKey(_))
        ));
        assert!(matches!(
            document_to_table(&json!({"standards": []}), "standards"),
            Err(CcssError::MissingRootKey(_))
        ));
    }

    #[test]
    fn test_document_extra_field_rejected() {
        let doc = json!({"k": [{"a": 1}, {"a": 2, "b": 3}]});
        assert!(matches!(
            document_to_table(&doc, "k"),
            Err(CcssError::UnexpectedField { index: 1, .. })
        ));
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let table = Table::new(strings(&["source"]), Vec::new());
        match table.require_columns(&["source", "target", "relationship"]) {
            Err(CcssError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, strings(&["target", "relationship"]));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
