use ccss_core::reference::ReferenceIndex;
use ccss_core::storage;
use ccss_core::table::{document_to_table, table_to_document};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const K8_CSV: &str = "\
grade_level_code,domain_code,cluster_code,standard_counter,substandard_counter,description
K,CC,A,1,,Count to 100 by ones and by tens.
4,NF,B,3,,Understand a fraction a/b with a > 1 as a sum of fractions 1/b.
4,NF,B,3,a,\"Understand addition and subtraction of fractions, as joining parts.\"
";

#[test]
fn test_csv_json_csv_roundtrip_through_files() {
    let tmp = TempDir::new().unwrap();
    let csv_in = tmp.path().join("k8.csv");
    let json = tmp.path().join("k8.json");
    let csv_out = tmp.path().join("k8_again.csv");
    fs::write(&csv_in, K8_CSV).unwrap();

    let table = storage::read_table(&csv_in).unwrap();
    storage::write_json(&json, &table_to_document(&table, "standards").unwrap()).unwrap();

    let document: Value = storage::read_json(&json).unwrap();
    assert_eq!(document["standards"][0]["substandard_counter"], Value::Null);

    let back = document_to_table(&document, "standards").unwrap();
    storage::write_table(&csv_out, &back.headers, &back.rows).unwrap();

    assert_eq!(back, table);
    assert_eq!(fs::read_to_string(&csv_out).unwrap(), K8_CSV);
}

#[test]
fn test_converted_document_feeds_reference_index() {
    let tmp = TempDir::new().unwrap();
    let csv_in = tmp.path().join("k8.csv");
    let json = tmp.path().join("k8.json");
    fs::write(&csv_in, K8_CSV).unwrap();
    let table = storage::read_table(&csv_in).unwrap();
    storage::write_json(&json, &table_to_document(&table, "standards").unwrap()).unwrap();

    let index = ReferenceIndex::build(storage::load_standards(&json, "standards").unwrap());
    assert_eq!(index.len(), 3);
    assert_eq!(
        index.lookup("4", "NF", "3", Some("a")).unwrap().cluster_code.as_deref(),
        Some("B")
    );
    assert_eq!(
        index.lookup("K", "CC", "1", None).unwrap().description.as_deref(),
        Some("Count to 100 by ones and by tens.")
    );
}

#[test]
fn test_empty_cluster_cell_survives_conversion() {
    let tmp = TempDir::new().unwrap();
    let csv_in = tmp.path().join("hs.csv");
    let json = tmp.path().join("hs.json");
    fs::write(
        &csv_in,
        "grade_level_code,category_code,domain_code,cluster_code,standard_counter,substandard_counter,description\n\
         HS,A,CED,,4,,No cluster.\n\
         HS,A,SSE,A,1,,Interpret expressions.\n",
    )
    .unwrap();
    let table = storage::read_table(&csv_in).unwrap();
    storage::write_json(&json, &table_to_document(&table, "standards").unwrap()).unwrap();

    let records = storage::load_standards(&json, "standards").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].cluster_code, None);
    assert_eq!(records[0].category_code.as_deref(), Some("A"));
    assert_eq!(records[1].cluster_code.as_deref(), Some("A"));
}

#[test]
fn test_custom_root_key() {
    let tmp = TempDir::new().unwrap();
    let csv_in = tmp.path().join("k8.csv");
    fs::write(&csv_in, K8_CSV).unwrap();
    let table = storage::read_table(&csv_in).unwrap();

    let document = table_to_document(&table, "items").unwrap();
    assert!(document.get("standards").is_none());
    assert_eq!(document["items"].as_array().unwrap().len(), 3);
    assert!(document_to_table(&document, "standards").is_err());
}
