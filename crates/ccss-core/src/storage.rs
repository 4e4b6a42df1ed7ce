//! Read and write CSV tables and JSON documents on disk.
//!
//! Writes go to a temporary sibling file that is renamed over the target, so
//! a failed run never leaves a half-written output behind.

use crate::error::{CcssError, Result};
use crate::model::{DependencyDocument, ReferenceRecord, RelationshipEdge};
use crate::table::Table;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a CSV file. The first record is the header; data rows may have any
/// number of fields.
pub fn read_table(path: &Path) -> Result<Table> {
    let bytes = fs::read(path).map_err(|e| CcssError::read(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => return Err(CcssError::MissingHeader),
    };
    let rows = records
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;

    tracing::debug!("read {} data rows from {}", rows.len(), path.display());
    Ok(Table::new(headers, rows))
}

/// Write a header row followed by `rows`.
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    write_atomic(path, &table_bytes(path, headers, rows)?)
}

/// Read and parse any JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| CcssError::read(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretty-print `value` as JSON into `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_atomic(path, &json_bytes(value)?)
}

/// Write `{root_key: items}`.
pub fn write_list<T: Serialize>(path: &Path, root_key: &str, items: &[T]) -> Result<()> {
    write_json(path, &list_value(root_key, items)?)
}

/// Outputs that replace their targets together.
///
/// Each write only fills a temporary sibling. [`OutputBatch::commit`] renames
/// them all into place; a batch dropped before that removes its temporaries
/// and leaves every target as it was.
#[derive(Debug, Default)]
pub struct OutputBatch {
    staged: Vec<(PathBuf, PathBuf)>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        let bytes = table_bytes(path, headers, rows)?;
        self.stage(path, &bytes)
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, path: &Path, value: &T) -> Result<()> {
        let bytes = json_bytes(value)?;
        self.stage(path, &bytes)
    }

    pub fn list<T: Serialize>(&mut self, path: &Path, root_key: &str, items: &[T]) -> Result<()> {
        self.json(path, &list_value(root_key, items)?)
    }

    /// Move every staged file over its target.
    pub fn commit(mut self) -> Result<()> {
        while !self.staged.is_empty() {
            let (tmp, path) = self.staged.remove(0);
            rename_into_place(&tmp, &path)?;
        }
        Ok(())
    }

    fn stage(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = write_temp(path, bytes)?;
        self.staged.push((tmp, path.to_path_buf()));
        Ok(())
    }
}

impl Drop for OutputBatch {
    fn drop(&mut self) {
        for (tmp, _) in &self.staged {
            remove_temp(tmp);
        }
    }
}

/// Load standards records stored under `root_key`.
///
/// A document without `root_key` yields no records.
pub fn load_standards(path: &Path, root_key: &str) -> Result<Vec<ReferenceRecord>> {
    let records: Vec<ReferenceRecord> = load_list(path, root_key)?;
    tracing::info!("loaded {} standards from {}", records.len(), path.display());
    Ok(records)
}

/// Load a sanitized dependencies document (`{"dependencies": [...]}` by default).
pub fn load_dependencies(path: &Path, root_key: &str) -> Result<DependencyDocument> {
    let dependencies: Vec<RelationshipEdge> = load_list(path, root_key)?;
    tracing::info!(
        "loaded {} dependencies from {}",
        dependencies.len(),
        path.display()
    );
    Ok(DependencyDocument { dependencies })
}

fn load_list<T: DeserializeOwned>(path: &Path, root_key: &str) -> Result<Vec<T>> {
    let mut document: Value = read_json(path)?;
    match document.get_mut(root_key) {
        Some(list) => Ok(serde_json::from_value(list.take())?),
        None => {
            tracing::warn!("{} has no '{}' key", path.display(), root_key);
            Ok(Vec::new())
        }
    }
}

fn table_bytes(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| CcssError::write(path, e.into_error()))
}

fn json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json.into_bytes())
}

fn list_value<T: Serialize>(root_key: &str, items: &[T]) -> Result<Value> {
    let mut root = serde_json::Map::new();
    root.insert(root_key.to_string(), serde_json::to_value(items)?);
    Ok(Value::Object(root))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = write_temp(path, bytes)?;
    rename_into_place(&tmp, path)
}

fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| CcssError::write(dir, e))?;
    }
    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        remove_temp(&tmp);
        return Err(CcssError::write(&tmp, e));
    }
    Ok(tmp)
}

fn rename_into_place(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).map_err(|e| {
        remove_temp(tmp);
        CcssError::write(path, e)
    })
}

fn remove_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::debug!("could not remove {}: {}", tmp.display(), e);
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
