//! Store — one JSON document per dataset on local disk.
//!
//! Each document is a JSON array of normalized records, indented, with
//! non-ASCII text written literally. Writes go to a `.part` sibling first and
//! are renamed into place, so the inspector never sees half a document.

use crate::error::{kind_of, StoreError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A dataset document found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl DatasetFile {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Write `records` to `path` as an indented JSON array.
pub fn write_dataset(path: &Path, records: &[Value], indent: usize) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let part = part_path(path);
    let file = File::create(&part).map_err(|e| StoreError::io(&part, e))?;
    let mut writer = BufWriter::new(file);

    let indent = " ".repeat(indent);
    let mut ser = serde_json::Serializer::with_formatter(
        &mut writer,
        PrettyFormatter::with_indent(indent.as_bytes()),
    );
    records
        .serialize(&mut ser)
        .map_err(|e| StoreError::json(&part, e))?;
    writer.write_all(b"\n").map_err(|e| StoreError::io(&part, e))?;
    writer.flush().map_err(|e| StoreError::io(&part, e))?;
    drop(writer);

    std::fs::rename(&part, path).map_err(|e| StoreError::io(path, e))?;
    tracing::debug!(path = %path.display(), records = records.len(), "dataset written");
    Ok(())
}

/// Read a dataset document back. The top-level value must be an array.
pub fn read_dataset(path: &Path) -> Result<Vec<Value>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::json(path, e))?;
    match value {
        Value::Array(records) => {
            tracing::debug!(path = %path.display(), records = records.len(), "dataset read");
            Ok(records)
        }
        other => Err(StoreError::NotAnArray {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// Every `*.json` document in `dir`, sorted by file name. A directory that
/// does not exist yet holds no datasets.
pub fn list_datasets(dir: &Path) -> Result<Vec<DatasetFile>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let meta = entry.metadata().map_err(|e| StoreError::io(&path, e))?;
        if !meta.is_file() {
            continue;
        }
        files.push(DatasetFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: meta.len(),
            path,
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
