use crate::data::column_format::ColumnFormat;
use crate::data::datatable::{Align, DataColumn, DataRow, DataTable, DataValue};
use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Column entry of a table fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub min_width: Option<u16>,
    #[serde(default)]
    pub align: Align,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    #[serde(default)]
    pub format: Option<ColumnFormat>,
}

fn default_sortable() -> bool {
    true
}

impl ColumnSpec {
    pub fn into_column(self) -> DataColumn<String> {
        let label = self.label.unwrap_or_else(|| humanize_field(&self.field));
        let mut column = DataColumn::new(self.field, label)
            .with_align(self.align)
            .with_sortable(self.sortable);
        if let Some(width) = self.min_width {
            column = column.with_min_width(width);
        }
        if let Some(format) = self.format {
            column = column.with_formatter(move |value| format.apply(value));
        }
        column
    }
}

/// A dashboard table fixture: optional title, column descriptors and rows
#[derive(Debug, Deserialize)]
struct TableFixture {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    columns: Vec<ColumnSpec>,
    rows: Vec<JsonValue>,
}

/// A loaded table together with the caption its fixture carried
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub title: Option<String>,
    pub table: DataTable<DataRow>,
}

/// "student_name" -> "Student Name"
pub fn humanize_field(field: &str) -> String {
    field
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Load a JSON array of row objects into a DataTable
pub fn load_json_to_datatable<P: AsRef<Path>>(
    path: P,
    table_name: &str,
) -> Result<DataTable<DataRow>> {
    let json = read_json(path.as_ref())?;
    json_array_to_datatable(&json, table_name, path.as_ref())
}

/// Build a DataTable from an already parsed JSON array of row objects
pub fn json_array_to_datatable(
    json: &JsonValue,
    table_name: &str,
    path: &Path,
) -> Result<DataTable<DataRow>> {
    let items = json
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of rows in {:?}", path))?;

    let rows = json_rows_to_datarows(items)?;
    let columns = infer_columns(&rows);
    let mut table = DataTable::from_rows(table_name, columns, rows)?;
    tag_source(&mut table, "json", path);
    Ok(table)
}

/// Load a `{ title, columns, rows }` table fixture
pub fn load_table_fixture<P: AsRef<Path>>(path: P) -> Result<LoadedTable> {
    let json = read_json(path.as_ref())?;
    fixture_from_json(json, path.as_ref())
}

fn fixture_from_json(json: JsonValue, path: &Path) -> Result<LoadedTable> {
    let fixture: TableFixture = serde_json::from_value(json)
        .with_context(|| format!("Invalid table fixture: {:?}", path))?;

    let rows = json_rows_to_datarows(&fixture.rows)?;
    let columns = if fixture.columns.is_empty() {
        infer_columns(&rows)
    } else {
        fixture
            .columns
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect()
    };

    let name = fixture.title.clone().unwrap_or_else(|| file_stem(path));
    let mut table = DataTable::from_rows(name, columns, rows)?;
    tag_source(&mut table, "fixture", path);

    Ok(LoadedTable {
        title: fixture.title,
        table,
    })
}

/// Load a CSV file with a header row and an `id` column into a DataTable
pub fn load_csv_to_datatable<P: AsRef<Path>>(
    path: P,
    table_name: &str,
) -> Result<DataTable<DataRow>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers()?.clone();
    let id_index = headers
        .iter()
        .position(|h| h == "id")
        .ok_or_else(|| anyhow!("CSV file {:?} has no 'id' column", path.as_ref()))?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Bad CSV record at row {}", line + 1))?;
        let mut row = DataRow::new(record.get(id_index).unwrap_or_default());
        for (col_idx, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if col_idx != id_index {
                row.set(header, DataValue::infer_from_str(cell));
            }
        }
        rows.push(row);
    }

    let columns = headers
        .iter()
        .filter(|h| *h != "id")
        .map(|h| DataColumn::new(h.to_string(), humanize_field(h)))
        .collect();

    let mut table = DataTable::from_rows(table_name, columns, rows)?;
    tag_source(&mut table, "csv", path.as_ref());
    Ok(table)
}

/// Pick a loader from the file extension and shape
pub fn load_datatable<P: AsRef<Path>>(path: P) -> Result<LoadedTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let loaded = match extension.as_str() {
        "csv" => LoadedTable {
            title: None,
            table: load_csv_to_datatable(path, &file_stem(path))?,
        },
        "json" => {
            let json = read_json(path)?;
            if json.is_object() {
                fixture_from_json(json, path)?
            } else {
                LoadedTable {
                    title: None,
                    table: json_array_to_datatable(&json, &file_stem(path), path)?,
                }
            }
        }
        other => bail!("Unsupported file type '{}' for {:?}", other, path),
    };

    info!(
        target: "loader",
        "Loaded '{}' with {} rows and {} columns",
        loaded.table.name,
        loaded.table.row_count(),
        loaded.table.column_count()
    );
    Ok(loaded)
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let file =
        File::open(path).with_context(|| format!("Failed to open JSON file: {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

fn tag_source(table: &mut DataTable<DataRow>, kind: &str, path: &Path) {
    table
        .metadata
        .insert("source_type".to_string(), kind.to_string());
    table
        .metadata
        .insert("source_path".to_string(), path.display().to_string());
}

/// Convert JSON row objects, requiring a string or integer `id`
pub fn json_rows_to_datarows(items: &[JsonValue]) -> Result<Vec<DataRow>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<DataRow> {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Row {} is not a JSON object", index))?;

            let id = match obj.get("id") {
                Some(JsonValue::String(s)) => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                Some(other) => bail!("Row {} has an unusable id: {}", index, other),
                None => bail!("Row {} has no 'id' field", index),
            };

            let mut row = DataRow::new(id);
            for (key, value) in obj.iter().filter(|(k, _)| k.as_str() != "id") {
                row.set(key.clone(), json_value_to_data_value(value));
            }
            Ok(row)
        })
        .collect()
}

/// Columns for every field seen across the rows, in first-seen order
fn infer_columns(rows: &[DataRow]) -> Vec<DataColumn<String>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for field in row.fields.keys() {
            if seen.insert(field.clone()) {
                columns.push(DataColumn::new(field.clone(), humanize_field(field)));
            }
        }
    }
    debug!(target: "loader", "Inferred {} columns", columns.len());
    columns
}

/// Convert a JSON value to a DataValue, keeping nested values as JSON text
pub fn json_value_to_data_value(json: &JsonValue) -> DataValue {
    match json {
        JsonValue::Null => DataValue::Null,
        JsonValue::Bool(b) => DataValue::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::String(n.to_string())
            }
        }
        JsonValue::String(s) => DataValue::String(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => DataValue::String(json.to_string()),
    }
}
