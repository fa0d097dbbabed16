use crate::data::data_view::DataView;
use crate::data::datatable::TableRow;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Exports the filtered and sorted rows of a view, every page included,
/// using each column's formatter
pub struct DataExporter;

impl DataExporter {
    /// Timestamped file name such as `exam_results_20250101_093000.csv`
    pub fn default_filename(prefix: &str, extension: &str) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.{}", prefix, timestamp, extension)
    }

    fn header<R: TableRow>(view: &DataView<R>) -> Vec<String> {
        std::iter::once("id".to_string())
            .chain(view.source().column_labels())
            .collect()
    }

    fn formatted_rows<R: TableRow>(view: &DataView<R>) -> Result<Vec<Vec<String>>> {
        let rows = view.ordered_rows();
        if rows.is_empty() {
            bail!("No data to export");
        }

        let columns = &view.source().columns;
        Ok(rows
            .into_iter()
            .map(|row| {
                std::iter::once(row.row_id().to_string())
                    .chain(
                        columns
                            .iter()
                            .map(|column| column.format(row.value(&column.field).as_ref())),
                    )
                    .collect()
            })
            .collect())
    }

    /// Write CSV, returning the number of data rows written
    pub fn write_csv<R: TableRow, W: Write>(view: &DataView<R>, writer: W) -> Result<usize> {
        let rows = Self::formatted_rows(view)?;
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(Self::header(view))?;
        for row in &rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;

        Ok(rows.len())
    }

    /// Write a pretty JSON array of objects keyed by column label
    pub fn write_json<R: TableRow, W: Write>(view: &DataView<R>, writer: W) -> Result<usize> {
        let rows = Self::formatted_rows(view)?;
        let header = Self::header(view);

        let json_array: Vec<Value> = rows
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, Value> = header
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(Value::String))
                    .collect();
                Value::Object(obj)
            })
            .collect();

        serde_json::to_writer_pretty(writer, &json_array)?;
        Ok(rows.len())
    }

    /// Export to a file, choosing CSV or JSON from the extension
    pub fn export_to_file<R: TableRow, P: AsRef<Path>>(
        view: &DataView<R>,
        path: P,
    ) -> Result<String> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| anyhow!("Export path {:?} has no extension", path))?;

        if extension != "csv" && extension != "json" {
            bail!("Unsupported export format '{}'", extension);
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create export file: {:?}", path))?;
        let writer = BufWriter::new(file);

        let count = if extension == "csv" {
            Self::write_csv(view, writer)?
        } else {
            Self::write_json(view, writer)?
        };

        info!(target: "export", "Exported {} rows to {:?}", count, path);
        Ok(format!("✓ Exported {} rows to {}", count, path.display()))
    }
}
