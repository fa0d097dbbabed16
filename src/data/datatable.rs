use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Text shown for a field the row does not carry at all
pub const UNDEFINED_TEXT: &str = "undefined";

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl DataValue {
    /// Infer a typed value from raw text (CSV cells, CLI input)
    pub fn infer_from_str(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("null") {
            return DataValue::Null;
        }

        if value.eq_ignore_ascii_case("true") {
            return DataValue::Boolean(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return DataValue::Boolean(false);
        }

        if let Ok(i) = value.parse::<i64>() {
            return DataValue::Integer(i);
        }

        if let Ok(f) = value.parse::<f64>() {
            return DataValue::Float(f);
        }

        DataValue::String(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataValue::Integer(_) | DataValue::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

/// Default string coercion of a possibly-absent value
pub fn display_text(value: Option<&DataValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNDEFINED_TEXT.to_string(),
    }
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Turns a cell value into its display string
pub type CellFormatter = Arc<dyn Fn(Option<&DataValue>) -> String + Send + Sync>;

/// Column descriptor: which field to show and how
#[derive(Clone)]
pub struct DataColumn<F> {
    pub field: F,
    pub label: String,
    pub min_width: Option<u16>,
    pub align: Align,
    pub formatter: Option<CellFormatter>,
    pub sortable: bool,
}

impl<F> DataColumn<F> {
    pub fn new(field: F, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            min_width: None,
            align: Align::Left,
            formatter: None,
            sortable: true,
        }
    }

    pub fn with_min_width(mut self, min_width: u16) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_formatter<G>(mut self, formatter: G) -> Self
    where
        G: Fn(Option<&DataValue>) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Format a value with the column formatter, falling back to string coercion
    pub fn format(&self, value: Option<&DataValue>) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => display_text(value),
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for DataColumn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataColumn")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("min_width", &self.min_width)
            .field("align", &self.align)
            .field("formatter", &self.formatter.is_some())
            .field("sortable", &self.sortable)
            .finish()
    }
}

/// A row the table can display.
///
/// `Field` is the caller's field-name type: an enum for typed rows,
/// `String` for schema-less fixture rows.
pub trait TableRow {
    type Field: Clone + Eq + Hash + fmt::Debug;

    /// Unique, stable identifier of the row
    fn row_id(&self) -> &str;

    /// Value of one field, `None` when the row does not carry it
    fn value(&self, field: &Self::Field) -> Option<DataValue>;

    /// Every value the row carries, id included. Free-text search scans these.
    fn values(&self) -> Vec<DataValue>;
}

/// Schema-less row keyed by field name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: String,
    pub fields: BTreeMap<String, DataValue>,
}

impl DataRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<DataValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&DataValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TableRow for DataRow {
    type Field = String;

    fn row_id(&self) -> &str {
        &self.id
    }

    fn value(&self, field: &String) -> Option<DataValue> {
        if field == "id" {
            return Some(DataValue::String(self.id.clone()));
        }
        self.fields.get(field).cloned()
    }

    fn values(&self) -> Vec<DataValue> {
        std::iter::once(DataValue::String(self.id.clone()))
            .chain(self.fields.values().cloned())
            .collect()
    }
}

/// Rows plus the column descriptors used to show them
#[derive(Debug, Clone)]
pub struct DataTable<R: TableRow> {
    pub name: String,
    pub columns: Vec<DataColumn<R::Field>>,
    rows: Vec<R>,
    /// Row id to position in `rows`
    index: HashMap<String, usize>,
    pub metadata: HashMap<String, String>,
}

impl<R: TableRow> DataTable<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            index: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Build a table in one go, rejecting duplicate row ids
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<DataColumn<R::Field>>,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self> {
        let mut table = Self::new(name);
        table.columns = columns;
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    pub fn add_column(&mut self, column: DataColumn<R::Field>) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: R) -> Result<()> {
        if self.index.contains_key(row.row_id()) {
            bail!(
                "Duplicate row id '{}' in table '{}'",
                row.row_id(),
                self.name
            );
        }
        self.index.insert(row.row_id().to_string(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn get_row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn find_row(&self, id: &str) -> Option<&R> {
        self.index.get(id).and_then(|&idx| self.rows.get(idx))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids of every row, in dataset order
    pub fn row_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.row_id())
    }

    pub fn column(&self, field: &R::Field) -> Option<&DataColumn<R::Field>> {
        self.columns.iter().find(|c| &c.field == field)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }
}
