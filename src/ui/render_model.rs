//! What a table looks like after derivation, independent of any backend.
//!
//! `table_renderer` turns this into text, `table_widget` into a ratatui widget.

use crate::data::data_view::SortOrder;
use crate::data::datatable::Align;
use crate::data::selection::SelectAllState;
use crate::data::view_state::PageSize;

/// A custom control rendered at the end of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub id: String,
    pub label: String,
}

impl RowAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub label: String,
    pub align: Align,
    pub min_width: Option<u16>,
    /// Whether clicking the header sorts
    pub sortable: bool,
    /// Direction when this column is the active sort
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub text: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<RenderedCell>,
    /// `None` when the table is not selectable
    pub selected: Option<bool>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Loading,
    Empty(String),
    Rows(Vec<RenderedRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: PageSize,
    pub total: usize,
    pub page_count: usize,
    pub range_label: String,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toolbar {
    pub export: bool,
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub title: Option<String>,
    /// Current query, present only when the table is searchable
    pub search: Option<String>,
    pub headers: Vec<HeaderCell>,
    /// Header checkbox, present only when the table is selectable
    pub select_all: Option<SelectAllState>,
    pub body: TableBody,
    pub pagination: Option<PaginationInfo>,
    pub toolbar: Toolbar,
    pub has_actions: bool,
}

impl RenderedTable {
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, TableBody::Loading)
    }

    pub fn empty_message(&self) -> Option<&str> {
        match &self.body {
            TableBody::Empty(message) => Some(message),
            _ => None,
        }
    }

    /// Cell texts of one column on the current page
    pub fn column_texts(&self, column: usize) -> Vec<&str> {
        self.rows()
            .iter()
            .filter_map(|row| row.cells.get(column).map(|c| c.text.as_str()))
            .collect()
    }
}
