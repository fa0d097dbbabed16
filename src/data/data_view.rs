use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::data::datatable::{DataTable, DataValue, TableRow};
use crate::data::datavalue_compare::compare_datavalues;
use crate::data::search_filter::SearchFilter;
use crate::data::view_state::ViewState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Orient a comparator result. The rows themselves are never reversed,
    /// so equal keys keep their input order in both directions.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Represents how data should be sorted
#[derive(Debug, Clone, PartialEq)]
pub struct SortConfig<F> {
    pub field: F,
    pub order: SortOrder,
}

impl<F> SortConfig<F> {
    pub fn ascending(field: F) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: F) -> Self {
        Self {
            field,
            order: SortOrder::Descending,
        }
    }
}

/// Which derivation stages run for a table instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub filter: bool,
    pub sort: bool,
    pub paginate: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            filter: true,
            sort: true,
            paginate: true,
        }
    }
}

/// Last valid page index for a row count, 0 when there are no rows
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    let last = total.div_ceil(page_size).saturating_sub(1);
    page.min(last)
}

/// The slice of the ordered rows that makes up one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Effective (clamped) page index
    pub page: usize,
    pub page_size: usize,
    /// Rows available before slicing
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn compute(total: usize, page: usize, page_size: usize) -> Self {
        let page = clamp_page(page, total, page_size);
        let start = (page * page_size).min(total);
        let end = (start + page_size).min(total);
        Self {
            page,
            page_size,
            total,
            start,
            end,
        }
    }

    /// A single window over everything, used when pagination is off
    pub fn unpaginated(total: usize) -> Self {
        Self {
            page: 0,
            page_size: total,
            total,
            start: 0,
            end: total,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.end < self.total
    }

    /// "1–10 of 12" style label, one-based
    pub fn range_label(&self) -> String {
        let from = if self.is_empty() { 0 } else { self.start + 1 };
        format!("{}–{} of {}", from, self.end, self.total)
    }
}

/// Stable sort of row indices by one field
pub fn sort_indices<R: TableRow>(
    table: &DataTable<R>,
    indices: Vec<usize>,
    sort: Option<&SortConfig<R::Field>>,
    enabled: bool,
) -> Vec<usize> {
    let Some(sort) = sort else {
        return indices;
    };
    if !enabled {
        return indices;
    }
    if let Some(column) = table.column(&sort.field) {
        if !column.sortable {
            debug!(target: "data_view", "Column {:?} is not sortable", sort.field);
            return indices;
        }
    }

    let mut keyed: Vec<(usize, Option<DataValue>)> = indices
        .into_iter()
        .map(|idx| {
            let key = table.get_row(idx).and_then(|row| row.value(&sort.field));
            (idx, key)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| sort.order.apply(compare_datavalues(a.as_ref(), b.as_ref())));

    keyed.into_iter().map(|(idx, _)| idx).collect()
}

/// A view over a DataTable that filters, sorts and pages rows
/// without modifying the underlying data
#[derive(Debug, Clone)]
pub struct DataView<R: TableRow> {
    /// The underlying immutable data source
    source: Arc<DataTable<R>>,

    /// Row indices after filtering and sorting
    visible_rows: Vec<usize>,

    /// Current page over `visible_rows`
    window: PageWindow,
}

impl<R: TableRow> DataView<R> {
    /// Create a new view showing all data from the table
    pub fn new(source: Arc<DataTable<R>>) -> Self {
        let row_count = source.row_count();
        Self {
            source,
            visible_rows: (0..row_count).collect(),
            window: PageWindow::unpaginated(row_count),
        }
    }

    /// Run filter, sort and paginate for the given view state
    pub fn derive(source: Arc<DataTable<R>>, state: &ViewState<R::Field>, stages: Stages) -> Self {
        let view = Self::new(source)
            .filter(&state.query, stages.filter)
            .sort_by(state.sort.as_ref(), stages.sort)
            .paginate(state.page, state.page_size.as_usize(), stages.paginate);

        debug!(
            target: "data_view",
            "Derived {} of {} rows, page {} ({})",
            view.row_count(),
            view.source.row_count(),
            view.window.page,
            view.window.range_label()
        );
        view
    }

    /// Keep only rows matching a free-text query
    pub fn filter(mut self, query: &str, enabled: bool) -> Self {
        self.visible_rows =
            SearchFilter::filter_indices(&self.source, &self.visible_rows, query, enabled);
        self.window = PageWindow::unpaginated(self.visible_rows.len());
        self
    }

    /// Order rows by one field
    pub fn sort_by(mut self, sort: Option<&SortConfig<R::Field>>, enabled: bool) -> Self {
        self.visible_rows = sort_indices(&self.source, self.visible_rows, sort, enabled);
        self
    }

    /// Select one page; the page index is clamped to the last page with rows
    pub fn paginate(mut self, page: usize, page_size: usize, enabled: bool) -> Self {
        let total = self.visible_rows.len();
        self.window = if enabled {
            PageWindow::compute(total, page, page_size)
        } else {
            PageWindow::unpaginated(total)
        };
        self
    }

    /// Rows on the current page
    pub fn row_count(&self) -> usize {
        self.window.len()
    }

    /// Rows after filtering, before paging
    pub fn total_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn page_window(&self) -> PageWindow {
        self.window
    }

    /// Visible row indices (before paging)
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }

    /// Row indices on the current page
    pub fn page_indices(&self) -> &[usize] {
        &self.visible_rows[self.window.start..self.window.end]
    }

    pub fn page_rows(&self) -> Vec<&R> {
        self.page_indices()
            .iter()
            .filter_map(|&idx| self.source.get_row(idx))
            .collect()
    }

    /// All filtered and sorted rows, every page
    pub fn ordered_rows(&self) -> Vec<&R> {
        self.visible_rows
            .iter()
            .filter_map(|&idx| self.source.get_row(idx))
            .collect()
    }

    pub fn source(&self) -> &DataTable<R> {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow};

    fn create_test_table() -> Arc<DataTable<DataRow>> {
        let rows = vec![
            DataRow::new("a").with("name", "Dana").with("score", 70_i64),
            DataRow::new("b").with("name", "alice").with("score", 92_i64),
            DataRow::new("c").with("name", "Carl").with("score", 70_i64),
            DataRow::new("d").with("name", "Bea"),
        ];
        Arc::new(
            DataTable::from_rows(
                "results",
                vec![
                    DataColumn::new("name".to_string(), "Name"),
                    DataColumn::new("score".to_string(), "Score"),
                    DataColumn::new("notes".to_string(), "Notes").with_sortable(false),
                ],
                rows,
            )
            .unwrap(),
        )
    }

    fn ids(view: &DataView<DataRow>) -> Vec<&str> {
        view.page_rows().iter().map(|r| r.row_id()).collect()
    }

    #[test]
    fn test_new_view_shows_all_rows() {
        let view = DataView::new(create_test_table());
        assert_eq!(view.row_count(), 4);
        assert_eq!(ids(&view), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let view = DataView::new(create_test_table())
            .sort_by(Some(&SortConfig::ascending("name".to_string())), true);
        assert_eq!(ids(&view), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_sort_descending_keeps_ties_in_input_order() {
        let view = DataView::new(create_test_table())
            .sort_by(Some(&SortConfig::descending("score".to_string())), true);
        // d has no score and ranks after every number
        assert_eq!(ids(&view), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_mixed_number_and_text_column() {
        // Same column holds integers, numeric strings, words and gaps
        let rows = (0..2000_i64).map(|i| {
            let v = (i * 7919) % 1000;
            let row = DataRow::new(format!("r{}", i));
            match i % 4 {
                0 => row.with("score", v),
                1 => row.with("score", v.to_string()),
                2 => row.with("score", (v as f64) / 3.0),
                _ if i % 8 == 3 => row.with("score", format!("Grade {}", v % 7)),
                _ => row,
            }
        });
        let table = Arc::new(DataTable::from_rows("mixed", Vec::new(), rows).unwrap());

        for sort in [
            SortConfig::ascending("score".to_string()),
            SortConfig::descending("score".to_string()),
        ] {
            let view = DataView::new(table.clone()).sort_by(Some(&sort), true);
            assert_eq!(view.total_count(), 2000);

            let keys: Vec<Option<DataValue>> = view
                .ordered_rows()
                .iter()
                .map(|row| row.value(&"score".to_string()))
                .collect();
            for pair in keys.windows(2) {
                let ordering = sort
                    .order
                    .apply(compare_datavalues(pair[0].as_ref(), pair[1].as_ref()));
                assert_ne!(ordering, Ordering::Greater);
            }
        }

        // numbers first when ascending
        let ascending = DataView::new(table)
            .sort_by(Some(&SortConfig::ascending("score".to_string())), true);
        let first = ascending.ordered_rows()[0].value(&"score".to_string());
        assert_eq!(first, Some(DataValue::Integer(0)));
    }

    #[test]
    fn test_unsortable_column_passes_through() {
        let view = DataView::new(create_test_table())
            .sort_by(Some(&SortConfig::ascending("notes".to_string())), true);
        assert_eq!(ids(&view), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_disabled_passes_through() {
        let view = DataView::new(create_test_table())
            .sort_by(Some(&SortConfig::ascending("name".to_string())), false);
        assert_eq!(ids(&view), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_paginate_slices_page() {
        let view = DataView::new(create_test_table()).paginate(1, 3, true);
        assert_eq!(ids(&view), vec!["d"]);
        assert_eq!(view.total_count(), 4);
        assert_eq!(view.page_window().range_label(), "4–4 of 4");
    }

    #[test]
    fn test_paginate_clamps_out_of_range_page() {
        let view = DataView::new(create_test_table()).paginate(7, 2, true);
        assert_eq!(view.page_window().page, 1);
        assert_eq!(ids(&view), vec!["c", "d"]);
    }

    #[test]
    fn test_pagination_disabled_returns_everything() {
        let view = DataView::new(create_test_table()).paginate(3, 2, false);
        assert_eq!(view.row_count(), 4);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(5, 0, 10), 0);
        assert_eq!(clamp_page(2, 30, 10), 2);
        assert_eq!(clamp_page(3, 30, 10), 2);
        assert_eq!(clamp_page(1, 11, 10), 1);
    }

    #[test]
    fn test_empty_window_label() {
        let window = PageWindow::compute(0, 0, 10);
        assert!(window.is_empty());
        assert_eq!(window.range_label(), "0–0 of 0");
        assert_eq!(window.page_count(), 0);
        assert!(!window.has_next());
    }
}
