use crate::data::datatable::{DataTable, TableRow};
use tracing::debug;

/// Free-text filtering over table rows
pub struct SearchFilter;

impl SearchFilter {
    /// Whether a query actually restricts anything
    pub fn is_active(query: &str, enabled: bool) -> bool {
        enabled && !query.trim().is_empty()
    }

    /// Check a row against an already-lowercased needle
    pub fn row_matches<R: TableRow>(row: &R, needle: &str) -> bool {
        row.values()
            .iter()
            .any(|value| value.to_string().to_lowercase().contains(needle))
    }

    /// Indices of every row in the table that matches the query
    pub fn apply<R: TableRow>(table: &DataTable<R>, query: &str, enabled: bool) -> Vec<usize> {
        let all: Vec<usize> = (0..table.row_count()).collect();
        Self::filter_indices(table, &all, query, enabled)
    }

    /// Narrow a set of row indices down to the ones matching the query.
    /// Order of the input is preserved.
    pub fn filter_indices<R: TableRow>(
        table: &DataTable<R>,
        indices: &[usize],
        query: &str,
        enabled: bool,
    ) -> Vec<usize> {
        if !Self::is_active(query, enabled) {
            return indices.to_vec();
        }

        let needle = query.to_lowercase();
        let matched: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&idx| {
                table
                    .get_row(idx)
                    .map(|row| Self::row_matches(row, &needle))
                    .unwrap_or(false)
            })
            .collect();

        debug!(
            target: "search_filter",
            "Query '{}' kept {} of {} rows",
            query,
            matched.len(),
            indices.len()
        );
        matched
    }
}
