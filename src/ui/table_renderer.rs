use comfy_table::{
    Attribute, Cell, CellAlignment, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::config::config::IconConfig;
use crate::data::data_view::SortOrder;
use crate::data::datatable::Align;
use crate::data::selection::SelectAllState;
use crate::ui::render_model::{HeaderCell, RenderedTable, TableBody};

fn cell_alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

pub fn checkbox(state: SelectAllState, icons: &IconConfig) -> &str {
    match state {
        SelectAllState::All => &icons.checked,
        SelectAllState::Some => &icons.indeterminate,
        SelectAllState::None => &icons.unchecked,
    }
}

/// Header text with the sort marker of the active column
pub fn header_label(header: &HeaderCell, icons: &IconConfig) -> String {
    match header.sort {
        Some(SortOrder::Ascending) => format!("{} {}", header.label, icons.sort_ascending),
        Some(SortOrder::Descending) => format!("{} {}", header.label, icons.sort_descending),
        None => header.label.clone(),
    }
}

/// Render a derived table as plain text. `width` enables dynamic wrapping.
pub fn render_text(table: &RenderedTable, icons: &IconConfig, width: Option<u16>) -> String {
    let mut output = String::new();

    if let Some(title) = &table.title {
        output.push_str(title);
        output.push('\n');
    }
    if let Some(query) = &table.search {
        output.push_str(&format!("Search: {}\n", query));
    }

    let mut grid = Table::new();
    match width {
        Some(width) => {
            grid.set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(width);
        }
        None => {
            grid.set_content_arrangement(ContentArrangement::Disabled);
        }
    }

    // Header
    let mut header: Vec<Cell> = Vec::new();
    let mut constraints: Vec<ColumnConstraint> = Vec::new();
    if let Some(state) = table.select_all {
        header.push(Cell::new(checkbox(state, icons)));
        constraints.push(ColumnConstraint::ContentWidth);
    }
    for column in &table.headers {
        header.push(
            Cell::new(header_label(column, icons))
                .add_attribute(Attribute::Bold)
                .set_alignment(cell_alignment(column.align)),
        );
        constraints.push(match column.min_width {
            Some(min) => ColumnConstraint::LowerBoundary(Width::Fixed(min)),
            None => ColumnConstraint::ContentWidth,
        });
    }
    if table.has_actions {
        header.push(Cell::new("Actions").add_attribute(Attribute::Bold));
        constraints.push(ColumnConstraint::ContentWidth);
    }
    grid.set_header(header);

    // Rows
    for row in table.rows() {
        let mut cells: Vec<Cell> = Vec::new();
        if let Some(selected) = row.selected {
            let state = if selected {
                SelectAllState::All
            } else {
                SelectAllState::None
            };
            cells.push(Cell::new(checkbox(state, icons)));
        }
        for cell in &row.cells {
            cells.push(Cell::new(&cell.text).set_alignment(cell_alignment(cell.align)));
        }
        if table.has_actions {
            let labels: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
            cells.push(Cell::new(labels.join(" | ")));
        }
        grid.add_row(cells);
    }
    grid.set_constraints(constraints);

    output.push_str(&grid.to_string());
    output.push('\n');

    match &table.body {
        TableBody::Loading => output.push_str(&format!("{} Loading...\n", icons.loading)),
        TableBody::Empty(message) => {
            output.push_str(message);
            output.push('\n');
        }
        TableBody::Rows(_) => {}
    }

    if let Some(pagination) = &table.pagination {
        output.push_str(&format!(
            "Rows per page: {}   {}   Page {}/{}\n",
            pagination.page_size,
            pagination.range_label,
            pagination.page + 1,
            pagination.page_count.max(1)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::view_state::PageSize;
    use crate::ui::render_model::{
        PaginationInfo, RenderedCell, RenderedRow, RowAction, Toolbar,
    };

    fn header(label: &str, sort: Option<SortOrder>) -> HeaderCell {
        HeaderCell {
            label: label.to_string(),
            align: Align::Left,
            min_width: None,
            sortable: true,
            sort,
        }
    }

    fn rendered(body: TableBody) -> RenderedTable {
        RenderedTable {
            title: Some("Upcoming Exams".to_string()),
            search: Some("phys".to_string()),
            headers: vec![header("Exam", Some(SortOrder::Descending)), header("Seats", None)],
            select_all: Some(SelectAllState::Some),
            body,
            pagination: Some(PaginationInfo {
                page: 0,
                page_size: PageSize::Ten,
                total: 1,
                page_count: 1,
                range_label: "1–1 of 1".to_string(),
                has_previous: false,
                has_next: false,
            }),
            toolbar: Toolbar::default(),
            has_actions: true,
        }
    }

    #[test]
    fn test_render_rows() {
        let table = rendered(TableBody::Rows(vec![RenderedRow {
            id: "e1".to_string(),
            cells: vec![
                RenderedCell {
                    text: "Physics".to_string(),
                    align: Align::Left,
                },
                RenderedCell {
                    text: "40".to_string(),
                    align: Align::Right,
                },
            ],
            selected: Some(true),
            actions: vec![RowAction::new("view", "View"), RowAction::new("flag", "Flag")],
        }]));

        let text = render_text(&table, &IconConfig::simple(), None);
        assert!(text.starts_with("Upcoming Exams\nSearch: phys\n"));
        assert!(text.contains("Exam v"));
        assert!(text.contains("[-]"));
        assert!(text.contains("[x]"));
        assert!(text.contains("Physics"));
        assert!(text.contains("View | Flag"));
        assert!(text.contains("Rows per page: 10   1–1 of 1   Page 1/1"));
    }

    #[test]
    fn test_render_empty_and_loading() {
        let empty = render_text(
            &rendered(TableBody::Empty("No data available".to_string())),
            &IconConfig::simple(),
            None,
        );
        assert!(empty.contains("No data available"));

        let loading = render_text(&rendered(TableBody::Loading), &IconConfig::simple(), None);
        assert!(loading.contains("... Loading..."));
        assert!(!loading.contains("No data available"));
    }
}
