use ratatui::layout::{Alignment, Constraint};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::config::config::IconConfig;
use crate::data::datatable::Align;
use crate::data::selection::SelectAllState;
use crate::ui::render_model::{RenderedTable, TableBody};
use crate::ui::table_renderer::{checkbox, header_label};

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

/// Build a ratatui Table widget from a derived table
pub fn build_table_widget(table: &RenderedTable, icons: &IconConfig) -> Table<'static> {
    let checkbox_column = table.select_all.is_some();

    // Header
    let mut header_cells: Vec<Cell> = Vec::new();
    let mut constraints: Vec<Constraint> = Vec::new();
    if let Some(state) = table.select_all {
        header_cells.push(Cell::from(checkbox(state, icons).to_string()));
        constraints.push(Constraint::Length(3));
    }
    for column in &table.headers {
        let label = header_label(column, icons);
        let width = column
            .min_width
            .unwrap_or(0)
            .max(label.chars().count() as u16 + 2);
        header_cells.push(Cell::from(Line::from(label).alignment(alignment(column.align))));
        constraints.push(Constraint::Min(width));
    }
    if table.has_actions {
        header_cells.push(Cell::from("Actions"));
        constraints.push(Constraint::Min(9));
    }
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray));

    // Rows
    let rows: Vec<Row> = match &table.body {
        TableBody::Loading => {
            vec![Row::new(message_cells(
                format!("{} Loading...", icons.loading),
                checkbox_column,
            ))]
        }
        TableBody::Empty(message) => vec![Row::new(message_cells(message.clone(), checkbox_column))],
        TableBody::Rows(rows) => rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> = Vec::new();
                if let Some(selected) = row.selected {
                    let state = if selected {
                        SelectAllState::All
                    } else {
                        SelectAllState::None
                    };
                    cells.push(Cell::from(checkbox(state, icons).to_string()));
                }
                for cell in &row.cells {
                    cells.push(Cell::from(
                        Line::from(cell.text.clone()).alignment(alignment(cell.align)),
                    ));
                }
                if table.has_actions {
                    let labels: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
                    cells.push(Cell::from(labels.join(" ")));
                }

                let style = if row.selected == Some(true) {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect(),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(table.title.clone().unwrap_or_else(|| "Data".to_string()));
    if let Some(pagination) = &table.pagination {
        block = block.title_bottom(
            Line::from(format!(
                " {} · {} per page ",
                pagination.range_label, pagination.page_size
            ))
            .alignment(Alignment::Right),
        );
    }

    Table::new(rows, constraints)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::Blue))
}

/// A status line in the first data column
fn message_cells(message: String, checkbox_column: bool) -> Vec<Cell<'static>> {
    let mut cells = Vec::new();
    if checkbox_column {
        cells.push(Cell::from(""));
    }
    cells.push(Cell::from(message));
    cells
}
