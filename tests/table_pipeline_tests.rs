use procto_table::data::data_view::{DataView, SortConfig};
use procto_table::data::datatable::{DataColumn, DataRow, DataTable, DataValue, TableRow};
use procto_table::data::selection::SelectAllState;
use procto_table::data::view_state::PageSize;
use procto_table::ui::table_component::{DataTableComponent, TableEvent, TableOptions};
use std::sync::Arc;

/// Twelve scored rows, two of them at 85
fn scored_table() -> Arc<DataTable<DataRow>> {
    let scores = [92, 78, 85, 61, 47, 99, 70, 85, 55, 88, 73, 66];
    let rows = scores.iter().enumerate().map(|(i, score)| {
        DataRow::new(format!("r{:02}", i + 1))
            .with("name", format!("Student {}", i + 1))
            .with("score", *score as i64)
    });
    Arc::new(
        DataTable::from_rows(
            "scores",
            vec![
                DataColumn::new("name".to_string(), "Name"),
                DataColumn::new("score".to_string(), "Score"),
            ],
            rows,
        )
        .unwrap(),
    )
}

fn page_ids(table: &DataTableComponent<DataRow>) -> Vec<String> {
    table.render().rows().iter().map(|r| r.id.clone()).collect()
}

#[test]
fn test_filter_is_idempotent() {
    let table = scored_table();
    let once = DataView::new(table.clone()).filter("student 1", true);
    let twice = DataView::new(table)
        .filter("student 1", true)
        .filter("student 1", true);

    // Student 1, 10, 11, 12
    assert_eq!(once.total_count(), 4);
    assert_eq!(once.visible_row_indices(), twice.visible_row_indices());
}

#[test]
fn test_tied_scores_stay_adjacent_and_ordered() {
    let mut table = DataTableComponent::new(scored_table(), TableOptions::default());

    table.handle_event(TableEvent::HeaderClicked("score".to_string()));
    let ascending: Vec<String> = table
        .view()
        .ordered_rows()
        .iter()
        .map(|r| r.row_id().to_string())
        .collect();
    let pos_a = ascending.iter().position(|id| id == "r03").unwrap();
    assert_eq!(ascending[pos_a + 1], "r08");

    table.handle_event(TableEvent::HeaderClicked("score".to_string()));
    let descending: Vec<String> = table
        .view()
        .ordered_rows()
        .iter()
        .map(|r| r.row_id().to_string())
        .collect();
    let pos_d = descending.iter().position(|id| id == "r03").unwrap();
    assert_eq!(descending[pos_d + 1], "r08");
    assert_eq!(descending[0], "r06");
}

#[test]
fn test_scored_rows_split_ten_and_two() {
    let mut table = DataTableComponent::new(scored_table(), TableOptions::default());
    table.handle_event(TableEvent::HeaderClicked("score".to_string()));

    let first = table.render();
    assert_eq!(first.rows().len(), 10);
    assert_eq!(first.pagination.as_ref().unwrap().range_label, "1–10 of 12");

    table.handle_event(TableEvent::PageChanged(1));
    let second = table.render();
    assert_eq!(second.rows().len(), 2);
    assert_eq!(second.column_texts(1), vec!["92", "99"]);
}

#[test]
fn test_pagination_covers_every_row_once() {
    let rows = (0..30).map(|i| DataRow::new(format!("row{}", i)).with("n", i as i64));
    let source = Arc::new(
        DataTable::from_rows("thirty", vec![DataColumn::new("n".to_string(), "N")], rows).unwrap(),
    );
    let mut table = DataTableComponent::new(source, TableOptions::default());

    let mut seen = Vec::new();
    for page in 0..3 {
        table.handle_event(TableEvent::PageChanged(page));
        let ids = page_ids(&table);
        assert_eq!(ids.len(), 10);
        seen.extend(ids);
    }

    let expected: Vec<String> = (0..30).map(|i| format!("row{}", i)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_selection_survives_sort_changes() {
    let mut table = DataTableComponent::new(
        scored_table(),
        TableOptions::default().with_selectable(true),
    );
    table.handle_event(TableEvent::RowToggled("r05".to_string()));
    table.handle_event(TableEvent::RowToggled("r09".to_string()));

    table.handle_event(TableEvent::HeaderClicked("score".to_string()));
    table.handle_event(TableEvent::HeaderClicked("name".to_string()));

    let selected: Vec<&str> = table.selection().selected_ids().collect();
    assert_eq!(selected, vec!["r05", "r09"]);
    assert_eq!(table.render().select_all, Some(SelectAllState::Some));
}

#[test]
fn test_select_all_ignores_filter_and_page() {
    let source = Arc::new(
        DataTable::from_rows(
            "abc",
            vec![DataColumn::new("name".to_string(), "Name")],
            vec![
                DataRow::new("a").with("name", "Ada"),
                DataRow::new("b").with("name", "Bo"),
                DataRow::new("c").with("name", "Cy"),
            ],
        )
        .unwrap(),
    );
    let mut table = DataTableComponent::new(
        source,
        TableOptions::default()
            .with_selectable(true)
            .with_page_size(PageSize::Five),
    );
    table.handle_event(TableEvent::SearchChanged("ada".to_string()));

    table.handle_event(TableEvent::SelectAllToggled(true));
    let selected: Vec<&str> = table.selection().selected_ids().collect();
    assert_eq!(selected, vec!["a", "b", "c"]);
    assert_eq!(table.render().select_all, Some(SelectAllState::All));

    table.handle_event(TableEvent::SelectAllToggled(false));
    assert!(table.selection().is_empty());
    assert_eq!(table.render().select_all, Some(SelectAllState::None));
}

#[test]
fn test_search_is_case_insensitive_and_empty_message_shows() {
    let source = Arc::new(
        DataTable::from_rows(
            "people",
            vec![DataColumn::new("name".to_string(), "Name")],
            vec![
                DataRow::new("1").with("name", "Alice Johnson"),
                DataRow::new("2").with("name", "Bob Stone"),
            ],
        )
        .unwrap(),
    );
    let mut table = DataTableComponent::new(source, TableOptions::default());

    for query in ["johnson", "JOHNSON", "JoHnSoN"] {
        table.handle_event(TableEvent::SearchChanged(query.to_string()));
        assert_eq!(table.render().column_texts(0), vec!["Alice Johnson"]);
    }

    table.handle_event(TableEvent::SearchChanged("zzz".to_string()));
    let rendered = table.render();
    assert!(rendered.rows().is_empty());
    assert_eq!(rendered.empty_message(), Some("No data available"));
}

#[test]
fn test_loading_hides_rows() {
    let table = DataTableComponent::new(
        scored_table(),
        TableOptions::default().with_loading(true),
    );
    let rendered = table.render();
    assert!(rendered.is_loading());
    assert!(rendered.rows().is_empty());
    assert!(rendered.empty_message().is_none());
}

#[test]
fn test_descending_sort_config_on_view() {
    let view = DataView::new(scored_table())
        .sort_by(Some(&SortConfig::descending("score".to_string())), true)
        .paginate(0, 5, true);
    let scores: Vec<Option<DataValue>> = view
        .page_rows()
        .iter()
        .map(|row| row.value(&"score".to_string()))
        .collect();
    assert_eq!(
        scores,
        vec![
            Some(DataValue::Integer(99)),
            Some(DataValue::Integer(92)),
            Some(DataValue::Integer(88)),
            Some(DataValue::Integer(85)),
            Some(DataValue::Integer(85)),
        ]
    );
}

// Rows with a typed field set instead of string keys

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ExamField {
    Course,
    Room,
    Seats,
}

struct Exam {
    code: String,
    course: String,
    room: String,
    seats: i64,
}

impl TableRow for Exam {
    type Field = ExamField;

    fn row_id(&self) -> &str {
        &self.code
    }

    fn value(&self, field: &ExamField) -> Option<DataValue> {
        Some(match field {
            ExamField::Course => DataValue::from(self.course.as_str()),
            ExamField::Room => DataValue::from(self.room.as_str()),
            ExamField::Seats => DataValue::Integer(self.seats),
        })
    }

    fn values(&self) -> Vec<DataValue> {
        vec![
            DataValue::from(self.code.as_str()),
            DataValue::from(self.course.as_str()),
            DataValue::from(self.room.as_str()),
            DataValue::Integer(self.seats),
        ]
    }
}

fn exam(code: &str, course: &str, room: &str, seats: i64) -> Exam {
    Exam {
        code: code.to_string(),
        course: course.to_string(),
        room: room.to_string(),
        seats,
    }
}

#[test]
fn test_typed_rows_sort_and_search() {
    let source = Arc::new(
        DataTable::from_rows(
            "exams",
            vec![
                DataColumn::new(ExamField::Course, "Course"),
                DataColumn::new(ExamField::Room, "Room").with_sortable(false),
                DataColumn::new(ExamField::Seats, "Seats")
                    .with_formatter(|v| format!("{} seats", v.map(|v| v.to_string()).unwrap_or_default())),
            ],
            vec![
                exam("MATH101", "Calculus", "B-204", 120),
                exam("PHYS201", "Mechanics", "A-110", 45),
                exam("CHEM150", "Organic Chemistry", "C-003", 80),
            ],
        )
        .unwrap(),
    );
    let mut table = DataTableComponent::new(source, TableOptions::default());

    table.handle_event(TableEvent::HeaderClicked(ExamField::Seats));
    assert_eq!(
        table.render().column_texts(2),
        vec!["45 seats", "80 seats", "120 seats"]
    );

    assert!(!table.handle_event(TableEvent::HeaderClicked(ExamField::Room)));

    table.handle_event(TableEvent::SearchChanged("phys".to_string()));
    let rendered = table.render();
    assert_eq!(rendered.rows().len(), 1);
    assert_eq!(rendered.rows()[0].id, "PHYS201");
}
