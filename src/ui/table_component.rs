use std::sync::Arc;
use tracing::debug;

use crate::config::config::TableDefaults;
use crate::data::data_view::{clamp_page, DataView, Stages};
use crate::data::datatable::{DataTable, TableRow};
use crate::data::selection::SelectionTracker;
use crate::data::view_state::{PageSize, ViewState};
use crate::ui::render_model::{
    HeaderCell, PaginationInfo, RenderedCell, RenderedRow, RenderedTable, RowAction, TableBody,
    Toolbar,
};

pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

/// Per-instance switches of the table
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub title: Option<String>,
    pub searchable: bool,
    pub selectable: bool,
    pub pagination: bool,
    pub sortable: bool,
    pub empty_message: String,
    pub loading: bool,
    /// Rows per page the table starts with
    pub page_size: PageSize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title: None,
            searchable: true,
            selectable: false,
            pagination: true,
            sortable: true,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            loading: false,
            page_size: PageSize::default(),
        }
    }
}

impl From<&TableDefaults> for TableOptions {
    fn from(defaults: &TableDefaults) -> Self {
        Self {
            title: None,
            searchable: defaults.searchable,
            selectable: defaults.selectable,
            pagination: defaults.pagination,
            sortable: defaults.sortable,
            empty_message: defaults.empty_message.clone(),
            loading: false,
            page_size: defaults.page_size(),
        }
    }
}

impl TableOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn stages(&self) -> Stages {
        Stages {
            filter: self.searchable,
            sort: self.sortable,
            paginate: self.pagination,
        }
    }
}

type RowCallback<R> = Box<dyn FnMut(&R)>;
type ActionCallback<R> = Box<dyn FnMut(&R, &str)>;
type ActionRenderer<R> = Box<dyn Fn(&R) -> Vec<RowAction>>;
type ButtonCallback = Box<dyn FnMut()>;

/// Callbacks the caller wires into the table
pub struct TableCallbacks<R> {
    on_row_click: Option<RowCallback<R>>,
    on_action: Option<ActionCallback<R>>,
    render_actions: Option<ActionRenderer<R>>,
    on_export: Option<ButtonCallback>,
    on_refresh: Option<ButtonCallback>,
}

impl<R> Default for TableCallbacks<R> {
    fn default() -> Self {
        Self {
            on_row_click: None,
            on_action: None,
            render_actions: None,
            on_export: None,
            on_refresh: None,
        }
    }
}

impl<R> TableCallbacks<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_row_click(mut self, callback: impl FnMut(&R) + 'static) -> Self {
        self.on_row_click = Some(Box::new(callback));
        self
    }

    pub fn on_action(mut self, callback: impl FnMut(&R, &str) + 'static) -> Self {
        self.on_action = Some(Box::new(callback));
        self
    }

    pub fn render_actions(mut self, renderer: impl Fn(&R) -> Vec<RowAction> + 'static) -> Self {
        self.render_actions = Some(Box::new(renderer));
        self
    }

    pub fn on_export(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_export = Some(Box::new(callback));
        self
    }

    pub fn on_refresh(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_refresh = Some(Box::new(callback));
        self
    }
}

/// User interaction with the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<F> {
    SearchChanged(String),
    HeaderClicked(F),
    RowClicked(String),
    /// A click on a row action; never reaches the row-click callback
    ActionClicked { row_id: String, action: String },
    RowToggled(String),
    SelectAllToggled(bool),
    PageChanged(usize),
    PageSizeChanged(PageSize),
    ExportClicked,
    RefreshClicked,
}

/// Sortable, filterable, paginated table over caller-supplied rows
pub struct DataTableComponent<R: TableRow> {
    source: Arc<DataTable<R>>,
    options: TableOptions,
    state: ViewState<R::Field>,
    callbacks: TableCallbacks<R>,
}

impl<R: TableRow> DataTableComponent<R> {
    pub fn new(source: Arc<DataTable<R>>, options: TableOptions) -> Self {
        let state = ViewState::new(options.page_size);
        Self {
            source,
            options,
            state,
            callbacks: TableCallbacks::default(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: TableCallbacks<R>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn source(&self) -> &DataTable<R> {
        &self.source
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn state(&self) -> &ViewState<R::Field> {
        &self.state
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.state.selection
    }

    /// Replace the rows. Selection is kept; the page is pulled back if needed.
    pub fn set_source(&mut self, source: Arc<DataTable<R>>) {
        debug!(
            target: "table_component",
            "New dataset '{}' with {} rows",
            source.name,
            source.row_count()
        );
        self.source = source;
        self.sync_page();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    /// Filter, sort and page the current rows
    pub fn view(&self) -> DataView<R> {
        DataView::derive(self.source.clone(), &self.state, self.options.stages())
    }

    fn sync_page(&mut self) {
        if self.options.pagination {
            self.state.page = self.view().page_window().page;
        }
    }

    /// Apply one interaction. Returns true when the view state changed.
    pub fn handle_event(&mut self, event: TableEvent<R::Field>) -> bool {
        crate::trace_event!(&event);

        match event {
            TableEvent::SearchChanged(query) => {
                if !self.options.searchable {
                    return false;
                }
                self.state.set_query(query);
                self.sync_page();
                true
            }
            TableEvent::HeaderClicked(field) => {
                if !self.options.sortable {
                    return false;
                }
                if let Some(column) = self.source.column(&field) {
                    if !column.sortable {
                        return false;
                    }
                }
                self.state.request_sort(field);
                true
            }
            TableEvent::RowClicked(row_id) => {
                if let (Some(callback), Some(row)) = (
                    self.callbacks.on_row_click.as_mut(),
                    self.source.find_row(&row_id),
                ) {
                    callback(row);
                }
                false
            }
            TableEvent::ActionClicked { row_id, action } => {
                if let (Some(callback), Some(row)) = (
                    self.callbacks.on_action.as_mut(),
                    self.source.find_row(&row_id),
                ) {
                    callback(row, &action);
                }
                false
            }
            TableEvent::RowToggled(row_id) => {
                if !self.options.selectable || !self.source.contains_id(&row_id) {
                    return false;
                }
                self.state.selection.toggle(&row_id);
                true
            }
            TableEvent::SelectAllToggled(checked) => {
                if !self.options.selectable {
                    return false;
                }
                self.state.selection.set_all(checked, self.source.row_ids());
                true
            }
            TableEvent::PageChanged(page) => {
                if !self.options.pagination {
                    return false;
                }
                let total = self.view().total_count();
                self.state
                    .set_page(clamp_page(page, total, self.state.page_size.as_usize()));
                true
            }
            TableEvent::PageSizeChanged(page_size) => {
                self.state.set_page_size(page_size);
                true
            }
            TableEvent::ExportClicked => {
                if let Some(callback) = self.callbacks.on_export.as_mut() {
                    callback();
                }
                false
            }
            TableEvent::RefreshClicked => {
                if let Some(callback) = self.callbacks.on_refresh.as_mut() {
                    callback();
                }
                false
            }
        }
    }

    /// Derive everything a renderer needs
    pub fn render(&self) -> RenderedTable {
        let options = &self.options;
        let columns = &self.source.columns;

        let headers = columns
            .iter()
            .map(|column| {
                let sortable = options.sortable && column.sortable;
                HeaderCell {
                    label: column.label.clone(),
                    align: column.align,
                    min_width: column.min_width,
                    sortable,
                    sort: if sortable {
                        self.state.is_sorted_by(&column.field)
                    } else {
                        None
                    },
                }
            })
            .collect();

        let select_all = options
            .selectable
            .then(|| self.state.selection.state(self.source.row_ids()));

        let view = self.view();
        let window = view.page_window();

        let body = if options.loading {
            TableBody::Loading
        } else if window.is_empty() {
            TableBody::Empty(options.empty_message.clone())
        } else {
            TableBody::Rows(
                view.page_rows()
                    .into_iter()
                    .map(|row| self.render_row(row))
                    .collect(),
            )
        };

        let pagination = options.pagination.then(|| PaginationInfo {
            page: window.page,
            page_size: self.state.page_size,
            total: window.total,
            page_count: window.page_count(),
            range_label: window.range_label(),
            has_previous: window.has_previous(),
            has_next: window.has_next(),
        });

        RenderedTable {
            title: options.title.clone(),
            search: options.searchable.then(|| self.state.query.clone()),
            headers,
            select_all,
            body,
            pagination,
            toolbar: Toolbar {
                export: self.callbacks.on_export.is_some(),
                refresh: self.callbacks.on_refresh.is_some(),
            },
            has_actions: self.callbacks.render_actions.is_some(),
        }
    }

    fn render_row(&self, row: &R) -> RenderedRow {
        let cells = self
            .source
            .columns
            .iter()
            .map(|column| RenderedCell {
                text: column.format(row.value(&column.field).as_ref()),
                align: column.align,
            })
            .collect();

        RenderedRow {
            id: row.row_id().to_string(),
            cells,
            selected: self
                .options
                .selectable
                .then(|| self.state.selection.is_selected(row.row_id())),
            actions: self
                .callbacks
                .render_actions
                .as_ref()
                .map(|render| render(row))
                .unwrap_or_default(),
        }
    }
}
