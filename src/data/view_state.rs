use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::data::data_view::{SortConfig, SortOrder};
use crate::data::selection::SelectionTracker;

/// Rows per page, limited to the sizes the pagination control offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn as_usize(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.as_usize() == value)
            .ok_or_else(|| anyhow!("Unsupported page size {} (expected 5, 10, 25 or 50)", value))
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.as_usize()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

/// UI-owned state that drives the derivation stages
#[derive(Debug, Clone)]
pub struct ViewState<F> {
    pub page: usize,
    pub page_size: PageSize,
    pub sort: Option<SortConfig<F>>,
    pub query: String,
    pub selection: SelectionTracker,
}

impl<F> Default for ViewState<F> {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: PageSize::default(),
            sort: None,
            query: String::new(),
            selection: SelectionTracker::new(),
        }
    }
}

impl<F: Clone + PartialEq + fmt::Debug> ViewState<F> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Header click: same field flips direction, a new field starts ascending
    pub fn request_sort(&mut self, field: F) -> &SortConfig<F> {
        let order = match &self.sort {
            Some(current) if current.field == field => current.order.toggled(),
            _ => SortOrder::Ascending,
        };
        trace!(target: "view_state", "Sort by {:?} {:?}", field, order);
        self.sort.insert(SortConfig { field, order })
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Changing the page size always goes back to the first page
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 0;
    }

    pub fn is_sorted_by(&self, field: &F) -> Option<SortOrder> {
        self.sort
            .as_ref()
            .filter(|sort| &sort.field == field)
            .map(|sort| sort.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_conversion() {
        assert_eq!(PageSize::try_from(25).unwrap(), PageSize::TwentyFive);
        assert!(PageSize::try_from(20).is_err());
        assert_eq!(usize::from(PageSize::Fifty), 50);
        assert_eq!(PageSize::default().as_usize(), 10);
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let mut state: ViewState<&str> = ViewState::default();

        assert_eq!(state.request_sort("score").order, SortOrder::Ascending);
        assert_eq!(state.request_sort("score").order, SortOrder::Descending);
        assert_eq!(state.request_sort("score").order, SortOrder::Ascending);
    }

    #[test]
    fn test_new_field_resets_to_ascending() {
        let mut state: ViewState<&str> = ViewState::default();
        state.request_sort("score");
        state.request_sort("score");
        assert_eq!(state.is_sorted_by(&"score"), Some(SortOrder::Descending));

        let sort = state.request_sort("name");
        assert_eq!(sort.field, "name");
        assert_eq!(sort.order, SortOrder::Ascending);
        assert_eq!(state.is_sorted_by(&"score"), None);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state: ViewState<String> = ViewState::new(PageSize::Five);
        state.set_page(3);
        state.set_page_size(PageSize::TwentyFive);
        assert_eq!(state.page, 0);
        assert_eq!(state.page_size, PageSize::TwentyFive);
    }
}
