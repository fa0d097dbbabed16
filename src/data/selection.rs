//! Row selection keyed by row id.
//!
//! Selection is independent of filtering, sorting and paging: a row stays
//! selected while it is hidden by a query or sits on another page.

use std::collections::BTreeSet;
use tracing::trace;

/// Tri-state of the "select all" checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    None,
    Some,
    All,
}

impl SelectAllState {
    pub fn is_checked(self) -> bool {
        self == SelectAllState::All
    }

    pub fn is_indeterminate(self) -> bool {
        self == SelectAllState::Some
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row. Returns whether the row is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        let selected = if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        };
        trace!(target: "selection", "Row '{}' selected={}", id, selected);
        selected
    }

    /// Handle the header checkbox: checked selects every given id, unchecked clears
    pub fn set_all<'a, I>(&mut self, checked: bool, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.selected.clear();
        if checked {
            self.selected.extend(ids.into_iter().map(str::to_string));
        }
        trace!(target: "selection", "Select all={} -> {} rows", checked, self.selected.len());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Every selected id, stale ones included
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected ids still present in the dataset
    pub fn count_present<'a, I>(&self, present: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        present
            .into_iter()
            .filter(|id| self.selected.contains(*id))
            .count()
    }

    /// Checkbox state computed against the ids currently in the dataset.
    /// Ids of rows that have since disappeared are ignored.
    pub fn state<'a, I>(&self, present: I) -> SelectAllState
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (total, selected) = present.into_iter().fold((0, 0), |(total, selected), id| {
            (total + 1, selected + usize::from(self.selected.contains(id)))
        });
        if selected == 0 {
            SelectAllState::None
        } else if selected == total {
            SelectAllState::All
        } else {
            SelectAllState::Some
        }
    }

    /// Drop ids that are no longer in the dataset
    pub fn retain_present<'a, I>(&mut self, present: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let kept: BTreeSet<String> = present
            .into_iter()
            .filter(|id| self.selected.contains(*id))
            .map(str::to_string)
            .collect();
        self.selected = kept;
    }
}
