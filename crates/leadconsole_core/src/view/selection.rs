//! Checked-row tracking, independent of filters and pagination.

use super::columns::TableRow;
use std::collections::BTreeSet;

/// Set of selected row ids.
///
/// Selection survives page, sort and filter changes; it is only cleared
/// explicitly or pruned against the current rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: BTreeSet<String>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn set_selected(&mut self, id: impl Into<String>, selected: bool) {
        let id = id.into();
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Flips one row and returns its new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Selects or deselects every row of the given page.
    pub fn set_page_selected<T: TableRow>(&mut self, page_rows: &[&T], selected: bool) {
        for row in page_rows {
            self.set_selected(row.row_id(), selected);
        }
    }

    /// True when the page is non-empty and every row on it is selected.
    pub fn is_all_page_selected<T: TableRow>(&self, page_rows: &[&T]) -> bool {
        !page_rows.is_empty() && page_rows.iter().all(|row| self.is_selected(row.row_id()))
    }

    /// True when some, but not all, rows of the page are selected.
    pub fn is_some_page_selected<T: TableRow>(&self, page_rows: &[&T]) -> bool {
        let selected = page_rows
            .iter()
            .filter(|row| self.is_selected(row.row_id()))
            .count();
        selected > 0 && selected < page_rows.len()
    }

    /// Selected ids in stable order, ready for a bulk delete.
    pub fn selected_ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that no longer exist in `rows`.
    pub fn retain_existing<T: TableRow>(&mut self, rows: &[T]) {
        let existing: BTreeSet<&str> = rows.iter().map(|row| row.row_id()).collect();
        self.ids.retain(|id| existing.contains(id.as_str()));
    }
}
