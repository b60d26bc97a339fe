//! Interactive state of one table, turned into a `ViewSpec` per render.
//!
//! # Invariants
//! - A sort is always active; toggling never removes it.
//! - Changing a filter returns to the first page.
//! - Only hideable columns can be hidden.

use super::columns::TableRow;
use super::query::{query, SortSpec, ViewResult, ViewSpec};
use super::selection::RowSelection;
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// Filters, sort, pagination, visibility and selection for a table of `T`.
#[derive(Debug, Clone)]
pub struct TableState<T: TableRow> {
    spec: ViewSpec,
    selection: RowSelection,
    _rows: PhantomData<fn() -> T>,
}

impl<T: TableRow> Default for TableState<T> {
    fn default() -> Self {
        Self {
            spec: ViewSpec::default(),
            selection: RowSelection::default(),
            _rows: PhantomData,
        }
    }
}

impl<T: TableRow> TableState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query spec.
    pub fn spec(&self) -> &ViewSpec {
        &self.spec
    }

    /// Runs the query engine over `rows` with the current state.
    pub fn view<'a>(&self, rows: &'a [T]) -> ViewResult<'a, T> {
        query(rows, &self.spec)
    }

    pub fn text_filter(&self) -> &str {
        &self.spec.text_filter
    }

    pub fn set_text_filter(&mut self, text: impl Into<String>) {
        self.spec.text_filter = text.into();
        self.spec.page_index = 0;
    }

    pub fn clear_text_filter(&mut self) {
        self.set_text_filter(String::new());
    }

    pub fn facet_filter(&self) -> &BTreeSet<String> {
        &self.spec.facet_filter
    }

    /// Checks or unchecks one facet value and returns the active set.
    pub fn set_facet(&mut self, value: &str, checked: bool) -> &BTreeSet<String> {
        if checked {
            self.spec.facet_filter.insert(value.to_string());
        } else {
            self.spec.facet_filter.remove(value);
        }
        self.spec.page_index = 0;
        &self.spec.facet_filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.spec.sort
    }

    /// Header click on `column`.
    ///
    /// Returns `false` when the column cannot be sorted.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        match T::column(column) {
            Some(def) if def.sortable => {}
            _ => return false,
        }

        if self.spec.sort.column == column {
            self.spec.sort.descending = !self.spec.sort.descending;
        } else {
            self.spec.sort = SortSpec::ascending(column);
        }
        true
    }

    pub fn page_index(&self) -> usize {
        self.spec.page_index
    }

    pub fn page_size(&self) -> usize {
        self.spec.page_size
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.spec.page_index = page_index;
    }

    pub fn can_previous_page(&self) -> bool {
        self.spec.page_index > 0
    }

    pub fn can_next_page(&self, total_filtered_count: usize) -> bool {
        self.spec.page_index + 1 < self.page_count(total_filtered_count)
    }

    pub fn previous_page(&mut self) {
        self.spec.page_index = self.spec.page_index.saturating_sub(1);
    }

    pub fn next_page(&mut self, total_filtered_count: usize) {
        if self.can_next_page(total_filtered_count) {
            self.spec.page_index += 1;
        }
    }

    pub fn last_page(&mut self, total_filtered_count: usize) {
        self.spec.page_index = self.page_count(total_filtered_count).saturating_sub(1);
    }

    /// Changes the page size, keeping the current first row visible.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let first_row = self.spec.page_index * self.spec.page_size.max(1);
        self.spec.page_size = page_size;
        self.spec.page_index = first_row / page_size;
    }

    pub fn page_count(&self, total_filtered_count: usize) -> usize {
        total_filtered_count.div_ceil(self.spec.page_size.max(1))
    }

    pub fn is_column_visible(&self, column: &str) -> bool {
        self.spec.column_visibility.is_visible(column)
    }

    /// Returns `false` for unknown or non-hideable columns.
    pub fn set_column_visible(&mut self, column: &str, visible: bool) -> bool {
        match T::column(column) {
            Some(def) if def.hideable => {
                self.spec.column_visibility.set(column, visible);
                true
            }
            _ => false,
        }
    }

    /// Ids of columns offered in the "toggle columns" menu.
    pub fn hideable_columns(&self) -> Vec<&'static str> {
        T::columns()
            .iter()
            .filter(|column| column.hideable)
            .map(|column| column.id)
            .collect()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut RowSelection {
        &mut self.selection
    }
}
