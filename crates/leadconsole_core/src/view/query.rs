//! Pure filter/facet/sort/paginate transform.
//!
//! # Invariants
//! - Steps run in a fixed order: text filter, facet filter, sort, page.
//! - Facet counts are taken after the text filter, before the facet filter.
//! - Sorting is stable; rows without a value sort last in both directions.

use super::columns::{SortValue, TableRow};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SORT_COLUMN: &str = "name";

/// Active sort: exactly one column, ascending or descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::ascending(DEFAULT_SORT_COLUMN)
    }
}

/// Column visibility overrides; columns not listed are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    pub fn is_visible(&self, column: &str) -> bool {
        self.0.get(column).copied().unwrap_or(true)
    }

    pub fn set(&mut self, column: impl Into<String>, visible: bool) {
        self.0.insert(column.into(), visible);
    }
}

/// Declarative table query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    pub text_filter: String,
    /// Accepted values of the table's facet column; empty accepts all.
    pub facet_filter: BTreeSet<String>,
    pub sort: SortSpec,
    pub page_index: usize,
    /// Rows per page; zero is treated as one.
    pub page_size: usize,
    pub column_visibility: ColumnVisibility,
}

impl Default for ViewSpec {
    fn default() -> Self {
        Self {
            text_filter: String::new(),
            facet_filter: BTreeSet::new(),
            sort: SortSpec::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            column_visibility: ColumnVisibility::default(),
        }
    }
}

/// Output of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<'a, T> {
    pub page_rows: Vec<&'a T>,
    /// Rows passing both filters, across all pages.
    pub total_filtered_count: usize,
    /// Facet value -> rows passing the text filter with that value.
    pub facet_counts: BTreeMap<String, usize>,
    pub page_count: usize,
    /// Column ids to render, in declaration order.
    pub visible_columns: Vec<&'static str>,
}

impl<T> ViewResult<'_, T> {
    /// Count for one facet value, zero when absent.
    pub fn facet_count(&self, value: &str) -> usize {
        self.facet_counts.get(value).copied().unwrap_or(0)
    }
}

/// Derives the visible page of `rows` for `spec`.
pub fn query<'a, T: TableRow>(rows: &'a [T], spec: &ViewSpec) -> ViewResult<'a, T> {
    let needle = spec.text_filter.to_lowercase();
    let text_matched: Vec<&T> = rows
        .iter()
        .filter(|row| row.search_text().to_lowercase().contains(&needle))
        .collect();

    let mut facet_counts = BTreeMap::new();
    for row in &text_matched {
        *facet_counts
            .entry(row.facet_value().to_string())
            .or_insert(0) += 1;
    }

    let mut filtered: Vec<&T> = text_matched
        .into_iter()
        .filter(|row| {
            spec.facet_filter.is_empty() || spec.facet_filter.contains(row.facet_value())
        })
        .collect();
    sort_rows(&mut filtered, &spec.sort);

    let total_filtered_count = filtered.len();
    let page_size = spec.page_size.max(1);
    let start = spec.page_index.saturating_mul(page_size);
    let page_rows = filtered.into_iter().skip(start).take(page_size).collect();

    ViewResult {
        page_rows,
        total_filtered_count,
        facet_counts,
        page_count: total_filtered_count.div_ceil(page_size),
        visible_columns: visible_columns::<T>(&spec.column_visibility),
    }
}

fn visible_columns<T: TableRow>(visibility: &ColumnVisibility) -> Vec<&'static str> {
    T::columns()
        .iter()
        .filter(|column| !column.hideable || visibility.is_visible(column.id))
        .map(|column| column.id)
        .collect()
}

fn sort_rows<T: TableRow>(rows: &mut [&T], sort: &SortSpec) {
    match T::column(&sort.column) {
        Some(column) if column.sortable => {}
        _ => return,
    }

    rows.sort_by(|a, b| {
        compare_values(
            a.sort_value(&sort.column),
            b.sort_value(&sort.column),
            sort.descending,
        )
    });
}

fn compare_values(a: Option<SortValue<'_>>, b: Option<SortValue<'_>>, descending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_present(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn compare_present(a: SortValue<'_>, b: SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(&b),
        (SortValue::Text(a), SortValue::Text(b)) => compare_alphanumeric(a, b),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

/// Case-insensitive natural comparison: digit runs compare by value.
fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_chunks = split_digit_runs(&a);
    let b_chunks = split_digit_runs(&b);

    for (left, right) in a_chunks.iter().zip(b_chunks.iter()) {
        let ordering = if is_digit_run(left) && is_digit_run(right) {
            compare_digit_runs(left, right)
        } else {
            left.cmp(right)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

fn split_digit_runs(value: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut previous_digit = None;

    for (index, ch) in value.char_indices() {
        let digit = ch.is_ascii_digit();
        if previous_digit.is_some_and(|previous| previous != digit) {
            chunks.push(&value[start..index]);
            start = index;
        }
        previous_digit = Some(digit);
    }
    if start < value.len() {
        chunks.push(&value[start..]);
    }
    chunks
}

fn is_digit_run(chunk: &str) -> bool {
    chunk.bytes().all(|byte| byte.is_ascii_digit())
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}
