//! Column definitions and row accessors for the console tables.

use crate::model::lead::Lead;
use crate::model::opportunity::Opportunity;

/// Static description of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub hideable: bool,
}

impl ColumnDef {
    const fn data(id: &'static str, header: &'static str) -> Self {
        Self {
            id,
            header,
            sortable: true,
            hideable: true,
        }
    }

    const fn pinned(id: &'static str, header: &'static str, sortable: bool) -> Self {
        Self {
            id,
            header,
            sortable,
            hideable: false,
        }
    }
}

pub const LEAD_COLUMNS: &[ColumnDef] = &[
    ColumnDef::pinned("select", "", false),
    ColumnDef::pinned("name", "Name", true),
    ColumnDef::data("email", "Email"),
    ColumnDef::data("company", "Company"),
    ColumnDef::data("source", "Source"),
    ColumnDef::data("score", "Score"),
    ColumnDef::data("status", "Status"),
    ColumnDef::pinned("actions", "Actions", false),
];

pub const OPPORTUNITY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::pinned("name", "Name", true),
    ColumnDef::data("amount", "Amount"),
    ColumnDef::data("accountName", "AccountName"),
    ColumnDef::data("stage", "Stage"),
];

/// Comparable cell value used for sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// Per-table row behavior consumed by the query engine.
pub trait TableRow {
    /// Columns in display order.
    fn columns() -> &'static [ColumnDef];

    /// Column whose values drive the facet filter and counts.
    fn facet_column() -> &'static str;

    fn row_id(&self) -> &str;

    /// Text matched by the free-text filter, before lowercasing.
    fn search_text(&self) -> String;

    fn facet_value(&self) -> &str;

    /// Value of `column` for sorting; `None` when the row has no value or
    /// the column is not a data column.
    fn sort_value(&self, column: &str) -> Option<SortValue<'_>>;

    /// Looks up a column definition by id.
    fn column(id: &str) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|column| column.id == id)
    }
}

impl TableRow for Lead {
    fn columns() -> &'static [ColumnDef] {
        LEAD_COLUMNS
    }

    fn facet_column() -> &'static str {
        "status"
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.company)
    }

    fn facet_value(&self) -> &str {
        self.status.as_str()
    }

    fn sort_value(&self, column: &str) -> Option<SortValue<'_>> {
        match column {
            "name" => Some(SortValue::Text(&self.name)),
            "email" => Some(SortValue::Text(&self.email)),
            "company" => Some(SortValue::Text(&self.company)),
            "source" => Some(SortValue::Text(&self.source)),
            "score" => Some(SortValue::Number(self.score)),
            "status" => Some(SortValue::Text(self.status.as_str())),
            _ => None,
        }
    }
}

impl TableRow for Opportunity {
    fn columns() -> &'static [ColumnDef] {
        OPPORTUNITY_COLUMNS
    }

    fn facet_column() -> &'static str {
        "stage"
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> String {
        self.name.clone()
    }

    fn facet_value(&self) -> &str {
        &self.stage
    }

    fn sort_value(&self, column: &str) -> Option<SortValue<'_>> {
        match column {
            "name" => Some(SortValue::Text(&self.name)),
            "amount" => self.amount.map(SortValue::Number),
            "accountName" => Some(SortValue::Text(&self.account_name)),
            "stage" => Some(SortValue::Text(&self.stage)),
            _ => None,
        }
    }
}
