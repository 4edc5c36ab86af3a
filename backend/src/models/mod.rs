//! Table model shared by the loader, the enricher and the serializer.
//!
//! Rows are JSON objects keyed by column name, the same representation the
//! parser has always produced, so columns can appear or disappear depending
//! on what was uploaded. Because a JSON map does not carry a column order,
//! [`Table`] keeps the authoritative order in [`Table::columns`].
//!
//! - [`Record`] - one row, column name → cell
//! - [`Table`] - ordered columns plus ordered rows
//! - [`FIXED_COLUMNS`] - the output schema, in declared order

use serde_json::{Map, Value};

// =============================================================================
// Output Schema
// =============================================================================

pub const COL_NO_ALL: &str = "No (All)";
pub const COL_NO: &str = "No";
pub const COL_MONTH: &str = "Month";
pub const COL_DOI: &str = "DOI";
pub const COL_JOURNAL_NAME: &str = "Journal Name";
pub const COL_YEAR_PUBLISHED: &str = "Year Published";
pub const COL_VOLUME: &str = "Volume";
pub const COL_ISSUES: &str = "Issues";
pub const COL_TYPES: &str = "Types";
pub const COL_PAGE: &str = "Page";
pub const COL_PAGE_START: &str = "Page (start)";
pub const COL_PAGE_END: &str = "Page (end)";
pub const COL_DOI_URL: &str = "DOI/URL";
pub const COL_PAPER_TITLE: &str = "Paper Title";
pub const COL_FULL_AUTHORS: &str = "Full Authors (Institution published)";

/// Input column copied into `Paper Title` and then dropped.
pub const COL_TITLE: &str = "Title";

/// Columns guaranteed in every enriched table, in output order.
pub const FIXED_COLUMNS: [&str; 15] = [
    COL_NO_ALL,
    COL_NO,
    COL_MONTH,
    COL_DOI,
    COL_JOURNAL_NAME,
    COL_YEAR_PUBLISHED,
    COL_VOLUME,
    COL_ISSUES,
    COL_TYPES,
    COL_PAGE,
    COL_PAGE_START,
    COL_PAGE_END,
    COL_DOI_URL,
    COL_PAPER_TITLE,
    COL_FULL_AUTHORS,
];

// =============================================================================
// Cells
// =============================================================================

/// One row of the table.
pub type Record = Map<String, Value>;

/// Render a cell as text. Null renders as the empty string.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// True for null cells and empty strings.
pub fn cell_is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Wrap an optional string as a cell.
pub fn text_or_null(value: Option<impl Into<String>>) -> Value {
    value.map(|v| Value::String(v.into())).unwrap_or(Value::Null)
}

// =============================================================================
// Table
// =============================================================================

/// Ordered rows with an explicit column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in output order.
    pub columns: Vec<String>,
    /// Rows in table order. Every row holds a key for every column.
    pub rows: Vec<Record>,
}

impl Table {
    /// Empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from JSON objects.
    ///
    /// Column order follows first appearance of each key across the records.
    /// Keys a record lacks are filled with null; non-object values are ignored.
    pub fn from_records(records: Vec<Value>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            if let Value::Object(obj) = record {
                for key in obj.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
                rows.push(obj);
            }
        }

        let mut table = Self { columns, rows };
        table.fill_missing_cells();
        table
    }

    /// Append a row, filling absent columns with null.
    pub fn push_row(&mut self, mut row: Record) {
        for col in &self.columns {
            row.entry(col.clone()).or_insert(Value::Null);
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Add a column at the end, filling every row with `fill`.
    /// Does nothing if the column already exists.
    pub fn add_column(&mut self, name: &str, fill: Value) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.insert(name.to_string(), fill.clone());
        }
    }

    /// Remove a column and its cells. Returns whether it existed.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != name);
        if self.columns.len() == before {
            return false;
        }
        for row in &mut self.rows {
            row.remove(name);
        }
        true
    }

    /// Move `leading` to the front in the given order; the remaining columns
    /// keep their relative order after them. Names in `leading` that are not
    /// columns are ignored.
    pub fn reorder(&mut self, leading: &[&str]) {
        let mut ordered: Vec<String> = leading
            .iter()
            .filter(|name| self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        ordered.extend(
            self.columns
                .iter()
                .filter(|c| !leading.contains(&c.as_str()))
                .cloned(),
        );
        self.columns = ordered;
    }

    /// Cells of one column, in row order. Null for missing keys.
    pub fn column_values(&self, name: &str) -> Vec<&Value> {
        static NULL: Value = Value::Null;
        self.rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&NULL))
            .collect()
    }

    /// Rows as a JSON array of objects, keys in column order.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let ordered: Record = self
                        .columns
                        .iter()
                        .map(|col| (col.clone(), row.get(col).cloned().unwrap_or(Value::Null)))
                        .collect();
                    Value::Object(ordered)
                })
                .collect(),
        )
    }

    fn fill_missing_cells(&mut self) {
        for row in &mut self.rows {
            for col in &self.columns {
                row.entry(col.clone()).or_insert(Value::Null);
            }
        }
    }
}
