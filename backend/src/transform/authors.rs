//! Author list aggregation.
//!
//! Uploads carry one column triple per author slot:
//! `Given Name (Author i)`, `Family Name (Author i)`, `Affiliation (Author i)`,
//! for i = 1, 2, 3, … Slots are read in order until a triple is incomplete,
//! and each row's contributions are folded into a single
//! `"Jane Doe (MIT), John Roe"` style string.

use serde_json::Value;

use crate::models::{cell_to_string, Record, Table};

/// Separator between authors in the aggregated value.
pub const AUTHOR_SEPARATOR: &str = ", ";

/// Column names for one author slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorColumns {
    pub given: String,
    pub family: String,
    pub affiliation: String,
}

impl AuthorColumns {
    pub fn for_slot(slot: usize) -> Self {
        Self {
            given: format!("Given Name (Author {})", slot),
            family: format!("Family Name (Author {})", slot),
            affiliation: format!("Affiliation (Author {})", slot),
        }
    }

    fn present_in(&self, table: &Table) -> bool {
        table.has_column(&self.given)
            && table.has_column(&self.family)
            && table.has_column(&self.affiliation)
    }

    /// `"<given> <family> (<affiliation>)"` for one row.
    pub fn compose(&self, row: &Record) -> String {
        compose_author(
            &text_cell(row, &self.given),
            &text_cell(row, &self.family),
            &text_cell(row, &self.affiliation),
        )
    }
}

/// Consecutive complete author slots, starting at 1.
pub fn author_slots(table: &Table) -> Vec<AuthorColumns> {
    (1..)
        .map(AuthorColumns::for_slot)
        .take_while(|cols| cols.present_in(table))
        .collect()
}

/// One author's contribution. Empty when every part is empty.
pub fn compose_author(given: &str, family: &str, affiliation: &str) -> String {
    let name = format!("{} {}", given, family);
    let name = name.trim();
    if affiliation.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, affiliation).trim().to_string()
    }
}

/// Append a contribution, skipping empty ones.
pub fn append_author(acc: &mut String, contribution: &str) {
    if contribution.is_empty() {
        return;
    }
    if !acc.is_empty() {
        acc.push_str(AUTHOR_SEPARATOR);
    }
    acc.push_str(contribution);
}

/// Strip leading and trailing commas and spaces.
pub fn trim_separators(value: &str) -> &str {
    value.trim_matches(|c: char| c == ',' || c == ' ')
}

/// Fold every slot of `row` onto `start`. Separators are trimmed after each
/// author, so a trailing comma inside one contribution never doubles up.
pub fn aggregate_row(start: &str, row: &Record, slots: &[AuthorColumns]) -> String {
    let mut acc = trim_separators(start).to_string();
    for slot in slots {
        append_author(&mut acc, &slot.compose(row));
        acc = trim_separators(&acc).to_string();
    }
    acc
}

fn text_cell(row: &Record, column: &str) -> String {
    row.get(column).map(cell_to_string).unwrap_or_default()
}

/// Fill `column` of every row with its aggregated author list.
pub fn aggregate_into(table: &mut Table, column: &str) {
    let slots = author_slots(table);
    for row in &mut table.rows {
        let start = text_cell(row, column);
        let authors = aggregate_row(&start, row, &slots);
        row.insert(column.to_string(), Value::String(authors));
    }
}
